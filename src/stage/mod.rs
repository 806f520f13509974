//! Stage - the top-level coordinator.
//!
//! One stage owns one token pool, the zones created against it, and the
//! timeline that fires animation completions. It is the unit of
//! coordinate-space isolation: two stages never share coordinates, tokens,
//! or zones.
//!
//! ## Driving the stage
//!
//! The stage never blocks and never spawns threads. The host:
//!
//! 1. calls choreography operations (`spawn`, `transfer_card`, ...), which
//!    return immediately;
//! 2. calls [`Stage::tick`] with a monotonic millisecond timestamp so due
//!    completions fire;
//! 3. calls [`Stage::handle_resize`] when the container's geometry changes;
//! 4. drains dirty tokens ([`Stage::drain_dirty`]) and presents their
//!    visual state.
//!
//! Everything is confined to the host's single thread; no internal
//! synchronization exists or is needed.

mod timeline;
pub mod transfer;

use kurbo::Rect;

use crate::core::config::StageConfig;
use crate::core::geometry::StageGeometry;
use crate::core::ids::{TokenId, ZoneId};
use crate::layout::{LayoutCtx, LayoutMode, Strategy};
use crate::tokens::{CardFace, CardRenderer, CardType, Token, TokenPool};
use crate::zones::Zone;

use timeline::Timeline;
use transfer::{
    CompletionFn, DiscardOptions, DrawOptions, PendingAction, TransferFlight, TransferOptions,
    TransferPhase,
};

fn layout_ctx<'a>(
    config: &'a StageConfig,
    geometry: &'a StageGeometry,
    mode: LayoutMode,
) -> LayoutCtx<'a> {
    LayoutCtx {
        config,
        geometry,
        mode,
    }
}

/// Top-level engine owning one pool and its zones.
pub struct Stage {
    config: StageConfig,
    geometry: StageGeometry,
    pool: TokenPool,
    zones: Vec<Zone>,
    renderer: Option<CardRenderer>,
    timeline: Timeline,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("config", &self.config)
            .field("geometry", &self.geometry)
            .field("zones", &self.zones.len())
            .field("tokens", &self.pool.slot_count())
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl Stage {
    /// Create a stage over the given container geometry.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (non-positive card
    /// dimensions) - a stage that can't center a card can't do anything.
    #[must_use]
    pub fn new(config: StageConfig, geometry: StageGeometry) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid stage configuration: {err}");
        }
        Self {
            config,
            geometry,
            pool: TokenPool::new(),
            zones: Vec::new(),
            renderer: None,
            timeline: Timeline::new(),
        }
    }

    /// Register the callback that populates card faces.
    ///
    /// Invoked whenever a token's type is set. Without one, faces fall back
    /// to the type's text.
    pub fn set_card_renderer(&mut self, f: impl FnMut(&mut CardFace, &CardType) + 'static) {
        self.renderer = Some(Box::new(f));
    }

    /// The stage configuration.
    #[must_use]
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// The current container geometry.
    #[must_use]
    pub fn geometry(&self) -> &StageGeometry {
        &self.geometry
    }

    /// Read access to the token pool.
    #[must_use]
    pub fn pool(&self) -> &TokenPool {
        &self.pool
    }

    /// Completions still waiting on the timeline.
    #[must_use]
    pub fn pending_animations(&self) -> usize {
        self.timeline.pending()
    }

    /// Current animation clock time in ms (the latest timestamp passed to
    /// [`Stage::tick`]).
    #[must_use]
    pub fn now(&self) -> u64 {
        self.timeline.now()
    }

    // -- Zones --

    /// Create a zone over `anchor` with the given strategy and register it
    /// for global re-layout.
    pub fn create_zone(&mut self, anchor: Rect, strategy: Strategy) -> ZoneId {
        let id = ZoneId::new(self.zones.len() as u16);
        tracing::debug!(zone = %id, kind = %strategy.kind(), "zone created");
        self.zones.push(Zone::new(id, anchor, strategy));
        id
    }

    /// Look up a zone.
    #[must_use]
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.raw() as usize)
    }

    /// All zones in creation order.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Update a zone's anchor rectangle (the anchor element moved or
    /// resized). Takes effect on the next layout pass.
    pub fn set_zone_anchor(&mut self, id: ZoneId, anchor: Rect) {
        match self.zones.get_mut(id.raw() as usize) {
            Some(zone) => zone.set_anchor(anchor),
            None => tracing::warn!(zone = %id, "set_zone_anchor on unknown zone"),
        }
    }

    /// Append `token` to a zone and re-layout its members.
    pub fn add_to_zone(&mut self, id: ZoneId, token: TokenId) {
        let ctx = layout_ctx(&self.config, &self.geometry, LayoutMode::Animated);
        match self.zones.get_mut(id.raw() as usize) {
            Some(zone) => zone.add(token, &mut self.pool, &ctx),
            None => tracing::warn!(zone = %id, "add_to_zone on unknown zone"),
        }
    }

    /// Remove zone members at `indices` (applied descending; missing
    /// indices are ignored). Returns the removed tokens in removal order.
    pub fn remove_indices(&mut self, id: ZoneId, indices: &[usize]) -> Vec<TokenId> {
        let ctx = layout_ctx(&self.config, &self.geometry, LayoutMode::Animated);
        match self.zones.get_mut(id.raw() as usize) {
            Some(zone) => zone.remove_indices(indices, &mut self.pool, &ctx),
            None => Vec::new(),
        }
    }

    /// Remove the first occurrence of `token` from a zone. Returns whether
    /// it was found.
    pub fn remove_token(&mut self, id: ZoneId, token: TokenId) -> bool {
        let ctx = layout_ctx(&self.config, &self.geometry, LayoutMode::Animated);
        match self.zones.get_mut(id.raw() as usize) {
            Some(zone) => zone.remove_token(token, &mut self.pool, &ctx),
            None => false,
        }
    }

    /// Remove and return every member of a zone.
    pub fn clear_zone(&mut self, id: ZoneId) -> Vec<TokenId> {
        let ctx = layout_ctx(&self.config, &self.geometry, LayoutMode::Animated);
        match self.zones.get_mut(id.raw() as usize) {
            Some(zone) => zone.clear(&mut self.pool, &ctx),
            None => Vec::new(),
        }
    }

    /// Add `token` to a zone, playing its teleport-in effect when the zone
    /// is flow-positioned; otherwise the add completes immediately.
    pub fn add_with_teleport(
        &mut self,
        id: ZoneId,
        token: TokenId,
        duration: Option<u64>,
        on_complete: Option<CompletionFn>,
    ) {
        let Some(zone) = self.zones.get_mut(id.raw() as usize) else {
            tracing::warn!(zone = %id, "add_with_teleport on unknown zone");
            return;
        };
        let is_flow = zone.is_flow();
        let ctx = layout_ctx(&self.config, &self.geometry, LayoutMode::Animated);
        zone.add(token, &mut self.pool, &ctx);

        if is_flow {
            if let Some(t) = self.pool.get_mut(token) {
                t.begin_teleport_in();
            }
            let dur = duration.unwrap_or(self.config.teleport_duration);
            self.timeline
                .schedule(dur, PendingAction::TeleportInDone { token, on_complete });
        } else if let Some(cb) = on_complete {
            cb(self, token);
        }
    }

    // -- Token lifecycle (thin pool delegation) --

    /// Spawn a coordinate-positioned token, optionally placed instantly on
    /// an anchor.
    pub fn spawn(
        &mut self,
        card_type: impl Into<CardType>,
        anchor: Option<Rect>,
        flipped: bool,
    ) -> TokenId {
        self.pool.spawn(
            card_type.into(),
            anchor,
            flipped,
            self.renderer.as_mut(),
            &self.config,
            &self.geometry,
        )
    }

    /// Spawn a token directly into a flow zone's container.
    pub fn spawn_into_flow(
        &mut self,
        card_type: impl Into<CardType>,
        zone: ZoneId,
        flipped: bool,
    ) -> TokenId {
        self.pool
            .spawn_into_container(card_type.into(), zone, flipped, self.renderer.as_mut())
    }

    /// Return a token to the pool.
    pub fn despawn(&mut self, token: TokenId) {
        self.pool.despawn(token);
    }

    // -- Token operations --

    /// Borrow a live token's visual state.
    #[must_use]
    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.pool.get(id)
    }

    /// Mutably borrow a live token for direct state manipulation
    /// (`set_flow_mode`, `reset_teleport_state`, ...).
    #[must_use]
    pub fn token_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.pool.get_mut(id)
    }

    /// Set a token's card type, re-rendering its face.
    pub fn set_card_type(&mut self, id: TokenId, card_type: impl Into<CardType>) {
        match self.pool.get_mut(id) {
            Some(token) => token.set_type(Some(card_type.into()), self.renderer.as_mut()),
            None => tracing::warn!(token = %id, "set_card_type on stale token"),
        }
    }

    /// Set a token's face-up/face-down state.
    pub fn set_flipped(&mut self, id: TokenId, flipped: bool) {
        if let Some(token) = self.pool.get_mut(id) {
            token.set_flipped(flipped);
        }
    }

    /// Animate a token toward a position. No-op for flow-mode tokens.
    pub fn move_to(&mut self, id: TokenId, x: f64, y: f64, rotation: f64) {
        if let Some(token) = self.pool.get_mut(id) {
            token.move_to(x, y, rotation);
        }
    }

    /// Animate a token onto an anchor's center. No-op for flow-mode tokens.
    pub fn move_to_anchor(&mut self, id: TokenId, anchor: Rect, rotation: f64) {
        if let Some(token) = self.pool.get_mut(id) {
            token.move_to_anchor(anchor, rotation, &self.config, &self.geometry);
        }
    }

    /// Place a token instantly. No-op for flow-mode tokens.
    pub fn jump_to(&mut self, id: TokenId, x: f64, y: f64) {
        if let Some(token) = self.pool.get_mut(id) {
            token.jump_to(x, y);
        }
    }

    /// Place a token instantly on an anchor's center. No-op for flow-mode
    /// tokens.
    pub fn jump_to_anchor(&mut self, id: TokenId, anchor: Rect) {
        if let Some(token) = self.pool.get_mut(id) {
            token.jump_to_anchor(anchor, &self.config, &self.geometry);
        }
    }

    /// Play a token's float/fade-out effect, invoking `on_complete` after
    /// `duration` (default: the configured teleport duration).
    pub fn teleport_out(
        &mut self,
        id: TokenId,
        duration: Option<u64>,
        on_complete: Option<CompletionFn>,
    ) {
        let Some(token) = self.pool.get_mut(id) else {
            tracing::warn!(token = %id, "teleport_out on stale token");
            return;
        };
        token.begin_teleport_out();
        let dur = duration.unwrap_or(self.config.teleport_duration);
        self.timeline.schedule(
            dur,
            PendingAction::TeleportOutDone {
                token: id,
                on_complete,
            },
        );
    }

    /// Play a token's drop/fade-in effect, invoking `on_complete` after
    /// `duration` (default: the configured teleport duration).
    pub fn teleport_in(
        &mut self,
        id: TokenId,
        duration: Option<u64>,
        on_complete: Option<CompletionFn>,
    ) {
        let Some(token) = self.pool.get_mut(id) else {
            tracing::warn!(token = %id, "teleport_in on stale token");
            return;
        };
        token.begin_teleport_in();
        let dur = duration.unwrap_or(self.config.teleport_duration);
        self.timeline.schedule(
            dur,
            PendingAction::TeleportInDone {
                token: id,
                on_complete,
            },
        );
    }

    // -- Choreography --

    /// Move a token between zones.
    ///
    /// When neither zone is flow-positioned this is a same-identity move:
    /// the token leaves `from`, optionally flips, and animates into its
    /// slot in `to`; the same handle remains valid and is returned.
    ///
    /// When either zone is flow-positioned, coordinate animation can't
    /// bridge the two positioning models, so the engine performs a
    /// *teleport replace*: the original token animates out, is despawned,
    /// and a new token of the same type and flip state is spawned into the
    /// destination. Returns `None` in that case; the replacement handle is
    /// delivered through the completion callback, and the original handle
    /// must not be used afterwards.
    pub fn transfer_card(
        &mut self,
        token: TokenId,
        from: ZoneId,
        to: ZoneId,
        opts: TransferOptions,
    ) -> Option<TokenId> {
        let Some(current) = self.pool.get(token) else {
            tracing::warn!(token = %token, "transfer_card on stale token");
            return None;
        };
        let card_type = current
            .card_type()
            .cloned()
            .unwrap_or_else(|| CardType::new(""));
        let flipped = opts.flip.unwrap_or(current.flipped());

        let from_flow = self.zone(from).is_some_and(Zone::is_flow);
        let to_flow = self.zone(to).is_some_and(Zone::is_flow);
        tracing::debug!(token = %token, from = %from, to = %to, teleport = from_flow || to_flow, "transfer");

        self.remove_token(from, token);

        if !from_flow && !to_flow {
            if let Some(flip) = opts.flip {
                self.set_flipped(token, flip);
            }
            self.add_to_zone(to, token);
            if let Some(cb) = opts.on_complete {
                let dur = opts.duration.unwrap_or(self.config.move_duration);
                self.timeline.schedule(
                    dur,
                    PendingAction::MoveDone {
                        token,
                        on_complete: Some(cb),
                    },
                );
            }
            return Some(token);
        }

        // Teleport replace: out, despawn, respawn on the far side, in.
        let dur = opts.duration.unwrap_or(self.config.teleport_duration);
        if let Some(t) = self.pool.get_mut(token) {
            t.begin_teleport_out();
        }
        self.timeline.schedule(
            dur,
            PendingAction::TransferStep(TransferFlight {
                phase: TransferPhase::AnimatingOut,
                token,
                card_type,
                flipped,
                to,
                duration: dur,
                on_complete: opts.on_complete,
            }),
        );
        None
    }

    /// Spawn a new card and animate it into a zone.
    ///
    /// The card takes its flow or coordinate form from the destination. A
    /// `source_anchor` gives coordinate spawns their starting position (the
    /// deck the card visually comes from).
    pub fn draw_card(
        &mut self,
        card_type: impl Into<CardType>,
        source_anchor: Option<Rect>,
        to: ZoneId,
        opts: DrawOptions,
    ) -> TokenId {
        let to_flow = self.zone(to).is_some_and(Zone::is_flow);
        let token = if to_flow {
            self.spawn_into_flow(card_type, to, opts.flipped)
        } else {
            self.spawn(card_type, source_anchor, opts.flipped)
        };
        tracing::debug!(token = %token, to = %to, "draw");
        self.add_with_teleport(to, token, opts.duration, opts.on_complete);
        token
    }

    /// Remove a token from its zone and retire it.
    ///
    /// Flow zones play the teleport-out effect before despawning. For
    /// coordinate zones the token animates to `dest_anchor` (when given)
    /// and despawns after a configurable delay.
    pub fn discard_card(
        &mut self,
        token: TokenId,
        from: ZoneId,
        dest_anchor: Option<Rect>,
        opts: DiscardOptions,
    ) {
        let from_flow = self.zone(from).is_some_and(Zone::is_flow);
        tracing::debug!(token = %token, from = %from, "discard");
        self.remove_token(from, token);

        if from_flow {
            let dur = opts.duration.unwrap_or(self.config.teleport_duration);
            let Some(t) = self.pool.get_mut(token) else {
                tracing::warn!(token = %token, "discard_card on stale token");
                return;
            };
            t.begin_teleport_out();
            self.timeline.schedule(
                dur,
                PendingAction::DiscardDespawn {
                    token,
                    on_complete: opts.on_complete,
                },
            );
        } else {
            if let Some(anchor) = dest_anchor {
                self.move_to_anchor(token, anchor, 0.0);
            }
            let delay = opts
                .despawn_delay
                .or(opts.duration)
                .unwrap_or(self.config.move_duration);
            self.timeline.schedule(
                delay,
                PendingAction::DiscardDespawn {
                    token,
                    on_complete: opts.on_complete,
                },
            );
        }
    }

    // -- Global passes --

    /// Re-run layout on every zone (animated).
    pub fn render_all(&mut self) {
        let ctx = layout_ctx(&self.config, &self.geometry, LayoutMode::Animated);
        for zone in &self.zones {
            zone.render(&mut self.pool, &ctx);
        }
    }

    /// React to a container resize: adopt the new geometry and re-lay out
    /// every zone instantly, with no transition.
    ///
    /// Zone anchors that moved with the resize should be updated first via
    /// [`Stage::set_zone_anchor`]. Coalescing rapid resizes is the host's
    /// concern.
    pub fn handle_resize(&mut self, geometry: StageGeometry) {
        tracing::debug!(?geometry, "resize");
        self.geometry = geometry;
        let ctx = layout_ctx(&self.config, &self.geometry, LayoutMode::Instant);
        for zone in &self.zones {
            zone.render(&mut self.pool, &ctx);
        }
    }

    /// Advance the animation clock and fire every completion now due.
    ///
    /// `now_ms` is a monotonic host timestamp; the clock never rewinds.
    /// Completions scheduled by firing callbacks with zero delay run within
    /// the same tick.
    pub fn tick(&mut self, now_ms: u64) {
        loop {
            let due = self.timeline.advance(now_ms);
            if due.is_empty() {
                break;
            }
            for action in due {
                self.run_action(action);
            }
        }
    }

    /// Slot indices whose visual state changed since the last drain, for
    /// the presenter to re-read through [`TokenPool::slot`].
    pub fn drain_dirty(&mut self) -> Vec<u32> {
        self.pool.drain_dirty()
    }

    // -- Completion execution --

    /// Fire one scheduled completion.
    ///
    /// Entries are never cancelled, so each firing revalidates its token:
    /// a handle gone stale since scheduling (despawned, or recycled onto a
    /// new occupant) turns the completion into a logged no-op.
    fn run_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::TransferStep(flight) => self.run_transfer_step(flight),
            PendingAction::TeleportOutDone { token, on_complete } => {
                if !self.pool.is_alive(token) {
                    tracing::warn!(token = %token, "teleport-out completion on stale token");
                    return;
                }
                if let Some(cb) = on_complete {
                    cb(self, token);
                }
            }
            PendingAction::TeleportInDone { token, on_complete } => {
                let Some(t) = self.pool.get_mut(token) else {
                    tracing::warn!(token = %token, "teleport-in completion on stale token");
                    return;
                };
                t.finish_teleport();
                if let Some(cb) = on_complete {
                    cb(self, token);
                }
            }
            PendingAction::MoveDone { token, on_complete } => {
                if !self.pool.is_alive(token) {
                    tracing::warn!(token = %token, "move completion on stale token");
                    return;
                }
                if let Some(cb) = on_complete {
                    cb(self, token);
                }
            }
            PendingAction::DiscardDespawn { token, on_complete } => {
                if !self.pool.despawn(token) {
                    return;
                }
                if let Some(cb) = on_complete {
                    cb(self);
                }
            }
        }
    }

    fn run_transfer_step(&mut self, mut flight: TransferFlight) {
        match flight.phase {
            TransferPhase::AnimatingOut => {
                // Despawned / Respawning happen synchronously here.
                if !self.pool.despawn(flight.token) {
                    tracing::warn!(token = %flight.token, "transfer aborted: token recycled mid-flight");
                    return;
                }
                let to_flow = self.zone(flight.to).is_some_and(Zone::is_flow);
                let replacement = if to_flow {
                    self.pool.spawn_into_container(
                        flight.card_type.clone(),
                        flight.to,
                        flight.flipped,
                        self.renderer.as_mut(),
                    )
                } else {
                    self.pool.spawn(
                        flight.card_type.clone(),
                        None,
                        flight.flipped,
                        self.renderer.as_mut(),
                        &self.config,
                        &self.geometry,
                    )
                };
                tracing::debug!(old = %flight.token, new = %replacement, "transfer respawned");

                let ctx = layout_ctx(&self.config, &self.geometry, LayoutMode::Animated);
                if let Some(zone) = self.zones.get_mut(flight.to.raw() as usize) {
                    zone.add(replacement, &mut self.pool, &ctx);
                }

                flight.token = replacement;
                if to_flow {
                    if let Some(t) = self.pool.get_mut(replacement) {
                        t.begin_teleport_in();
                    }
                    flight.phase = TransferPhase::AnimatingIn;
                    let dur = flight.duration;
                    self.timeline.schedule(dur, PendingAction::TransferStep(flight));
                } else if let Some(cb) = flight.on_complete {
                    cb(self, replacement);
                }
            }
            TransferPhase::AnimatingIn => {
                let Some(t) = self.pool.get_mut(flight.token) else {
                    tracing::warn!(token = %flight.token, "transfer aborted: replacement recycled mid-flight");
                    return;
                };
                t.finish_teleport();
                if let Some(cb) = flight.on_complete {
                    cb(self, flight.token);
                }
            }
        }
    }
}
