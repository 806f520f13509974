//! Token pool - recycled visual actors.
//!
//! Creating a visual element is the expensive operation in this system, so
//! the pool never destroys one. Despawned tokens are hidden and pushed on a
//! free list; the next spawn reuses a free slot, resetting the state that
//! must not leak across occupants (type, flip, flow mode, teleport classes).
//! The slot vector grows monotonically for the life of the stage.
//!
//! Each slot carries a generation counter, bumped at despawn, so handles
//! retained past a token's lifetime are detected instead of silently
//! operating on the slot's next occupant.

use kurbo::Rect;

use crate::core::config::StageConfig;
use crate::core::geometry::StageGeometry;
use crate::core::ids::{TokenId, ZoneId};

use super::face::{CardRenderer, CardType};
use super::token::{Parent, Token};

/// Pool of all tokens ever created for one stage.
#[derive(Debug, Default)]
pub struct TokenPool {
    tokens: Vec<Token>,
    generation: Vec<u32>,
    in_use: Vec<bool>,
    free_list: Vec<u32>,
}

impl TokenPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a token positioned by stage coordinates.
    ///
    /// Reuses a free slot when one exists, creating a new one otherwise.
    /// The token comes back visible, face-up or face-down per `flipped`,
    /// with its front face rendered for `card_type`. With an `anchor`, the
    /// token is placed on the anchor's center instantly (no travel
    /// animation).
    pub fn spawn(
        &mut self,
        card_type: CardType,
        anchor: Option<Rect>,
        flipped: bool,
        renderer: Option<&mut CardRenderer>,
        config: &StageConfig,
        geometry: &StageGeometry,
    ) -> TokenId {
        let id = self.activate(card_type, flipped, renderer);
        let token = &mut self.tokens[id.index() as usize];
        token.set_parent(Parent::Stage);
        if let Some(anchor) = anchor {
            token.jump_to_anchor(anchor, config, geometry);
        }
        tracing::debug!(token = %id, "spawned");
        id
    }

    /// Spawn a token into a flow container.
    ///
    /// The token's element is parented into the container identified by
    /// `container` and flow mode is enabled: the container, not coordinate
    /// math, determines its placement.
    pub fn spawn_into_container(
        &mut self,
        card_type: CardType,
        container: ZoneId,
        flipped: bool,
        renderer: Option<&mut CardRenderer>,
    ) -> TokenId {
        let id = self.activate(card_type, flipped, renderer);
        let token = &mut self.tokens[id.index() as usize];
        token.set_parent(Parent::Container(container));
        token.set_flow_mode(true);
        tracing::debug!(token = %id, container = %container, "spawned into flow");
        id
    }

    /// Return a token to the free set.
    ///
    /// Hides it, disables flow mode, clears teleport state, re-parents it
    /// back under the stage, and bumps the slot generation so the handle
    /// (and any copies of it) go stale. Despawning an already-stale handle
    /// is a logged no-op.
    pub fn despawn(&mut self, id: TokenId) -> bool {
        if !self.is_alive(id) {
            tracing::warn!(token = %id, "despawn of stale token ignored");
            return false;
        }
        let idx = id.index() as usize;
        let token = &mut self.tokens[idx];
        token.set_visible(false);
        token.set_flow_mode(false);
        token.reset_teleport_state();
        token.set_parent(Parent::Stage);
        token.set_type(None, None);

        self.generation[idx] += 1;
        self.in_use[idx] = false;
        self.free_list.push(id.index());
        tracing::debug!(token = %id, "despawned");
        true
    }

    /// Whether the handle refers to a live token.
    #[must_use]
    pub fn is_alive(&self, id: TokenId) -> bool {
        let idx = id.index() as usize;
        idx < self.tokens.len() && self.in_use[idx] && self.generation[idx] == id.generation()
    }

    /// Borrow a live token.
    #[must_use]
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        if self.is_alive(id) {
            Some(&self.tokens[id.index() as usize])
        } else {
            None
        }
    }

    /// Mutably borrow a live token.
    #[must_use]
    pub fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        if self.is_alive(id) {
            Some(&mut self.tokens[id.index() as usize])
        } else {
            None
        }
    }

    /// Total slots ever created.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.tokens.len()
    }

    /// Tokens currently spawned.
    #[must_use]
    pub fn in_use_count(&self) -> usize {
        self.tokens.len() - self.free_list.len()
    }

    /// Tokens available for reuse.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Slot indices whose visual state changed since the last drain.
    ///
    /// Includes freed slots (a despawn changes visibility), so presenters
    /// read them through [`slot`](Self::slot) rather than a live handle.
    pub fn drain_dirty(&mut self) -> Vec<u32> {
        let mut dirty = Vec::new();
        for (idx, token) in self.tokens.iter_mut().enumerate() {
            if token.take_dirty() {
                dirty.push(idx as u32);
            }
        }
        dirty
    }

    /// Read a slot by raw index, skipping liveness validation.
    ///
    /// Only use with indices that came from [`drain_dirty`](Self::drain_dirty).
    #[must_use]
    pub fn slot(&self, idx: u32) -> Option<&Token> {
        self.tokens.get(idx as usize)
    }

    // -- Internals --

    fn activate(
        &mut self,
        card_type: CardType,
        flipped: bool,
        renderer: Option<&mut CardRenderer>,
    ) -> TokenId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.in_use[idx as usize] = true;
            idx
        } else {
            let idx = self.tokens.len() as u32;
            self.tokens.push(Token::new());
            self.generation.push(0);
            self.in_use.push(true);
            idx
        };

        let token = &mut self.tokens[idx as usize];
        token.reset_teleport_state();
        token.set_flow_mode(false);
        token.set_z_index(0);
        token.set_type(Some(card_type), renderer);
        token.set_flipped(flipped);
        token.set_visible(true);

        TokenId::new(idx, self.generation[idx as usize])
    }
}
