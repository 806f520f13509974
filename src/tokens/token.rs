//! Token - a positionable, flippable visual actor.
//!
//! A token owns the visual state of one card: stage-relative position,
//! rotation, flip, z-order, visibility, parent attachment, and the
//! transition class flags the external styling layer animates. The visual
//! transform is always derived from the current fields, so a presenter
//! reading a token never sees a stale render.
//!
//! ## Flow mode
//!
//! A flow-mode token is laid out by its surrounding container, not by
//! coordinate math. Every position-affecting operation is a no-op while
//! `flow_mode` is set; entering flow mode resets position and rotation to
//! neutral.

use kurbo::{Point, Rect, Vec2};

use crate::core::config::StageConfig;
use crate::core::geometry::{half_extent, relative_position, StageGeometry};
use crate::core::ids::ZoneId;

use super::face::{CardFace, CardRenderer, CardType};

/// Where a token's visual element is attached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parent {
    /// Attached directly under the stage container (coordinate positioning).
    #[default]
    Stage,
    /// Attached inside a flow zone's container (flow positioning).
    Container(ZoneId),
}

/// Class flags toggled for the external styling layer.
///
/// The engine only guarantees *when* each flag is set and cleared; the
/// visual effect behind each class is an external styling concern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransitionClasses {
    /// Float/fade-out effect is playing.
    pub teleport_out: bool,
    /// Drop/fade-in effect is playing.
    pub teleport_in: bool,
    /// Pre-entry state for the drop/fade-in effect.
    pub teleport_in_prepare: bool,
    /// Token is positioned by its container, not by coordinates.
    pub flow_mode: bool,
    /// The most recent placement must be applied without a transition.
    /// Cleared by the next animated move.
    pub no_transition: bool,
}

impl TransitionClasses {
    fn clear_teleport(&mut self) {
        self.teleport_out = false;
        self.teleport_in = false;
        self.teleport_in_prepare = false;
    }

    /// Whether any teleport class is set.
    #[must_use]
    pub fn teleporting(&self) -> bool {
        self.teleport_out || self.teleport_in || self.teleport_in_prepare
    }
}

/// Snapshot of a token's derived visual transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualTransform {
    /// Stage-relative translation of the top-left corner.
    pub translate: Vec2,
    /// Rotation in degrees.
    pub rotate: f64,
    /// Flip rotation in degrees: 0 face-up, 180 face-down.
    pub flip: f64,
}

/// One pooled card actor.
#[derive(Debug, Default)]
pub struct Token {
    card_type: Option<CardType>,
    position: Point,
    rotation: f64,
    flipped: bool,
    flow_mode: bool,
    z_index: u32,
    visible: bool,
    parent: Parent,
    classes: TransitionClasses,
    face: CardFace,
    dirty: bool,
}

impl Token {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // -- Read accessors --

    /// Assigned card type, `None` while pooled.
    #[must_use]
    pub fn card_type(&self) -> Option<&CardType> {
        self.card_type.as_ref()
    }

    /// Stage-relative position of the top-left corner.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Whether the token shows its back face.
    #[must_use]
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// Whether the token is positioned by its container.
    #[must_use]
    pub fn flow_mode(&self) -> bool {
        self.flow_mode
    }

    /// Draw order within the stage (higher draws above).
    #[must_use]
    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    /// Whether the token is visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Current parent attachment.
    #[must_use]
    pub fn parent(&self) -> Parent {
        self.parent
    }

    /// Current transition class flags.
    #[must_use]
    pub fn classes(&self) -> TransitionClasses {
        self.classes
    }

    /// Front-face content.
    #[must_use]
    pub fn face(&self) -> &CardFace {
        &self.face
    }

    /// Whether the most recent placement suppressed the transition.
    #[must_use]
    pub fn last_move_instant(&self) -> bool {
        self.classes.no_transition
    }

    /// Derive the current visual transform from the token's fields.
    #[must_use]
    pub fn visual_transform(&self) -> VisualTransform {
        VisualTransform {
            translate: self.position.to_vec2(),
            rotate: self.rotation,
            flip: if self.flipped { 180.0 } else { 0.0 },
        }
    }

    // -- Mutation (all mutators mark the token dirty on real change) --

    /// Set the card type and re-render the front face.
    ///
    /// The render callback, when present, populates the face; otherwise the
    /// face label falls back to the type's text. Passing `None` clears the
    /// face (the token is going back to the pool).
    pub fn set_type(&mut self, card_type: Option<CardType>, renderer: Option<&mut CardRenderer>) {
        match &card_type {
            Some(ty) => {
                self.face.clear();
                match renderer {
                    Some(render) => render(&mut self.face, ty),
                    None => self.face.set_label(ty.to_string()),
                }
            }
            None => self.face.clear(),
        }
        self.card_type = card_type;
        self.dirty = true;
    }

    /// Set the face-up/face-down state.
    pub fn set_flipped(&mut self, flipped: bool) {
        if self.flipped != flipped {
            self.flipped = flipped;
            self.dirty = true;
        }
    }

    /// Switch between coordinate and flow positioning.
    ///
    /// Entering flow mode resets position and rotation to neutral; the
    /// surrounding container determines layout from then on.
    pub fn set_flow_mode(&mut self, flow: bool) {
        if self.flow_mode == flow {
            return;
        }
        self.flow_mode = flow;
        self.classes.flow_mode = flow;
        if flow {
            self.position = Point::ORIGIN;
            self.rotation = 0.0;
        }
        self.dirty = true;
    }

    /// Animate toward a position and rotation. No-op in flow mode.
    pub fn move_to(&mut self, x: f64, y: f64, rotation: f64) {
        self.place(Point::new(x, y), rotation, false);
    }

    /// Animate toward an anchor's center. No-op in flow mode.
    pub fn move_to_anchor(
        &mut self,
        anchor: Rect,
        rotation: f64,
        config: &StageConfig,
        geometry: &StageGeometry,
    ) {
        let target = Self::anchor_origin(anchor, config, geometry);
        self.place(target, rotation, false);
    }

    /// Place instantly, suppressing the transition. No-op in flow mode.
    pub fn jump_to(&mut self, x: f64, y: f64) {
        self.place(Point::new(x, y), 0.0, true);
    }

    /// Place instantly on an anchor's center. No-op in flow mode.
    pub fn jump_to_anchor(&mut self, anchor: Rect, config: &StageConfig, geometry: &StageGeometry) {
        let target = Self::anchor_origin(anchor, config, geometry);
        self.place(target, 0.0, true);
    }

    /// Full placement with explicit transition control. No-op in flow mode.
    pub(crate) fn place_at(&mut self, target: Point, rotation: f64, instant: bool) {
        self.place(target, rotation, instant);
    }

    /// Start the float/fade-out effect.
    pub(crate) fn begin_teleport_out(&mut self) {
        self.classes.clear_teleport();
        self.classes.teleport_out = true;
        self.dirty = true;
    }

    /// Start the drop/fade-in effect.
    pub(crate) fn begin_teleport_in(&mut self) {
        self.classes.clear_teleport();
        self.classes.teleport_in_prepare = true;
        self.classes.teleport_in = true;
        self.dirty = true;
    }

    /// Clear teleport classes once an effect completes.
    pub(crate) fn finish_teleport(&mut self) {
        self.reset_teleport_state();
    }

    /// Clear any teleport-related classes.
    ///
    /// Called when a pooled token is reused so animation state never leaks
    /// onto the next occupant.
    pub fn reset_teleport_state(&mut self) {
        if self.classes.teleporting() {
            self.classes.clear_teleport();
            self.dirty = true;
        }
    }

    pub(crate) fn set_z_index(&mut self, z: u32) {
        if self.z_index != z {
            self.z_index = z;
            self.dirty = true;
        }
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Parent) {
        if self.parent != parent {
            self.parent = parent;
            self.dirty = true;
        }
    }

    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    // -- Internals --

    /// Top-left position that centers a card on `anchor`'s center.
    fn anchor_origin(anchor: Rect, config: &StageConfig, geometry: &StageGeometry) -> Point {
        let center = relative_position(anchor, geometry);
        center - half_extent(config.card_width, config.card_height)
    }

    fn place(&mut self, target: Point, rotation: f64, instant: bool) {
        if self.flow_mode {
            tracing::trace!("ignoring position op on flow-mode token");
            return;
        }
        let moved = self.position != target || self.rotation != rotation;
        if moved || self.classes.no_transition != instant {
            self.position = target;
            self.rotation = rotation;
            self.classes.no_transition = instant;
            self.dirty = true;
        }
    }
}
