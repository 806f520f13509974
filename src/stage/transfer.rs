//! Choreography options, completion callbacks, and the transfer state
//! machine.
//!
//! Choreography operations are fire-and-forget: they return immediately and
//! report completion through an optional callback. A caller needing
//! sequencing reacts to callbacks; nothing here returns a deferred result.

use crate::core::ids::{TokenId, ZoneId};
use crate::tokens::CardType;

use super::Stage;

/// Completion callback carrying the token the operation settled on.
///
/// For a teleporting transfer this is the *replacement* token - the
/// original identity is gone by the time the callback fires.
pub type CompletionFn = Box<dyn FnOnce(&mut Stage, TokenId)>;

/// Completion callback for operations that end with no token (discard).
pub type DoneFn = Box<dyn FnOnce(&mut Stage)>;

/// Options for [`Stage::transfer_card`].
#[derive(Default)]
pub struct TransferOptions {
    /// Flip the card to this state as part of the move.
    pub flip: Option<bool>,
    /// Animation duration override in ms.
    pub duration: Option<u64>,
    /// Invoked when the move (or replacement teleport) completes.
    pub on_complete: Option<CompletionFn>,
}

impl TransferOptions {
    /// Options with every field defaulted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the card during the transfer.
    #[must_use]
    pub fn flipped(mut self, flip: bool) -> Self {
        self.flip = Some(flip);
        self
    }

    /// Override the animation duration.
    #[must_use]
    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration = Some(ms);
        self
    }

    /// Set the completion callback.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce(&mut Stage, TokenId) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for TransferOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferOptions")
            .field("flip", &self.flip)
            .field("duration", &self.duration)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Options for [`Stage::draw_card`].
#[derive(Default)]
pub struct DrawOptions {
    /// Spawn the card face-down.
    pub flipped: bool,
    /// Animation duration override in ms.
    pub duration: Option<u64>,
    /// Invoked once the card has settled in its zone.
    pub on_complete: Option<CompletionFn>,
}

impl DrawOptions {
    /// Options with every field defaulted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the card face-down.
    #[must_use]
    pub fn face_down(mut self) -> Self {
        self.flipped = true;
        self
    }

    /// Override the animation duration.
    #[must_use]
    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration = Some(ms);
        self
    }

    /// Set the completion callback.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce(&mut Stage, TokenId) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for DrawOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawOptions")
            .field("flipped", &self.flipped)
            .field("duration", &self.duration)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Options for [`Stage::discard_card`].
#[derive(Default)]
pub struct DiscardOptions {
    /// Animation duration override in ms.
    pub duration: Option<u64>,
    /// Delay before the discarded token is despawned (coordinate zones).
    pub despawn_delay: Option<u64>,
    /// Invoked after the token has been despawned.
    pub on_complete: Option<DoneFn>,
}

impl DiscardOptions {
    /// Options with every field defaulted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the animation duration.
    #[must_use]
    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration = Some(ms);
        self
    }

    /// Delay the despawn after the discard animation starts.
    #[must_use]
    pub fn with_despawn_delay(mut self, ms: u64) -> Self {
        self.despawn_delay = Some(ms);
        self
    }

    /// Set the completion callback.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce(&mut Stage) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for DiscardOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscardOptions")
            .field("duration", &self.duration)
            .field("despawn_delay", &self.despawn_delay)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Phase of an in-flight teleporting transfer.
///
/// The full progression is
/// `Removing -> AnimatingOut -> Despawned -> Respawning -> AnimatingIn -> Done`;
/// only the two animating phases wait on the timeline. Removal happens
/// synchronously when the transfer starts, despawn/respawn happen
/// synchronously when `AnimatingOut` fires, and `Done` is the completion
/// callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransferPhase {
    /// The original token is playing its teleport-out effect.
    AnimatingOut,
    /// The replacement token is playing its teleport-in effect.
    AnimatingIn,
}

/// State of one teleporting transfer.
///
/// Carries everything needed to rebuild the card on the far side: the
/// replacement token is a *new identity* of the same type and flip state.
pub(crate) struct TransferFlight {
    pub(crate) phase: TransferPhase,
    /// The original token while animating out, the replacement after.
    pub(crate) token: TokenId,
    pub(crate) card_type: CardType,
    pub(crate) flipped: bool,
    pub(crate) to: ZoneId,
    pub(crate) duration: u64,
    pub(crate) on_complete: Option<CompletionFn>,
}

impl std::fmt::Debug for TransferFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferFlight")
            .field("phase", &self.phase)
            .field("token", &self.token)
            .field("card_type", &self.card_type)
            .field("flipped", &self.flipped)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// A completion waiting on the timeline.
pub(crate) enum PendingAction {
    /// Advance a teleporting transfer to its next phase.
    TransferStep(TransferFlight),
    /// A standalone teleport-out effect finished.
    TeleportOutDone {
        token: TokenId,
        on_complete: Option<CompletionFn>,
    },
    /// A teleport-in effect finished; clear its classes.
    TeleportInDone {
        token: TokenId,
        on_complete: Option<CompletionFn>,
    },
    /// A coordinate move's duration elapsed.
    MoveDone {
        token: TokenId,
        on_complete: Option<CompletionFn>,
    },
    /// A discarded token's delay elapsed; despawn it.
    DiscardDespawn {
        token: TokenId,
        on_complete: Option<DoneFn>,
    },
}

impl std::fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransferStep(flight) => f.debug_tuple("TransferStep").field(flight).finish(),
            Self::TeleportOutDone { token, .. } => {
                f.debug_struct("TeleportOutDone").field("token", token).finish()
            }
            Self::TeleportInDone { token, .. } => {
                f.debug_struct("TeleportInDone").field("token", token).finish()
            }
            Self::MoveDone { token, .. } => {
                f.debug_struct("MoveDone").field("token", token).finish()
            }
            Self::DiscardDespawn { token, .. } => {
                f.debug_struct("DiscardDespawn").field("token", token).finish()
            }
        }
    }
}
