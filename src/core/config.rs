//! Stage configuration.
//!
//! The stage is configured once at construction:
//! - `card_width`/`card_height`: the dimensions every anchor-centering
//!   calculation uses
//! - `teleport_duration`: default duration (ms) for flow-mode transition
//!   effects
//! - `move_duration`: default duration (ms) for coordinate-move completion
//!
//! The card render callback is registered on the stage itself
//! (`Stage::set_card_renderer`) since callbacks are not configuration data.

use serde::{Deserialize, Serialize};

use super::error::StageError;

/// Default flow-mode transition duration in milliseconds.
pub const DEFAULT_TELEPORT_MS: u64 = 400;

/// Default coordinate-move duration in milliseconds.
pub const DEFAULT_MOVE_MS: u64 = 300;

/// Construction-time stage configuration.
///
/// ```
/// use card_stage::StageConfig;
///
/// let config = StageConfig::new(80.0, 120.0)
///     .with_teleport_duration(250)
///     .with_move_duration(180);
///
/// assert_eq!(config.card_width, 80.0);
/// assert_eq!(config.teleport_duration, 250);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Card width in stage-local units.
    pub card_width: f64,

    /// Card height in stage-local units.
    pub card_height: f64,

    /// Default duration for teleport (flow-mode) effects, in ms.
    pub teleport_duration: u64,

    /// Default duration for coordinate moves, in ms.
    pub move_duration: u64,
}

impl StageConfig {
    /// Create a configuration with the given card dimensions and default
    /// durations.
    #[must_use]
    pub fn new(card_width: f64, card_height: f64) -> Self {
        Self {
            card_width,
            card_height,
            teleport_duration: DEFAULT_TELEPORT_MS,
            move_duration: DEFAULT_MOVE_MS,
        }
    }

    /// Set the default teleport duration.
    #[must_use]
    pub fn with_teleport_duration(mut self, ms: u64) -> Self {
        self.teleport_duration = ms;
        self
    }

    /// Set the default coordinate-move duration.
    #[must_use]
    pub fn with_move_duration(mut self, ms: u64) -> Self {
        self.move_duration = ms;
        self
    }

    /// Check that the configuration is usable.
    ///
    /// Card dimensions must be positive finite numbers.
    pub fn validate(&self) -> Result<(), StageError> {
        let ok = self.card_width.is_finite()
            && self.card_height.is_finite()
            && self.card_width > 0.0
            && self.card_height > 0.0;
        if ok {
            Ok(())
        } else {
            Err(StageError::InvalidCardSize {
                width: self.card_width,
                height: self.card_height,
            })
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::new(80.0, 120.0)
    }
}
