//! Handle types for tokens and zones.
//!
//! Tokens are addressed by `TokenId`, a generational handle into the token
//! pool. The pool recycles slots, and the generation counter lets any holder
//! of an old handle be detected after the slot has been reissued: operations
//! on stale handles degrade to no-ops instead of corrupting the new occupant.
//!
//! Zones are addressed by `ZoneId`, assigned sequentially by the stage at
//! zone creation.

use serde::{Deserialize, Serialize};

/// Handle to a pooled token.
///
/// A `TokenId` is only valid while the slot it points at is on its
/// `generation`. Despawning a token bumps the slot's generation, so handles
/// retained past despawn compare stale and are ignored by the pool.
///
/// ```
/// use card_stage::TokenId;
///
/// let id = TokenId::new(3, 0);
/// assert_eq!(id.index(), 3);
/// assert_eq!(id.generation(), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId {
    index: u32,
    generation: u32,
}

impl TokenId {
    /// Create a token handle from raw parts.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the pool.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation the handle was issued on.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({}@{})", self.index, self.generation)
    }
}

/// Zone identifier, assigned sequentially by the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u16);

impl ZoneId {
    /// Create a new zone ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_id_parts() {
        let id = TokenId::new(7, 2);
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 2);
        assert_eq!(format!("{}", id), "Token(7@2)");
    }

    #[test]
    fn test_token_id_generation_distinguishes() {
        let before = TokenId::new(4, 0);
        let after = TokenId::new(4, 1);
        assert_ne!(before, after);
        assert_eq!(before.index(), after.index());
    }

    #[test]
    fn test_zone_id() {
        let id = ZoneId::new(5);
        assert_eq!(id.raw(), 5);
        assert_eq!(format!("{}", id), "Zone(5)");
    }

    #[test]
    fn test_serialization() {
        let id = TokenId::new(3, 1);
        let json = serde_json::to_string(&id).unwrap();
        let back: TokenId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);

        let zone = ZoneId::new(2);
        let json = serde_json::to_string(&zone).unwrap();
        let back: ZoneId = serde_json::from_str(&json).unwrap();
        assert_eq!(zone, back);
    }
}
