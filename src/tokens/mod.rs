//! Token system: card actors, face content, and the recycling pool.
//!
//! ## Key Types
//!
//! - `CardType`: Opaque caller-defined card identifier
//! - `CardFace`: Front-face content the render callback populates
//! - `Token`: One positionable, flippable visual actor
//! - `TokenPool`: Free-list recycling of tokens with generation counters
//!
//! Tokens are created once and reused indefinitely; see [`TokenPool`].

pub mod face;
pub mod pool;
pub mod token;

pub use face::{CardFace, CardRenderer, CardType};
pub use pool::TokenPool;
pub use token::{Parent, Token, TransitionClasses, VisualTransform};
