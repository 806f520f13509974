//! # card-stage
//!
//! A layout and animation engine for card-shaped UI tokens inside a
//! fixed-size, non-scrolling container.
//!
//! ## Design Principles
//!
//! 1. **Presentation Only**: No game rules, no persistent application
//!    state. External callers decide when cards spawn, move, or retire;
//!    the stage decides where they sit and how they get there.
//!
//! 2. **Pooled Actors**: Visual elements are expensive, so tokens are
//!    created once and recycled forever. Generational handles make stale
//!    references detectable instead of dangerous.
//!
//! 3. **Fire-and-Forget Choreography**: Every animated operation returns
//!    immediately and reports completion through an optional callback
//!    after its duration. Nothing blocks, nothing suspends; the host
//!    drives time through `Stage::tick`.
//!
//! 4. **External Visuals**: The engine owns visual *state* - positions,
//!    rotations, flips, transition class flags - and guarantees when each
//!    changes. Drawing and interpolation belong to the embedding
//!    presentation layer, which reads that state through the dirty set.
//!
//! ## Architecture
//!
//! Intent flows top-down: the [`Stage`] receives spawn/transfer/discard
//! calls, delegates element lifecycle to the [`TokenPool`], and delegates
//! position computation to each [`Zone`]'s [`Strategy`], which translates
//! anchor geometry through [`StageGeometry`] and writes the results into
//! [`Token`] state.
//!
//! ## Modules
//!
//! - `core`: Handles, geometry, configuration, errors
//! - `tokens`: Card actors, face content, and the recycling pool
//! - `layout`: Row/pile/grid/flow layout strategies
//! - `zones`: Ordered, strategy-governed token groupings
//! - `stage`: The engine - choreography, timeline, transfers

pub mod core;
pub mod layout;
pub mod stage;
pub mod tokens;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    relative_position, StageConfig, StageError, StageGeometry, TokenId, ZoneId,
    DEFAULT_MOVE_MS, DEFAULT_TELEPORT_MS,
};

pub use crate::tokens::{
    CardFace, CardRenderer, CardType, Parent, Token, TokenPool, TransitionClasses,
    VisualTransform,
};

pub use crate::layout::{
    auto_columns, row_step, FlowOptions, GridOptions, LayoutMode, PileOptions, RowOptions,
    Strategy, StrategyKind,
};

pub use crate::zones::Zone;

pub use crate::stage::transfer::{
    CompletionFn, DiscardOptions, DoneFn, DrawOptions, TransferOptions,
};
pub use crate::stage::Stage;

// Geometry primitives come from kurbo; re-exported so callers don't need a
// direct dependency for anchors and viewports.
pub use kurbo::{Point, Rect, Size, Vec2};
