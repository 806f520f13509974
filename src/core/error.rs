//! Stage error types.
//!
//! Almost nothing in this crate fails: caller misuse (stale handles, missing
//! indices, position math on flow-mode tokens) is absorbed as a silent no-op
//! so an animation never dies mid-flight. The only errors are the ones worth
//! rejecting before a stage is running: malformed configuration and unknown
//! strategy kinds parsed from config files.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum StageError {
    #[error("unknown strategy kind: {0}")]
    UnknownStrategy(String),

    #[error("invalid card size: {width}x{height}")]
    InvalidCardSize { width: f64, height: f64 },
}
