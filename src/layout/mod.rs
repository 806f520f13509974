//! Layout strategies: pure position assignment for zone members.
//!
//! A strategy is a stateless configuration object chosen at zone creation.
//! `layout` derives every member's position, rotation, and draw order from
//! nothing but the current item order and the anchor's geometry - running it
//! twice in a row produces identical results, and no strategy keeps history.
//!
//! ## Variants
//!
//! - `Row`: centered horizontal fan, step shrunk to fit the anchor
//! - `Pile`: all items on the anchor center with a deterministic scatter
//! - `Grid`: fixed-origin grid from the anchor's top-left corner
//! - `Flow`: no coordinates at all; members are handed to the zone's
//!   container, which lays them out itself

mod flow;
mod grid;
mod pile;
mod row;

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::core::config::StageConfig;
use crate::core::error::StageError;
use crate::core::geometry::StageGeometry;
use crate::core::ids::{TokenId, ZoneId};
use crate::tokens::TokenPool;

pub use grid::auto_columns;
pub use row::row_step;

/// How a layout pass applies positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    /// Members animate toward their new positions.
    Animated,
    /// Members jump with no transition (resize recovery).
    Instant,
}

/// Shared inputs to a layout pass.
#[derive(Clone, Copy, Debug)]
pub struct LayoutCtx<'a> {
    pub config: &'a StageConfig,
    pub geometry: &'a StageGeometry,
    pub mode: LayoutMode,
}

/// Strategy discriminant, the form zone configuration files carry.
///
/// ```
/// use card_stage::StrategyKind;
///
/// let kind: StrategyKind = "grid".parse().unwrap();
/// assert_eq!(kind, StrategyKind::Grid);
/// assert!("spiral".parse::<StrategyKind>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Row,
    Pile,
    Grid,
    Flow,
}

impl std::str::FromStr for StrategyKind {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row" => Ok(Self::Row),
            "pile" => Ok(Self::Pile),
            "grid" => Ok(Self::Grid),
            "flow" => Ok(Self::Flow),
            other => Err(StageError::UnknownStrategy(other.to_string())),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Row => "row",
            Self::Pile => "pile",
            Self::Grid => "grid",
            Self::Flow => "flow",
        };
        write!(f, "{name}")
    }
}

/// Tunables for [`Strategy::Row`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowOptions {
    /// Gap between neighboring cards at the natural step.
    pub gap: f64,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self { gap: 10.0 }
    }
}

/// Tunables for [`Strategy::Pile`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PileOptions {
    /// Maximum scatter rotation in degrees.
    pub max_angle: f64,
}

impl Default for PileOptions {
    fn default() -> Self {
        Self { max_angle: 8.0 }
    }
}

/// Tunables for [`Strategy::Grid`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridOptions {
    /// Explicit column count; `None` fits as many as the anchor's width
    /// allows.
    pub cols: Option<u32>,
    /// Horizontal cell gap.
    pub gap_x: f64,
    /// Vertical cell gap.
    pub gap_y: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            cols: None,
            gap_x: 10.0,
            gap_y: 10.0,
        }
    }
}

/// Tunables for [`Strategy::Flow`].
///
/// The gap is stored for the zone's container to consume; the engine itself
/// computes no flow coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowOptions {
    /// Gap hint for the container's own layout.
    pub gap: f64,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self { gap: 10.0 }
    }
}

/// A zone's layout strategy with its tunables.
///
/// Shared by reference across repeated layout calls and never mutated by
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    Row(RowOptions),
    Pile(PileOptions),
    Grid(GridOptions),
    Flow(FlowOptions),
}

impl Strategy {
    /// Row strategy with default options.
    #[must_use]
    pub fn row() -> Self {
        Self::Row(RowOptions::default())
    }

    /// Pile strategy with default options.
    #[must_use]
    pub fn pile() -> Self {
        Self::Pile(PileOptions::default())
    }

    /// Grid strategy with default options.
    #[must_use]
    pub fn grid() -> Self {
        Self::Grid(GridOptions::default())
    }

    /// Flow strategy with default options.
    #[must_use]
    pub fn flow() -> Self {
        Self::Flow(FlowOptions::default())
    }

    /// A strategy of the given kind with default options.
    #[must_use]
    pub fn from_kind(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Row => Self::row(),
            StrategyKind::Pile => Self::pile(),
            StrategyKind::Grid => Self::grid(),
            StrategyKind::Flow => Self::flow(),
        }
    }

    /// This strategy's discriminant.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Row(_) => StrategyKind::Row,
            Self::Pile(_) => StrategyKind::Pile,
            Self::Grid(_) => StrategyKind::Grid,
            Self::Flow(_) => StrategyKind::Flow,
        }
    }

    /// Whether members are positioned by document flow instead of
    /// coordinates.
    #[must_use]
    pub fn is_flow(&self) -> bool {
        matches!(self, Self::Flow(_))
    }

    /// Assign positions to `items` against `anchor`.
    pub(crate) fn layout(
        &self,
        zone: ZoneId,
        items: &[TokenId],
        anchor: Rect,
        pool: &mut TokenPool,
        ctx: &LayoutCtx<'_>,
    ) {
        match self {
            Self::Row(opts) => row::layout(opts, items, anchor, pool, ctx),
            Self::Pile(opts) => pile::layout(opts, items, anchor, pool, ctx),
            Self::Grid(opts) => grid::layout(opts, items, anchor, pool, ctx),
            Self::Flow(_) => flow::layout(zone, items, pool),
        }
    }
}

/// Apply one computed placement to a token, honoring the layout mode.
///
/// Instant placement keeps the assigned rotation (a resize re-layout of a
/// pile must not square the cards up).
pub(crate) fn place_token(
    pool: &mut TokenPool,
    id: TokenId,
    x: f64,
    y: f64,
    rotation: f64,
    z: u32,
    mode: LayoutMode,
) {
    // A despawned token lingering in a zone list is skipped, not an error.
    let Some(token) = pool.get_mut(id) else {
        tracing::trace!(token = %id, "skipping layout of dead token");
        return;
    };
    token.place_at(
        kurbo::Point::new(x, y),
        rotation,
        mode == LayoutMode::Instant,
    );
    token.set_z_index(z);
}
