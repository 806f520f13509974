//! Pile layout: everything on the anchor center with a deterministic
//! scatter.
//!
//! Each item gets a rotation derived from its index alone, so re-running
//! the layout never reshuffles a settled pile - the same index always
//! produces the same angle.

use kurbo::Rect;

use crate::core::geometry::relative_position;
use crate::core::ids::TokenId;
use crate::tokens::TokenPool;

use super::{place_token, LayoutCtx, PileOptions};

/// Spreads consecutive indices across the sine period so neighboring cards
/// don't lean the same way.
const ANGLE_SPREAD: f64 = 12.9898;

/// Scatter rotation for the item at `index`.
#[must_use]
pub(super) fn scatter_angle(index: usize, max_angle: f64) -> f64 {
    (index as f64 * ANGLE_SPREAD).sin() * max_angle
}

pub(super) fn layout(
    opts: &PileOptions,
    items: &[TokenId],
    anchor: Rect,
    pool: &mut TokenPool,
    ctx: &LayoutCtx<'_>,
) {
    let center = relative_position(anchor, ctx.geometry);
    let x = center.x - ctx.config.card_width / 2.0;
    let y = center.y - ctx.config.card_height / 2.0;

    for (i, &id) in items.iter().enumerate() {
        place_token(
            pool,
            id,
            x,
            y,
            scatter_angle(i, opts.max_angle),
            i as u32,
            ctx.mode,
        );
    }
}
