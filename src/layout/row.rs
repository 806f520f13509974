//! Row layout: a centered horizontal fan.
//!
//! Items are centered as a group on the anchor's center. The horizontal
//! step between neighbors is `card_width + gap`, shrunk (never expanded)
//! when the anchor can't accommodate the natural step, so the group always
//! spans at most the anchor's width.

use kurbo::Rect;

use crate::core::geometry::relative_position;
use crate::core::ids::TokenId;
use crate::tokens::TokenPool;

use super::{place_token, LayoutCtx, RowOptions};

/// Horizontal step between neighboring cards.
///
/// For more than one item this is the smaller of the natural step
/// (`card_width + gap`) and the widest step that still fits `count` items
/// in `anchor_width`, floored at zero.
#[must_use]
pub fn row_step(count: usize, anchor_width: f64, card_width: f64, gap: f64) -> f64 {
    let natural = card_width + gap;
    if count <= 1 {
        return natural;
    }
    let available = (anchor_width - card_width) / (count - 1) as f64;
    natural.min(available).max(0.0)
}

pub(super) fn layout(
    opts: &RowOptions,
    items: &[TokenId],
    anchor: Rect,
    pool: &mut TokenPool,
    ctx: &LayoutCtx<'_>,
) {
    if items.is_empty() {
        return;
    }
    let card_w = ctx.config.card_width;
    let card_h = ctx.config.card_height;
    let center = relative_position(anchor, ctx.geometry);
    let anchor_w = ctx.geometry.to_stage_length(anchor.width());

    let step = row_step(items.len(), anchor_w, card_w, opts.gap);
    let group_w = card_w + step * (items.len() - 1) as f64;
    let first_x = center.x - group_w / 2.0;
    let y = center.y - card_h / 2.0;

    for (i, &id) in items.iter().enumerate() {
        let x = first_x + step * i as f64;
        place_token(pool, id, x, y, 0.0, i as u32, ctx.mode);
    }
}
