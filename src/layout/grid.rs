//! Grid layout: rows and columns from the anchor's top-left corner.
//!
//! Unlike `Row`, the grid does not center on the anchor - the origin is
//! pinned to the anchor's top-left so the grid grows downward as items
//! arrive. Column count is either configured or fitted to the anchor's
//! width, never zero.

use kurbo::Rect;

use crate::core::ids::TokenId;
use crate::tokens::TokenPool;

use super::{place_token, GridOptions, LayoutCtx};

/// Widest column count whose cards and gaps fit `anchor_width`.
///
/// The trailing card needs no gap, hence the `+ gap` on both sides of the
/// division. Never returns zero.
#[must_use]
pub fn auto_columns(anchor_width: f64, card_width: f64, gap: f64) -> u32 {
    let fit = ((anchor_width + gap) / (card_width + gap)).floor();
    (fit as u32).max(1)
}

pub(super) fn layout(
    opts: &GridOptions,
    items: &[TokenId],
    anchor: Rect,
    pool: &mut TokenPool,
    ctx: &LayoutCtx<'_>,
) {
    let card_w = ctx.config.card_width;
    let card_h = ctx.config.card_height;
    let origin = ctx.geometry.to_stage_point(anchor.origin());
    let anchor_w = ctx.geometry.to_stage_length(anchor.width());

    let cols = opts
        .cols
        .map(|c| c.max(1))
        .unwrap_or_else(|| auto_columns(anchor_w, card_w, opts.gap_x));

    for (i, &id) in items.iter().enumerate() {
        let col = (i as u32) % cols;
        let row = (i as u32) / cols;
        let x = origin.x + f64::from(col) * (card_w + opts.gap_x);
        let y = origin.y + f64::from(row) * (card_h + opts.gap_y);
        place_token(pool, id, x, y, 0.0, i as u32, ctx.mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StageConfig;
    use crate::core::geometry::StageGeometry;
    use crate::layout::LayoutMode;

    fn run(count: usize, opts: GridOptions, anchor: Rect) -> Vec<(f64, f64)> {
        let config = StageConfig::new(80.0, 120.0);
        let geometry = StageGeometry::unscaled(Rect::new(0.0, 0.0, 1000.0, 800.0));
        let mut pool = TokenPool::new();
        let items: Vec<TokenId> = (0..count)
            .map(|i| {
                pool.spawn(
                    format!("card-{i}").into(),
                    None,
                    false,
                    None,
                    &config,
                    &geometry,
                )
            })
            .collect();

        let ctx = LayoutCtx {
            config: &config,
            geometry: &geometry,
            mode: LayoutMode::Animated,
        };
        layout(&opts, &items, anchor, &mut pool, &ctx);

        items
            .iter()
            .map(|&id| {
                let t = pool.get(id).unwrap();
                (t.position().x, t.position().y)
            })
            .collect()
    }

    #[test]
    fn test_explicit_columns() {
        let opts = GridOptions {
            cols: Some(2),
            gap_x: 10.0,
            gap_y: 20.0,
        };
        let anchor = Rect::new(50.0, 60.0, 450.0, 460.0);
        let placed = run(5, opts, anchor);

        // Columns step by 90, rows by 140, origin at the anchor corner.
        assert_eq!(placed[0], (50.0, 60.0));
        assert_eq!(placed[1], (140.0, 60.0));
        assert_eq!(placed[2], (50.0, 200.0));
        assert_eq!(placed[3], (140.0, 200.0));
        assert_eq!(placed[4], (50.0, 340.0));
    }

    #[test]
    fn test_auto_columns_fits_width() {
        // (300 + 10) / (80 + 10) = 3.44 -> 3 columns.
        assert_eq!(auto_columns(300.0, 80.0, 10.0), 3);
        // Exactly two cards and one gap.
        assert_eq!(auto_columns(170.0, 80.0, 10.0), 2);
    }

    #[test]
    fn test_auto_columns_never_zero() {
        assert_eq!(auto_columns(10.0, 80.0, 10.0), 1);
        assert_eq!(auto_columns(0.0, 80.0, 10.0), 1);
    }

    #[test]
    fn test_auto_layout_wraps() {
        let opts = GridOptions::default();
        // 300px anchor fits 3 columns of 80px cards with 10px gaps.
        let anchor = Rect::new(0.0, 0.0, 300.0, 600.0);
        let placed = run(4, opts, anchor);

        assert_eq!(placed[0], (0.0, 0.0));
        assert_eq!(placed[1], (90.0, 0.0));
        assert_eq!(placed[2], (180.0, 0.0));
        // Fourth item wraps to the second row.
        assert_eq!(placed[3], (0.0, 130.0));
    }
}
