//! Coordinate translation between on-screen and stage-local space.
//!
//! The stage container may be rendered under a uniform visual scale (for
//! example a fit-to-window transform). Layout math runs in the container's
//! *unscaled* coordinate space, so anchor geometry read from the screen has
//! to be divided back through that scale before it is usable.
//!
//! The container must not scroll; translation assumes a zero scroll offset.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Geometry of the stage container.
///
/// `viewport` is the container's on-screen rectangle (origin and rendered
/// size). `layout_width` is the container's unscaled layout width; the ratio
/// of rendered width to layout width is the uniform scale applied to the
/// container.
///
/// ```
/// use card_stage::{Rect, StageGeometry};
///
/// // Rendered at half size: 400px on screen, 800px of layout space.
/// let stage = StageGeometry::new(Rect::new(0.0, 0.0, 400.0, 300.0), 800.0);
/// assert_eq!(stage.scale(), 0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageGeometry {
    /// On-screen rectangle of the container.
    pub viewport: Rect,

    /// Unscaled layout width of the container.
    pub layout_width: f64,
}

impl StageGeometry {
    /// Create stage geometry from a viewport rect and the unscaled width.
    ///
    /// # Panics
    ///
    /// Panics if `layout_width` is not a positive finite number.
    #[must_use]
    pub fn new(viewport: Rect, layout_width: f64) -> Self {
        assert!(
            layout_width.is_finite() && layout_width > 0.0,
            "layout width must be positive, got {layout_width}"
        );
        Self {
            viewport,
            layout_width,
        }
    }

    /// Geometry for an unscaled container (rendered width == layout width).
    #[must_use]
    pub fn unscaled(viewport: Rect) -> Self {
        Self::new(viewport, viewport.width())
    }

    /// Uniform scale applied to the container.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.viewport.width() / self.layout_width
    }

    /// Translate an on-screen point into stage-local coordinates.
    #[must_use]
    pub fn to_stage_point(&self, p: Point) -> Point {
        let scale = self.scale();
        Point::new(
            (p.x - self.viewport.x0) / scale,
            (p.y - self.viewport.y0) / scale,
        )
    }

    /// Translate an on-screen length into stage-local units.
    #[must_use]
    pub fn to_stage_length(&self, len: f64) -> f64 {
        len / self.scale()
    }
}

/// Center of `target` expressed in the stage's local coordinate space.
///
/// `target` is an on-screen rectangle (as read from the live layout); the
/// result compensates for the stage container's uniform scale.
#[must_use]
pub fn relative_position(target: Rect, stage: &StageGeometry) -> Point {
    stage.to_stage_point(target.center())
}

/// Half of a `width`/`height` pair, as a vector.
///
/// Used by anchor placement: an anchor names a center point, a token's
/// position names its top-left corner.
#[must_use]
pub(crate) fn half_extent(width: f64, height: f64) -> Vec2 {
    Vec2::new(width / 2.0, height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscaled_translation() {
        let stage = StageGeometry::unscaled(Rect::new(100.0, 50.0, 900.0, 650.0));
        assert_eq!(stage.scale(), 1.0);

        let target = Rect::new(150.0, 100.0, 250.0, 200.0);
        let p = relative_position(target, &stage);
        assert_eq!(p, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_scale_compensation() {
        // Container rendered at half its layout size.
        let stage = StageGeometry::new(Rect::new(0.0, 0.0, 400.0, 300.0), 800.0);
        assert_eq!(stage.scale(), 0.5);

        // A rect centered at (100, 100) on screen sits at (200, 200) in
        // layout space.
        let target = Rect::new(80.0, 80.0, 120.0, 120.0);
        let p = relative_position(target, &stage);
        assert_eq!(p, Point::new(200.0, 200.0));

        assert_eq!(stage.to_stage_length(50.0), 100.0);
    }

    #[test]
    fn test_origin_offset_applies_before_scale() {
        let stage = StageGeometry::new(Rect::new(10.0, 20.0, 210.0, 120.0), 400.0);
        assert_eq!(stage.scale(), 0.5);

        let p = stage.to_stage_point(Point::new(110.0, 70.0));
        assert_eq!(p, Point::new(200.0, 100.0));
    }

    #[test]
    #[should_panic(expected = "layout width must be positive")]
    fn test_zero_layout_width_panics() {
        StageGeometry::new(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0);
    }

    #[test]
    fn test_serialization() {
        let stage = StageGeometry::new(Rect::new(0.0, 0.0, 400.0, 300.0), 800.0);
        let json = serde_json::to_string(&stage).unwrap();
        let back: StageGeometry = serde_json::from_str(&json).unwrap();
        assert_eq!(stage, back);
    }
}
