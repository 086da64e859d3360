//! Pass geometry shared by every filter.
//!
//! A filter receives its input bounds (what the source texture covers) and
//! output bounds (what it draws) in content coordinates. The target matrix
//! maps source-local pixels, whose origin is the input bounds origin, onto
//! the render target.

use lfx_common::{FilterSource, FilterTarget, Point, Rect};

/// Per-frame bounds handed to a filter by `update`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PassGeometry {
    pub input_bounds: Rect,
    pub output_bounds: Rect,
    pub scale: Point,
}

impl PassGeometry {
    pub fn new(input_bounds: Rect, output_bounds: Rect, scale: Point) -> Self {
        Self {
            input_bounds,
            output_bounds,
            scale,
        }
    }

    /// Output quad in target pixels and matching normalized source coordinates.
    pub fn quad(&self, source: &FilterSource, target: &FilterTarget) -> ([Point; 4], [Point; 4]) {
        let size = source.texture.size();
        let corners = self.output_bounds.corners();
        let local = corners.map(|c| {
            Point::new(
                (c.x - self.input_bounds.left) * source.scale.x,
                (c.y - self.input_bounds.top) * source.scale.y,
            )
        });
        let vertices = local.map(|p| target.matrix.map_point(p));
        let tex_coords = local.map(|p| {
            Point::new(
                if size.x > 0.0 { p.x / size.x } else { 0.0 },
                if size.y > 0.0 { p.y / size.y } else { 0.0 },
            )
        });
        (vertices, tex_coords)
    }
}
