//! Final target selection for the last filter node.
//!
//! The last node draws straight onto the destination when nothing on it
//! would be corrupted by doing so, and through an offscreen surface
//! otherwise.

use lfx_common::{
    Canvas, EffectType, FilterConfig, FilterTarget, Matrix, PaintKind, Point, Rect, Texture,
};
use tracing::trace;

use crate::bounds::transform_filter_bounds;
use crate::filter_list::FilterList;
use crate::nodes::FilterNode;

/// Input bounds of the last node: the output of the node before it, or the
/// content itself when there is only one node.
fn second_to_last_bounds(nodes: &[FilterNode], content_bounds: &Rect) -> Rect {
    if nodes.len() > 1 {
        nodes[nodes.len() - 2].bounds
    } else {
        *content_bounds
    }
}

/// Target that draws the last node straight onto `parent`, if allowed.
pub fn direct_filter_target(
    parent: &dyn Canvas,
    list: &FilterList<'_>,
    nodes: &[FilterNode],
    content_bounds: &Rect,
    source_scale: Point,
    config: &FilterConfig,
) -> Option<FilterTarget> {
    let last = nodes.last()?;
    // A trailing blur is downsampled and has to be scaled back up offscreen.
    if list
        .effects
        .last()
        .is_some_and(|e| e.effect_type() == EffectType::FastBlur)
    {
        trace!("Last effect is a fast blur, drawing offscreen");
        return None;
    }
    if last.needs_msaa() {
        trace!("Last filter needs MSAA, drawing offscreen");
        return None;
    }
    // Filter vertices are computed from unclipped bounds, so test those.
    let mut transform_bounds = *content_bounds;
    transform_filter_bounds(&mut transform_bounds, list, config);
    let paint = parent.has_complex_paint(&transform_bounds);
    if paint != PaintKind::None {
        trace!(?paint, "Destination has complex paint, drawing offscreen");
        return None;
    }
    let mut matrix = parent.matrix();
    if matrix.has_skew() {
        trace!("Destination matrix has skew, drawing offscreen");
        return None;
    }
    let texture = parent.render_target()?;
    let input = second_to_last_bounds(nodes, content_bounds);
    matrix.pre_translate(input.left, input.top);
    matrix.pre_scale(1.0 / source_scale.x, 1.0 / source_scale.y);
    Some(FilterTarget { texture, matrix })
}

/// Target that draws the last node into an offscreen surface allocated at
/// the last node's bounds.
pub fn offscreen_filter_target(
    texture: Texture,
    nodes: &[FilterNode],
    content_bounds: &Rect,
    source_scale: Point,
) -> FilterTarget {
    let final_bounds = nodes.last().map_or(*content_bounds, |n| n.bounds);
    let input = second_to_last_bounds(nodes, content_bounds);
    let matrix = Matrix::translate(
        (input.left - final_bounds.left) * source_scale.x,
        (input.top - final_bounds.top) * source_scale.y,
    );
    FilterTarget { texture, matrix }
}

#[cfg(test)]
mod tests {
    use lfx_effects::{LayerFilter, MotionBlurFilter};

    use super::*;

    fn node(bounds: Rect) -> FilterNode {
        FilterNode::new(
            LayerFilter::MotionBlur(MotionBlurFilter::new()).into_handle(),
            bounds,
        )
    }

    fn texture() -> Texture {
        Texture {
            handle: 42,
            width: 64,
            height: 64,
        }
    }

    #[test]
    fn offscreen_offset_is_relative_to_final_bounds() {
        let nodes = vec![
            node(Rect::new(-5.0, -5.0, 105.0, 105.0)),
            node(Rect::new(-10.0, -20.0, 110.0, 120.0)),
        ];
        let target = offscreen_filter_target(
            texture(),
            &nodes,
            &Rect::from_wh(100.0, 100.0),
            Point::splat(2.0),
        );
        assert_eq!(target.matrix, Matrix::translate(10.0, 30.0));
        assert_eq!(target.texture, texture());
    }

    #[test]
    fn single_node_offset_uses_content_bounds() {
        let nodes = vec![node(Rect::new(-4.0, -4.0, 104.0, 104.0))];
        let target = offscreen_filter_target(
            texture(),
            &nodes,
            &Rect::from_wh(100.0, 100.0),
            Point::ONE,
        );
        assert_eq!(target.matrix, Matrix::translate(4.0, 4.0));
    }

    #[test]
    fn no_nodes_draw_in_place() {
        let target = offscreen_filter_target(texture(), &[], &Rect::from_wh(8.0, 8.0), Point::ONE);
        assert!(target.matrix.is_identity());
    }
}
