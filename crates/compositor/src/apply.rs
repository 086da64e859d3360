//! Filter chain execution with two-slot buffer reuse.
//!
//! Every node but the last renders into an intermediate [`FilterBuffer`] that
//! becomes the next node's source. Two named slots rotate after each pass:
//! the buffer that just stopped being a source is `free` and may be reused by
//! the next pass if its size and MSAA flag match.

use lfx_common::{FilterBuffer, FilterSource, FilterTarget, GpuContext, Matrix, Point, Rect};
use tracing::{debug, trace};

use crate::nodes::FilterNode;
use crate::CompositorError;

/// Pixel size of a node's buffer at `scale`.
fn buffer_size(bounds: &Rect, scale: Point) -> (u32, u32) {
    let width = (bounds.width() * scale.x).ceil().max(0.0) as u32;
    let height = (bounds.height() * scale.y).ceil().max(0.0) as u32;
    (width, height)
}

/// Run `nodes` in order, starting from `source` and ending in `target`.
///
/// An allocation failure stops the chain before any further draw call;
/// `target` is left untouched unless the last node was reached.
pub fn apply_filters(
    context: &dyn GpuContext,
    nodes: &[FilterNode],
    content_bounds: &Rect,
    source: &FilterSource,
    target: &FilterTarget,
) -> Result<(), CompositorError> {
    let scale = source.scale;
    let mut free: Option<FilterBuffer> = None;
    let mut last: Option<FilterBuffer> = None;
    let mut last_source: Option<FilterSource> = None;
    let mut last_bounds = *content_bounds;
    let mut allocations = 0usize;

    for (index, node) in nodes.iter().enumerate() {
        let input = last_source.as_ref().unwrap_or(source);
        let filter = node.filter.lock();
        if index + 1 == nodes.len() {
            trace!(filter = %filter.name(), "Drawing final node");
            filter.draw(context, input, target)?;
            break;
        }

        let (width, height) = buffer_size(&node.bounds, scale);
        let msaa = filter.needs_msaa();
        let current = match free.take() {
            Some(buffer) if buffer.matches(width, height, msaa) => {
                trace!(index, width, height, "Reusing filter buffer");
                buffer
            }
            _ => {
                allocations += 1;
                context.make_filter_buffer(width, height, msaa)?
            }
        };
        context.clear_buffer(&current)?;
        let offset = Matrix::translate(
            (last_bounds.left - node.bounds.left) * scale.x,
            (last_bounds.top - node.bounds.top) * scale.y,
        );
        filter.draw(context, input, &current.to_filter_target(offset))?;
        context.resolve_buffer(&current)?;

        last_source = Some(current.to_filter_source(scale));
        free = last.take();
        last = Some(current);
        last_bounds = node.bounds;
    }

    debug!(node_count = nodes.len(), allocations, "Applied filters");
    Ok(())
}
