//! Layer filter renderer: draws a layer's content with its filters applied.
//!
//! The [`FilterRenderer`] takes a layer, the frame, the layer's rendered
//! content and a destination canvas, then:
//! 1. builds the [`FilterList`] and the filter chain,
//! 2. rasterizes the content into a surface,
//! 3. runs the chain into the destination or an offscreen surface,
//! 4. blits the offscreen result back.
//!
//! An empty chain draws the content unfiltered.

use lfx_common::{
    Canvas, EffectType, FilterConfig, FilterSource, Frame, Graphic, Layer, Matrix, Point, Rect,
};
use lfx_effects::RenderCache;
use tracing::debug;

use crate::apply::apply_filters;
use crate::bounds::{content_bounds, measure_filter_bounds};
use crate::filter_list::FilterList;
use crate::guard::{CanvasRestore, GpuStateGuard};
use crate::nodes::{make_filter_nodes, FilterNode};
use crate::target::{direct_filter_target, offscreen_filter_target};
use crate::CompositorError;

/// What a draw ended up doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Filters ran; `offscreen` when the result went through an offscreen surface.
    Filtered { offscreen: bool },
    /// Nothing to filter, or clipping removed all output; content was drawn as is.
    Unfiltered,
    /// A surface or buffer could not be allocated; nothing was drawn.
    Dropped,
}

/// Draws layers through their filter chains.
#[derive(Clone, Debug, Default)]
pub struct FilterRenderer {
    config: FilterConfig,
}

impl FilterRenderer {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Bounds of everything `layer`'s filters draw, given its tight content
    /// bounds in `bounds`.
    pub fn measure_filter_bounds(&self, bounds: &mut Rect, layer: &Layer, layer_frame: Frame) {
        measure_filter_bounds(bounds, layer, layer_frame, &self.config);
    }

    /// Clip bounds of `parent` in the coordinates the filter chain runs in.
    pub fn clip_bounds(parent: &dyn Canvas, list: &FilterList<'_>) -> Rect {
        let mut matrix = parent.matrix();
        if list.use_parent_size_input {
            matrix.pre_concat(&list.inverted_layer_matrix());
        }
        let inverted = matrix.invert().unwrap_or(Matrix::IDENTITY);
        inverted.map_rect(&parent.clip_bounds())
    }

    /// Content rasterization scale limit after the fast-blur downsample policy.
    ///
    /// A fast blur whose strength never changes hides rasterization detail,
    /// so the content is drawn at a reduced scale. Layer styles opt out.
    fn scale_factor_limit(&self, list: &FilterList<'_>) -> f32 {
        let mut limit = list.scale_factor_limit;
        if !self.config.fast_blur_downsample || !list.layer_styles.is_empty() {
            return limit;
        }
        let first_blur = list
            .effects
            .iter()
            .find(|e| e.effect_type() == EffectType::FastBlur);
        if first_blur.is_some_and(|e| e.is_static_fast_blur()) {
            limit = limit.min(self.config.fast_blur_max_scale_factor);
        }
        limit
    }

    /// Draw `content` onto `parent` with `layer`'s filters at `layer_frame`.
    ///
    /// Allocation failures drop the frame and report [`FilterOutcome::Dropped`];
    /// other GPU or filter failures are returned. The parent canvas matrix and
    /// the GPU state are restored on every path.
    pub fn draw_with_filter(
        &self,
        parent: &mut dyn Canvas,
        cache: &mut dyn RenderCache,
        layer: &Layer,
        layer_frame: Frame,
        content: &dyn Graphic,
    ) -> Result<FilterOutcome, CompositorError> {
        let list = FilterList::new(layer, layer_frame, &self.config);
        let mut content_bounds = content_bounds(&list, content);
        let clip_bounds = Self::clip_bounds(parent, &list);
        let nodes = make_filter_nodes(&list, cache, &mut content_bounds, &clip_bounds, &self.config);
        if nodes.is_empty() {
            content.draw(parent);
            return Ok(FilterOutcome::Unfiltered);
        }

        match self.composite(parent, &list, &nodes, content_bounds, content) {
            Err(err) if err.is_alloc_failure() => {
                debug!(layer = %layer.id, frame = %layer_frame, error = %err, "Dropped filtered layer");
                Ok(FilterOutcome::Dropped)
            }
            other => other,
        }
    }

    fn composite(
        &self,
        parent: &mut dyn Canvas,
        list: &FilterList<'_>,
        nodes: &[FilterNode],
        content_bounds: Rect,
        content: &dyn Graphic,
    ) -> Result<FilterOutcome, CompositorError> {
        let state = GpuStateGuard::new(parent.context());
        let mut parent = CanvasRestore::new(parent);
        if list.use_parent_size_input {
            parent.concat(&list.inverted_layer_matrix());
        }
        let scale_factor_limit = self.scale_factor_limit(list);

        let mut content_surface =
            parent.make_content_surface(&content_bounds, scale_factor_limit, false)?;
        let source_scale = {
            let canvas = content_surface.canvas();
            if list.use_parent_size_input {
                canvas.concat(&list.layer_matrix);
            }
            content.draw(canvas);
            canvas.matrix().max_scale_factor()
        };
        let source = FilterSource {
            texture: content_surface.texture(),
            scale: Point::splat(source_scale),
        };

        let mut target_surface = None;
        let target = match direct_filter_target(
            &*parent,
            list,
            nodes,
            &content_bounds,
            source.scale,
            &self.config,
        ) {
            Some(target) => target,
            None => {
                let (final_bounds, msaa) = nodes
                    .last()
                    .map_or((content_bounds, false), |n| (n.bounds, n.needs_msaa()));
                let surface =
                    parent.make_content_surface(&final_bounds, scale_factor_limit, msaa)?;
                let target =
                    offscreen_filter_target(surface.texture(), nodes, &content_bounds, source.scale);
                target_surface = Some(surface);
                target
            }
        };

        // Pending draws must reach the destination before filters write to it.
        parent.flush();
        apply_filters(state.context(), nodes, &content_bounds, &source, &target)?;

        let offscreen = target_surface.is_some();
        if let Some(mut surface) = target_surface {
            let drawing_matrix = surface
                .canvas()
                .matrix()
                .invert()
                .unwrap_or(Matrix::IDENTITY);
            parent.draw_texture(&surface.texture(), &drawing_matrix);
        }
        debug!(
            layer = %list.layer.id,
            node_count = nodes.len(),
            offscreen,
            source_scale,
            "Drew filtered layer"
        );
        Ok(FilterOutcome::Filtered { offscreen })
    }
}
