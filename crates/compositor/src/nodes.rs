//! Filter node sequencing.
//!
//! Walks the filter list in application order, updates each resolved filter
//! with its input and output bounds, and clips the output bounds against the
//! visible region. Any clip that leaves nothing drops the whole chain.

use lfx_common::{Effect, EffectKind, FilterConfig, Rect, Texture};
use lfx_effects::{FilterHandle, FilterParams, LayerStylesFilter, MotionBlurFilter, RenderCache};
use tracing::{debug, trace};

use crate::filter_list::FilterList;

/// One step of the filter chain: a filter and the bounds it draws.
#[derive(Debug, Clone)]
pub struct FilterNode {
    pub filter: FilterHandle,
    /// Output bounds in content coordinates, rounded out to whole pixels.
    pub bounds: Rect,
}

impl FilterNode {
    pub fn new(filter: FilterHandle, bounds: Rect) -> Self {
        Self { filter, bounds }
    }

    pub fn needs_msaa(&self) -> bool {
        self.filter.lock().needs_msaa()
    }
}

/// Index of the last effect that samples outside the visible area.
///
/// Effects before it must see the whole input and are never clipped.
pub fn clip_index(effects: &[&Effect]) -> Option<usize> {
    effects.iter().rposition(|e| !e.process_visible_area_only())
}

/// Build the filter chain for `list`.
///
/// `content_bounds` shrinks to the clip when no effect samples outside the
/// visible area. Returns an empty chain when clipping leaves nothing to draw.
/// Filters the cache cannot resolve are left out of the chain.
pub fn make_filter_nodes(
    list: &FilterList<'_>,
    cache: &mut dyn RenderCache,
    content_bounds: &mut Rect,
    clip_rect: &Rect,
    config: &FilterConfig,
) -> Vec<FilterNode> {
    let clip_index = clip_index(&list.effects);
    let mut clip_bounds = *clip_rect;
    let mut filter_bounds = *content_bounds;

    // Motion blur samples beyond the clip, so the clip grows with it.
    if list.has_motion_blur() {
        MotionBlurFilter::transform_bounds(
            &mut clip_bounds,
            list.layer,
            list.layer_frame,
            config.motion_blur_scale_factor,
        );
        clip_bounds.round_out();
    }
    if clip_index.is_none() && !content_bounds.intersect(&clip_bounds) {
        trace!(layer = %list.layer.id, "Content outside clip");
        return Vec::new();
    }

    let mut nodes = Vec::new();
    if !make_effect_nodes(
        &mut nodes,
        &clip_bounds,
        list,
        cache,
        &mut filter_bounds,
        clip_index,
    ) || !make_motion_blur_node(&mut nodes, &clip_bounds, list, cache, &mut filter_bounds, config)
        || !make_layer_style_node(&mut nodes, &clip_bounds, list, cache, &mut filter_bounds)
    {
        return Vec::new();
    }

    debug!(
        layer = %list.layer.id,
        frame = %list.layer_frame,
        node_count = nodes.len(),
        clip_index = ?clip_index,
        "Built filter nodes"
    );
    nodes
}

fn make_effect_nodes(
    nodes: &mut Vec<FilterNode>,
    clip_bounds: &Rect,
    list: &FilterList<'_>,
    cache: &mut dyn RenderCache,
    filter_bounds: &mut Rect,
    clip_index: Option<usize>,
) -> bool {
    for (index, effect) in list.effects.iter().enumerate() {
        let Some(filter) = cache.filter_for_effect(list.layer, effect) else {
            trace!(effect = %effect.id, "No filter for effect");
            continue;
        };
        let old_bounds = *filter_bounds;
        effect.transform_bounds(filter_bounds, list.effect_scale, list.layer_frame);
        filter_bounds.round_out();
        {
            let mut guard = filter.lock();
            guard.update(
                FilterParams::Effect(effect),
                list.layer_frame,
                old_bounds,
                *filter_bounds,
                list.effect_scale,
            );
            if let Some(map_filter) = guard.as_displacement_map_mut() {
                let (texture, map_bounds) = resolve_map_texture(effect, list, cache);
                map_filter.update_map_texture(texture, map_bounds);
            }
        }
        let clipped = clip_index.map_or(true, |ci| index >= ci);
        if clipped && !filter_bounds.intersect(clip_bounds) {
            trace!(effect = %effect.id, index, "Effect output outside clip");
            return false;
        }
        nodes.push(FilterNode::new(filter, *filter_bounds));
    }
    true
}

/// Render the displacement map layer over its composition bounds.
fn resolve_map_texture(
    effect: &Effect,
    list: &FilterList<'_>,
    cache: &mut dyn RenderCache,
) -> (Option<Texture>, Rect) {
    let EffectKind::DisplacementMap(params) = &effect.kind else {
        return (None, Rect::empty());
    };
    let Some(map_layer) = params.map_layer.as_deref() else {
        return (None, Rect::empty());
    };
    let map_bounds = map_layer.parent_bounds().rounded_out();
    let texture = cache
        .layer_graphic(map_layer, list.layer_frame)
        .and_then(|graphic| cache.rasterize(graphic.as_ref(), map_bounds));
    if texture.is_none() {
        trace!(effect = %effect.id, map_layer = %map_layer.id, "Displacement map unavailable");
    }
    (texture, map_bounds)
}

fn make_motion_blur_node(
    nodes: &mut Vec<FilterNode>,
    clip_bounds: &Rect,
    list: &FilterList<'_>,
    cache: &mut dyn RenderCache,
    filter_bounds: &mut Rect,
    config: &FilterConfig,
) -> bool {
    if !list.has_motion_blur() {
        return true;
    }
    let Some(filter) = cache.motion_blur_filter() else {
        return true;
    };
    {
        let mut guard = filter.lock();
        let has_motion = guard
            .as_motion_blur_mut()
            .is_some_and(|f| f.update_layer(list.layer, list.layer_frame));
        if !has_motion {
            trace!(layer = %list.layer.id, "No motion to blur");
            return true;
        }
        let old_bounds = *filter_bounds;
        MotionBlurFilter::transform_bounds(
            filter_bounds,
            list.layer,
            list.layer_frame,
            config.motion_blur_scale_factor,
        );
        filter_bounds.round_out();
        guard.update(
            FilterParams::MotionBlur,
            list.layer_frame,
            old_bounds,
            *filter_bounds,
            list.effect_scale,
        );
    }
    if !filter_bounds.intersect(clip_bounds) {
        return false;
    }
    nodes.push(FilterNode::new(filter, *filter_bounds));
    true
}

fn make_layer_style_node(
    nodes: &mut Vec<FilterNode>,
    clip_bounds: &Rect,
    list: &FilterList<'_>,
    cache: &mut dyn RenderCache,
    filter_bounds: &mut Rect,
) -> bool {
    if list.layer_styles.is_empty() {
        return true;
    }
    let Some(filter) = cache.layer_styles_filter(list.layer) else {
        trace!(layer = %list.layer.id, "No layer styles filter");
        return true;
    };
    let old_bounds = *filter_bounds;
    LayerStylesFilter::transform_bounds(
        filter_bounds,
        &list.layer_styles,
        list.layer_style_scale,
        list.layer_frame,
    );
    filter_bounds.round_out();
    filter.lock().update(
        FilterParams::LayerStyles(&list.layer_styles),
        list.layer_frame,
        old_bounds,
        *filter_bounds,
        list.layer_style_scale,
    );
    if !filter_bounds.intersect(clip_bounds) {
        return false;
    }
    nodes.push(FilterNode::new(filter, *filter_bounds));
    true
}
