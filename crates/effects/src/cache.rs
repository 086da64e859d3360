//! Filter lookup across frames.
//!
//! [`RenderCache`] is what the compositor asks for filters and for a map
//! layer's rendered content. [`FilterCache`] is the filter store a host's
//! `RenderCache` delegates the filter half to. Effect filters are keyed by
//! layer and effect id, since effect ids are only unique within a layer.

use std::collections::HashMap;
use std::sync::Arc;

use lfx_common::{Effect, EffectId, Frame, Graphic, Layer, LayerId, Rect, Texture};
use tracing::{debug, info};

use crate::effect_filter::EffectFilter;
use crate::filter::{FilterHandle, LayerFilter};
use crate::layer_styles::LayerStylesFilter;
use crate::motion_blur::MotionBlurFilter;

/// Host-side cache the filter chain resolves its filters through.
///
/// Any method may return `None`; the chain omits what it cannot resolve.
pub trait RenderCache {
    fn filter_for_effect(&mut self, layer: &Layer, effect: &Effect) -> Option<FilterHandle>;

    fn motion_blur_filter(&mut self) -> Option<FilterHandle>;

    fn layer_styles_filter(&mut self, layer: &Layer) -> Option<FilterHandle>;

    /// Rendered content of `layer` at `layer_frame`, used as a displacement map.
    fn layer_graphic(&mut self, layer: &Layer, layer_frame: Frame) -> Option<Arc<dyn Graphic>>;

    /// Rasterize `graphic` over `bounds` into a texture.
    fn rasterize(&mut self, graphic: &dyn Graphic, bounds: Rect) -> Option<Texture>;
}

/// Filters built on first use and kept until invalidated.
///
/// Filters hold no parameters of their own; the chain refreshes them from
/// the live layer on every update.
#[derive(Default)]
pub struct FilterCache {
    effects: HashMap<(LayerId, EffectId), FilterHandle>,
    styles: HashMap<LayerId, FilterHandle>,
    motion_blur: Option<FilterHandle>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effect_filter(&mut self, layer: &Layer, effect: &Effect) -> FilterHandle {
        let key = (layer.id, effect.id.clone());
        let handle = self.effects.entry(key).or_insert_with(|| {
            debug!(
                layer = %layer.id,
                effect = %effect.id,
                kind = effect.effect_type().display_name(),
                "Built effect filter"
            );
            LayerFilter::Effect(EffectFilter::new(effect)).into_handle()
        });
        Arc::clone(handle)
    }

    pub fn motion_blur_filter(&mut self) -> FilterHandle {
        let handle = self.motion_blur.get_or_insert_with(|| {
            debug!("Built motion blur filter");
            LayerFilter::MotionBlur(MotionBlurFilter::new()).into_handle()
        });
        Arc::clone(handle)
    }

    pub fn layer_styles_filter(&mut self, layer: &Layer) -> FilterHandle {
        let handle = self.styles.entry(layer.id).or_insert_with(|| {
            debug!(layer = %layer.id, count = layer.layer_styles.len(), "Built layer styles filter");
            LayerFilter::LayerStyles(LayerStylesFilter::new()).into_handle()
        });
        Arc::clone(handle)
    }

    /// Drop every filter built for `layer`, including those of effects it no
    /// longer has.
    pub fn invalidate_layer(&mut self, layer: &Layer) {
        self.effects.retain(|(layer_id, _), _| *layer_id != layer.id);
        self.styles.remove(&layer.id);
    }

    pub fn clear(&mut self) {
        let count = self.len();
        self.effects.clear();
        self.styles.clear();
        self.motion_blur = None;
        info!(count, "Cleared filter cache");
    }

    /// Number of cached filters.
    pub fn len(&self) -> usize {
        self.effects.len() + self.styles.len() + usize::from(self.motion_blur.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
