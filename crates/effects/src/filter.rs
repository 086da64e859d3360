//! The closed set of filter objects a layer's filter chain is built from.

use std::sync::Arc;

use lfx_common::{Effect, FilterSource, FilterTarget, Frame, GpuContext, LayerStyle, Point, Rect};
use parking_lot::Mutex;
use tracing::debug;

use crate::effect_filter::EffectFilter;
use crate::layer_styles::LayerStylesFilter;
use crate::motion_blur::MotionBlurFilter;
use crate::FilterError;

/// Shared handle to a cached filter.
///
/// The render cache owns filters across frames; a filter chain locks each
/// one while it updates or draws it.
pub type FilterHandle = Arc<Mutex<LayerFilter>>;

/// Live parameters a filter is refreshed from on every update.
///
/// Cached filters keep no copy of the effect or styles they were built for,
/// so edits and keyframes always reach the next draw.
#[derive(Clone, Copy, Debug)]
pub enum FilterParams<'a> {
    Effect(&'a Effect),
    MotionBlur,
    LayerStyles(&'a [&'a LayerStyle]),
}

#[derive(Debug)]
pub enum LayerFilter {
    Effect(EffectFilter),
    MotionBlur(MotionBlurFilter),
    LayerStyles(LayerStylesFilter),
}

impl LayerFilter {
    pub fn into_handle(self) -> FilterHandle {
        Arc::new(Mutex::new(self))
    }

    /// Short name for logs.
    pub fn name(&self) -> String {
        match self {
            Self::Effect(f) => format!("effect:{}", f.id()),
            Self::MotionBlur(_) => "motion_blur".to_string(),
            Self::LayerStyles(_) => "layer_styles".to_string(),
        }
    }

    /// Hand the filter its parameters and bounds for this frame:
    /// `input_bounds` is what the source texture covers, `output_bounds` what
    /// the filter will draw.
    pub fn update(
        &mut self,
        params: FilterParams<'_>,
        frame: Frame,
        input_bounds: Rect,
        output_bounds: Rect,
        scale: Point,
    ) {
        match (self, params) {
            (Self::Effect(f), FilterParams::Effect(effect)) => {
                f.update(effect, frame, input_bounds, output_bounds, scale)
            }
            (Self::MotionBlur(f), FilterParams::MotionBlur) => {
                f.update(frame, input_bounds, output_bounds, scale)
            }
            (Self::LayerStyles(f), FilterParams::LayerStyles(styles)) => {
                f.update(styles, frame, input_bounds, output_bounds, scale)
            }
            (filter, params) => {
                debug!(filter = %filter.name(), ?params, "Filter kind does not match its parameters")
            }
        }
    }

    pub fn needs_msaa(&self) -> bool {
        match self {
            Self::Effect(f) => f.needs_msaa(),
            Self::MotionBlur(_) | Self::LayerStyles(_) => false,
        }
    }

    pub fn draw(
        &self,
        context: &dyn GpuContext,
        source: &FilterSource,
        target: &FilterTarget,
    ) -> Result<(), FilterError> {
        match self {
            Self::Effect(f) => f.draw(context, source, target),
            Self::MotionBlur(f) => f.draw(context, source, target),
            Self::LayerStyles(f) => f.draw(context, source, target),
        }
    }

    /// The effect filter if it is a displacement map, the only kind that
    /// takes a second input.
    pub fn as_displacement_map_mut(&mut self) -> Option<&mut EffectFilter> {
        match self {
            Self::Effect(f) if f.effect_type() == lfx_common::EffectType::DisplacementMap => Some(f),
            _ => None,
        }
    }

    pub fn as_motion_blur_mut(&mut self) -> Option<&mut MotionBlurFilter> {
        match self {
            Self::MotionBlur(f) => Some(f),
            _ => None,
        }
    }
}
