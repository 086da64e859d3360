//! Filter pipeline configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the layer filter pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Content rasterization scale used ahead of a non-animating fast blur.
    pub fast_blur_max_scale_factor: f32,
    /// Whether the fast-blur downsample policy runs at all.
    pub fast_blur_downsample: bool,
    /// Growth of motion-blurred bounds about their center.
    pub motion_blur_scale_factor: f32,
    /// Image layers never rasterize above their native resolution.
    pub image_scale_factor_limit: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            fast_blur_max_scale_factor: 0.1,
            fast_blur_downsample: true,
            motion_blur_scale_factor: 1.2,
            image_scale_factor_limit: 1.0,
        }
    }
}
