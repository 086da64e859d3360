//! Snapshot of a layer's active filters at one frame.

use lfx_common::{Effect, FilterConfig, Frame, Layer, LayerStyle, LayerType, Matrix, Point};

/// Everything the filter chain needs to know about a layer at one frame.
///
/// Built once per draw and read-only afterwards.
#[derive(Debug)]
pub struct FilterList<'a> {
    pub layer: &'a Layer,
    pub layer_frame: Frame,
    /// Layer transform at the content frame matching `layer_frame`.
    pub layer_matrix: Matrix,
    /// Upper bound on the content rasterization scale.
    pub scale_factor_limit: f32,
    /// Every visible effect only reads and writes the content's visible area.
    pub process_visible_area_only: bool,
    /// Filters read a parent-sized input with the layer transform baked in.
    pub use_parent_size_input: bool,
    /// Visible effects, in authoring order.
    pub effects: Vec<&'a Effect>,
    /// Visible layer styles, in authoring order.
    pub layer_styles: Vec<&'a LayerStyle>,
    /// Scale effect parameters are multiplied by. Divides the layer
    /// transform's scale back out when effects run on a parent-size layer
    /// without a parent-size input; `(1, 1)` otherwise.
    pub effect_scale: Point,
    /// Scale layer style parameters are multiplied by. Divides the layer
    /// transform's scale back out unless the input is parent-size.
    pub layer_style_scale: Point,
}

impl<'a> FilterList<'a> {
    pub fn new(layer: &'a Layer, layer_frame: Frame, config: &FilterConfig) -> Self {
        let effects: Vec<&Effect> = layer
            .effects
            .iter()
            .filter(|e| e.visible_at(layer_frame))
            .collect();
        let layer_styles: Vec<&LayerStyle> = layer
            .layer_styles
            .iter()
            .filter(|s| s.visible_at(layer_frame))
            .collect();
        let layer_matrix = layer.matrix_at(layer.content_frame(layer_frame));
        let scale_factor_limit = if layer.layer_type() == LayerType::Image {
            config.image_scale_factor_limit
        } else {
            f32::MAX
        };
        let process_visible_area_only = effects.iter().all(|e| e.process_visible_area_only());

        // Shape and Text content has no size of its own. Effects that sample
        // outside the visible area read the parent composition instead.
        let need_parent_size = !effects.is_empty() && layer.has_unbounded_content();
        let use_parent_size_input = !process_visible_area_only && need_parent_size;

        // Styles (and parent-size effects) run before the layer transform,
        // so its scale is divided back out.
        let mut effect_scale = Point::ONE;
        let mut layer_style_scale = Point::ONE;
        if !use_parent_size_input {
            layer_style_scale = layer_matrix.inverted_scale_factors();
            if need_parent_size {
                effect_scale = layer_style_scale;
            }
        }

        Self {
            layer,
            layer_frame,
            layer_matrix,
            scale_factor_limit,
            process_visible_area_only,
            use_parent_size_input,
            effects,
            layer_styles,
            effect_scale,
            layer_style_scale,
        }
    }

    pub fn has_motion_blur(&self) -> bool {
        self.layer.motion_blur
    }

    /// Inverse layer transform, or identity when the transform is singular.
    pub fn inverted_layer_matrix(&self) -> Matrix {
        self.layer_matrix.invert().unwrap_or(Matrix::IDENTITY)
    }
}
