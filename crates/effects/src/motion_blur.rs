//! Motion blur filter.
//!
//! The blur direction comes from how the layer transform moves between the
//! previous and next content frames. A layer whose transform is identical
//! across all three frames has nothing to blur.

use lfx_common::{
    FilterPass, FilterSource, FilterTarget, Frame, GpuContext, Layer, Matrix, Point, ProgramId,
    Rect, UniformArgs,
};
use tracing::trace;

use crate::quad::PassGeometry;
use crate::FilterError;

/// Layer matrices at the previous, current and next content frame.
fn layer_matrices(layer: &Layer, layer_frame: Frame) -> [Matrix; 3] {
    let content_frame = layer.content_frame(layer_frame);
    [
        layer.matrix_at(content_frame - 1),
        layer.matrix_at(content_frame),
        layer.matrix_at(content_frame + 1),
    ]
}

fn to_mat3(m: &Matrix) -> [f32; 9] {
    [
        m.scale_x, m.skew_x, m.trans_x, m.skew_y, m.scale_y, m.trans_y, 0.0, 0.0, 1.0,
    ]
}

#[derive(Debug, Default)]
pub struct MotionBlurFilter {
    /// Maps current positions to where they were one frame earlier.
    previous: Matrix,
    /// Maps current positions to where they will be one frame later.
    next: Matrix,
    uniforms: UniformArgs,
    geometry: Option<PassGeometry>,
}

impl MotionBlurFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the layer has no motion to blur at `layer_frame`.
    pub fn should_skip(layer: &Layer, layer_frame: Frame) -> bool {
        if !layer.motion_blur {
            return true;
        }
        let [previous, current, next] = layer_matrices(layer, layer_frame);
        previous == current && current == next
    }

    /// Grow `bounds` about their center by `growth` when the layer moves.
    pub fn transform_bounds(bounds: &mut Rect, layer: &Layer, layer_frame: Frame, growth: f32) {
        if Self::should_skip(layer, layer_frame) {
            return;
        }
        let center = bounds.center();
        let width = bounds.width() * growth;
        let height = bounds.height() * growth;
        bounds.set_xywh(center.x - width * 0.5, center.y - height * 0.5, width, height);
    }

    /// Capture the layer's motion at `layer_frame`. Returns `false` when there
    /// is nothing to blur and the filter should be left out of the chain.
    pub fn update_layer(&mut self, layer: &Layer, layer_frame: Frame) -> bool {
        if Self::should_skip(layer, layer_frame) {
            return false;
        }
        let [previous, current, next] = layer_matrices(layer, layer_frame);
        let Some(inverted) = current.invert() else {
            trace!(layer = %layer.id, "Singular layer matrix, skipping motion blur");
            return false;
        };
        self.previous = previous.concat(&inverted);
        self.next = next.concat(&inverted);
        true
    }

    pub fn relative_matrices(&self) -> (Matrix, Matrix) {
        (self.previous, self.next)
    }

    pub fn uniforms(&self) -> &UniformArgs {
        &self.uniforms
    }

    pub fn update(&mut self, _frame: Frame, input_bounds: Rect, output_bounds: Rect, scale: Point) {
        self.uniforms = UniformArgs::new()
            .push_mat3(to_mat3(&self.previous))
            .push_mat3(to_mat3(&self.next))
            .push_vec2([scale.x, scale.y])
            .push_vec2([input_bounds.left, input_bounds.top]);
        self.geometry = Some(PassGeometry::new(input_bounds, output_bounds, scale));
    }

    pub fn draw(
        &self,
        context: &dyn GpuContext,
        source: &FilterSource,
        target: &FilterTarget,
    ) -> Result<(), FilterError> {
        let geometry = self.geometry.ok_or_else(|| FilterError::NotUpdated {
            filter: ProgramId::MotionBlur.name().to_string(),
        })?;
        let (vertices, tex_coords) = geometry.quad(source, target);
        context.draw_filter(&FilterPass {
            program: ProgramId::MotionBlur,
            uniforms: &self.uniforms,
            source,
            target,
            vertices,
            tex_coords,
            aux_texture: None,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lfx_common::{LayerId, LayerKind, Property, Transform2D};

    use super::*;

    fn moving_layer() -> Layer {
        let start = Transform2D::default();
        let end = Transform2D {
            position: Point::new(100.0, 0.0),
            ..Default::default()
        };
        Layer::new(LayerId(1), LayerKind::Shape)
            .with_motion_blur(true)
            .with_transform(Property::animated(vec![(Frame(0), start), (Frame(10), end)]).unwrap())
    }

    #[test]
    fn static_layer_is_skipped() {
        let layer = Layer::new(LayerId(1), LayerKind::Shape).with_motion_blur(true);
        assert!(MotionBlurFilter::should_skip(&layer, Frame(5)));
        let mut bounds = Rect::from_wh(10.0, 10.0);
        MotionBlurFilter::transform_bounds(&mut bounds, &layer, Frame(5), 1.2);
        assert_eq!(bounds, Rect::from_wh(10.0, 10.0));
        assert!(!MotionBlurFilter::new().update_layer(&layer, Frame(5)));
    }

    #[test]
    fn disabled_motion_blur_is_skipped() {
        let layer = moving_layer().with_motion_blur(false);
        assert!(MotionBlurFilter::should_skip(&layer, Frame(5)));
    }

    #[test]
    fn moving_layer_grows_about_center() {
        let layer = moving_layer();
        let mut bounds = Rect::from_wh(100.0, 50.0);
        MotionBlurFilter::transform_bounds(&mut bounds, &layer, Frame(5), 1.2);
        assert!((bounds.left + 10.0).abs() < 1e-4);
        assert!((bounds.top + 5.0).abs() < 1e-4);
        assert!((bounds.right - 110.0).abs() < 1e-4);
        assert!((bounds.bottom - 55.0).abs() < 1e-4);
    }

    #[test]
    fn relative_matrices_follow_motion() {
        let layer = moving_layer();
        let mut filter = MotionBlurFilter::new();
        assert!(filter.update_layer(&layer, Frame(5)));
        let (previous, next) = filter.relative_matrices();
        assert!((previous.trans_x + 10.0).abs() < 1e-3);
        assert!((next.trans_x - 10.0).abs() < 1e-3);
    }

    #[test]
    fn draw_before_update_fails() {
        struct NoGpu;
        impl GpuContext for NoGpu {
            fn make_filter_buffer(
                &self,
                width: u32,
                height: u32,
                msaa: bool,
            ) -> Result<lfx_common::FilterBuffer, lfx_common::GpuError> {
                Err(lfx_common::GpuError::AllocFailed {
                    width,
                    height,
                    msaa,
                })
            }
            fn clear_buffer(
                &self,
                _: &lfx_common::FilterBuffer,
            ) -> Result<(), lfx_common::GpuError> {
                Ok(())
            }
            fn resolve_buffer(
                &self,
                _: &lfx_common::FilterBuffer,
            ) -> Result<(), lfx_common::GpuError> {
                Ok(())
            }
            fn draw_filter(&self, _: &FilterPass<'_>) -> Result<(), lfx_common::GpuError> {
                Ok(())
            }
            fn save_state(&self) -> lfx_common::GpuState {
                lfx_common::GpuState::default()
            }
            fn restore_state(&self, _: lfx_common::GpuState) {}
        }

        let texture = lfx_common::Texture {
            handle: 1,
            width: 4,
            height: 4,
        };
        let source = FilterSource {
            texture,
            scale: Point::ONE,
        };
        let target = FilterTarget {
            texture,
            matrix: Matrix::IDENTITY,
        };
        let err = MotionBlurFilter::new()
            .draw(&NoGpu, &source, &target)
            .unwrap_err();
        assert!(matches!(err, FilterError::NotUpdated { .. }));
    }
}
