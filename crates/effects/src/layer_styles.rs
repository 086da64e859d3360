//! Aggregate filter for a layer's styles.
//!
//! All visible styles of a layer draw in one filter node. Shadows and glows
//! go underneath the source, strokes on top of it. Passes are rebuilt from
//! the layer's live styles on every `update`.

use lfx_common::{
    FilterPass, FilterSource, FilterTarget, Frame, GpuContext, LayerStyle, LayerStyleKind, Point,
    ProgramId, Rect, StrokePosition, UniformArgs,
};
use tracing::trace;

use crate::quad::PassGeometry;
use crate::FilterError;

/// Choke width, in pixels, above which the spread pass switches to the thick kernel.
const THICK_SPREAD_THRESHOLD: f32 = 3.0;

/// Spread kernel used by a drop shadow pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpreadMode {
    Normal,
    Thick,
}

impl SpreadMode {
    fn for_choke(choke: f32) -> Self {
        if choke > THICK_SPREAD_THRESHOLD {
            Self::Thick
        } else {
            Self::Normal
        }
    }
}

/// One draw issued by the aggregate filter.
#[derive(Clone, Debug, PartialEq)]
pub struct StylePass {
    pub program: ProgramId,
    pub uniforms: UniformArgs,
}

#[derive(Debug, Default)]
pub struct LayerStylesFilter {
    passes: Vec<StylePass>,
    geometry: Option<PassGeometry>,
}

impl LayerStylesFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of the source bounds with every style's output.
    pub fn transform_bounds(bounds: &mut Rect, styles: &[&LayerStyle], scale: Point, frame: Frame) {
        let source = *bounds;
        for style in styles {
            let mut styled = source;
            style.transform_bounds(&mut styled, scale, frame);
            bounds.join(&styled);
        }
    }

    pub fn passes(&self) -> &[StylePass] {
        &self.passes
    }

    pub fn update(
        &mut self,
        styles: &[&LayerStyle],
        frame: Frame,
        input_bounds: Rect,
        output_bounds: Rect,
        scale: Point,
    ) {
        let mut below = Vec::new();
        let mut above = Vec::new();
        for style in styles.iter().filter(|s| s.visible_at(frame)) {
            match &style.kind {
                LayerStyleKind::DropShadow(p) => {
                    let offset = p.offset_at(frame);
                    let size = p.size.value_at(frame);
                    let spread = p.spread.value_at(frame).clamp(0.0, 1.0);
                    let choke = spread * size * scale.max_component();
                    let (program, mode) = if spread > 0.0 {
                        (ProgramId::DropShadowSpread, SpreadMode::for_choke(choke))
                    } else {
                        (ProgramId::DropShadow, SpreadMode::Normal)
                    };
                    trace!(program = %program, ?mode, choke, "Drop shadow pass");
                    below.push(StylePass {
                        program,
                        uniforms: UniformArgs::new()
                            .push_vec4(p.color)
                            .push_f32(p.opacity.value_at(frame))
                            .push_vec2([offset.x * scale.x, offset.y * scale.y])
                            .push_vec2([size * scale.x, size * scale.y])
                            .push_f32(spread)
                            .push_bool(mode == SpreadMode::Thick),
                    });
                }
                LayerStyleKind::OuterGlow(p) => {
                    let size = p.size.value_at(frame);
                    below.push(StylePass {
                        program: ProgramId::OuterGlow,
                        uniforms: UniformArgs::new()
                            .push_vec4(p.color)
                            .push_f32(p.opacity.value_at(frame))
                            .push_vec2([size * scale.x, size * scale.y])
                            .push_f32(p.spread.value_at(frame))
                            .push_f32(p.range.value_at(frame)),
                    });
                }
                LayerStyleKind::Stroke(p) => {
                    let size = p.size.value_at(frame);
                    let position = match p.position {
                        StrokePosition::Outside => 0,
                        StrokePosition::Center => 1,
                        StrokePosition::Inside => 2,
                    };
                    above.push(StylePass {
                        program: ProgramId::Stroke,
                        uniforms: UniformArgs::new()
                            .push_vec4(p.color)
                            .push_f32(p.opacity.value_at(frame))
                            .push_vec2([size * scale.x, size * scale.y])
                            .push_u32(position),
                    });
                }
            }
        }
        self.passes = below;
        self.passes.push(StylePass {
            program: ProgramId::Passthrough,
            uniforms: UniformArgs::new(),
        });
        self.passes.extend(above);
        self.geometry = Some(PassGeometry::new(input_bounds, output_bounds, scale));
    }

    pub fn draw(
        &self,
        context: &dyn GpuContext,
        source: &FilterSource,
        target: &FilterTarget,
    ) -> Result<(), FilterError> {
        let geometry = self.geometry.ok_or_else(|| FilterError::NotUpdated {
            filter: "layer_styles".to_string(),
        })?;
        let (vertices, tex_coords) = geometry.quad(source, target);
        for pass in &self.passes {
            context.draw_filter(&FilterPass {
                program: pass.program,
                uniforms: &pass.uniforms,
                source,
                target,
                vertices,
                tex_coords,
                aux_texture: None,
            })?;
        }
        Ok(())
    }
}
