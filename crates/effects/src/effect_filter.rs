//! Filter object for a single effect.
//!
//! Uniforms are rebuilt on every `update` from the live effect at that frame;
//! the filter keeps only what outlives a frame. Displacement-map filters
//! additionally carry the rasterized map texture, uploaded through
//! [`EffectFilter::update_map_texture`].

use lfx_common::{
    Effect, EffectId, EffectKind, EffectType, FilterPass, FilterSource, FilterTarget, Frame,
    GpuContext, Point, ProgramId, Rect, Texture, UniformArgs,
};
use tracing::trace;

use crate::quad::PassGeometry;
use crate::FilterError;

/// Reference map sampled by a displacement-map filter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapTexture {
    pub texture: Texture,
    /// Map bounds in map-layer content pixels.
    pub bounds: Rect,
}

/// GPU filter driven by one effect.
#[derive(Debug)]
pub struct EffectFilter {
    id: EffectId,
    effect_type: EffectType,
    uniforms: UniformArgs,
    geometry: Option<PassGeometry>,
    map: Option<MapTexture>,
}

impl EffectFilter {
    pub fn new(effect: &Effect) -> Self {
        Self {
            id: effect.id.clone(),
            effect_type: effect.effect_type(),
            uniforms: UniformArgs::new(),
            geometry: None,
            map: None,
        }
    }

    pub fn id(&self) -> &EffectId {
        &self.id
    }

    pub fn effect_type(&self) -> EffectType {
        self.effect_type
    }

    pub fn program(&self) -> ProgramId {
        match self.effect_type {
            EffectType::FastBlur => ProgramId::FastBlur,
            EffectType::Glow => ProgramId::Glow,
            EffectType::DisplacementMap => ProgramId::DisplacementMap,
            EffectType::MotionTile => ProgramId::MotionTile,
            EffectType::CornerPin => ProgramId::CornerPin,
            EffectType::Bulge => ProgramId::Bulge,
            EffectType::BrightnessContrast => ProgramId::BrightnessContrast,
            EffectType::Mosaic => ProgramId::Mosaic,
        }
    }

    pub fn uniforms(&self) -> &UniformArgs {
        &self.uniforms
    }

    pub fn geometry(&self) -> Option<&PassGeometry> {
        self.geometry.as_ref()
    }

    pub fn map_texture(&self) -> Option<&MapTexture> {
        self.map.as_ref()
    }

    /// Corner pin warps edges diagonally and needs multisampling to stay smooth.
    pub fn needs_msaa(&self) -> bool {
        self.effect_type == EffectType::CornerPin
    }

    /// Rebuild uniforms from `effect` and record this frame's bounds.
    pub fn update(
        &mut self,
        effect: &Effect,
        frame: Frame,
        input_bounds: Rect,
        output_bounds: Rect,
        scale: Point,
    ) {
        let effect_type = effect.effect_type();
        if effect_type != self.effect_type {
            trace!(effect = %effect.id, from = ?self.effect_type, to = ?effect_type, "Effect kind changed");
            self.effect_type = effect_type;
            self.map = None;
        }
        self.uniforms = build_uniforms(&effect.kind, frame, &input_bounds, scale);
        self.geometry = Some(PassGeometry::new(input_bounds, output_bounds, scale));
    }

    /// Replace the displacement map. Only meaningful for displacement-map effects.
    pub fn update_map_texture(&mut self, texture: Option<Texture>, bounds: Rect) {
        self.map = texture.map(|texture| MapTexture { texture, bounds });
    }

    pub fn draw(
        &self,
        context: &dyn GpuContext,
        source: &FilterSource,
        target: &FilterTarget,
    ) -> Result<(), FilterError> {
        let geometry = self.geometry.ok_or_else(|| FilterError::NotUpdated {
            filter: self.id.to_string(),
        })?;
        let (vertices, tex_coords) = geometry.quad(source, target);
        let mut program = self.program();
        let mut uniforms = &self.uniforms;
        let empty = UniformArgs::new();
        let mut aux_texture = None;
        if self.effect_type() == EffectType::DisplacementMap {
            match &self.map {
                Some(map) => {
                    aux_texture = Some(map.texture);
                }
                None => {
                    trace!(effect = %self.id, "No displacement map, drawing source unchanged");
                    program = ProgramId::Passthrough;
                    uniforms = &empty;
                }
            }
        }
        context.draw_filter(&FilterPass {
            program,
            uniforms,
            source,
            target,
            vertices,
            tex_coords,
            aux_texture,
        })?;
        Ok(())
    }
}

fn build_uniforms(kind: &EffectKind, frame: Frame, input: &Rect, scale: Point) -> UniformArgs {
    match kind {
        EffectKind::FastBlur(p) => {
            let blurriness = p.blurriness.value_at(frame);
            let dimension = p.dimension.value_at(frame) as u32;
            UniformArgs::new()
                .push_vec2([blurriness * scale.x, blurriness * scale.y])
                .push_u32(dimension)
                .push_bool(p.repeat_edge_pixels.value_at(frame))
        }
        EffectKind::Glow(p) => UniformArgs::new()
            .push_f32(p.threshold.value_at(frame))
            .push_vec2([
                p.radius.value_at(frame) * scale.x,
                p.radius.value_at(frame) * scale.y,
            ])
            .push_f32(p.intensity.value_at(frame)),
        EffectKind::DisplacementMap(p) => UniformArgs::new()
            .push_vec2([
                p.horizontal.value_at(frame) * scale.x,
                p.vertical.value_at(frame) * scale.y,
            ])
            .push_bool(p.wrap_pixels.value_at(frame))
            .push_vec2([input.width(), input.height()]),
        EffectKind::MotionTile(p) => {
            let center = p.tile_center.value_at(frame);
            UniformArgs::new()
                .push_vec2([
                    (center.x - input.left) / input.width().max(1.0),
                    (center.y - input.top) / input.height().max(1.0),
                ])
                .push_vec2([
                    p.tile_width.value_at(frame) / 100.0,
                    p.tile_height.value_at(frame) / 100.0,
                ])
                .push_vec2([
                    p.output_width.value_at(frame) / 100.0,
                    p.output_height.value_at(frame) / 100.0,
                ])
                .push_bool(p.mirror_edges.value_at(frame))
                .push_f32(p.phase.value_at(frame))
        }
        EffectKind::CornerPin(p) => {
            let mut args = UniformArgs::new();
            for corner in p.points_at(frame) {
                args = args.push_vec2([corner.x * scale.x, corner.y * scale.y]);
            }
            args
        }
        EffectKind::Bulge(p) => {
            let center = p.center.value_at(frame);
            UniformArgs::new()
                .push_vec2([
                    (center.x - input.left) * scale.x,
                    (center.y - input.top) * scale.y,
                ])
                .push_vec2([
                    p.horizontal_radius.value_at(frame) * scale.x,
                    p.vertical_radius.value_at(frame) * scale.y,
                ])
                .push_f32(p.height.value_at(frame))
                .push_bool(p.pinning.value_at(frame))
        }
        EffectKind::BrightnessContrast(p) => UniformArgs::new()
            .push_f32(p.brightness.value_at(frame))
            .push_f32(p.contrast.value_at(frame)),
        EffectKind::Mosaic(p) => UniformArgs::new()
            .push_u32(p.horizontal_blocks.value_at(frame).max(1))
            .push_u32(p.vertical_blocks.value_at(frame).max(1))
            .push_bool(p.sharp_colors),
    }
}

#[cfg(test)]
mod tests {
    use lfx_common::{
        BrightnessContrastParams, CornerPinParams, DisplacementMapParams, FastBlurParams,
        GlowParams, Property, Uniform,
    };

    use super::*;

    fn glow(radius: f32) -> Effect {
        Effect::new(
            "glow",
            GlowParams {
                radius: Property::Static(radius),
                ..Default::default()
            },
        )
    }

    #[test]
    fn blur_uniforms_scale_with_filter_scale() {
        let blur = Effect::new(
            "blur",
            FastBlurParams {
                blurriness: Property::Static(8.0),
                ..Default::default()
            },
        );
        let mut filter = EffectFilter::new(&blur);
        let bounds = Rect::from_wh(10.0, 10.0);
        filter.update(&blur, Frame(0), bounds, bounds, Point::new(0.5, 2.0));
        assert_eq!(filter.uniforms().len(), 3);
        assert_eq!(filter.uniforms().entries()[0], Uniform::Vec2([4.0, 16.0]));
        assert_eq!(filter.program(), ProgramId::FastBlur);
        assert!(!filter.needs_msaa());
    }

    #[test]
    fn uniforms_follow_the_effect_passed_to_update() {
        let bounds = Rect::from_wh(10.0, 10.0);
        let mut filter = EffectFilter::new(&glow(10.0));
        filter.update(&glow(10.0), Frame(0), bounds, bounds, Point::ONE);
        assert_eq!(filter.uniforms().entries()[1], Uniform::Vec2([10.0, 10.0]));

        // Same id, edited radius: the cached filter must not keep the old value.
        filter.update(&glow(2.0), Frame(0), bounds, bounds, Point::ONE);
        assert_eq!(filter.uniforms().entries()[1], Uniform::Vec2([2.0, 2.0]));
    }

    #[test]
    fn kind_change_switches_program() {
        let bounds = Rect::from_wh(10.0, 10.0);
        let mut filter = EffectFilter::new(&glow(4.0));
        let bc = Effect::new("glow", BrightnessContrastParams::default());
        filter.update(&bc, Frame(0), bounds, bounds, Point::ONE);
        assert_eq!(filter.program(), ProgramId::BrightnessContrast);
        assert_eq!(filter.uniforms().len(), 2);
    }

    #[test]
    fn corner_pin_needs_msaa() {
        let filter = EffectFilter::new(&Effect::new(
            "pin",
            CornerPinParams {
                upper_left: Property::Static(Point::ZERO),
                upper_right: Property::Static(Point::new(10.0, 0.0)),
                lower_left: Property::Static(Point::new(0.0, 10.0)),
                lower_right: Property::Static(Point::new(10.0, 10.0)),
            },
        ));
        assert!(filter.needs_msaa());
    }

    #[test]
    fn map_texture_round_trips_through_update() {
        let mut filter = EffectFilter::new(&Effect::new("map", DisplacementMapParams::default()));
        assert!(filter.map_texture().is_none());
        let texture = Texture {
            handle: 5,
            width: 32,
            height: 16,
        };
        filter.update_map_texture(Some(texture), Rect::from_wh(32.0, 16.0));
        assert_eq!(filter.map_texture().unwrap().texture, texture);
        filter.update_map_texture(None, Rect::empty());
        assert!(filter.map_texture().is_none());
    }

    #[test]
    fn geometry_recorded_on_update() {
        let bc = Effect::new("bc", BrightnessContrastParams::default());
        let mut filter = EffectFilter::new(&bc);
        assert!(filter.geometry().is_none());
        let input = Rect::from_wh(4.0, 4.0);
        let output = Rect::new(-1.0, -1.0, 5.0, 5.0);
        filter.update(&bc, Frame(3), input, output, Point::ONE);
        let geometry = filter.geometry().unwrap();
        assert_eq!(geometry.input_bounds, input);
        assert_eq!(geometry.output_bounds, output);
    }
}
