//! Layer styles: shadow, glow, and stroke decorations drawn around a layer's content.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::property::Property;
use crate::types::Frame;

#[derive(Clone, Debug)]
pub struct DropShadowParams {
    /// RGBA, premultiplied alpha not applied.
    pub color: [f32; 4],
    pub opacity: Property<f32>,
    /// Light angle in degrees; the shadow falls on the opposite side.
    pub angle: Property<f32>,
    pub distance: Property<f32>,
    pub size: Property<f32>,
    /// Portion of `size` spent on a hard choke instead of blur, in `[0, 1]`.
    pub spread: Property<f32>,
}

impl Default for DropShadowParams {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            opacity: Property::Static(0.75),
            angle: Property::Static(120.0),
            distance: Property::Static(5.0),
            size: Property::Static(5.0),
            spread: Property::Static(0.0),
        }
    }
}

impl DropShadowParams {
    /// Shadow offset in content pixels.
    pub fn offset_at(&self, frame: Frame) -> Point {
        let radians = (self.angle.value_at(frame) - 180.0).to_radians();
        let distance = self.distance.value_at(frame);
        Point::new(radians.cos() * distance, -radians.sin() * distance)
    }
}

#[derive(Clone, Debug)]
pub struct OuterGlowParams {
    pub color: [f32; 4],
    pub opacity: Property<f32>,
    pub size: Property<f32>,
    pub spread: Property<f32>,
    /// Falloff range in `[0, 1]`.
    pub range: Property<f32>,
}

impl Default for OuterGlowParams {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 0.75, 1.0],
            opacity: Property::Static(0.75),
            size: Property::Static(5.0),
            spread: Property::Static(0.0),
            range: Property::Static(0.5),
        }
    }
}

/// Where a stroke sits relative to the content edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokePosition {
    #[default]
    Outside,
    Center,
    Inside,
}

#[derive(Clone, Debug)]
pub struct StrokeParams {
    pub color: [f32; 4],
    pub opacity: Property<f32>,
    pub size: Property<f32>,
    pub position: StrokePosition,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self {
            color: [1.0, 0.0, 0.0, 1.0],
            opacity: Property::Static(1.0),
            size: Property::Static(3.0),
            position: StrokePosition::Outside,
        }
    }
}

#[derive(Clone, Debug)]
pub enum LayerStyleKind {
    DropShadow(DropShadowParams),
    OuterGlow(OuterGlowParams),
    Stroke(StrokeParams),
}

impl From<DropShadowParams> for LayerStyleKind {
    fn from(params: DropShadowParams) -> Self {
        Self::DropShadow(params)
    }
}

impl From<OuterGlowParams> for LayerStyleKind {
    fn from(params: OuterGlowParams) -> Self {
        Self::OuterGlow(params)
    }
}

impl From<StrokeParams> for LayerStyleKind {
    fn from(params: StrokeParams) -> Self {
        Self::Stroke(params)
    }
}

/// A layer style applied to a layer.
#[derive(Clone, Debug)]
pub struct LayerStyle {
    pub enabled: bool,
    pub kind: LayerStyleKind,
}

impl LayerStyle {
    pub fn new(kind: impl Into<LayerStyleKind>) -> Self {
        Self {
            enabled: true,
            kind: kind.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            LayerStyleKind::DropShadow(_) => "drop_shadow",
            LayerStyleKind::OuterGlow(_) => "outer_glow",
            LayerStyleKind::Stroke(_) => "stroke",
        }
    }

    pub fn visible_at(&self, frame: Frame) -> bool {
        if !self.enabled {
            return false;
        }
        match &self.kind {
            LayerStyleKind::DropShadow(p) => {
                p.opacity.value_at(frame) > 0.0
                    && (p.distance.value_at(frame) != 0.0 || p.size.value_at(frame) > 0.0)
            }
            LayerStyleKind::OuterGlow(p) => {
                p.opacity.value_at(frame) > 0.0 && p.size.value_at(frame) > 0.0
            }
            LayerStyleKind::Stroke(p) => {
                p.opacity.value_at(frame) > 0.0 && p.size.value_at(frame) > 0.0
            }
        }
    }

    /// Grow `bounds` to cover both the source and the style's own output.
    pub fn transform_bounds(&self, bounds: &mut Rect, scale: Point, frame: Frame) {
        let source = *bounds;
        let mut styled = source;
        match &self.kind {
            LayerStyleKind::DropShadow(p) => {
                let offset = p.offset_at(frame);
                let size = p.size.value_at(frame);
                styled.offset(offset.x * scale.x, offset.y * scale.y);
                styled.outset(size * scale.x, size * scale.y);
            }
            LayerStyleKind::OuterGlow(p) => {
                let size = p.size.value_at(frame);
                styled.outset(size * scale.x, size * scale.y);
            }
            LayerStyleKind::Stroke(p) => {
                let width = match p.position {
                    StrokePosition::Outside => p.size.value_at(frame),
                    StrokePosition::Center => p.size.value_at(frame) * 0.5,
                    StrokePosition::Inside => 0.0,
                };
                styled.outset(width * scale.x, width * scale.y);
            }
        }
        bounds.join(&styled);
    }
}
