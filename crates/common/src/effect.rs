//! Effect definitions: the closed set of per-layer visual effects.
//!
//! Every effect answers three questions for the filter pipeline: whether it
//! is visible at a frame, whether it only touches the content's visible
//! area, and how it moves the edges of the region it draws.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::layer::Layer;
use crate::property::Property;
use crate::types::{EffectId, Frame};

/// Effect type tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    FastBlur,
    Glow,
    DisplacementMap,
    MotionTile,
    CornerPin,
    Bulge,
    BrightnessContrast,
    Mosaic,
}

impl EffectType {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::FastBlur => "Fast Blur",
            Self::Glow => "Glow",
            Self::DisplacementMap => "Displacement Map",
            Self::MotionTile => "Motion Tile",
            Self::CornerPin => "Corner Pin",
            Self::Bulge => "Bulge",
            Self::BrightnessContrast => "Brightness & Contrast",
            Self::Mosaic => "Mosaic",
        }
    }
}

/// Blur direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlurDimension {
    #[default]
    Both,
    Horizontal,
    Vertical,
}

crate::impl_hold_interpolate!(BlurDimension);

#[derive(Clone, Debug)]
pub struct FastBlurParams {
    pub blurriness: Property<f32>,
    pub dimension: Property<BlurDimension>,
    /// Clamp sampling at the edges instead of fading out; keeps bounds fixed.
    pub repeat_edge_pixels: Property<bool>,
}

impl Default for FastBlurParams {
    fn default() -> Self {
        Self {
            blurriness: Property::Static(0.0),
            dimension: Property::Static(BlurDimension::Both),
            repeat_edge_pixels: Property::Static(false),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GlowParams {
    /// Luminance threshold in `[0, 1]`.
    pub threshold: Property<f32>,
    pub radius: Property<f32>,
    pub intensity: Property<f32>,
}

impl Default for GlowParams {
    fn default() -> Self {
        Self {
            threshold: Property::Static(0.6),
            radius: Property::Static(10.0),
            intensity: Property::Static(1.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DisplacementMapParams {
    /// Layer whose rendered content drives the displacement.
    pub map_layer: Option<Arc<Layer>>,
    /// Maximum horizontal displacement in pixels.
    pub horizontal: Property<f32>,
    /// Maximum vertical displacement in pixels.
    pub vertical: Property<f32>,
    pub wrap_pixels: Property<bool>,
}

impl Default for DisplacementMapParams {
    fn default() -> Self {
        Self {
            map_layer: None,
            horizontal: Property::Static(5.0),
            vertical: Property::Static(5.0),
            wrap_pixels: Property::Static(false),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MotionTileParams {
    /// Tile center in content pixels.
    pub tile_center: Property<Point>,
    /// Tile size in percent of the input.
    pub tile_width: Property<f32>,
    pub tile_height: Property<f32>,
    /// Output size in percent of the input.
    pub output_width: Property<f32>,
    pub output_height: Property<f32>,
    pub mirror_edges: Property<bool>,
    /// Phase shift in degrees.
    pub phase: Property<f32>,
}

impl Default for MotionTileParams {
    fn default() -> Self {
        Self {
            tile_center: Property::Static(Point::ZERO),
            tile_width: Property::Static(100.0),
            tile_height: Property::Static(100.0),
            output_width: Property::Static(100.0),
            output_height: Property::Static(100.0),
            mirror_edges: Property::Static(false),
            phase: Property::Static(0.0),
        }
    }
}

/// Corner positions in content pixels.
#[derive(Clone, Debug)]
pub struct CornerPinParams {
    pub upper_left: Property<Point>,
    pub upper_right: Property<Point>,
    pub lower_left: Property<Point>,
    pub lower_right: Property<Point>,
}

impl CornerPinParams {
    pub fn points_at(&self, frame: Frame) -> [Point; 4] {
        [
            self.upper_left.value_at(frame),
            self.upper_right.value_at(frame),
            self.lower_left.value_at(frame),
            self.lower_right.value_at(frame),
        ]
    }
}

#[derive(Clone, Debug)]
pub struct BulgeParams {
    pub center: Property<Point>,
    pub horizontal_radius: Property<f32>,
    pub vertical_radius: Property<f32>,
    /// Positive values push outward, negative values pinch.
    pub height: Property<f32>,
    /// Keep the layer edges fixed.
    pub pinning: Property<bool>,
}

impl Default for BulgeParams {
    fn default() -> Self {
        Self {
            center: Property::Static(Point::ZERO),
            horizontal_radius: Property::Static(50.0),
            vertical_radius: Property::Static(50.0),
            height: Property::Static(1.0),
            pinning: Property::Static(false),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BrightnessContrastParams {
    pub brightness: Property<f32>,
    pub contrast: Property<f32>,
}

impl Default for BrightnessContrastParams {
    fn default() -> Self {
        Self {
            brightness: Property::Static(0.0),
            contrast: Property::Static(0.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MosaicParams {
    pub horizontal_blocks: Property<u32>,
    pub vertical_blocks: Property<u32>,
    pub sharp_colors: bool,
}

impl Default for MosaicParams {
    fn default() -> Self {
        Self {
            horizontal_blocks: Property::Static(10),
            vertical_blocks: Property::Static(10),
            sharp_colors: false,
        }
    }
}

/// Effect kind with its parameters.
#[derive(Clone, Debug)]
pub enum EffectKind {
    FastBlur(FastBlurParams),
    Glow(GlowParams),
    DisplacementMap(DisplacementMapParams),
    MotionTile(MotionTileParams),
    CornerPin(CornerPinParams),
    Bulge(BulgeParams),
    BrightnessContrast(BrightnessContrastParams),
    Mosaic(MosaicParams),
}

macro_rules! impl_from_params {
    ($($params:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$params> for EffectKind {
                fn from(params: $params) -> Self {
                    Self::$variant(params)
                }
            }
        )*
    };
}

impl_from_params!(
    FastBlurParams => FastBlur,
    GlowParams => Glow,
    DisplacementMapParams => DisplacementMap,
    MotionTileParams => MotionTile,
    CornerPinParams => CornerPin,
    BulgeParams => Bulge,
    BrightnessContrastParams => BrightnessContrast,
    MosaicParams => Mosaic,
);

/// An effect applied to a layer.
#[derive(Clone, Debug)]
pub struct Effect {
    pub id: EffectId,
    pub enabled: bool,
    pub kind: EffectKind,
}

impl Effect {
    pub fn new(id: impl Into<String>, kind: impl Into<EffectKind>) -> Self {
        Self {
            id: EffectId::new(id),
            enabled: true,
            kind: kind.into(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn effect_type(&self) -> EffectType {
        match &self.kind {
            EffectKind::FastBlur(_) => EffectType::FastBlur,
            EffectKind::Glow(_) => EffectType::Glow,
            EffectKind::DisplacementMap(_) => EffectType::DisplacementMap,
            EffectKind::MotionTile(_) => EffectType::MotionTile,
            EffectKind::CornerPin(_) => EffectType::CornerPin,
            EffectKind::Bulge(_) => EffectType::Bulge,
            EffectKind::BrightnessContrast(_) => EffectType::BrightnessContrast,
            EffectKind::Mosaic(_) => EffectType::Mosaic,
        }
    }

    /// Whether the effect changes any pixel at `frame`.
    pub fn visible_at(&self, frame: Frame) -> bool {
        if !self.enabled {
            return false;
        }
        match &self.kind {
            EffectKind::FastBlur(p) => p.blurriness.value_at(frame) > 0.0,
            EffectKind::Glow(p) => {
                p.radius.value_at(frame) > 0.0 && p.intensity.value_at(frame) > 0.0
            }
            EffectKind::DisplacementMap(p) => {
                p.map_layer.is_some()
                    && (p.horizontal.value_at(frame) != 0.0 || p.vertical.value_at(frame) != 0.0)
            }
            EffectKind::MotionTile(_) | EffectKind::CornerPin(_) | EffectKind::Mosaic(_) => true,
            EffectKind::Bulge(p) => {
                p.height.value_at(frame) != 0.0
                    && p.horizontal_radius.value_at(frame) > 0.0
                    && p.vertical_radius.value_at(frame) > 0.0
            }
            EffectKind::BrightnessContrast(p) => {
                p.brightness.value_at(frame) != 0.0 || p.contrast.value_at(frame) != 0.0
            }
        }
    }

    /// Whether the effect only reads and writes the content's visible area.
    ///
    /// Effects that return `false` sample outside the content (tiling,
    /// remapping, warping) and need the full parent-sized input.
    pub fn process_visible_area_only(&self) -> bool {
        !matches!(
            self.kind,
            EffectKind::DisplacementMap(_)
                | EffectKind::MotionTile(_)
                | EffectKind::CornerPin(_)
                | EffectKind::Bulge(_)
        )
    }

    /// Whether the blur strength never changes over time.
    pub fn is_static_fast_blur(&self) -> bool {
        matches!(&self.kind, EffectKind::FastBlur(p) if !p.blurriness.animatable())
    }

    /// Move the edges of `bounds` to cover everything the effect draws.
    pub fn transform_bounds(&self, bounds: &mut Rect, scale: Point, frame: Frame) {
        match &self.kind {
            EffectKind::FastBlur(p) => {
                if p.repeat_edge_pixels.value_at(frame) {
                    return;
                }
                let blurriness = p.blurriness.value_at(frame);
                let (dx, dy) = match p.dimension.value_at(frame) {
                    BlurDimension::Both => (blurriness * scale.x, blurriness * scale.y),
                    BlurDimension::Horizontal => (blurriness * scale.x, 0.0),
                    BlurDimension::Vertical => (0.0, blurriness * scale.y),
                };
                bounds.outset(dx, dy);
            }
            EffectKind::Glow(p) => {
                let radius = p.radius.value_at(frame);
                bounds.outset(radius * scale.x, radius * scale.y);
            }
            EffectKind::MotionTile(p) => {
                let width = bounds.width() * p.output_width.value_at(frame) / 100.0;
                let height = bounds.height() * p.output_height.value_at(frame) / 100.0;
                let x = bounds.x() + (bounds.width() - width) * 0.5;
                let y = bounds.y() + (bounds.height() - height) * 0.5;
                bounds.set_xywh(x, y, width, height);
            }
            EffectKind::CornerPin(p) => {
                let points = p
                    .points_at(frame)
                    .map(|c| Point::new(c.x * scale.x, c.y * scale.y));
                *bounds = Rect::from_points(&points);
            }
            EffectKind::Bulge(p) => {
                if p.pinning.value_at(frame) || p.height.value_at(frame) <= 0.0 {
                    return;
                }
                let center = p.center.value_at(frame);
                let rx = p.horizontal_radius.value_at(frame);
                let ry = p.vertical_radius.value_at(frame);
                let bulge = Rect::new(
                    (center.x - rx) * scale.x,
                    (center.y - ry) * scale.y,
                    (center.x + rx) * scale.x,
                    (center.y + ry) * scale.y,
                );
                bounds.join(&bulge);
            }
            EffectKind::DisplacementMap(_)
            | EffectKind::BrightnessContrast(_)
            | EffectKind::Mosaic(_) => {}
        }
    }
}
