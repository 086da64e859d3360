//! Layer description: the filter pipeline's view of one scene layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::error::ModelError;
use crate::geometry::{Matrix, Point, Rect};
use crate::layer_style::LayerStyle;
use crate::property::{Interpolate, Property};
use crate::types::{Frame, LayerId};

/// 2D transform applied to a layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Anchor point in layer content pixels.
    pub anchor: Point,
    /// Position in pixels (from composition top-left).
    pub position: Point,
    /// Scale factors (1.0 = original size).
    pub scale: Point,
    /// Rotation in degrees.
    pub rotation: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            anchor: Point::ZERO,
            position: Point::ZERO,
            scale: Point::ONE,
            rotation: 0.0,
        }
    }
}

impl Transform2D {
    /// `translate(position) * rotate(rotation) * scale(scale) * translate(-anchor)`.
    pub fn to_matrix(&self) -> Matrix {
        let mut matrix = Matrix::translate(self.position.x, self.position.y);
        if self.rotation != 0.0 {
            matrix.pre_concat(&Matrix::rotate(self.rotation));
        }
        matrix.pre_scale(self.scale.x, self.scale.y);
        matrix.pre_translate(-self.anchor.x, -self.anchor.y);
        matrix
    }
}

impl Interpolate for Transform2D {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            anchor: self.anchor.interpolate(&other.anchor, t),
            position: self.position.interpolate(&other.position, t),
            scale: self.scale.interpolate(&other.scale, t),
            rotation: self.rotation.interpolate(&other.rotation, t),
        }
    }
}

/// A composition: the canvas a set of layers is laid out in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub width: u32,
    pub height: u32,
}

impl Composition {
    pub fn new(width: u32, height: u32) -> Result<Self, ModelError> {
        if width == 0 || height == 0 {
            return Err(ModelError::InvalidComposition { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_wh(self.width as f32, self.height as f32)
    }
}

/// Layer type tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerType {
    Null,
    Solid,
    Text,
    Shape,
    Image,
    PreCompose,
    Camera,
}

/// Layer content, with the data each type needs to report its intrinsic size.
#[derive(Clone, Debug)]
pub enum LayerKind {
    Null,
    Solid { width: u32, height: u32 },
    Text,
    Shape,
    Image { width: u32, height: u32 },
    PreCompose { composition: Arc<Composition> },
    Camera,
}

impl LayerKind {
    pub fn layer_type(&self) -> LayerType {
        match self {
            Self::Null => LayerType::Null,
            Self::Solid { .. } => LayerType::Solid,
            Self::Text => LayerType::Text,
            Self::Shape => LayerType::Shape,
            Self::Image { .. } => LayerType::Image,
            Self::PreCompose { .. } => LayerType::PreCompose,
            Self::Camera => LayerType::Camera,
        }
    }
}

/// Complete description of a layer as seen by the filter pipeline.
#[derive(Clone, Debug)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    /// Composition the layer lives in; Shape and Text layers size their
    /// filter input from it.
    pub containing_composition: Option<Arc<Composition>>,
    /// Layer frame at which content frame zero starts.
    pub start_time: Frame,
    pub transform: Property<Transform2D>,
    pub motion_blur: bool,
    /// Applied effects (in authoring order).
    pub effects: Vec<Effect>,
    /// Applied layer styles (in authoring order).
    pub layer_styles: Vec<LayerStyle>,
}

impl Layer {
    pub fn new(id: LayerId, kind: LayerKind) -> Self {
        Self {
            id,
            name: String::new(),
            kind,
            containing_composition: None,
            start_time: Frame::ZERO,
            transform: Property::Static(Transform2D::default()),
            motion_blur: false,
            effects: Vec::new(),
            layer_styles: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_composition(mut self, composition: Arc<Composition>) -> Self {
        self.containing_composition = Some(composition);
        self
    }

    pub fn with_start_time(mut self, start_time: Frame) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_transform(mut self, transform: impl Into<Property<Transform2D>>) -> Self {
        self.transform = transform.into();
        self
    }

    pub fn with_motion_blur(mut self, enabled: bool) -> Self {
        self.motion_blur = enabled;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_layer_style(mut self, style: LayerStyle) -> Self {
        self.layer_styles.push(style);
        self
    }

    pub fn layer_type(&self) -> LayerType {
        self.kind.layer_type()
    }

    /// Layer frame converted to the layer's own content timeline.
    pub fn content_frame(&self, layer_frame: Frame) -> Frame {
        layer_frame - self.start_time
    }

    /// Local transform at a content frame.
    pub fn matrix_at(&self, content_frame: Frame) -> Matrix {
        self.transform.value_at(content_frame).to_matrix()
    }

    /// Full-size input bounds: the canvas the layer's filters read from when
    /// they are not limited to the visible content.
    pub fn parent_bounds(&self) -> Rect {
        let (width, height) = match &self.kind {
            LayerKind::Shape | LayerKind::Text => self
                .containing_composition
                .as_ref()
                .map_or((0, 0), |c| (c.width, c.height)),
            LayerKind::Solid { width, height } | LayerKind::Image { width, height } => {
                (*width, *height)
            }
            LayerKind::PreCompose { composition } => (composition.width, composition.height),
            LayerKind::Null | LayerKind::Camera => (0, 0),
        };
        Rect::from_wh(width as f32, height as f32)
    }

    /// Whether the layer's content has no intrinsic size of its own.
    pub fn has_unbounded_content(&self) -> bool {
        matches!(self.layer_type(), LayerType::Shape | LayerType::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transform_is_identity() {
        assert!(Transform2D::default().to_matrix().is_identity());
    }

    #[test]
    fn transform_maps_anchor_to_position() {
        let t = Transform2D {
            anchor: Point::new(50.0, 50.0),
            position: Point::new(200.0, 100.0),
            scale: Point::new(2.0, 2.0),
            rotation: 0.0,
        };
        let m = t.to_matrix();
        assert_eq!(m.map_point(Point::new(50.0, 50.0)), Point::new(200.0, 100.0));
        assert_eq!(m.map_point(Point::new(60.0, 50.0)), Point::new(220.0, 100.0));
    }

    #[test]
    fn parent_bounds_per_kind() {
        let comp = Arc::new(Composition::new(720, 1280).unwrap());
        let shape = Layer::new(LayerId(1), LayerKind::Shape).with_composition(comp.clone());
        assert_eq!(shape.parent_bounds(), Rect::from_wh(720.0, 1280.0));

        let solid = Layer::new(
            LayerId(2),
            LayerKind::Solid {
                width: 30,
                height: 40,
            },
        )
        .with_composition(comp.clone());
        assert_eq!(solid.parent_bounds(), Rect::from_wh(30.0, 40.0));

        let pre = Layer::new(
            LayerId(3),
            LayerKind::PreCompose {
                composition: Arc::new(Composition::new(64, 32).unwrap()),
            },
        );
        assert_eq!(pre.parent_bounds(), Rect::from_wh(64.0, 32.0));

        let null = Layer::new(LayerId(4), LayerKind::Null);
        assert!(null.parent_bounds().is_empty());
    }

    #[test]
    fn content_frame_is_relative_to_start() {
        let layer = Layer::new(LayerId(1), LayerKind::Shape).with_start_time(Frame(10));
        assert_eq!(layer.content_frame(Frame(25)), Frame(15));
    }
}
