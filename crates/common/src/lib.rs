//! `lfx-common`: shared types, traits, and errors for the layer filter pipeline.
//!
//! This crate is the foundation the `lfx-effects` and `lfx-compositor` crates
//! depend on. It defines:
//!
//! - **Geometry**: `Point`, `Rect`, `Matrix` (outward rounding, intersection, affine maps)
//! - **Types**: `Frame`, `LayerId`, `EffectId` (newtypes for safety)
//! - **Property**: `Property<T>` animatable values evaluated per frame
//! - **Layer**: `Layer`, `LayerKind`, `Composition`, `Transform2D`
//! - **Effects / Layer styles**: closed sets of per-layer visual transformations
//! - **GPU Traits**: `GpuContext`, `Canvas`, `Surface`, `Graphic` (backend abstraction)
//! - **Programs**: `ProgramId`, `UniformArgs` (filter draw parameters)
//! - **Errors**: `GpuError`, `ModelError` (thiserror-based)
//! - **Config**: `FilterConfig`

pub mod config;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod gpu_traits;
pub mod layer;
pub mod layer_style;
pub mod program;
pub mod property;
pub mod types;

// Re-export commonly used items at crate root
pub use config::FilterConfig;
pub use effect::{
    BlurDimension, BrightnessContrastParams, BulgeParams, CornerPinParams, DisplacementMapParams,
    Effect, EffectKind, EffectType, FastBlurParams, GlowParams, MosaicParams, MotionTileParams,
};
pub use error::{GpuError, ModelError};
pub use geometry::{Matrix, Point, Rect};
pub use gpu_traits::{
    Canvas, FilterBuffer, FilterPass, FilterSource, FilterTarget, GpuContext, GpuState, Graphic,
    PaintKind, Surface, Texture,
};
pub use layer::{Composition, Layer, LayerKind, LayerType, Transform2D};
pub use layer_style::{
    DropShadowParams, LayerStyle, LayerStyleKind, OuterGlowParams, StrokeParams, StrokePosition,
};
pub use program::{ProgramId, Uniform, UniformArgs};
pub use property::{Interpolate, Keyframe, Property};
pub use types::{EffectId, Frame, LayerId};
