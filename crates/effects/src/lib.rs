//! `lfx-effects`: filter objects for layer effects, motion blur and layer styles.
//!
//! This crate provides:
//! - [`LayerFilter`], the closed set of filters a filter chain is built from
//! - One [`EffectFilter`] per effect kind, with per-kind uniform layout
//! - [`MotionBlurFilter`] and [`LayerStylesFilter`], including the bounds
//!   math the compositor uses to size their buffers
//! - The [`RenderCache`] trait and a [`FilterCache`] keyed by layer and effect id
//!
//! ## Effects
//! - Fast Blur, Glow
//! - Displacement Map (second input: the map layer's rendered content)
//! - Motion Tile, Corner Pin, Bulge
//! - Brightness & Contrast, Mosaic
//!
//! ## Layer styles
//! - Drop Shadow (with spread), Outer Glow, Stroke

pub mod cache;
pub mod effect_filter;
pub mod error;
pub mod filter;
pub mod layer_styles;
pub mod motion_blur;
pub mod quad;

pub use cache::{FilterCache, RenderCache};
pub use effect_filter::{EffectFilter, MapTexture};
pub use error::FilterError;
pub use filter::{FilterHandle, FilterParams, LayerFilter};
pub use layer_styles::{LayerStylesFilter, SpreadMode, StylePass};
pub use motion_blur::MotionBlurFilter;
pub use quad::PassGeometry;
