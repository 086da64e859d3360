//! GPU backend abstraction traits.
//!
//! These traits define the interface between the filter pipeline and the
//! rendering backend. The effects and compositor crates program against
//! them, never against a concrete GPU API.

use std::sync::Arc;

use crate::error::GpuError;
use crate::geometry::{Matrix, Point, Rect};
use crate::program::{ProgramId, UniformArgs};

/// Opaque GPU texture or render-target handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Texture {
    /// Backend-specific handle.
    pub handle: u64,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn size(&self) -> Point {
        Point::new(self.width as f32, self.height as f32)
    }
}

/// Intermediate render buffer between two filter passes.
///
/// Not `Clone`: whoever holds the buffer owns it exclusively.
#[derive(Debug, PartialEq, Eq)]
pub struct FilterBuffer {
    /// Resolved texture the next pass samples from.
    pub texture: Texture,
    /// Whether draws accumulate into a multisampled attachment first.
    pub msaa: bool,
}

impl FilterBuffer {
    pub fn width(&self) -> u32 {
        self.texture.width
    }

    pub fn height(&self) -> u32 {
        self.texture.height
    }

    /// Whether the buffer can serve a pass of this pixel size and quality.
    pub fn matches(&self, width: u32, height: u32, msaa: bool) -> bool {
        self.width() == width && self.height() == height && self.msaa == msaa
    }

    pub fn to_filter_target(&self, matrix: Matrix) -> FilterTarget {
        FilterTarget {
            texture: self.texture,
            matrix,
        }
    }

    pub fn to_filter_source(&self, scale: Point) -> FilterSource {
        FilterSource {
            texture: self.texture,
            scale,
        }
    }
}

/// Input of a filter pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterSource {
    pub texture: Texture,
    /// Scale the texture was rasterized at, relative to content pixels.
    pub scale: Point,
}

/// Output of a filter pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterTarget {
    pub texture: Texture,
    /// Maps source-local pixels (origin at the input bounds) onto the target.
    pub matrix: Matrix,
}

/// One draw call issued by a filter.
#[derive(Clone, Debug)]
pub struct FilterPass<'a> {
    pub program: ProgramId,
    pub uniforms: &'a UniformArgs,
    pub source: &'a FilterSource,
    pub target: &'a FilterTarget,
    /// Output quad in target pixels (top-left, top-right, bottom-left, bottom-right).
    pub vertices: [Point; 4],
    /// Normalized source coordinates for the same corners.
    pub tex_coords: [Point; 4],
    /// Secondary texture, e.g. a displacement map.
    pub aux_texture: Option<Texture>,
}

/// Snapshot of mutable GPU global state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GpuState {
    pub framebuffer: u64,
    pub program: u64,
    pub viewport: [i32; 4],
    pub blend_enabled: bool,
    pub scissor_enabled: bool,
}

/// GPU context the filter passes are issued on.
pub trait GpuContext {
    /// Allocate an intermediate buffer of `width`×`height` pixels.
    fn make_filter_buffer(&self, width: u32, height: u32, msaa: bool)
        -> Result<FilterBuffer, GpuError>;

    /// Clear a buffer to transparent black.
    fn clear_buffer(&self, buffer: &FilterBuffer) -> Result<(), GpuError>;

    /// Finalize multisample accumulation so the texture can be sampled.
    fn resolve_buffer(&self, buffer: &FilterBuffer) -> Result<(), GpuError>;

    /// Issue one filter draw call.
    fn draw_filter(&self, pass: &FilterPass<'_>) -> Result<(), GpuError>;

    fn save_state(&self) -> GpuState;

    fn restore_state(&self, state: GpuState);
}

/// How the destination has been painted under a region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PaintKind {
    #[default]
    None,
    /// Pending blend-mode paint that a direct write would corrupt.
    Blend,
    /// Pending mask or clip paint.
    Mask,
}

/// A drawing destination with a current transform and clip.
pub trait Canvas {
    fn matrix(&self) -> Matrix;

    fn set_matrix(&mut self, matrix: Matrix);

    /// Pre-concatenate `matrix` onto the current transform.
    fn concat(&mut self, matrix: &Matrix) {
        let mut total = self.matrix();
        total.pre_concat(matrix);
        self.set_matrix(total);
    }

    /// Device-space bounds of the global clip.
    fn clip_bounds(&self) -> Rect;

    /// Create an offscreen surface covering `bounds` (local coordinates)
    /// at the current transform's scale, capped by `scale_factor_limit`.
    ///
    /// The returned surface's canvas maps local coordinates onto its pixels.
    fn make_content_surface(
        &self,
        bounds: &Rect,
        scale_factor_limit: f32,
        msaa: bool,
    ) -> Result<Box<dyn Surface>, GpuError>;

    /// Submit all pending draws.
    fn flush(&mut self);

    fn draw_texture(&mut self, texture: &Texture, matrix: &Matrix);

    fn has_complex_paint(&self, bounds: &Rect) -> PaintKind;

    /// Render target a filter may draw into directly, if the canvas exposes one.
    fn render_target(&self) -> Option<Texture>;

    fn context(&self) -> Arc<dyn GpuContext>;
}

/// An offscreen surface.
pub trait Surface {
    fn canvas(&mut self) -> &mut dyn Canvas;

    fn texture(&self) -> Texture;
}

/// Drawable layer content.
pub trait Graphic {
    /// Tight bounds of what `draw` touches, in content coordinates.
    fn measure_bounds(&self) -> Rect;

    fn draw(&self, canvas: &mut dyn Canvas);
}
