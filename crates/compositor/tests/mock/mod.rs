//! Recording GPU backend for compositor tests.
//!
//! Every call that reaches the backend is appended to one event log, so tests
//! can assert on both counts and ordering.

#![allow(dead_code)]

use std::sync::Arc;

use lfx_common::{
    Canvas, Effect, FilterBuffer, FilterPass, Frame, GpuContext, GpuError, GpuState, Graphic,
    Layer, Matrix, PaintKind, ProgramId, Rect, Surface, Texture, UniformArgs,
};
use lfx_effects::{FilterCache, FilterHandle, RenderCache};
use parking_lot::Mutex;

pub const DESTINATION: u64 = 1;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    SaveState,
    RestoreState,
    AllocBuffer {
        handle: u64,
        width: u32,
        height: u32,
        msaa: bool,
    },
    ClearBuffer(u64),
    ResolveBuffer(u64),
    Draw {
        program: ProgramId,
        source: u64,
        target: u64,
        target_matrix: Matrix,
        vertices: [lfx_common::Point; 4],
        uniforms: UniformArgs,
        aux: Option<u64>,
    },
    MakeSurface {
        handle: u64,
        bounds: Rect,
        scale_factor_limit: f32,
        msaa: bool,
    },
    ContentDrawn {
        target: Option<u64>,
        matrix: Matrix,
    },
    Flush,
    Blit {
        texture: u64,
        matrix: Matrix,
    },
    Rasterize {
        bounds: Rect,
    },
}

#[derive(Default)]
pub struct MockGpu {
    events: Mutex<Vec<Event>>,
    next_handle: Mutex<u64>,
    buffer_allocs: Mutex<usize>,
    surface_allocs: Mutex<usize>,
    /// 1-based index of the buffer allocation that fails.
    fail_buffer_alloc: Mutex<Option<usize>>,
    /// 1-based index of the surface allocation that fails.
    fail_surface_alloc: Mutex<Option<usize>>,
    state: Mutex<GpuState>,
}

impl MockGpu {
    pub fn new() -> Arc<Self> {
        let gpu = Self::default();
        *gpu.next_handle.lock() = DESTINATION + 1;
        Arc::new(gpu)
    }

    pub fn fail_buffer_alloc(&self, nth: usize) {
        *self.fail_buffer_alloc.lock() = Some(nth);
    }

    pub fn fail_surface_alloc(&self, nth: usize) {
        *self.fail_surface_alloc.lock() = Some(nth);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn record(&self, event: Event) {
        self.events.lock().push(event);
    }

    pub fn handle(&self) -> u64 {
        let mut next = self.next_handle.lock();
        let handle = *next;
        *next += 1;
        handle
    }

    pub fn state(&self) -> GpuState {
        *self.state.lock()
    }

    pub fn buffer_allocs(&self) -> Vec<(u32, u32, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::AllocBuffer {
                    width,
                    height,
                    msaa,
                    ..
                } => Some((width, height, msaa)),
                _ => None,
            })
            .collect()
    }

    pub fn surfaces(&self) -> Vec<(Rect, f32, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::MakeSurface {
                    bounds,
                    scale_factor_limit,
                    msaa,
                    ..
                } => Some((bounds, scale_factor_limit, msaa)),
                _ => None,
            })
            .collect()
    }

    pub fn draws(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, Event::Draw { .. }))
            .collect()
    }

    pub fn draw_programs(&self) -> Vec<ProgramId> {
        self.draws()
            .into_iter()
            .filter_map(|e| match e {
                Event::Draw { program, .. } => Some(program),
                _ => None,
            })
            .collect()
    }

    pub fn draws_into(&self, target: u64) -> usize {
        self.draws()
            .iter()
            .filter(|e| matches!(e, Event::Draw { target: t, .. } if *t == target))
            .count()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    fn allocate_surface(&self) -> Result<u64, GpuError> {
        let mut allocs = self.surface_allocs.lock();
        *allocs += 1;
        if *self.fail_surface_alloc.lock() == Some(*allocs) {
            return Err(GpuError::AllocFailed {
                width: 0,
                height: 0,
                msaa: false,
            });
        }
        Ok(self.handle())
    }
}

impl GpuContext for MockGpu {
    fn make_filter_buffer(
        &self,
        width: u32,
        height: u32,
        msaa: bool,
    ) -> Result<FilterBuffer, GpuError> {
        {
            let mut allocs = self.buffer_allocs.lock();
            *allocs += 1;
            if *self.fail_buffer_alloc.lock() == Some(*allocs) {
                return Err(GpuError::AllocFailed {
                    width,
                    height,
                    msaa,
                });
            }
        }
        let handle = self.handle();
        self.record(Event::AllocBuffer {
            handle,
            width,
            height,
            msaa,
        });
        Ok(FilterBuffer {
            texture: Texture {
                handle,
                width,
                height,
            },
            msaa,
        })
    }

    fn clear_buffer(&self, buffer: &FilterBuffer) -> Result<(), GpuError> {
        self.record(Event::ClearBuffer(buffer.texture.handle));
        Ok(())
    }

    fn resolve_buffer(&self, buffer: &FilterBuffer) -> Result<(), GpuError> {
        self.record(Event::ResolveBuffer(buffer.texture.handle));
        Ok(())
    }

    fn draw_filter(&self, pass: &FilterPass<'_>) -> Result<(), GpuError> {
        self.state.lock().program = pass.program as u64 + 100;
        self.record(Event::Draw {
            program: pass.program,
            source: pass.source.texture.handle,
            target: pass.target.texture.handle,
            target_matrix: pass.target.matrix,
            vertices: pass.vertices,
            uniforms: pass.uniforms.clone(),
            aux: pass.aux_texture.map(|t| t.handle),
        });
        Ok(())
    }

    fn save_state(&self) -> GpuState {
        self.record(Event::SaveState);
        self.state()
    }

    fn restore_state(&self, state: GpuState) {
        self.record(Event::RestoreState);
        *self.state.lock() = state;
    }
}

pub struct MockCanvas {
    gpu: Arc<MockGpu>,
    pub matrix: Matrix,
    pub clip: Rect,
    pub render_target: Option<Texture>,
    pub complex_paint: PaintKind,
}

impl MockCanvas {
    /// A 1000x1000 destination with an identity matrix. The clip extends
    /// past every edge so filter output is not cut at the origin.
    pub fn destination(gpu: &Arc<MockGpu>) -> Self {
        Self {
            gpu: Arc::clone(gpu),
            matrix: Matrix::IDENTITY,
            clip: Rect::new(-500.0, -500.0, 1500.0, 1500.0),
            render_target: Some(Texture {
                handle: DESTINATION,
                width: 1000,
                height: 1000,
            }),
            complex_paint: PaintKind::None,
        }
    }

    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = clip;
        self
    }

    pub fn with_complex_paint(mut self, paint: PaintKind) -> Self {
        self.complex_paint = paint;
        self
    }

    pub fn without_render_target(mut self) -> Self {
        self.render_target = None;
        self
    }
}

impl Canvas for MockCanvas {
    fn matrix(&self) -> Matrix {
        self.matrix
    }

    fn set_matrix(&mut self, matrix: Matrix) {
        self.matrix = matrix;
    }

    fn clip_bounds(&self) -> Rect {
        self.clip
    }

    fn make_content_surface(
        &self,
        bounds: &Rect,
        scale_factor_limit: f32,
        msaa: bool,
    ) -> Result<Box<dyn Surface>, GpuError> {
        let handle = self.gpu.allocate_surface()?;
        self.gpu.record(Event::MakeSurface {
            handle,
            bounds: *bounds,
            scale_factor_limit,
            msaa,
        });
        let scale = self.matrix.max_scale_factor().min(scale_factor_limit);
        let mut matrix = Matrix::scale(scale, scale);
        matrix.pre_translate(-bounds.left, -bounds.top);
        let texture = Texture {
            handle,
            width: (bounds.width() * scale).ceil() as u32,
            height: (bounds.height() * scale).ceil() as u32,
        };
        Ok(Box::new(MockSurface {
            canvas: MockCanvas {
                gpu: Arc::clone(&self.gpu),
                matrix,
                clip: Rect::from_wh(texture.width as f32, texture.height as f32),
                render_target: Some(texture),
                complex_paint: PaintKind::None,
            },
            texture,
        }))
    }

    fn flush(&mut self) {
        self.gpu.record(Event::Flush);
    }

    fn draw_texture(&mut self, texture: &Texture, matrix: &Matrix) {
        let mut total = self.matrix;
        total.pre_concat(matrix);
        self.gpu.record(Event::Blit {
            texture: texture.handle,
            matrix: total,
        });
    }

    fn has_complex_paint(&self, _bounds: &Rect) -> PaintKind {
        self.complex_paint
    }

    fn render_target(&self) -> Option<Texture> {
        self.render_target
    }

    fn context(&self) -> Arc<dyn GpuContext> {
        Arc::clone(&self.gpu) as Arc<dyn GpuContext>
    }
}

pub struct MockSurface {
    canvas: MockCanvas,
    texture: Texture,
}

impl Surface for MockSurface {
    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.canvas
    }

    fn texture(&self) -> Texture {
        self.texture
    }
}

/// Layer content with fixed bounds; logs where it is drawn.
pub struct MockGraphic {
    gpu: Arc<MockGpu>,
    bounds: Rect,
}

impl MockGraphic {
    pub fn new(gpu: &Arc<MockGpu>, bounds: Rect) -> Self {
        Self {
            gpu: Arc::clone(gpu),
            bounds,
        }
    }
}

impl Graphic for MockGraphic {
    fn measure_bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        self.gpu.record(Event::ContentDrawn {
            target: canvas.render_target().map(|t| t.handle),
            matrix: canvas.matrix(),
        });
    }
}

/// Render cache backed by a [`FilterCache`], with optional map content.
pub struct MockCache {
    gpu: Arc<MockGpu>,
    pub filters: FilterCache,
    pub map_graphic: Option<Arc<dyn Graphic>>,
    pub resolve_effects: bool,
}

impl MockCache {
    pub fn new(gpu: &Arc<MockGpu>) -> Self {
        Self {
            gpu: Arc::clone(gpu),
            filters: FilterCache::new(),
            map_graphic: None,
            resolve_effects: true,
        }
    }
}

impl RenderCache for MockCache {
    fn filter_for_effect(&mut self, layer: &Layer, effect: &Effect) -> Option<FilterHandle> {
        self.resolve_effects
            .then(|| self.filters.effect_filter(layer, effect))
    }

    fn motion_blur_filter(&mut self) -> Option<FilterHandle> {
        Some(self.filters.motion_blur_filter())
    }

    fn layer_styles_filter(&mut self, layer: &Layer) -> Option<FilterHandle> {
        Some(self.filters.layer_styles_filter(layer))
    }

    fn layer_graphic(&mut self, _layer: &Layer, _layer_frame: Frame) -> Option<Arc<dyn Graphic>> {
        self.map_graphic.clone()
    }

    fn rasterize(&mut self, _graphic: &dyn Graphic, bounds: Rect) -> Option<Texture> {
        self.gpu.record(Event::Rasterize { bounds });
        Some(Texture {
            handle: self.gpu.handle(),
            width: bounds.width() as u32,
            height: bounds.height() as u32,
        })
    }
}
