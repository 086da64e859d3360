//! Scope guards restoring GPU and canvas state on every exit path.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use lfx_common::{Canvas, GpuContext, GpuState, Matrix};
use tracing::trace;

/// Captures GPU global state on creation and restores it on drop.
pub struct GpuStateGuard {
    context: Arc<dyn GpuContext>,
    state: GpuState,
}

impl GpuStateGuard {
    pub fn new(context: Arc<dyn GpuContext>) -> Self {
        let state = context.save_state();
        Self { context, state }
    }

    pub fn context(&self) -> &dyn GpuContext {
        self.context.as_ref()
    }
}

impl Drop for GpuStateGuard {
    fn drop(&mut self) {
        trace!("Restoring GPU state");
        self.context.restore_state(self.state);
    }
}

/// Borrows a canvas and puts its matrix back on drop.
pub struct CanvasRestore<'a> {
    canvas: &'a mut dyn Canvas,
    matrix: Matrix,
}

impl<'a> CanvasRestore<'a> {
    pub fn new(canvas: &'a mut dyn Canvas) -> Self {
        let matrix = canvas.matrix();
        Self { canvas, matrix }
    }
}

impl<'a> Deref for CanvasRestore<'a> {
    type Target = dyn Canvas + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.canvas
    }
}

impl<'a> DerefMut for CanvasRestore<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.canvas
    }
}

impl Drop for CanvasRestore<'_> {
    fn drop(&mut self) {
        self.canvas.set_matrix(self.matrix);
    }
}
