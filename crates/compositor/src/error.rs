//! Compositor error types.

use lfx_common::GpuError;
use lfx_effects::FilterError;
use thiserror::Error;

/// Errors that can occur while compositing a layer's filters.
#[derive(Debug, Error)]
pub enum CompositorError {
    /// A GPU backend operation failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    /// A filter failed to draw its pass.
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),
}

impl CompositorError {
    /// Whether a surface or buffer could not be allocated.
    pub fn is_alloc_failure(&self) -> bool {
        match self {
            Self::Gpu(err) => err.is_alloc_failure(),
            Self::Filter(err) => err.is_alloc_failure(),
        }
    }
}
