//! Filter error types.

use lfx_common::GpuError;
use thiserror::Error;

/// Errors raised while drawing a filter pass.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A GPU backend operation failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    /// `draw` was called before the filter received its per-frame bounds.
    #[error("Filter '{filter}' drawn before update")]
    NotUpdated { filter: String },
}

impl FilterError {
    pub fn is_alloc_failure(&self) -> bool {
        matches!(self, Self::Gpu(err) if err.is_alloc_failure())
    }
}
