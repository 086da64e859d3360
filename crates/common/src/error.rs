//! Central error types (thiserror-based).

use thiserror::Error;

/// GPU backend errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GpuError {
    /// A surface or intermediate buffer could not be created.
    #[error("GPU allocation failed: {width}x{height} (msaa: {msaa})")]
    AllocFailed { width: u32, height: u32, msaa: bool },

    #[error("Filter draw failed: {program}: {reason}")]
    DrawFailed { program: String, reason: String },

    #[error("GPU context lost")]
    ContextLost,
}

impl GpuError {
    /// Allocation failures are a steady-state outcome under memory pressure.
    pub fn is_alloc_failure(&self) -> bool {
        matches!(self, Self::AllocFailed { .. })
    }
}

/// Layer-model construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Animated property needs at least one keyframe")]
    EmptyKeyframes,

    #[error("Invalid composition size: {width}x{height}")]
    InvalidComposition { width: u32, height: u32 },
}
