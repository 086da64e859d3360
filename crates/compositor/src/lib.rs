//! `lfx-compositor`: draws a layer's content through its filter chain.
//!
//! This crate turns the active effects, motion blur and layer styles of one
//! layer at one frame into a sequence of GPU filter passes, programmed
//! against the backend-agnostic [`Canvas`] and [`GpuContext`] traits.
//!
//! The pipeline per draw:
//! 1. **Filter list**: visible effects and styles, layer transform, input mode ([`FilterList`])
//! 2. **Nodes**: bounds propagation and clipping per filter ([`make_filter_nodes`])
//! 3. **Target**: direct onto the destination, or offscreen ([`direct_filter_target`])
//! 4. **Apply**: passes through intermediate buffers with two-slot reuse ([`apply_filters`])
//!
//! [`FilterRenderer`] runs all four and blits the offscreen result.
//!
//! [`Canvas`]: lfx_common::Canvas
//! [`GpuContext`]: lfx_common::GpuContext

pub mod apply;
pub mod bounds;
pub mod filter_list;
pub mod guard;
pub mod nodes;
pub mod renderer;
pub mod target;

mod error;

// Re-export primary API
pub use apply::apply_filters;
pub use bounds::{content_bounds, measure_filter_bounds, transform_filter_bounds};
pub use error::CompositorError;
pub use filter_list::FilterList;
pub use guard::{CanvasRestore, GpuStateGuard};
pub use nodes::{clip_index, make_filter_nodes, FilterNode};
pub use renderer::{FilterOutcome, FilterRenderer};
pub use target::{direct_filter_target, offscreen_filter_target};
