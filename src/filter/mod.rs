//! Resampling filters: kernel generation, pass planning and the kernel cache.

mod cache;
mod kernel;
mod plan;
mod sine;

pub use cache::{FilterCache, FilterCacheStats};
pub use kernel::{FilterKernel, KERNEL_SIZES, PHASE_BITS, PHASES, ROW_TAPS, generate_kernel};
pub use plan::{
    AxisFilter, FilterPass, FilterPlan, FilterType, PassKind, PassSurface, ScaleQuality, TempPlan,
    kernel_size, plan_filter, scale_factor,
};
