//! Batches, pooled command buffers and fixup chains.

mod buffer;
mod fixup;
mod pool;
mod state;

pub use buffer::{CommandBuffer, RECORD_ALIGN};
pub use fixup::Fixup;
pub use pool::{BatchHandle, PoolStats, Pools};
pub use state::{Batch, Claim};
