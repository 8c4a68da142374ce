//! Blit orchestration: request model, operation routing and batch finalization.

mod context;
mod finalizer;
mod ops;
mod request;
mod temp;

pub use context::BlitContext;
pub(crate) use finalizer::Finalizer;
pub use request::{BatchFlag, BlitOutcome, BlitRequest, Operation, ROP_COPY, Route, SurfaceRef};
pub use temp::TempPoolStats;
