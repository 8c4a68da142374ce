//! blitstream turns blit requests into command buffers for a fixed-function 2D compositing
//! accelerator.
//!
//! The pipeline for one request:
//!
//! - parse the pixel formats and surface geometry, absorbing base-address misalignment
//! - resolve Porter-Duff coefficients into hardware blend factors
//! - route the request to a fill, (multi-source) blit, stretch or filtered scale
//! - record register loads into pooled command buffers, with fixups for surface addresses
//! - on batch end, patch the fixups, maintain CPU caches and hand the buffers to a submitter
//!
//! Platform services (mapping, submission, cache maintenance) are traits in [`device`];
//! [`sim::SimDevice`] implements all of them in memory.
#![forbid(unsafe_code)]

mod foundation;

pub mod batch;
pub mod blend;
pub mod blit;
pub mod device;
pub mod filter;
pub mod format;
pub mod geom;
pub mod hw;
pub mod map;
pub mod sim;

pub use crate::foundation::core::{BufferDesc, BufferId, Mirror, Rect, Rotation};
pub use crate::foundation::error::{BlitError, BlitErrorKind, BlitResult};
pub use crate::foundation::fixed;
pub use crate::foundation::opts::ContextOpts;

pub use crate::batch::{BatchHandle, PoolStats};
pub use crate::blend::{BlendCode, BlendSpec, GlobalAlphaMode};
pub use crate::blit::{
    BatchFlag, BlitContext, BlitOutcome, BlitRequest, Operation, ROP_COPY, Route, SurfaceRef,
};
pub use crate::device::{Direction, OpKind, OpSummary, Submission};
pub use crate::filter::ScaleQuality;
pub use crate::format::FormatCode;
pub use crate::geom::SurfaceGeom;
pub use crate::map::MapStats;
pub use crate::sim::SimDevice;
