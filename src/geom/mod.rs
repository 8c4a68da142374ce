//! Surface geometry: rotation into memory orientation and base-address alignment.

mod rotate;
mod surface;

pub use rotate::rotate_rect;
pub use surface::{
    ADDRESS_ALIGN, Alignment, PlaneFixup, ResolvedSurface, SurfaceGeom, multi_source_compatible,
    resolve_surface,
};
