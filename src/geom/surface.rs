use smallvec::SmallVec;

use crate::foundation::core::{BufferDesc, Mirror, Rect, Rotation};
use crate::foundation::error::{BlitError, BlitResult};
use crate::format::{FormatCode, FormatDesc, parse_format};
use crate::geom::rotate::rotate_rect;

/// Base-address alignment the accelerator requires, in bytes.
pub const ADDRESS_ALIGN: u64 = 64;

/// Caller-supplied surface geometry. `width`/`height` are the memory layout; rectangles passed
/// alongside are in the rotated (logical) view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceGeom {
    pub width: u32,
    pub height: u32,
    /// Bytes per row of the first plane.
    pub stride: u32,
    pub format: FormatCode,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub mirror: Mirror,
}

impl SurfaceGeom {
    pub fn new(width: u32, height: u32, stride: u32, format: FormatCode) -> Self {
        Self {
            width,
            height,
            stride,
            format,
            rotation: Rotation::Deg0,
            mirror: Mirror::NONE,
        }
    }

    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn mirrored(mut self, mirror: Mirror) -> Self {
        self.mirror = mirror;
        self
    }

    /// Size of the surface as seen through its rotation.
    pub fn logical_size(&self) -> (u32, u32) {
        if self.rotation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// Base-address misalignment, absorbed by shifting the rectangle origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    /// `virt_addr % ADDRESS_ALIGN`.
    pub remainder: u32,
    /// `remainder` in pixels of the first plane.
    pub pixalign: u32,
}

/// Address patch for one plane: `device address + surface_offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneFixup {
    pub surface_offset: i32,
    pub stride: u32,
}

/// A surface after format, bounds and alignment resolution.
#[derive(Clone, Debug)]
pub struct ResolvedSurface {
    pub format: FormatDesc,
    pub geom: SurfaceGeom,
    pub align: Alignment,
    /// Caller rectangle in the logical view.
    pub logical_rect: Rect,
    /// Rectangle in memory orientation, origin shifted right by `align.pixalign`.
    pub rect: Rect,
    /// Programmed surface width: memory width plus `align.pixalign`.
    pub aligned_width: u32,
    /// One entry per plane.
    pub planes: SmallVec<[PlaneFixup; 3]>,
    /// Mirror flags in memory orientation.
    pub hw_mirror: Mirror,
}

impl ResolvedSurface {
    /// Map a logical rectangle of this surface into aligned memory coordinates.
    pub fn to_physical(&self, logical: Rect) -> Rect {
        let (lw, lh) = self.geom.logical_size();
        rotate_rect(
            logical,
            self.geom.rotation.inverse(),
            lw as i32,
            lh as i32,
        )
        .translate(self.align.pixalign as i32, 0)
    }

    /// Logical bounds of the whole surface.
    pub fn logical_bounds(&self) -> Rect {
        let (lw, lh) = self.geom.logical_size();
        Rect::new(0, 0, lw as i32, lh as i32)
    }

    pub fn is_planar(&self) -> bool {
        self.format.is_planar()
    }

    /// Byte offset of the first plane patch (`-remainder`).
    pub fn base_offset(&self) -> i32 {
        self.planes.first().map_or(0, |p| p.surface_offset)
    }
}

/// Validate a surface and compute its memory-orientation rectangle and alignment.
pub fn resolve_surface(
    buffer: &BufferDesc,
    geom: &SurfaceGeom,
    rect: Rect,
) -> BlitResult<ResolvedSurface> {
    buffer.validate()?;
    let format = parse_format(geom.format)?;
    if geom.width == 0 || geom.height == 0 {
        return Err(BlitError::invalid_argument(format!(
            "surface on buffer {:?} has zero size",
            buffer.id
        )));
    }
    if geom.width > i16::MAX as u32 || geom.height > i16::MAX as u32 {
        return Err(BlitError::invalid_argument(format!(
            "surface {}x{} exceeds coordinate range",
            geom.width, geom.height
        )));
    }
    let row_bytes = u64::from(geom.width) * u64::from(format.bits_per_pixel) / 8;
    let min_stride = if format.is_planar() {
        u64::from(geom.width)
    } else {
        row_bytes
    };
    if u64::from(geom.stride) < min_stride {
        return Err(BlitError::invalid_argument(format!(
            "stride {} shorter than a row ({min_stride} bytes)",
            geom.stride
        )));
    }

    let planes_len = plane_bytes(&format, geom);
    if planes_len > buffer.length as u64 {
        return Err(BlitError::invalid_argument(format!(
            "buffer {:?} holds {} bytes, surface needs {planes_len}",
            buffer.id, buffer.length
        )));
    }

    let (lw, lh) = geom.logical_size();
    if rect.is_negative() {
        return Err(BlitError::invalid_rectangle(format!(
            "{rect:?} has a negative size"
        )));
    }
    if rect.is_empty() {
        return Err(BlitError::invalid_rectangle(format!("{rect:?} is empty")));
    }
    if rect.edges_overflow() {
        return Err(BlitError::invalid_rectangle(format!(
            "{rect:?} edges overflow the coordinate range"
        )));
    }
    let bounds = Rect::new(0, 0, lw as i32, lh as i32);
    if !bounds.contains(rect) {
        return Err(BlitError::invalid_rectangle(format!(
            "{rect:?} outside {lw}x{lh} surface"
        )));
    }

    let physical = rotate_rect(rect, geom.rotation.inverse(), lw as i32, lh as i32);
    if let Some(yuv) = format.yuv {
        let (dx, dy) = (yuv.chroma_div.0 as i32, yuv.chroma_div.1 as i32);
        if physical.left % dx != 0
            || physical.width % dx != 0
            || physical.top % dy != 0
            || physical.height % dy != 0
        {
            return Err(BlitError::invalid_rectangle(format!(
                "{rect:?} not aligned to chroma subsampling"
            )));
        }
    }

    let align = alignment(buffer.virt_addr, &format)?;
    let planes = plane_fixups(&format, geom, align)?;

    Ok(ResolvedSurface {
        format,
        geom: *geom,
        align,
        logical_rect: rect,
        rect: physical.translate(align.pixalign as i32, 0),
        aligned_width: geom.width + align.pixalign,
        planes,
        hw_mirror: geom.mirror.rotated(geom.rotation),
    })
}

/// Whether `src` can share a multi-source operation drawing into `dst`.
///
/// Sources must be non-planar, unscaled against the destination rectangle and share the
/// destination's pixel alignment. Anything else is drawn as its own single-source operation.
pub fn multi_source_compatible(dst: &ResolvedSurface, src: &ResolvedSurface) -> bool {
    !src.is_planar()
        && !dst.is_planar()
        && src.logical_rect.same_size(dst.logical_rect)
        && src.align.pixalign == dst.align.pixalign
}

fn alignment(virt_addr: u64, format: &FormatDesc) -> BlitResult<Alignment> {
    let remainder = (virt_addr % ADDRESS_ALIGN) as u32;
    let bpp = format.bytes_per_pixel().max(1);
    if remainder % bpp != 0 {
        return Err(BlitError::invalid_argument(format!(
            "base address {virt_addr:#x} not aligned to {bpp}-byte pixels"
        )));
    }
    Ok(Alignment {
        remainder,
        pixalign: remainder / bpp,
    })
}

fn plane_bytes(format: &FormatDesc, geom: &SurfaceGeom) -> u64 {
    let luma = u64::from(geom.stride) * u64::from(geom.height);
    match format.yuv {
        Some(y) if y.planes == 2 => luma + u64::from(geom.stride) * u64::from(geom.height / 2),
        Some(y) if y.planes == 3 => {
            luma + 2 * u64::from(geom.stride / 2) * u64::from(geom.height / 2)
        }
        _ => luma,
    }
}

fn plane_fixups(
    format: &FormatDesc,
    geom: &SurfaceGeom,
    align: Alignment,
) -> BlitResult<SmallVec<[PlaneFixup; 3]>> {
    let rem = align.remainder as i64;
    let luma = i64::from(geom.stride) * i64::from(geom.height);
    let mut planes: SmallVec<[PlaneFixup; 3]> = SmallVec::new();
    planes.push(PlaneFixup {
        surface_offset: to_offset(-rem)?,
        stride: geom.stride,
    });
    match format.plane_count() {
        2 => planes.push(PlaneFixup {
            surface_offset: to_offset(luma - rem)?,
            stride: geom.stride,
        }),
        3 => {
            if rem % 2 != 0 {
                return Err(BlitError::invalid_argument(
                    "three-plane base address must be even",
                ));
            }
            let chroma_stride = geom.stride / 2;
            let chroma = i64::from(chroma_stride) * i64::from(geom.height / 2);
            planes.push(PlaneFixup {
                surface_offset: to_offset(luma - rem / 2)?,
                stride: chroma_stride,
            });
            planes.push(PlaneFixup {
                surface_offset: to_offset(luma + chroma - rem / 2)?,
                stride: chroma_stride,
            });
        }
        _ => {}
    }
    Ok(planes)
}

fn to_offset(v: i64) -> BlitResult<i32> {
    i32::try_from(v)
        .map_err(|_| BlitError::invalid_argument(format!("plane offset {v} out of range")))
}

#[cfg(test)]
#[path = "../../tests/unit/geom/surface.rs"]
mod tests;
