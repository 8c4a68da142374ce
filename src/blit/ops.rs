//! Emission of the operations that are finalized immediately: fills, stretches and filter passes.

use crate::batch::{Batch, Pools};
use crate::device::{DeviceHandle, OpKind, OpSummary};
use crate::filter::{FilterCache, FilterPass, FilterType, PassKind};
use crate::format::{FormatCode, FormatDesc, decode_pixel, encode_pixel, parse_format, premultiply};
use crate::foundation::core::{BufferDesc, BufferId, Rect};
use crate::foundation::error::{BlitError, BlitResult};
use crate::foundation::fixed::step_16_16;
use crate::geom::ResolvedSurface;
use crate::hw::emit::{self, DestTarget, FilterWindow, LayerOp, SourceLayer};
use crate::hw::regs::{self, ColorMultiply, Command, FilterConfig};

use super::request::ROP_COPY;

/// Solid colour of a single-pixel source, as ARGB8888 for the clear register.
///
/// `None` when the source has no host-visible bytes to read.
pub(crate) fn fill_color(
    buffer: &BufferDesc,
    src: &ResolvedSurface,
    dst: &FormatDesc,
) -> BlitResult<Option<u32>> {
    let Some(host) = &buffer.host else {
        return Ok(None);
    };
    let bpp = src.format.bytes_per_pixel() as usize;
    let x = (src.rect.left - src.align.pixalign as i32) as usize;
    let y = src.rect.top as usize;
    let off = y * src.geom.stride as usize + x * bpp;
    let bytes = host.get(off..off + bpp).ok_or_else(|| {
        BlitError::invalid_argument(format!(
            "fill pixel at byte {off} outside host bytes of {:?}",
            buffer.id
        ))
    })?;
    let raw = bytes
        .iter()
        .enumerate()
        .fold(0u32, |acc, (i, b)| acc | (u32::from(*b) << (8 * i)));

    let mut rgba = decode_pixel(&src.format, raw)?;
    if dst.premultiplied && !src.format.premultiplied {
        rgba = premultiply(rgba);
    }
    let argb = parse_format(FormatCode::ARGB8888)?;
    encode_pixel(&argb, rgba).map(Some)
}

pub(crate) fn emit_fill(
    batch: &mut Batch,
    pools: &Pools,
    dst: DestTarget<'_>,
    dst_id: BufferId,
    clip: Rect,
    color: u32,
) -> BlitResult<()> {
    emit::emit_dest(batch, pools, dst, Command::Clear)?;
    emit::emit_clip(batch, pools, clip)?;
    emit::emit_single(batch, pools, regs::CLEAR_COLOR, color)?;
    emit::emit_start_de(batch, pools, &[dst.surface.rect])?;
    batch.ops.push(OpSummary {
        kind: OpKind::Fill,
        dst: dst_id,
        srccount: 0,
        multi_source: false,
        layers: Default::default(),
    });
    Ok(())
}

/// Nearest-neighbour scaling through the stretch command.
pub(crate) fn emit_stretch(
    batch: &mut Batch,
    pools: &Pools,
    dst: DestTarget<'_>,
    dst_id: BufferId,
    clip: Rect,
    src: &SourceLayer<'_>,
) -> BlitResult<()> {
    let d = dst.surface.logical_rect;
    let s = src.surface.logical_rect;
    let mut factors = [
        step_16_16(s.width as u32, d.width as u32),
        step_16_16(s.height as u32, d.height as u32),
    ];
    // Factors follow the destination's memory axes.
    if dst.surface.geom.rotation.swaps_axes() {
        factors.swap(0, 1);
    }

    emit::emit_dest(batch, pools, dst, Command::Stretch)?;
    emit::emit_clip(batch, pools, clip)?;
    emit::emit_load_state(batch, pools, regs::STRETCH_FACTOR_H, &factors)?;
    emit::emit_source(batch, pools, 0, src)?;
    emit::emit_start_de(batch, pools, &[dst.surface.rect])?;
    batch.ops.push(OpSummary {
        kind: OpKind::Stretch,
        dst: dst_id,
        srccount: 1,
        multi_source: false,
        layers: smallvec::smallvec![None],
    });
    Ok(())
}

/// Surfaces bound to one filter pass.
pub(crate) struct PassBinding<'a> {
    pub(crate) input: &'a ResolvedSurface,
    pub(crate) input_handle: DeviceHandle,
    pub(crate) output: DestTarget<'a>,
    pub(crate) output_id: BufferId,
    pub(crate) clip: Rect,
}

pub(crate) fn emit_filter_pass(
    batch: &mut Batch,
    pools: &Pools,
    kernels: &FilterCache,
    pass: &FilterPass,
    bind: &PassBinding<'_>,
) -> BlitResult<()> {
    let (horizontal, vertical) = match pass.kind {
        PassKind::Horizontal => (true, false),
        PassKind::Vertical => (false, true),
        PassKind::Combined => (true, true),
    };
    if horizontal {
        let k = kernels.get(FilterType::Horizontal, pass.h.size, pass.h.scale)?;
        emit::emit_kernel(batch, pools, FilterType::Horizontal, &k)?;
    }
    if vertical {
        let k = kernels.get(FilterType::Vertical, pass.v.size, pass.v.scale)?;
        emit::emit_kernel(batch, pools, FilterType::Vertical, &k)?;
    }

    emit::emit_dest(batch, pools, bind.output, Command::Filter)?;
    emit::emit_clip(batch, pools, bind.clip)?;
    emit::emit_source(
        batch,
        pools,
        0,
        &SourceLayer {
            surface: bind.input,
            handle: bind.input_handle,
            rect: pass.src_rect,
            op: LayerOp::Rop(ROP_COPY),
            multiply: ColorMultiply::default(),
        },
    )?;
    let pass_code = match pass.kind {
        PassKind::Horizontal => 0,
        PassKind::Vertical => 1,
        PassKind::Combined => 2,
    };
    emit::emit_filter_window(
        batch,
        pools,
        &FilterWindow {
            config: FilterConfig {
                pass: pass_code,
                h_taps: pass.h.size,
                v_taps: pass.v.size,
            },
            source: pass.src_rect,
            origin: (
                emit::filter_origin(pass.src_rect.left, pass.h.step),
                emit::filter_origin(pass.src_rect.top, pass.v.step),
            ),
            target: pass.dst_rect,
        },
    )?;
    batch.ops.push(OpSummary {
        kind: OpKind::Filter,
        dst: bind.output_id,
        srccount: 1,
        multi_source: false,
        layers: smallvec::smallvec![None],
    });
    Ok(())
}
