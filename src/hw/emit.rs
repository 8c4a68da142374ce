//! Record writers: every function claims one or more records in a batch, fills them and attaches
//! address fixups.

use crate::batch::{Batch, Claim, Pools, RECORD_ALIGN};
use crate::blend::BlendConfig;
use crate::device::DeviceHandle;
use crate::filter::{FilterKernel, FilterType, ROW_TAPS};
use crate::format::{ColorSpace, FormatDesc};
use crate::foundation::core::Rect;
use crate::foundation::error::{BlitError, BlitResult};
use crate::geom::ResolvedSurface;
use crate::hw::regs::{
    self, AlphaModes, ColorMultiply, Command, FilterConfig, RotationConfig, SurfaceConfig,
};

/// Data words per kernel upload record.
const KERNEL_CHUNK: usize = 48;

/// Bytes of a LOAD_STATE record carrying `count` registers.
pub fn load_state_len(count: usize) -> usize {
    ((1 + count) * 4).next_multiple_of(RECORD_ALIGN)
}

/// Claim and fill a LOAD_STATE record. Data starts at word 1 of the returned claim.
pub fn emit_load_state(
    batch: &mut Batch,
    pools: &Pools,
    reg: u16,
    data: &[u32],
) -> BlitResult<Claim> {
    if data.is_empty() || data.len() > regs::MAX_LOAD_COUNT {
        return Err(BlitError::invalid_argument(format!(
            "LOAD_STATE of {} registers at {reg:#06x}",
            data.len()
        )));
    }
    let claim = batch.claim(pools, load_state_len(data.len()))?;
    let words = batch.record_mut(&claim);
    words[0] = regs::load_state_header(reg, data.len());
    words[1..=data.len()].copy_from_slice(data);
    Ok(claim)
}

/// Kick the drawing engine over `rects` (destination memory coordinates).
pub fn emit_start_de(batch: &mut Batch, pools: &Pools, rects: &[Rect]) -> BlitResult<Claim> {
    if rects.is_empty() || rects.len() > 0xFF {
        return Err(BlitError::invalid_argument(format!(
            "START_DE with {} rectangles",
            rects.len()
        )));
    }
    let claim = batch.claim(pools, (2 + 2 * rects.len()) * 4)?;
    let words = batch.record_mut(&claim);
    words[0] = regs::start_de_header(rects.len());
    words[1] = 0;
    for (i, r) in rects.iter().enumerate() {
        words[2 + 2 * i] = regs::pack_xy(r.left, r.top);
        words[3 + 2 * i] = regs::pack_xy(r.right(), r.bottom());
    }
    Ok(claim)
}

pub fn emit_end(batch: &mut Batch, pools: &Pools) -> BlitResult<()> {
    let claim = batch.claim(pools, RECORD_ALIGN)?;
    let words = batch.record_mut(&claim);
    words[0] = regs::END;
    words[1] = regs::NOP;
    Ok(())
}

fn surface_config(format: &FormatDesc, command: Option<Command>) -> SurfaceConfig {
    SurfaceConfig {
        format: format.hw_format.code(),
        swizzle: format.swizzle.code(),
        premultiplied: format.premultiplied,
        zero_fill: format.zero_fill,
        bt709: format.color_space == ColorSpace::YcbcrBt709,
        uv_swap: format.yuv.is_some_and(|y| y.uv_swapped),
        command: command.map_or(0, Command::code),
    }
}

/// Destination surface programming, shared by every command.
#[derive(Clone, Copy, Debug)]
pub struct DestTarget<'a> {
    pub surface: &'a ResolvedSurface,
    pub handle: DeviceHandle,
}

pub fn emit_dest(
    batch: &mut Batch,
    pools: &Pools,
    dst: DestTarget<'_>,
    command: Command,
) -> BlitResult<()> {
    let s = dst.surface;
    let turns = s.geom.rotation.quarter_turns();
    let data = [
        0,
        s.geom.stride,
        RotationConfig {
            width: s.aligned_width,
            quarter_turns: turns,
        }
        .encode(),
        surface_config(&s.format, Some(command)).encode(),
        s.geom.height,
        regs::encode_rot_mirror(turns, s.hw_mirror),
    ];
    let claim = emit_load_state(batch, pools, regs::DEST_ADDRESS, &data)?;
    batch.add_fixup(pools, &claim, 1, dst.handle, s.base_offset())
}

/// Clip rectangle in destination memory coordinates.
pub fn emit_clip(batch: &mut Batch, pools: &Pools, clip: Rect) -> BlitResult<()> {
    let data = [
        regs::pack_xy(clip.left, clip.top),
        regs::pack_xy(clip.right(), clip.bottom()),
    ];
    emit_load_state(batch, pools, regs::CLIP_TOP_LEFT, &data).map(drop)
}

pub fn emit_single(batch: &mut Batch, pools: &Pools, reg: u16, value: u32) -> BlitResult<()> {
    emit_load_state(batch, pools, reg, &[value]).map(drop)
}

/// How a source layer combines with what lies below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerOp {
    Rop(u8),
    Blend(BlendConfig),
}

impl LayerOp {
    pub fn blend(&self) -> Option<BlendConfig> {
        match self {
            Self::Blend(cfg) => Some(*cfg),
            Self::Rop(_) => None,
        }
    }
}

/// One source bank's worth of state.
#[derive(Clone, Copy, Debug)]
pub struct SourceLayer<'a> {
    pub surface: &'a ResolvedSurface,
    pub handle: DeviceHandle,
    /// Source rectangle in aligned memory coordinates.
    pub rect: Rect,
    pub op: LayerOp,
    pub multiply: ColorMultiply,
}

pub fn emit_source(
    batch: &mut Batch,
    pools: &Pools,
    bank: usize,
    layer: &SourceLayer<'_>,
) -> BlitResult<()> {
    if bank >= regs::SRC_BANKS {
        return Err(BlitError::invalid_argument(format!(
            "source bank {bank} out of range"
        )));
    }
    let s = layer.surface;
    let turns = s.geom.rotation.quarter_turns();
    let plane = |i: usize| s.planes.get(i).copied();

    let mut data = [0u32; regs::SRC_REGS];
    data[regs::SRC_STRIDE as usize] = s.geom.stride;
    data[regs::SRC_ROTATION_CONFIG as usize] = RotationConfig {
        width: s.aligned_width,
        quarter_turns: turns,
    }
    .encode();
    data[regs::SRC_CONFIG as usize] = surface_config(&s.format, None).encode();
    data[regs::SRC_ORIGIN as usize] = regs::pack_xy(layer.rect.left, layer.rect.top);
    data[regs::SRC_SIZE as usize] = regs::pack_xy(layer.rect.width, layer.rect.height);
    data[regs::SRC_ROTATION_HEIGHT as usize] = s.geom.height;
    data[regs::SRC_ROT_MIRROR as usize] = regs::encode_rot_mirror(turns, s.hw_mirror);
    if let Some(p) = plane(1) {
        data[regs::SRC_U_STRIDE as usize] = p.stride;
    }
    if let Some(p) = plane(2) {
        data[regs::SRC_V_STRIDE as usize] = p.stride;
    }
    match layer.op {
        LayerOp::Blend(cfg) => {
            data[regs::SRC_ALPHA_CONTROL as usize] = 1;
            data[regs::SRC_ALPHA_MODES as usize] = AlphaModes::from_blend(&cfg).encode();
            data[regs::SRC_GLOBAL_SRC_COLOR as usize] = u32::from(cfg.global_src_alpha) << 24;
            data[regs::SRC_GLOBAL_DST_COLOR as usize] = u32::from(cfg.global_dst_alpha) << 24;
            data[regs::SRC_ROP as usize] = 0xCCCC;
        }
        LayerOp::Rop(rop) => {
            data[regs::SRC_ROP as usize] = u32::from(rop) | (u32::from(rop) << 8);
        }
    }
    data[regs::SRC_COLOR_MULTIPLY as usize] = layer.multiply.encode();

    let claim = emit_load_state(batch, pools, regs::src_bank(bank), &data)?;
    let fixups = [
        (regs::SRC_ADDRESS, plane(0)),
        (regs::SRC_U_ADDRESS, plane(1)),
        (regs::SRC_V_ADDRESS, plane(2)),
    ];
    for (reg, p) in fixups {
        if let Some(p) = p {
            batch.add_fixup(pools, &claim, 1 + reg as usize, layer.handle, p.surface_offset)?;
        }
    }
    Ok(())
}

/// Upload one kernel table, split over several records.
pub fn emit_kernel(
    batch: &mut Batch,
    pools: &Pools,
    ty: FilterType,
    kernel: &FilterKernel,
) -> BlitResult<()> {
    let base = match ty {
        FilterType::Horizontal => regs::FILTER_KERNEL_H,
        FilterType::Vertical => regs::FILTER_KERNEL_V,
    };
    let words = pack_kernel(kernel);
    for (i, chunk) in words.chunks(KERNEL_CHUNK).enumerate() {
        emit_load_state(batch, pools, base + (i * KERNEL_CHUNK) as u16, chunk)?;
    }
    Ok(())
}

/// Flatten the 32 phase rows and pack coefficients two per word.
pub fn pack_kernel(kernel: &FilterKernel) -> Vec<u32> {
    let flat: Vec<i16> = kernel.phases().iter().flatten().copied().collect();
    debug_assert_eq!(flat.len(), regs::KERNEL_WORDS * 2);
    debug_assert_eq!(flat.len() % ROW_TAPS, 0);
    flat.chunks(2)
        .map(|pair| regs::pack_coeffs(pair[0], pair.get(1).copied().unwrap_or(0)))
        .collect()
}

/// Video-rasterizer window state for one filter pass.
#[derive(Clone, Copy, Debug)]
pub struct FilterWindow {
    pub config: FilterConfig,
    /// Source window in aligned memory coordinates.
    pub source: Rect,
    /// 16.16 position of the first sample.
    pub origin: (u32, u32),
    pub target: Rect,
}

pub fn emit_filter_window(batch: &mut Batch, pools: &Pools, w: &FilterWindow) -> BlitResult<()> {
    let data = [
        w.config.encode(),
        regs::pack_xy(w.source.left, w.source.top),
        regs::pack_xy(w.source.right(), w.source.bottom()),
        w.origin.0,
        w.origin.1,
        regs::pack_xy(w.target.left, w.target.top),
        regs::pack_xy(w.target.right(), w.target.bottom()),
    ];
    debug_assert_eq!(data.len(), regs::FILTER_REGS);
    emit_load_state(batch, pools, regs::FILTER_CONFIG, &data)?;
    // Bit 0 starts the horizontal pass, bit 1 the vertical one.
    let start = match w.config.pass {
        0 => 1,
        1 => 2,
        _ => 3,
    };
    emit_single(batch, pools, regs::VR_START, start)
}

/// Starting sample position: centre of the first destination pixel mapped into the source.
pub fn filter_origin(start: i32, step: u32) -> u32 {
    let pos = (i64::from(start) << 16) + i64::from(step / 2) - 0x8000;
    pos.clamp(0, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/hw/emit.rs"]
mod tests;
