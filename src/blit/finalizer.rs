use smallvec::SmallVec;

use crate::batch::{Batch, Pools};
use crate::device::{DeviceHandle, OpKind, OpSummary};
use crate::foundation::core::{BufferId, Rect};
use crate::foundation::error::BlitResult;
use crate::geom::ResolvedSurface;
use crate::hw::emit::{self, DestTarget, LayerOp, SourceLayer};
use crate::hw::regs::{self, ColorMultiply, Command};

/// Operation left open in a batch, emitted when the next request cannot join it or the batch ends.
#[derive(Debug)]
pub(crate) enum Finalizer {
    MultiSource(PendingOp),
}

#[derive(Debug)]
pub(crate) struct PendingLayer {
    pub(crate) surface: ResolvedSurface,
    pub(crate) handle: DeviceHandle,
    pub(crate) op: LayerOp,
    /// Whether this source may share an operation with others.
    pub(crate) multi_ok: bool,
}

impl PendingLayer {
    fn multiply(&self, dst: &ResolvedSurface) -> ColorMultiply {
        if !matches!(self.op, LayerOp::Blend(_)) {
            return ColorMultiply::default();
        }
        let src_straight = self.surface.format.has_alpha() && !self.surface.format.premultiplied;
        let dst_straight = dst.format.has_alpha() && !dst.format.premultiplied;
        ColorMultiply {
            src_premultiply: src_straight,
            dst_premultiply: dst_straight,
            dst_demultiply: dst_straight,
        }
    }
}

/// Sources accumulated against one destination, clip and rectangle.
#[derive(Debug)]
pub(crate) struct PendingOp {
    dst: ResolvedSurface,
    dst_id: BufferId,
    dst_handle: DeviceHandle,
    /// Clip in destination memory coordinates.
    clip: Rect,
    layers: SmallVec<[PendingLayer; regs::SRC_BANKS]>,
    multi_ok: bool,
}

impl PendingOp {
    pub(crate) fn new(
        dst: ResolvedSurface,
        dst_id: BufferId,
        dst_handle: DeviceHandle,
        clip: Rect,
        first: PendingLayer,
        multi_enabled: bool,
    ) -> Self {
        let multi_ok = multi_enabled && first.multi_ok;
        let mut layers = SmallVec::new();
        layers.push(first);
        Self {
            dst,
            dst_id,
            dst_handle,
            clip,
            layers,
            multi_ok,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.layers.len()
    }

    /// Why `layer` drawing into `dst` cannot join, or `None` if it can.
    pub(crate) fn join_blocker(
        &self,
        dst_id: BufferId,
        dst: &ResolvedSurface,
        clip: Rect,
        layer: &PendingLayer,
        multi_enabled: bool,
    ) -> Option<&'static str> {
        if !multi_enabled {
            Some("multi-source disabled")
        } else if self.layers.len() >= regs::SRC_BANKS {
            Some("source banks full")
        } else if !self.multi_ok || !layer.multi_ok {
            Some("source geometry not multi-source compatible")
        } else if self.dst_id != dst_id || self.dst.geom != dst.geom || self.dst.rect != dst.rect
        {
            Some("destination changed")
        } else if self.clip != clip {
            Some("clip changed")
        } else {
            None
        }
    }

    pub(crate) fn push(&mut self, layer: PendingLayer) {
        self.layers.push(layer);
    }

    /// Emit the operation: destination, clip, sources bottom first, then the draw.
    pub(crate) fn emit(&self, batch: &mut Batch, pools: &Pools) -> BlitResult<()> {
        let multi = self.layers.len() > 1;
        let command = if multi {
            Command::MultiSource
        } else {
            Command::Bitblt
        };
        emit::emit_dest(
            batch,
            pools,
            DestTarget {
                surface: &self.dst,
                handle: self.dst_handle,
            },
            command,
        )?;
        emit::emit_clip(batch, pools, self.clip)?;
        if multi {
            emit::emit_single(
                batch,
                pools,
                regs::MULTI_SOURCE_CONFIG,
                regs::encode_multi_source(self.layers.len()),
            )?;
        }
        for (bank, layer) in self.layers.iter().enumerate() {
            emit::emit_source(
                batch,
                pools,
                bank,
                &SourceLayer {
                    surface: &layer.surface,
                    handle: layer.handle,
                    rect: layer.surface.rect,
                    op: layer.op,
                    multiply: layer.multiply(&self.dst),
                },
            )?;
        }
        emit::emit_start_de(batch, pools, &[self.dst.rect])?;

        batch.ops.push(OpSummary {
            kind: OpKind::Blit,
            dst: self.dst_id,
            srccount: self.layers.len() as u32,
            multi_source: multi,
            layers: self.layers.iter().map(|l| l.op.blend()).collect(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blit/finalizer.rs"]
mod tests;
