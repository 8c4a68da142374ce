use std::sync::Arc;

use anyhow::Context as _;
use smallvec::SmallVec;

use crate::batch::{Batch, BatchHandle, PoolStats, Pools};
use crate::blend::resolve_blend;
use crate::blit::finalizer::{Finalizer, PendingLayer, PendingOp};
use crate::blit::ops::{self, PassBinding};
use crate::blit::request::{BatchFlag, BlitOutcome, BlitRequest, Operation, ROP_COPY, Route, SurfaceRef};
use crate::blit::temp::{TempPoolStats, TempSurfacePool};
use crate::device::{
    CacheMaintainer, CacheRegion, DeviceHandle, DeviceMapper, Direction, Submission, Submitter,
    maintain,
};
use crate::filter::{FilterCache, FilterCacheStats, PassSurface, ScaleQuality, plan_filter};
use crate::format::FormatCode;
use crate::foundation::core::{BufferDesc, BufferId, Rect};
use crate::foundation::error::{BlitError, BlitResult};
use crate::foundation::opts::ContextOpts;
use crate::geom::{ResolvedSurface, SurfaceGeom, multi_source_compatible, resolve_surface};
use crate::hw::emit::{self, DestTarget, LayerOp, SourceLayer};
use crate::hw::regs::ColorMultiply;
use crate::map::{BufferMapCache, MapKind, MapStats};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Source,
    Dest,
}

/// Entry point: turns blit requests into submitted command buffers.
///
/// All state lives behind per-pool locks, so one context can be shared between threads. A batch
/// in progress belongs to whichever call has it checked out.
pub struct BlitContext {
    opts: ContextOpts,
    mapper: Arc<dyn DeviceMapper>,
    submitter: Arc<dyn Submitter>,
    cache_ctl: Arc<dyn CacheMaintainer>,
    pools: Pools,
    maps: BufferMapCache,
    kernels: FilterCache,
    temps: TempSurfacePool,
}

impl BlitContext {
    pub fn new(
        opts: ContextOpts,
        mapper: Arc<dyn DeviceMapper>,
        submitter: Arc<dyn Submitter>,
        cache_ctl: Arc<dyn CacheMaintainer>,
    ) -> BlitResult<Self> {
        opts.validate()?;
        Ok(Self {
            pools: Pools::new(&opts),
            maps: BufferMapCache::new(mapper.clone()),
            kernels: FilterCache::new(opts.filter_cache_depth),
            temps: TempSurfacePool::new(opts.max_temp_pool_bytes),
            opts,
            mapper,
            submitter,
            cache_ctl,
        })
    }

    /// Context backed by one object that provides every collaborator.
    pub fn with_device<D>(opts: ContextOpts, device: Arc<D>) -> BlitResult<Self>
    where
        D: DeviceMapper + Submitter + CacheMaintainer + 'static,
    {
        Self::new(opts, device.clone(), device.clone(), device)
    }

    pub fn opts(&self) -> &ContextOpts {
        &self.opts
    }

    /// Record one request, submitting the batch when its flag closes it.
    #[tracing::instrument(level = "debug", skip_all, fields(flag = ?req.flag, dst = ?req.dst.buffer.id))]
    pub fn blit(&self, req: &BlitRequest) -> BlitResult<BlitOutcome> {
        let (handle, close) = match req.flag {
            BatchFlag::None => (self.pools.allocate_batch()?, true),
            BatchFlag::Begin => (self.pools.allocate_batch()?, false),
            BatchFlag::Continue(h) => (h, false),
            BatchFlag::End(h) => (h, true),
        };
        let mut batch = self.pools.checkout(handle)?;

        let route = match self.record(&mut batch, req) {
            Ok(route) => route,
            Err(err) => {
                tracing::warn!(error = %err, ?handle, "blit failed, releasing batch");
                if let Err(release_err) = self.release(handle, batch) {
                    tracing::warn!(error = %release_err, "batch release failed");
                }
                return Err(err);
            }
        };

        if close {
            self.finish(handle, batch)?;
            Ok(BlitOutcome {
                batch: None,
                route,
                submitted: true,
            })
        } else {
            self.pools.park(handle, batch)?;
            Ok(BlitOutcome {
                batch: Some(handle),
                route,
                submitted: false,
            })
        }
    }

    /// Drop a parked batch without submitting anything.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn discard_batch(&self, handle: BatchHandle) -> BlitResult<()> {
        let batch = self.pools.checkout(handle)?;
        self.release(handle, batch)
    }

    /// Map a buffer on behalf of the client; it stays mapped across batches until [`Self::unmap`].
    pub fn map(&self, buffer: &BufferDesc) -> BlitResult<DeviceHandle> {
        self.maps.map(buffer, MapKind::Explicit)
    }

    /// Drop the client's mapping of `id`. Returns whether the device mapping went away.
    pub fn unmap(&self, id: BufferId) -> bool {
        self.maps.unmap(id, MapKind::Explicit)
    }

    /// Client-requested cache maintenance over a whole buffer.
    pub fn cache(&self, buffer: &BufferDesc, dir: Direction) {
        maintain(&*self.cache_ctl, &[CacheRegion::whole(buffer)], dir);
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pools.stats()
    }

    pub fn map_stats(&self) -> MapStats {
        self.maps.stats()
    }

    pub fn filter_stats(&self) -> FilterCacheStats {
        self.kernels.stats()
    }

    pub fn temp_stats(&self) -> TempPoolStats {
        self.temps.stats()
    }

    fn record(&self, batch: &mut Batch, req: &BlitRequest) -> BlitResult<Route> {
        let dst = resolve_surface(&req.dst.buffer, &req.dst.geom, req.dst.rect)?;
        if dst.format.is_yuv() {
            return Err(BlitError::unsupported_format(
                "destination must be an RGB surface",
            ));
        }
        let Some(src_ref) = &req.src1 else {
            return Err(BlitError::invalid_argument("blit without a source surface"));
        };
        let clip = match req.clip {
            Some(c) => c.intersect(dst.logical_bounds()).ok_or_else(|| {
                BlitError::invalid_rectangle(format!("clip {c:?} misses the destination"))
            })?,
            None => dst.logical_rect,
        };
        let clip = dst.to_physical(clip);
        let src = resolve_surface(&src_ref.buffer, &src_ref.geom, src_ref.rect)?;

        let op = match req.op {
            Operation::Rop(rop) => LayerOp::Rop(rop),
            Operation::Blend(spec) => LayerOp::Blend(resolve_blend(spec)?),
        };
        if req.src2.is_some() && !matches!(op, LayerOp::Blend(_)) {
            return Err(BlitError::invalid_argument(
                "a second source needs a blend operation",
            ));
        }

        if self.is_fill(req, &src, &dst)
            && let Some(color) = ops::fill_color(&src_ref.buffer, &src, &dst.format)?
        {
            self.flush(batch)?;
            let dst_handle = self.pin(batch, &req.dst.buffer, Role::Dest)?;
            let target = DestTarget {
                surface: &dst,
                handle: dst_handle,
            };
            ops::emit_fill(batch, &self.pools, target, req.dst.buffer.id, clip, color)?;
            return Ok(Route::Fill);
        }

        if !src.logical_rect.same_size(dst.logical_rect) {
            return self.record_scaled(batch, req, src_ref, &src, &dst, clip, op);
        }

        let dst_handle = self.pin(batch, &req.dst.buffer, Role::Dest)?;
        let mut layers: SmallVec<[PendingLayer; 2]> = SmallVec::new();
        if let Some(bg_ref) = &req.src2 {
            let bg = resolve_surface(&bg_ref.buffer, &bg_ref.geom, bg_ref.rect)?;
            if !bg.logical_rect.same_size(dst.logical_rect) {
                return Err(BlitError::invalid_argument(
                    "background source must match the destination size",
                ));
            }
            let handle = self.pin(batch, &bg_ref.buffer, Role::Source)?;
            layers.push(PendingLayer {
                multi_ok: multi_source_compatible(&dst, &bg),
                surface: bg,
                handle,
                op: LayerOp::Rop(ROP_COPY),
            });
        }
        let handle = self.pin(batch, &src_ref.buffer, Role::Source)?;
        layers.push(PendingLayer {
            multi_ok: multi_source_compatible(&dst, &src),
            surface: src,
            handle,
            op,
        });

        for layer in layers {
            self.enqueue(batch, &dst, req.dst.buffer.id, dst_handle, clip, layer)?;
        }
        Ok(Route::Composite)
    }

    fn is_fill(&self, req: &BlitRequest, src: &ResolvedSurface, dst: &ResolvedSurface) -> bool {
        req.src2.is_none()
            && req.op == Operation::Rop(ROP_COPY)
            && !src.format.is_yuv()
            && src.logical_rect.width == 1
            && src.logical_rect.height == 1
            && dst.logical_rect.area() > 1
    }

    #[allow(clippy::too_many_arguments)]
    fn record_scaled(
        &self,
        batch: &mut Batch,
        req: &BlitRequest,
        src_ref: &SurfaceRef,
        src: &ResolvedSurface,
        dst: &ResolvedSurface,
        clip: Rect,
        op: LayerOp,
    ) -> BlitResult<Route> {
        let LayerOp::Rop(rop) = op else {
            return Err(BlitError::invalid_argument(
                "blending cannot be combined with scaling",
            ));
        };
        if req.quality != ScaleQuality::Fastest && src.geom.rotation != dst.geom.rotation {
            return Err(BlitError::unsupported_rotation(format!(
                "filtered scaling needs equal rotations, got {}° source and {}° destination",
                src.geom.rotation.degrees(),
                dst.geom.rotation.degrees()
            )));
        }

        self.flush(batch)?;
        let dst_handle = self.pin(batch, &req.dst.buffer, Role::Dest)?;
        let src_handle = self.pin(batch, &src_ref.buffer, Role::Source)?;
        let target = DestTarget {
            surface: dst,
            handle: dst_handle,
        };

        if req.quality == ScaleQuality::Fastest {
            tracing::debug!(src = ?src.logical_rect, dst = ?dst.logical_rect, "stretch");
            let layer = SourceLayer {
                surface: src,
                handle: src_handle,
                rect: src.rect,
                op: LayerOp::Rop(rop),
                multiply: ColorMultiply::default(),
            };
            ops::emit_stretch(batch, &self.pools, target, req.dst.buffer.id, clip, &layer)?;
            return Ok(Route::Stretch);
        }

        let bounds = Rect::new(
            src.align.pixalign as i32,
            0,
            src.geom.width as i32,
            src.geom.height as i32,
        );
        let plan = plan_filter(src.rect, dst.rect, req.quality, bounds);
        let temp = match plan.temp {
            Some(t) => {
                tracing::debug!(width = t.width, height = t.height, "two-pass filter");
                Some(self.temp_surface(batch, t.width, t.height)?)
            }
            None => None,
        };

        for pass in &plan.passes {
            let (input, input_handle) = match (pass.input, &temp) {
                (PassSurface::Temp, Some((s, h, _))) => (s, *h),
                _ => (src, src_handle),
            };
            let (output, output_id, pass_clip) = match (pass.output, &temp) {
                (PassSurface::Temp, Some((s, h, id))) => (
                    DestTarget {
                        surface: s,
                        handle: *h,
                    },
                    *id,
                    s.rect,
                ),
                _ => (target, req.dst.buffer.id, clip),
            };
            let bind = PassBinding {
                input,
                input_handle,
                output,
                output_id,
                clip: pass_clip,
            };
            ops::emit_filter_pass(batch, &self.pools, &self.kernels, pass, &bind)?;
        }
        Ok(Route::Filter {
            passes: plan.passes.len(),
        })
    }

    /// Scratch ARGB surface owned by the batch until it completes.
    fn temp_surface(
        &self,
        batch: &mut Batch,
        width: u32,
        height: u32,
    ) -> BlitResult<(ResolvedSurface, DeviceHandle, BufferId)> {
        let stride = (width * 4).next_multiple_of(self.opts.temp_alignment as u32);
        let len = stride as usize * height as usize;
        let desc = self.temps.take(&*self.mapper, len)?;
        let id = desc.id;
        batch.temps.push(desc.clone());

        let handle = self.maps.map(&desc, MapKind::Implicit)?;
        batch.schedule_unmap(id);
        let geom = SurfaceGeom::new(width, height, stride, FormatCode::ARGB8888);
        let surface = resolve_surface(
            &desc,
            &geom,
            Rect::new(0, 0, width as i32, height as i32),
        )?;
        Ok((surface, handle, id))
    }

    /// Add a layer to the pending operation, finalizing it first when the layer cannot join.
    fn enqueue(
        &self,
        batch: &mut Batch,
        dst: &ResolvedSurface,
        dst_id: BufferId,
        dst_handle: DeviceHandle,
        clip: Rect,
        layer: PendingLayer,
    ) -> BlitResult<()> {
        let multi = self.opts.multi_source;
        if let Some(Finalizer::MultiSource(pending)) = &mut batch.pending {
            match pending.join_blocker(dst_id, dst, clip, &layer, multi) {
                None => {
                    pending.push(layer);
                    tracing::trace!(sources = pending.len(), "source joined pending operation");
                    return Ok(());
                }
                Some(reason) => {
                    tracing::debug!(reason, sources = pending.len(), "finalizing pending operation");
                }
            }
        }
        self.flush(batch)?;
        batch.pending = Some(Finalizer::MultiSource(PendingOp::new(
            dst.clone(),
            dst_id,
            dst_handle,
            clip,
            layer,
            multi,
        )));
        Ok(())
    }

    /// Emit the pending operation, if any.
    fn flush(&self, batch: &mut Batch) -> BlitResult<()> {
        match batch.pending.take() {
            Some(Finalizer::MultiSource(op)) => op.emit(batch, &self.pools),
            None => Ok(()),
        }
    }

    /// Implicitly map a buffer for this batch and register its cache maintenance.
    fn pin(&self, batch: &mut Batch, buffer: &BufferDesc, role: Role) -> BlitResult<DeviceHandle> {
        let handle = self.maps.map(buffer, MapKind::Implicit)?;
        batch.schedule_unmap(buffer.id);
        if buffer.cpu_cached {
            let region = CacheRegion::whole(buffer);
            match role {
                Role::Source => batch.maintain_before(region, Direction::ToDevice),
                Role::Dest => {
                    batch.maintain_before(region, Direction::Bidirectional);
                    batch.maintain_after(region);
                }
            }
        }
        Ok(handle)
    }

    /// Finalize, submit and release a batch.
    fn finish(&self, handle: BatchHandle, mut batch: Batch) -> BlitResult<()> {
        let submitted = self.submit(&mut batch);
        if let Err(err) = &submitted {
            tracing::warn!(error = %err, ?handle, "batch finalization failed, releasing");
        }
        let released = self.release(handle, batch);
        submitted.and(released)
    }

    fn submit(&self, batch: &mut Batch) -> BlitResult<()> {
        self.flush(batch)?;
        if batch.ops.is_empty() {
            tracing::debug!("nothing recorded, skipping submission");
            return Ok(());
        }
        emit::emit_end(batch, &self.pools)?;
        batch.patch_fixups(|h| {
            self.mapper
                .resolve(h)
                .map_err(|e| BlitError::device_mapping(format!("resolve {h:?}: {e:#}")))
        })?;

        for (region, dir) in &batch.cache_before {
            maintain(&*self.cache_ctl, std::slice::from_ref(region), *dir);
        }
        let submission = Submission {
            buffers: batch.snapshot(),
            ops: batch.ops.clone(),
        };
        tracing::debug!(
            buffers = submission.buffers.len(),
            words = submission.word_count(),
            ops = submission.ops.len(),
            "submitting batch"
        );
        self.submitter
            .submit(&submission)
            .context("submit command buffers")?;
        maintain(&*self.cache_ctl, &batch.cache_after, Direction::FromDevice);
        Ok(())
    }

    /// Undo implicit mappings, recycle scratch surfaces and return the batch to the pools.
    fn release(&self, handle: BatchHandle, mut batch: Batch) -> BlitResult<()> {
        for id in batch.unmaps.drain(..) {
            self.maps.unmap(id, MapKind::Implicit);
        }
        for desc in batch.temps.drain(..) {
            self.temps.put(&*self.mapper, desc);
        }
        self.pools.free_batch(handle, batch)
    }
}

impl Drop for BlitContext {
    fn drop(&mut self) {
        self.temps.drain(&*self.mapper);
    }
}

impl std::fmt::Debug for BlitContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlitContext")
            .field("opts", &self.opts)
            .field("pools", &self.pools.stats())
            .field("maps", &self.maps.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blit/context.rs"]
mod tests;
