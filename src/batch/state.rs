use crate::batch::buffer::{CommandBuffer, RECORD_ALIGN};
use crate::batch::fixup::{Fixup, FixupChunk};
use crate::batch::pool::Pools;
use crate::blit::Finalizer;
use crate::device::{CacheRegion, DeviceHandle, Direction, OpSummary};
use crate::foundation::core::{BufferDesc, BufferId};
use crate::foundation::error::{BlitError, BlitResult};

/// Slot handed out by [`Batch::claim`]; addresses `len` bytes at `offset` of buffer `buffer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Claim {
    pub buffer: usize,
    pub offset: usize,
    pub len: usize,
}

#[derive(Debug)]
struct BufferEntry {
    buffer: CommandBuffer,
    fixups: Vec<FixupChunk>,
}

/// One logical unit of work: command buffers, their fixup chains and everything that has to
/// happen when the batch is finalized.
#[derive(Default)]
pub struct Batch {
    entries: Vec<BufferEntry>,
    claimed_bytes: usize,
    /// Buffers mapped implicitly for this batch, unmapped once it completes.
    pub(crate) unmaps: Vec<BufferId>,
    /// Regions maintained before submission.
    pub(crate) cache_before: Vec<(CacheRegion, Direction)>,
    /// Regions invalidated after submission.
    pub(crate) cache_after: Vec<CacheRegion>,
    /// Intermediate surfaces released with the batch.
    pub(crate) temps: Vec<BufferDesc>,
    /// Operation still accepting sources.
    pub(crate) pending: Option<Finalizer>,
    pub(crate) ops: Vec<OpSummary>,
}

impl Batch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append an empty command buffer from the pool.
    pub fn append_buffer(&mut self, pools: &Pools) -> BlitResult<()> {
        let buffer = pools.take_buffer()?;
        self.entries.push(BufferEntry {
            buffer,
            fixups: Vec::new(),
        });
        Ok(())
    }

    /// Reserve `size` bytes for one record, starting a new buffer when the current one is short.
    pub fn claim(&mut self, pools: &Pools, size: usize) -> BlitResult<Claim> {
        if size == 0 {
            return Err(BlitError::invalid_argument("zero-sized record"));
        }
        let len = size.next_multiple_of(RECORD_ALIGN);
        if len > pools.buffer_size() {
            return Err(BlitError::invalid_argument(format!(
                "record of {len} bytes exceeds the {}-byte command buffer",
                pools.buffer_size()
            )));
        }
        let fits = self
            .entries
            .last()
            .is_some_and(|e| e.buffer.remaining_bytes() >= len);
        if !fits {
            self.append_buffer(pools)?;
        }
        let buffer = self.entries.len() - 1;
        let offset = self.entries[buffer]
            .buffer
            .reserve(len)
            .ok_or_else(|| BlitError::out_of_memory("fresh command buffer rejected a record"))?;
        self.claimed_bytes += len;
        Ok(Claim {
            buffer,
            offset,
            len,
        })
    }

    pub fn record_mut(&mut self, claim: &Claim) -> &mut [u32] {
        self.entries[claim.buffer]
            .buffer
            .slice_mut(claim.offset, claim.len)
    }

    /// Record that word `word` of `claim` receives the device address of `handle` plus
    /// `surface_offset`.
    pub fn add_fixup(
        &mut self,
        pools: &Pools,
        claim: &Claim,
        word: usize,
        handle: DeviceHandle,
        surface_offset: i32,
    ) -> BlitResult<()> {
        if word * 4 >= claim.len || claim.buffer >= self.entries.len() {
            return Err(BlitError::invalid_argument(format!(
                "fixup word {word} outside {claim:?}"
            )));
        }
        let fixup = Fixup {
            buffer_offset: (claim.offset + word * 4) as u32,
            handle,
            surface_offset,
        };
        let entry = &mut self.entries[claim.buffer];
        if entry.fixups.last().is_none_or(FixupChunk::is_full) {
            entry.fixups.push(pools.take_chunk()?);
        }
        if let Some(chunk) = entry.fixups.last_mut() {
            chunk.push(fixup);
        }
        Ok(())
    }

    pub fn buffers(&self) -> impl Iterator<Item = &CommandBuffer> {
        self.entries.iter().map(|e| &e.buffer)
    }

    pub fn buffer_count(&self) -> usize {
        self.entries.len()
    }

    /// Fixups with the index of the buffer they patch.
    pub fn fixups(&self) -> impl Iterator<Item = (usize, &Fixup)> {
        self.entries.iter().enumerate().flat_map(|(i, e)| {
            e.fixups
                .iter()
                .flat_map(|c| c.entries().iter())
                .map(move |f| (i, f))
        })
    }

    pub fn fixup_count(&self) -> usize {
        self.fixups().count()
    }

    pub fn fixup_chunk_count(&self) -> usize {
        self.entries.iter().map(|e| e.fixups.len()).sum()
    }

    pub fn claimed_bytes(&self) -> usize {
        self.claimed_bytes
    }

    pub fn used_bytes(&self) -> usize {
        self.buffers().map(CommandBuffer::used_bytes).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed_bytes == 0
    }

    /// Write every fixup's device address into its command word.
    pub fn patch_fixups(
        &mut self,
        mut resolve: impl FnMut(DeviceHandle) -> BlitResult<u32>,
    ) -> BlitResult<()> {
        for entry in &mut self.entries {
            for chunk in &entry.fixups {
                for f in chunk.entries() {
                    let base = resolve(f.handle)?;
                    let addr = i64::from(base) + i64::from(f.surface_offset);
                    let addr = u32::try_from(addr).map_err(|_| {
                        BlitError::device_mapping(format!(
                            "patched address {addr:#x} for {:?} out of range",
                            f.handle
                        ))
                    })?;
                    entry.buffer.patch(f.buffer_offset as usize, addr);
                }
            }
        }
        Ok(())
    }

    /// Copies of the written part of every buffer, in order.
    pub fn snapshot(&self) -> Vec<Vec<u32>> {
        self.buffers().map(|b| b.words().to_vec()).collect()
    }

    pub(crate) fn schedule_unmap(&mut self, id: BufferId) {
        self.unmaps.push(id);
    }

    pub(crate) fn maintain_before(&mut self, region: CacheRegion, dir: Direction) {
        if !self.cache_before.iter().any(|(r, d)| *r == region && *d == dir) {
            self.cache_before.push((region, dir));
        }
    }

    pub(crate) fn maintain_after(&mut self, region: CacheRegion) {
        if !self.cache_after.contains(&region) {
            self.cache_after.push(region);
        }
    }

    /// Return storage to the free lists and clear all per-batch state.
    pub(crate) fn recycle(
        &mut self,
        free_buffers: &mut Vec<CommandBuffer>,
        free_chunks: &mut Vec<FixupChunk>,
    ) {
        for mut entry in self.entries.drain(..) {
            entry.buffer.reset();
            free_buffers.push(entry.buffer);
            for mut chunk in entry.fixups.drain(..) {
                chunk.reset();
                free_chunks.push(chunk);
            }
        }
        self.claimed_bytes = 0;
        self.unmaps.clear();
        self.cache_before.clear();
        self.cache_after.clear();
        self.temps.clear();
        self.pending = None;
        self.ops.clear();
    }
}

impl std::fmt::Debug for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch")
            .field("buffers", &self.entries.len())
            .field("claimed_bytes", &self.claimed_bytes)
            .field("fixups", &self.fixup_count())
            .field("unmaps", &self.unmaps)
            .field("ops", &self.ops.len())
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/state.rs"]
mod tests;
