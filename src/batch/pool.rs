use parking_lot::Mutex;

use crate::batch::buffer::CommandBuffer;
use crate::batch::fixup::FixupChunk;
use crate::batch::state::Batch;
use crate::foundation::error::{BlitError, BlitResult};
use crate::foundation::opts::ContextOpts;

/// Generation-checked reference to a batch slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BatchHandle {
    index: u32,
    generation: u32,
}

impl BatchHandle {
    pub fn index(self) -> u32 {
        self.index
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PoolStats {
    pub batch_slots: usize,
    pub batches_free: usize,
    pub buffers_allocated: usize,
    pub buffers_free: usize,
    pub fixup_chunks_allocated: usize,
    pub fixup_chunks_free: usize,
    pub out_of_memory: u64,
}

enum SlotState {
    Free(Batch),
    Parked(Batch),
    CheckedOut,
}

struct Slot {
    generation: u32,
    state: SlotState,
}

#[derive(Default)]
struct BatchArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    oom: u64,
}

struct FreeList<T> {
    free: Vec<T>,
    allocated: usize,
    oom: u64,
}

impl<T> Default for FreeList<T> {
    fn default() -> Self {
        Self {
            free: Vec::new(),
            allocated: 0,
            oom: 0,
        }
    }
}

/// Object pools backing every batch.
///
/// Locks are taken in the order batch arena, buffers, fixup chunks whenever more than one is held.
pub struct Pools {
    buffer_size: usize,
    max_batches: usize,
    max_buffers: usize,
    max_fixup_chunks: usize,
    fixup_chunk_len: usize,
    batches: Mutex<BatchArena>,
    buffers: Mutex<FreeList<CommandBuffer>>,
    chunks: Mutex<FreeList<FixupChunk>>,
}

impl Pools {
    pub fn new(opts: &ContextOpts) -> Self {
        Self {
            buffer_size: opts.buffer_size,
            max_batches: opts.max_batches,
            max_buffers: opts.max_buffers,
            max_fixup_chunks: opts.max_fixup_chunks,
            fixup_chunk_len: opts.fixup_chunk_len,
            batches: Mutex::new(BatchArena::default()),
            buffers: Mutex::new(FreeList::default()),
            chunks: Mutex::new(FreeList::default()),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Reserve a batch slot, reusing a freed one when possible.
    pub fn allocate_batch(&self) -> BlitResult<BatchHandle> {
        let mut arena = self.batches.lock();
        if let Some(index) = arena.free.pop() {
            let slot = &mut arena.slots[index as usize];
            let batch = match std::mem::replace(&mut slot.state, SlotState::CheckedOut) {
                SlotState::Free(batch) => batch,
                _ => Batch::new(),
            };
            slot.state = SlotState::Parked(batch);
            return Ok(BatchHandle {
                index,
                generation: slot.generation,
            });
        }
        if arena.slots.len() >= self.max_batches {
            arena.oom = arena.oom.saturating_add(1);
            return Err(BlitError::out_of_memory(format!(
                "all {} batch slots in use",
                self.max_batches
            )));
        }
        let index = arena.slots.len() as u32;
        arena.slots.push(Slot {
            generation: 0,
            state: SlotState::Parked(Batch::new()),
        });
        Ok(BatchHandle {
            index,
            generation: 0,
        })
    }

    /// Take a parked batch out of its slot for exclusive use.
    pub fn checkout(&self, handle: BatchHandle) -> BlitResult<Batch> {
        let mut arena = self.batches.lock();
        let slot = live_slot(&mut arena, handle)?;
        match std::mem::replace(&mut slot.state, SlotState::CheckedOut) {
            SlotState::Parked(batch) => Ok(batch),
            SlotState::CheckedOut => Err(BlitError::batch_state(format!(
                "{handle:?} is in use by another call"
            ))),
            SlotState::Free(batch) => {
                slot.state = SlotState::Free(batch);
                Err(BlitError::batch_state(format!("{handle:?} is not allocated")))
            }
        }
    }

    /// Put a checked-out batch back so a later call can continue it.
    pub fn park(&self, handle: BatchHandle, batch: Batch) -> BlitResult<()> {
        let mut arena = self.batches.lock();
        let slot = live_slot(&mut arena, handle)?;
        if !matches!(slot.state, SlotState::CheckedOut) {
            return Err(BlitError::batch_state(format!(
                "{handle:?} was not checked out"
            )));
        }
        slot.state = SlotState::Parked(batch);
        Ok(())
    }

    /// Return a checked-out batch and all its storage to the free lists. The handle becomes stale.
    pub fn free_batch(&self, handle: BatchHandle, mut batch: Batch) -> BlitResult<()> {
        let mut arena = self.batches.lock();
        let mut buffers = self.buffers.lock();
        let mut chunks = self.chunks.lock();

        let slot = live_slot(&mut arena, handle)?;
        if !matches!(slot.state, SlotState::CheckedOut) {
            return Err(BlitError::batch_state(format!(
                "{handle:?} was not checked out"
            )));
        }
        batch.recycle(&mut buffers.free, &mut chunks.free);
        slot.generation = slot.generation.wrapping_add(1);
        slot.state = SlotState::Free(batch);
        arena.free.push(handle.index);
        Ok(())
    }

    pub(crate) fn take_buffer(&self) -> BlitResult<CommandBuffer> {
        let mut pool = self.buffers.lock();
        if let Some(buffer) = pool.free.pop() {
            return Ok(buffer);
        }
        if pool.allocated >= self.max_buffers {
            pool.oom = pool.oom.saturating_add(1);
            return Err(BlitError::out_of_memory(format!(
                "command buffer pool exhausted ({} buffers)",
                self.max_buffers
            )));
        }
        pool.allocated += 1;
        Ok(CommandBuffer::new(self.buffer_size))
    }

    pub(crate) fn take_chunk(&self) -> BlitResult<FixupChunk> {
        let mut pool = self.chunks.lock();
        if let Some(chunk) = pool.free.pop() {
            return Ok(chunk);
        }
        if pool.allocated >= self.max_fixup_chunks {
            pool.oom = pool.oom.saturating_add(1);
            return Err(BlitError::out_of_memory(format!(
                "fixup chunk pool exhausted ({} chunks)",
                self.max_fixup_chunks
            )));
        }
        pool.allocated += 1;
        Ok(FixupChunk::new(self.fixup_chunk_len))
    }

    pub fn stats(&self) -> PoolStats {
        let arena = self.batches.lock();
        let buffers = self.buffers.lock();
        let chunks = self.chunks.lock();
        PoolStats {
            batch_slots: arena.slots.len(),
            batches_free: arena.free.len(),
            buffers_allocated: buffers.allocated,
            buffers_free: buffers.free.len(),
            fixup_chunks_allocated: chunks.allocated,
            fixup_chunks_free: chunks.free.len(),
            out_of_memory: arena
                .oom
                .saturating_add(buffers.oom)
                .saturating_add(chunks.oom),
        }
    }
}

fn live_slot(arena: &mut BatchArena, handle: BatchHandle) -> BlitResult<&mut Slot> {
    match arena.slots.get_mut(handle.index as usize) {
        Some(slot) if slot.generation == handle.generation => Ok(slot),
        Some(_) => Err(BlitError::batch_state(format!("{handle:?} is stale"))),
        None => Err(BlitError::batch_state(format!("{handle:?} is unknown"))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/pool.rs"]
mod tests;
