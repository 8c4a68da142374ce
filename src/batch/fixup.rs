use crate::device::DeviceHandle;

/// Deferred address patch: the word at `buffer_offset` becomes
/// `resolve(handle) + surface_offset` before submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fixup {
    /// Byte offset of the patched word inside its command buffer.
    pub buffer_offset: u32,
    pub handle: DeviceHandle,
    pub surface_offset: i32,
}

/// Fixed-length node of a per-buffer fixup chain.
#[derive(Debug)]
pub(crate) struct FixupChunk {
    entries: Vec<Fixup>,
    len: usize,
}

impl FixupChunk {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            entries: Vec::with_capacity(len),
            len,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.entries.len() >= self.len
    }

    pub(crate) fn push(&mut self, fixup: Fixup) {
        debug_assert!(!self.is_full());
        self.entries.push(fixup);
    }

    pub(crate) fn entries(&self) -> &[Fixup] {
        &self.entries
    }

    pub(crate) fn reset(&mut self) {
        self.entries.clear();
    }
}
