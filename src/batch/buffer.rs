/// Records start on this boundary, in bytes.
pub const RECORD_ALIGN: usize = 8;

/// Fixed-capacity arena of 32-bit command words.
#[derive(Debug)]
pub struct CommandBuffer {
    words: Vec<u32>,
    cursor: usize,
}

impl CommandBuffer {
    pub(crate) fn new(capacity_bytes: usize) -> Self {
        Self {
            words: vec![0; capacity_bytes / 4],
            cursor: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.words[..self.cursor].fill(0);
        self.cursor = 0;
    }

    pub fn capacity_bytes(&self) -> usize {
        self.words.len() * 4
    }

    pub fn used_bytes(&self) -> usize {
        self.cursor * 4
    }

    pub fn remaining_bytes(&self) -> usize {
        self.capacity_bytes() - self.used_bytes()
    }

    /// Written words.
    pub fn words(&self) -> &[u32] {
        &self.words[..self.cursor]
    }

    /// Reserve `bytes` (a multiple of [`RECORD_ALIGN`]) at the cursor; returns the byte offset.
    pub(crate) fn reserve(&mut self, bytes: usize) -> Option<usize> {
        debug_assert!(bytes % RECORD_ALIGN == 0);
        if bytes > self.remaining_bytes() {
            return None;
        }
        let offset = self.used_bytes();
        self.cursor += bytes / 4;
        Some(offset)
    }

    pub(crate) fn slice_mut(&mut self, byte_offset: usize, bytes: usize) -> &mut [u32] {
        let start = byte_offset / 4;
        &mut self.words[start..start + bytes / 4]
    }

    pub(crate) fn patch(&mut self, byte_offset: usize, value: u32) {
        self.words[byte_offset / 4] = value;
    }
}
