use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{BlitError, BlitResult};

/// Configuration of a [`crate::BlitContext`].
///
/// Pool limits bound how far each free list may grow; once a limit is hit, allocation reports
/// `OutOfMemory` instead of growing further.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ContextOpts {
    /// Capacity of one command buffer in bytes. Must be a multiple of 8.
    pub buffer_size: usize,
    /// Maximum number of batch headers in the arena.
    pub max_batches: usize,
    /// Maximum number of command buffers ever allocated.
    pub max_buffers: usize,
    /// Maximum number of fixup chunks ever allocated.
    pub max_fixup_chunks: usize,
    /// Fixups per chunk.
    pub fixup_chunk_len: usize,
    /// Kernels kept per (filter type, kernel size) cache bucket.
    pub filter_cache_depth: usize,
    /// Allow merging compatible sources into one multi-source operation.
    pub multi_source: bool,
    /// Byte alignment of temporary surface strides. Power of two.
    pub temp_alignment: usize,
    /// Bytes of released temporary surfaces retained for reuse.
    pub max_temp_pool_bytes: usize,
}

impl Default for ContextOpts {
    fn default() -> Self {
        Self {
            buffer_size: 4096,
            max_batches: 64,
            max_buffers: 1024,
            max_fixup_chunks: 1024,
            fixup_chunk_len: 32,
            filter_cache_depth: 5,
            multi_source: true,
            temp_alignment: 64,
            max_temp_pool_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ContextOpts {
    /// Parse options from JSON text. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> BlitResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| BlitError::invalid_argument(format!("parse context options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BlitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BlitError::invalid_argument(format!("open options JSON '{}': {e}", path.display()))
        })?;
        let opts: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            BlitError::invalid_argument(format!("parse options JSON '{}': {e}", path.display()))
        })?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> BlitResult<()> {
        // Smallest useful buffer holds the largest fixed-size record (one source bank plus header).
        if self.buffer_size < 256 || self.buffer_size % 8 != 0 {
            return Err(BlitError::invalid_argument(format!(
                "buffer_size must be a multiple of 8 and at least 256, got {}",
                self.buffer_size
            )));
        }
        if self.max_batches == 0 || self.max_buffers == 0 || self.max_fixup_chunks == 0 {
            return Err(BlitError::invalid_argument("pool limits must be non-zero"));
        }
        if self.fixup_chunk_len == 0 {
            return Err(BlitError::invalid_argument("fixup_chunk_len must be non-zero"));
        }
        if self.filter_cache_depth == 0 {
            return Err(BlitError::invalid_argument(
                "filter_cache_depth must be non-zero",
            ));
        }
        if !self.temp_alignment.is_power_of_two() || self.temp_alignment < 4 {
            return Err(BlitError::invalid_argument(format!(
                "temp_alignment must be a power of two >= 4, got {}",
                self.temp_alignment
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/opts.rs"]
mod tests;
