use parking_lot::Mutex;

use crate::device::DeviceMapper;
use crate::foundation::core::BufferDesc;
use crate::foundation::error::{BlitError, BlitResult};

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TempPoolStats {
    pub retained_surfaces: usize,
    pub retained_bytes: usize,
    pub alloc_surfaces: u64,
    pub alloc_bytes: u64,
    pub reused: u64,
    pub dropped_on_release: u64,
}

#[derive(Default)]
struct Inner {
    free: Vec<BufferDesc>,
    stats: TempPoolStats,
}

/// Bounded pool of device scratch buffers for intermediate filter surfaces.
///
/// Buffers are handed out best-fit by length; released buffers are kept while the retained total
/// stays within `max_bytes`, and given back to the mapper otherwise.
pub(crate) struct TempSurfacePool {
    max_bytes: usize,
    inner: Mutex<Inner>,
}

impl TempSurfacePool {
    pub(crate) fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub(crate) fn take(&self, mapper: &dyn DeviceMapper, len: usize) -> BlitResult<BufferDesc> {
        let mut inner = self.inner.lock();
        let best = inner
            .free
            .iter()
            .enumerate()
            .filter(|(_, d)| d.length >= len)
            .min_by_key(|(_, d)| d.length)
            .map(|(i, _)| i);
        if let Some(i) = best {
            let desc = inner.free.swap_remove(i);
            let st = &mut inner.stats;
            st.retained_surfaces = st.retained_surfaces.saturating_sub(1);
            st.retained_bytes = st.retained_bytes.saturating_sub(desc.length);
            st.reused = st.reused.saturating_add(1);
            return Ok(desc);
        }

        let desc = mapper.allocate(len).map_err(|e| {
            BlitError::out_of_memory(format!("allocate {len}-byte scratch surface: {e:#}"))
        })?;
        let st = &mut inner.stats;
        st.alloc_surfaces = st.alloc_surfaces.saturating_add(1);
        st.alloc_bytes = st.alloc_bytes.saturating_add(len as u64);
        Ok(desc)
    }

    pub(crate) fn put(&self, mapper: &dyn DeviceMapper, desc: BufferDesc) {
        let mut inner = self.inner.lock();
        if inner.stats.retained_bytes.saturating_add(desc.length) > self.max_bytes {
            inner.stats.dropped_on_release = inner.stats.dropped_on_release.saturating_add(1);
            drop(inner);
            mapper.release(&desc);
            return;
        }
        let st = &mut inner.stats;
        st.retained_surfaces = st.retained_surfaces.saturating_add(1);
        st.retained_bytes = st.retained_bytes.saturating_add(desc.length);
        inner.free.push(desc);
    }

    /// Give every retained buffer back to the mapper.
    pub(crate) fn drain(&self, mapper: &dyn DeviceMapper) {
        let free = {
            let mut inner = self.inner.lock();
            inner.stats.retained_surfaces = 0;
            inner.stats.retained_bytes = 0;
            std::mem::take(&mut inner.free)
        };
        for desc in &free {
            mapper.release(desc);
        }
    }

    pub(crate) fn stats(&self) -> TempPoolStats {
        self.inner.lock().stats.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blit/temp.rs"]
mod tests;
