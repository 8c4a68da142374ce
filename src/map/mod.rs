//! Reference-counted buffer mappings shared by every caller of a context.

use std::collections::{HashMap, hash_map};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::device::{DeviceHandle, DeviceMapper};
use crate::foundation::core::{BufferDesc, BufferId};
use crate::foundation::error::{BlitError, BlitResult};

/// Who holds a mapping reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    /// Client request; survives across batches until the client unmaps.
    Explicit,
    /// Taken by a blit; dropped when its batch completes.
    Implicit,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MapStats {
    pub live: usize,
    pub map_calls: u64,
    pub unmap_calls: u64,
    pub device_maps: u64,
    pub device_unmaps: u64,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    handle: DeviceHandle,
    explicit: u32,
    implicit: u32,
}

impl Entry {
    fn take(&mut self, kind: MapKind) {
        match kind {
            MapKind::Explicit => self.explicit = self.explicit.saturating_add(1),
            MapKind::Implicit => self.implicit = self.implicit.saturating_add(1),
        }
    }
}

#[derive(Default)]
struct Table {
    entries: HashMap<BufferId, Entry>,
    stats: MapStats,
}

pub struct BufferMapCache {
    mapper: Arc<dyn DeviceMapper>,
    table: Mutex<Table>,
}

impl BufferMapCache {
    pub fn new(mapper: Arc<dyn DeviceMapper>) -> Self {
        Self {
            mapper,
            table: Mutex::new(Table::default()),
        }
    }

    /// Take a reference on `desc`, creating the device mapping on the first one.
    ///
    /// The mapper runs outside the table lock; if another caller mapped the same buffer in the
    /// meantime, the redundant mapping is released and the existing one is shared.
    pub fn map(&self, desc: &BufferDesc, kind: MapKind) -> BlitResult<DeviceHandle> {
        desc.validate()?;
        {
            let mut guard = self.table.lock();
            let Table { entries, stats } = &mut *guard;
            stats.map_calls = stats.map_calls.saturating_add(1);
            if let Some(entry) = entries.get_mut(&desc.id) {
                entry.take(kind);
                return Ok(entry.handle);
            }
        }

        let fresh = self
            .mapper
            .map(desc)
            .map_err(|e| BlitError::device_mapping(format!("map {:?}: {e:#}", desc.id)))?;

        let mut guard = self.table.lock();
        let Table { entries, stats } = &mut *guard;
        let (handle, raced) = match entries.entry(desc.id) {
            hash_map::Entry::Occupied(o) => {
                let entry = o.into_mut();
                entry.take(kind);
                (entry.handle, true)
            }
            hash_map::Entry::Vacant(v) => {
                stats.device_maps = stats.device_maps.saturating_add(1);
                let entry = v.insert(Entry {
                    handle: fresh,
                    explicit: 0,
                    implicit: 0,
                });
                entry.take(kind);
                (fresh, false)
            }
        };
        stats.live = entries.len();
        drop(guard);

        if raced {
            tracing::debug!(buffer = ?desc.id, "buffer mapped concurrently, releasing duplicate");
            self.mapper.unmap(fresh);
        } else {
            tracing::trace!(buffer = ?desc.id, ?handle, "device mapping created");
        }
        Ok(handle)
    }

    /// Drop a reference. An explicit unmap clears every explicit reference at once.
    ///
    /// Returns whether the device mapping was torn down.
    pub fn unmap(&self, id: BufferId, kind: MapKind) -> bool {
        let mut guard = self.table.lock();
        let Table { entries, stats } = &mut *guard;
        stats.unmap_calls = stats.unmap_calls.saturating_add(1);

        let Some(entry) = entries.get_mut(&id) else {
            tracing::debug!(buffer = ?id, ?kind, "unmap of a buffer that is not mapped");
            return false;
        };
        match kind {
            MapKind::Explicit => entry.explicit = 0,
            MapKind::Implicit => entry.implicit = entry.implicit.saturating_sub(1),
        }
        if entry.explicit > 0 || entry.implicit > 0 {
            return false;
        }
        let handle = entry.handle;
        entries.remove(&id);
        stats.device_unmaps = stats.device_unmaps.saturating_add(1);
        stats.live = entries.len();
        drop(guard);

        self.mapper.unmap(handle);
        tracing::trace!(buffer = ?id, ?handle, "device mapping released");
        true
    }

    pub fn handle(&self, id: BufferId) -> Option<DeviceHandle> {
        self.table.lock().entries.get(&id).map(|e| e.handle)
    }

    /// `(explicit, implicit)` reference counts.
    pub fn counts(&self, id: BufferId) -> Option<(u32, u32)> {
        self.table
            .lock()
            .entries
            .get(&id)
            .map(|e| (e.explicit, e.implicit))
    }

    pub fn stats(&self) -> MapStats {
        self.table.lock().stats
    }
}

impl std::fmt::Debug for BufferMapCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferMapCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/map/cache.rs"]
mod tests;
