//! Boundary with the platform: memory mapping, submission and CPU cache maintenance.

use smallvec::SmallVec;

use crate::blend::BlendConfig;
use crate::foundation::core::{BufferDesc, BufferId};

/// Opaque token for a buffer mapped into the accelerator's address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct DeviceHandle(pub u64);

/// Memory-mapping service.
pub trait DeviceMapper: Send + Sync {
    fn map(&self, buffer: &BufferDesc) -> anyhow::Result<DeviceHandle>;
    /// Device address of a mapped buffer, used when patching fixups.
    fn resolve(&self, handle: DeviceHandle) -> anyhow::Result<u32>;
    fn unmap(&self, handle: DeviceHandle);
    /// Allocate device-visible scratch memory for intermediate surfaces.
    fn allocate(&self, len: usize) -> anyhow::Result<BufferDesc>;
    fn release(&self, buffer: &BufferDesc);
}

/// Receives finished command streams.
pub trait Submitter: Send + Sync {
    fn submit(&self, submission: &Submission) -> anyhow::Result<()>;
}

/// CPU cache maintenance, one cache level per method.
pub trait CacheMaintainer: Send + Sync {
    fn inner(&self, region: &CacheRegion, dir: Direction);
    fn outer(&self, region: &CacheRegion, dir: Direction);
}

/// Direction of a cache maintenance operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Clean before the device reads.
    ToDevice,
    /// Invalidate after the device writes.
    FromDevice,
    Bidirectional,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CacheRegion {
    pub buffer: BufferId,
    pub virt_addr: u64,
    pub len: usize,
}

impl CacheRegion {
    pub fn whole(buffer: &BufferDesc) -> Self {
        Self {
            buffer: buffer.id,
            virt_addr: buffer.virt_addr,
            len: buffer.length,
        }
    }
}

/// Maintain every region in direction-dependent level order: outer then inner when reading back
/// from the device, inner then outer otherwise.
pub fn maintain(m: &dyn CacheMaintainer, regions: &[CacheRegion], dir: Direction) {
    for region in regions {
        match dir {
            Direction::FromDevice => {
                m.outer(region, dir);
                m.inner(region, dir);
            }
            Direction::ToDevice | Direction::Bidirectional => {
                m.inner(region, dir);
                m.outer(region, dir);
            }
        }
    }
}

/// Kind of a finalized hardware operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Blit,
    Fill,
    Stretch,
    Filter,
}

/// Description of one finalized operation, handed to the submitter with the buffers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OpSummary {
    pub kind: OpKind,
    pub dst: BufferId,
    pub srccount: u32,
    pub multi_source: bool,
    /// Blend of each source layer, bottom first; `None` for raster-op layers.
    pub layers: SmallVec<[Option<BlendConfig>; 4]>,
}

/// One batch worth of patched command buffers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Submission {
    pub buffers: Vec<Vec<u32>>,
    pub ops: Vec<OpSummary>,
}

impl Submission {
    pub fn word_count(&self) -> usize {
        self.buffers.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/device/maintain.rs"]
mod tests;
