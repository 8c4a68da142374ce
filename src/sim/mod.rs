//! In-memory device that stands in for the platform collaborators.
//!
//! Every call is recorded so tests and the CLI can inspect what the orchestrator asked for.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, bail};
use parking_lot::Mutex;

use crate::device::{
    CacheMaintainer, CacheRegion, DeviceHandle, DeviceMapper, Direction, Submission, Submitter,
};
use crate::foundation::core::{BufferDesc, BufferId};

const PAGE: u64 = 0x1000;
const DEVICE_BASE: u64 = 0x1000_0000;
/// Scratch buffers get ids from this value upward.
pub const TEMP_ID_BASE: u64 = 1 << 48;
const TEMP_VIRT_BASE: u64 = 0x7F00_0000_0000;

/// Cache level touched by a maintenance call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheLevel {
    Inner,
    Outer,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    Map {
        buffer: BufferId,
        handle: DeviceHandle,
    },
    Unmap {
        handle: DeviceHandle,
    },
    Allocate {
        buffer: BufferId,
        len: usize,
    },
    Release {
        buffer: BufferId,
    },
    Cache {
        level: CacheLevel,
        buffer: BufferId,
        dir: Direction,
    },
    Submit {
        buffers: usize,
        words: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Mapping {
    buffer: BufferId,
    address: u32,
}

#[derive(Debug)]
struct SimState {
    next_handle: u64,
    next_page: u64,
    next_temp: u64,
    mappings: HashMap<DeviceHandle, Mapping>,
    fail_map: HashSet<BufferId>,
    fail_submit: bool,
    events: Vec<SimEvent>,
    submissions: Vec<Submission>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            next_handle: 1,
            next_page: DEVICE_BASE,
            next_temp: 0,
            mappings: HashMap::new(),
            fail_map: HashSet::new(),
            fail_submit: false,
            events: Vec::new(),
            submissions: Vec::new(),
        }
    }
}

/// Simulated mapper, submitter and cache controller.
#[derive(Debug, Default)]
pub struct SimDevice {
    state: Mutex<SimState>,
}

impl SimDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `map` of `buffer` fail.
    pub fn fail_map_for(&self, buffer: BufferId) {
        self.state.lock().fail_map.insert(buffer);
    }

    pub fn fail_submit(&self, fail: bool) {
        self.state.lock().fail_submit = fail;
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.state.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().submissions.clone()
    }

    pub fn live_mappings(&self) -> usize {
        self.state.lock().mappings.len()
    }

    pub fn count(&self, pred: impl Fn(&SimEvent) -> bool) -> usize {
        self.state.lock().events.iter().filter(|e| pred(e)).count()
    }

    /// Device address of a live mapping.
    pub fn address_of(&self, buffer: BufferId) -> Option<u32> {
        self.state
            .lock()
            .mappings
            .values()
            .find(|m| m.buffer == buffer)
            .map(|m| m.address)
    }
}

impl DeviceMapper for SimDevice {
    fn map(&self, buffer: &BufferDesc) -> anyhow::Result<DeviceHandle> {
        let mut st = self.state.lock();
        if st.fail_map.contains(&buffer.id) {
            bail!("simulated mapping failure for {:?}", buffer.id);
        }
        // Keep the in-page offset so alignment seen by the device matches the CPU view.
        let address = st.next_page + (buffer.virt_addr % PAGE);
        let address = u32::try_from(address).context("simulated device address space exhausted")?;
        let pages = (buffer.length as u64 + buffer.virt_addr % PAGE).div_ceil(PAGE).max(1);
        st.next_page += pages * PAGE;

        let handle = DeviceHandle(st.next_handle);
        st.next_handle += 1;
        st.mappings.insert(
            handle,
            Mapping {
                buffer: buffer.id,
                address,
            },
        );
        st.events.push(SimEvent::Map {
            buffer: buffer.id,
            handle,
        });
        Ok(handle)
    }

    fn resolve(&self, handle: DeviceHandle) -> anyhow::Result<u32> {
        self.state
            .lock()
            .mappings
            .get(&handle)
            .map(|m| m.address)
            .with_context(|| format!("{handle:?} is not mapped"))
    }

    fn unmap(&self, handle: DeviceHandle) {
        let mut st = self.state.lock();
        st.mappings.remove(&handle);
        st.events.push(SimEvent::Unmap { handle });
    }

    fn allocate(&self, len: usize) -> anyhow::Result<BufferDesc> {
        let mut st = self.state.lock();
        let n = st.next_temp;
        st.next_temp += 1;
        let id = BufferId(TEMP_ID_BASE + n);
        let virt_addr = TEMP_VIRT_BASE + n * (len as u64).next_multiple_of(PAGE);
        st.events.push(SimEvent::Allocate { buffer: id, len });
        Ok(BufferDesc::new(id, virt_addr, len))
    }

    fn release(&self, buffer: &BufferDesc) {
        self.state
            .lock()
            .events
            .push(SimEvent::Release { buffer: buffer.id });
    }
}

impl Submitter for SimDevice {
    fn submit(&self, submission: &Submission) -> anyhow::Result<()> {
        let mut st = self.state.lock();
        if st.fail_submit {
            bail!("simulated submission failure");
        }
        st.events.push(SimEvent::Submit {
            buffers: submission.buffers.len(),
            words: submission.word_count(),
        });
        st.submissions.push(submission.clone());
        Ok(())
    }
}

impl CacheMaintainer for SimDevice {
    fn inner(&self, region: &CacheRegion, dir: Direction) {
        self.state.lock().events.push(SimEvent::Cache {
            level: CacheLevel::Inner,
            buffer: region.buffer,
            dir,
        });
    }

    fn outer(&self, region: &CacheRegion, dir: Direction) {
        self.state.lock().events.push(SimEvent::Cache {
            level: CacheLevel::Outer,
            buffer: region.buffer,
            dir,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/device.rs"]
mod tests;
