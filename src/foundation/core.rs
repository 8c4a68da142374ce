use std::sync::Arc;

use crate::foundation::error::{BlitError, BlitResult};

/// Integer rectangle in surface pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Build a rectangle from its edges (`right`/`bottom` exclusive).
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Exclusive right edge, saturating at `i32::MAX`.
    pub const fn right(self) -> i32 {
        self.left.saturating_add(self.width)
    }

    pub const fn bottom(self) -> i32 {
        self.top.saturating_add(self.height)
    }

    /// Whether `right` or `bottom` falls outside the `i32` range.
    pub fn edges_overflow(self) -> bool {
        self.left.checked_add(self.width).is_none() || self.top.checked_add(self.height).is_none()
    }

    fn wide_edges(self) -> [i64; 4] {
        let (l, t) = (i64::from(self.left), i64::from(self.top));
        [l, t, l + i64::from(self.width), t + i64::from(self.height)]
    }

    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub const fn is_negative(self) -> bool {
        self.width < 0 || self.height < 0
    }

    pub fn area(self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        i64::from(self.width) * i64::from(self.height)
    }

    pub fn same_size(self, other: Rect) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let [l0, t0, r0, b0] = self.wide_edges();
        let [l1, t1, r1, b1] = other.wide_edges();
        let (left, top) = (l0.max(l1), t0.max(t1));
        let (right, bottom) = (r0.min(r1), b0.min(b1));
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect {
            left: i32::try_from(left).ok()?,
            top: i32::try_from(top).ok()?,
            width: i32::try_from(right - left).ok()?,
            height: i32::try_from(bottom - top).ok()?,
        })
    }

    pub fn contains(self, inner: Rect) -> bool {
        let [l0, t0, r0, b0] = self.wide_edges();
        let [l1, t1, r1, b1] = inner.wide_edges();
        l1 >= l0 && t1 >= t0 && r1 <= r0 && b1 <= b0
    }

    pub fn translate(self, dx: i32, dy: i32) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            ..self
        }
    }
}

/// Clockwise surface orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Accepts any multiple of 90 degrees, including negative angles.
    pub fn from_degrees(degrees: i32) -> BlitResult<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            _ => Err(BlitError::unsupported_rotation(format!(
                "{degrees} is not a multiple of 90 degrees"
            ))),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Quarter turns, as programmed into rotation registers.
    pub fn quarter_turns(self) -> u32 {
        (self.degrees() / 90) as u32
    }

    pub fn inverse(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg0,
            Self::Deg90 => Self::Deg270,
            Self::Deg180 => Self::Deg180,
            Self::Deg270 => Self::Deg90,
        }
    }

    pub fn then(self, other: Rotation) -> Self {
        match (self.degrees() + other.degrees()).rem_euclid(360) {
            90 => Self::Deg90,
            180 => Self::Deg180,
            270 => Self::Deg270,
            _ => Self::Deg0,
        }
    }

    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = BlitError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_degrees(value)
    }
}

impl From<Rotation> for i32 {
    fn from(value: Rotation) -> Self {
        value.degrees()
    }
}

/// Mirror flags applied after rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Mirror {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Mirror {
    pub const NONE: Mirror = Mirror {
        horizontal: false,
        vertical: false,
    };

    pub fn is_none(self) -> bool {
        !self.horizontal && !self.vertical
    }

    /// Mirror flags expressed in the axes of a surface rotated by `rotation`.
    pub fn rotated(self, rotation: Rotation) -> Mirror {
        if rotation.swaps_axes() {
            Mirror {
                horizontal: self.vertical,
                vertical: self.horizontal,
            }
        } else {
            self
        }
    }

    /// Two-bit hardware encoding: bit 0 horizontal, bit 1 vertical.
    pub fn bits(self) -> u32 {
        u32::from(self.horizontal) | (u32::from(self.vertical) << 1)
    }
}

/// Caller-chosen identity of a buffer; keys the buffer-map cache.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BufferId(pub u64);

/// A caller's memory buffer.
///
/// `virt_addr` is only used to derive the base-address misalignment; the device address comes
/// from the memory-mapping collaborator.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BufferDesc {
    pub id: BufferId,
    pub virt_addr: u64,
    pub length: usize,
    /// Whether CPU caches may hold lines of this buffer (enables cache maintenance).
    #[serde(default)]
    pub cpu_cached: bool,
    /// Host-visible contents, needed when a pixel has to be read on the CPU (fills).
    #[serde(skip)]
    pub host: Option<Arc<[u8]>>,
}

impl BufferDesc {
    pub fn new(id: BufferId, virt_addr: u64, length: usize) -> Self {
        Self {
            id,
            virt_addr,
            length,
            cpu_cached: false,
            host: None,
        }
    }

    pub fn with_host_bytes(mut self, bytes: Arc<[u8]>) -> Self {
        self.length = self.length.max(bytes.len());
        self.host = Some(bytes);
        self
    }

    pub fn cpu_cached(mut self, cached: bool) -> Self {
        self.cpu_cached = cached;
        self
    }

    pub fn validate(&self) -> BlitResult<()> {
        if self.length == 0 {
            return Err(BlitError::invalid_argument(format!(
                "buffer {:?} has zero length",
                self.id
            )));
        }
        if let Some(host) = &self.host
            && host.len() < self.length
        {
            return Err(BlitError::invalid_argument(format!(
                "buffer {:?} host bytes shorter than declared length",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
