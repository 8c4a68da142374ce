use crate::batch::BatchHandle;
use crate::blend::BlendSpec;
use crate::filter::ScaleQuality;
use crate::foundation::core::{BufferDesc, Rect};
use crate::geom::SurfaceGeom;

/// Raster op that copies the source unchanged.
pub const ROP_COPY: u8 = 0xCC;

/// A buffer, its pixel layout and the rectangle of interest (logical coordinates).
#[derive(Clone, Debug)]
pub struct SurfaceRef {
    pub buffer: BufferDesc,
    pub geom: SurfaceGeom,
    pub rect: Rect,
}

impl SurfaceRef {
    pub fn new(buffer: BufferDesc, geom: SurfaceGeom, rect: Rect) -> Self {
        Self { buffer, geom, rect }
    }

    /// Reference covering the whole (logical) surface.
    pub fn whole(buffer: BufferDesc, geom: SurfaceGeom) -> Self {
        let (w, h) = geom.logical_size();
        Self::new(buffer, geom, Rect::new(0, 0, w as i32, h as i32))
    }
}

/// Per-pixel combination of source and destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Ternary raster op code.
    Rop(u8),
    Blend(BlendSpec),
}

impl Default for Operation {
    fn default() -> Self {
        Self::Rop(ROP_COPY)
    }
}

/// Where a request sits in a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchFlag {
    /// Self-contained: allocate, record and submit.
    #[default]
    None,
    /// Open a batch and keep it for later requests.
    Begin,
    Continue(BatchHandle),
    /// Record into the batch, then submit it.
    End(BatchHandle),
}

/// One blit: a destination, up to two sources and how to combine them.
#[derive(Clone, Debug)]
pub struct BlitRequest {
    pub dst: SurfaceRef,
    pub src1: Option<SurfaceRef>,
    /// Background for two-source blends; drawn first.
    pub src2: Option<SurfaceRef>,
    /// Destination clip in logical coordinates; defaults to the destination rectangle.
    pub clip: Option<Rect>,
    pub op: Operation,
    pub quality: ScaleQuality,
    pub flag: BatchFlag,
}

impl BlitRequest {
    /// Plain copy of `src` into `dst`.
    pub fn copy(dst: SurfaceRef, src: SurfaceRef) -> Self {
        Self {
            dst,
            src1: Some(src),
            src2: None,
            clip: None,
            op: Operation::default(),
            quality: ScaleQuality::default(),
            flag: BatchFlag::None,
        }
    }

    pub fn with_background(mut self, src2: SurfaceRef) -> Self {
        self.src2 = Some(src2);
        self
    }

    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn with_op(mut self, op: Operation) -> Self {
        self.op = op;
        self
    }

    pub fn with_quality(mut self, quality: ScaleQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_flag(mut self, flag: BatchFlag) -> Self {
        self.flag = flag;
        self
    }
}

/// Path a request took through the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Solid fill from a single-pixel source.
    Fill,
    /// Queued as layers of a (possibly multi-source) blit.
    Composite,
    Stretch,
    Filter { passes: usize },
}

/// Result of [`crate::BlitContext::blit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitOutcome {
    /// Handle to continue the batch with; `None` once it has been submitted.
    pub batch: Option<BatchHandle>,
    pub route: Route,
    pub submitted: bool,
}
