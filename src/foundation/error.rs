/// Convenience result type used across blitstream.
pub type BlitResult<T> = Result<T, BlitError>;

/// Error code reported to callers alongside the diagnostic string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum BlitErrorKind {
    /// Null or malformed descriptor, inconsistent request.
    InvalidArgument,
    /// Pixel format that the translator or the accelerator cannot express.
    UnsupportedFormat,
    /// Blend coefficients outside the hardware-expressible set.
    UnsupportedBlendCombination,
    /// Rotation angle that is not a multiple of 90 degrees, or an unsupported rotation pairing.
    UnsupportedRotation,
    /// Rectangle outside surface bounds or with a negative size.
    InvalidRectangle,
    /// A pool could not grow.
    OutOfMemory,
    /// Unknown, stale or busy batch handle.
    BatchState,
    /// The memory-mapping collaborator failed.
    DeviceMapping,
    /// Failure reported by another collaborator.
    Other,
}

impl BlitErrorKind {
    /// Stable numeric code for callers that cannot carry the enum.
    pub fn code(self) -> i32 {
        match self {
            Self::InvalidArgument => 1,
            Self::UnsupportedFormat => 2,
            Self::UnsupportedBlendCombination => 3,
            Self::UnsupportedRotation => 4,
            Self::InvalidRectangle => 5,
            Self::OutOfMemory => 6,
            Self::BatchState => 7,
            Self::DeviceMapping => 8,
            Self::Other => 255,
        }
    }
}

/// Top-level error taxonomy used by every component.
#[derive(thiserror::Error, Debug)]
pub enum BlitError {
    /// Malformed descriptor or request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unsupported pixel format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Blend coefficients that the hardware cannot express.
    #[error("unsupported blend combination: {0}")]
    UnsupportedBlendCombination(String),

    /// Unsupported rotation.
    #[error("unsupported rotation: {0}")]
    UnsupportedRotation(String),

    /// Rectangle out of bounds or negative.
    #[error("invalid rectangle: {0}")]
    InvalidRectangle(String),

    /// Pool exhaustion.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// Wrong batch handle or batch already finalized.
    #[error("batch state error: {0}")]
    BatchState(String),

    /// Device mapping failed.
    #[error("device mapping failure: {0}")]
    DeviceMapping(String),

    /// Wrapped collaborator error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlitError {
    /// Build a [`BlitError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`BlitError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`BlitError::UnsupportedBlendCombination`] value.
    pub fn unsupported_blend(msg: impl Into<String>) -> Self {
        Self::UnsupportedBlendCombination(msg.into())
    }

    /// Build a [`BlitError::UnsupportedRotation`] value.
    pub fn unsupported_rotation(msg: impl Into<String>) -> Self {
        Self::UnsupportedRotation(msg.into())
    }

    /// Build a [`BlitError::InvalidRectangle`] value.
    pub fn invalid_rectangle(msg: impl Into<String>) -> Self {
        Self::InvalidRectangle(msg.into())
    }

    /// Build a [`BlitError::OutOfMemory`] value.
    pub fn out_of_memory(msg: impl Into<String>) -> Self {
        Self::OutOfMemory(msg.into())
    }

    /// Build a [`BlitError::BatchState`] value.
    pub fn batch_state(msg: impl Into<String>) -> Self {
        Self::BatchState(msg.into())
    }

    /// Build a [`BlitError::DeviceMapping`] value.
    pub fn device_mapping(msg: impl Into<String>) -> Self {
        Self::DeviceMapping(msg.into())
    }

    /// Error code for this error.
    pub fn kind(&self) -> BlitErrorKind {
        match self {
            Self::InvalidArgument(_) => BlitErrorKind::InvalidArgument,
            Self::UnsupportedFormat(_) => BlitErrorKind::UnsupportedFormat,
            Self::UnsupportedBlendCombination(_) => BlitErrorKind::UnsupportedBlendCombination,
            Self::UnsupportedRotation(_) => BlitErrorKind::UnsupportedRotation,
            Self::InvalidRectangle(_) => BlitErrorKind::InvalidRectangle,
            Self::OutOfMemory(_) => BlitErrorKind::OutOfMemory,
            Self::BatchState(_) => BlitErrorKind::BatchState,
            Self::DeviceMapping(_) => BlitErrorKind::DeviceMapping,
            Self::Other(_) => BlitErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
