//! Error types for the `framepick` crate.
//!
//! This module defines [`FramePickError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry enough context to
//! diagnose a failure without extra logging at the call site.
//!
//! End of stream is deliberately **not** an error: the frame pump and packet
//! sources signal it through the `Ok(None)` arm of their return types, and a
//! sampling run that ends before the store is full is a valid outcome.

use thiserror::Error;

/// The unified error type for all `framepick` operations.
///
/// Every public method that can fail returns `Result<T, FramePickError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramePickError {
    /// A buffer allocation failed.
    ///
    /// Partially constructed state is released by drop before this
    /// propagates; nothing leaks on the failure path.
    #[error("Out of memory while allocating sample buffers")]
    OutOfMemory,

    /// No decoder is available for the stream's codec.
    #[error("No decoder found for codec: {0}")]
    DecoderNotFound(String),

    /// The pixel format or frame layout cannot be processed.
    #[error("Invalid or unsupported format: {0}")]
    InvalidFormat(String),

    /// A single decoded frame would exceed the sampling memory ceiling.
    #[error(
        "Frame too large: {width}x{height} at {bits_per_pixel} bpp exceeds the sampling memory ceiling"
    )]
    TooLarge {
        /// Frame width in pixels.
        width: u32,
        /// Frame height in pixels.
        height: u32,
        /// Bits per pixel of the decode format.
        bits_per_pixel: u32,
    },

    /// The decoder rejected too many consecutive packet submissions.
    #[error("Decoder rejected {attempts} consecutive packet submissions")]
    DecodeSubmissionFailure {
        /// Number of consecutive rejections observed.
        attempts: u32,
    },

    /// A hard decoder failure (anything other than "no frame ready yet").
    #[error("Decode error: {0}")]
    Decode(String),

    /// The stream produced no frames, so there is nothing to select from.
    #[error("No frames were sampled from the stream")]
    NoFramesSampled,

    /// The process-wide codec serialization lock failed.
    #[error("Codec serialization lock failed")]
    LockFailure,

    /// An insertion was attempted on a full sample store.
    ///
    /// The store's capacity is fixed by the sample budget planner and is
    /// never grown.
    #[error("Sample store is full (capacity {capacity})")]
    SampleStoreFull {
        /// The fixed capacity of the store.
        capacity: usize,
    },

    /// A histogram of the wrong length was handed to the sample store.
    #[error("Histogram length {actual} does not match the store's bin count {expected}")]
    HistogramSizeMismatch {
        /// Bin count the store was created with.
        expected: usize,
        /// Bin count of the offered histogram.
        actual: usize,
    },
}

#[cfg(feature = "ffmpeg")]
impl From<ffmpeg_next::Error> for FramePickError {
    fn from(error: ffmpeg_next::Error) -> Self {
        use ffmpeg_next::Error as FfmpegError;
        match error {
            FfmpegError::DecoderNotFound => {
                FramePickError::DecoderNotFound("unknown codec".to_string())
            }
            FfmpegError::InvalidData => FramePickError::InvalidFormat(
                "invalid data found when processing input".to_string(),
            ),
            other => FramePickError::Decode(other.to_string()),
        }
    }
}
