//! Sample budget planning.
//!
//! Decides how many frames may be retained while scanning a stream for the
//! most representative one. The budget is the minimum of a hard ceiling, a
//! fraction of the stream's reported frame count, and however many fully
//! decoded frames fit in a fixed memory envelope.

/// Hard ceiling on the number of sampled frames.
pub const MAX_SAMPLED_FRAMES: usize = 100;

/// Memory envelope for retained frames, in bits (128 MiB).
pub const SAMPLE_MEMORY_BUDGET_BITS: u64 = 1 << 30;

/// Streams shorter than this get a quarter-of-total secondary cap.
pub const SHORT_STREAM_FRAMES: u64 = 400;

/// Compute the maximum number of frames to sample from a stream.
///
/// Rules, in order:
/// 1. an attached still picture is sampled exactly once;
/// 2. a known frame count below 400 caps sampling at a quarter of the
///    stream plus one;
/// 3. the retained frames must fit in a 128 MiB envelope at the stream's
///    decode format.
///
/// The result never exceeds [`MAX_SAMPLED_FRAMES`] and is always at least 1.
/// Callers reject frames whose single-frame footprint exceeds the envelope
/// (`TooLarge`) before planning.
///
/// # Example
///
/// ```
/// use framepick::plan_sample_budget;
///
/// // Cover art: one frame, regardless of hints.
/// assert_eq!(plan_sample_budget(Some(250), true, 1280, 720, 12), 1);
///
/// // A 40-frame clip: quarter of total, plus one.
/// assert_eq!(plan_sample_budget(Some(40), false, 1280, 720, 12), 11);
/// ```
pub fn plan_sample_budget(
    frame_count_hint: Option<u64>,
    attached_picture: bool,
    width: u32,
    height: u32,
    bits_per_pixel: u32,
) -> usize {
    if attached_picture {
        return 1;
    }

    let mut max_frames = MAX_SAMPLED_FRAMES as u64;
    if let Some(hint) = frame_count_hint {
        if hint > 0 && hint < SHORT_STREAM_FRAMES {
            max_frames = (hint >> 2) + 1;
        }
    }

    let frame_bits = u64::from(bits_per_pixel) * u64::from(width) * u64::from(height);
    if frame_bits > 0 {
        max_frames = max_frames.min(SAMPLE_MEMORY_BUDGET_BITS / frame_bits);
    }

    let budget = max_frames.max(1) as usize;
    log::debug!(
        "Sample budget: {budget} frames ({width}x{height} @ {bits_per_pixel} bpp, hint={frame_count_hint:?}, attached={attached_picture})"
    );
    budget
}
