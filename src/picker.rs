//! End-to-end best-frame selection.
//!
//! Ties the pieces together: decode the first frame, plan the sample
//! budget from its dimensions and the stream hints, fill a
//! [`SampleStore`] one frame at a time, then aggregate and hand the winning
//! frame to the caller.
//!
//! # Example
//!
//! ```no_run
//! use framepick::{select_best_frame, FramePump, PixelDescriptor, StreamInfo};
//! # use framepick::{DecodePoll, FramePickError, FrameDecoder, Packet, PacketSource};
//! # struct Source;
//! # impl PacketSource for Source {
//! #     fn next_packet(&mut self) -> Result<Option<Packet>, FramePickError> { Ok(None) }
//! # }
//! # struct Decoder;
//! # impl FrameDecoder for Decoder {
//! #     fn submit(&mut self, _: &Packet) -> Result<(), FramePickError> { Ok(()) }
//! #     fn receive(&mut self) -> Result<DecodePoll, FramePickError> { Ok(DecodePoll::Pending) }
//! # }
//!
//! let mut pump = FramePump::new(Source, Decoder, 0);
//! let stream = StreamInfo { frame_count_hint: Some(120), attached_picture: false };
//! let selection = select_best_frame(&mut pump, &stream, &PixelDescriptor::yuv420p())?;
//! println!("picked frame {} of {}", selection.index, selection.sampled);
//! # Ok::<(), framepick::FramePickError>(())
//! ```

use crate::budget::{SAMPLE_MEMORY_BUDGET_BITS, plan_sample_budget};
use crate::decode::{FrameDecoder, PacketSource};
use crate::error::FramePickError;
use crate::frame::VideoFrame;
use crate::histogram::Histogram;
use crate::pixel::PixelDescriptor;
use crate::pump::FramePump;
use crate::store::SampleStore;

/// Stream-level facts the budget planner needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamInfo {
    /// Container-reported frame count, if known.
    pub frame_count_hint: Option<u64>,
    /// `true` for a single attached still image (cover art).
    pub attached_picture: bool,
}

/// The outcome of a selection run.
#[derive(Debug)]
pub struct Selection {
    /// The winning frame, ownership transferred to the caller.
    pub frame: VideoFrame,
    /// Index of the winner among the sampled frames, in stream order.
    pub index: usize,
    /// How many frames were sampled (may be fewer than the budget if the
    /// stream ended early).
    pub sampled: usize,
}

/// Sample a stream and return its most representative frame.
///
/// Decodes up to the planned budget of frames, computes a histogram per
/// frame, aggregates them into a per-bin mean, and picks the frame whose
/// histogram deviates least from it. The stream ending before the budget is
/// reached is normal; at least one decoded frame is required.
///
/// # Errors
///
/// Returns [`FramePickError::NoFramesSampled`] if the stream yields no
/// frames, [`FramePickError::TooLarge`] if a single decoded frame would
/// exceed the sampling memory ceiling, and any hard pump or extraction
/// error.
pub fn select_best_frame<S: PacketSource, D: FrameDecoder>(
    pump: &mut FramePump<S, D>,
    stream: &StreamInfo,
    descriptor: &PixelDescriptor,
) -> Result<Selection, FramePickError> {
    let first = pump
        .next_frame()?
        .ok_or(FramePickError::NoFramesSampled)?;

    let bits_per_pixel = descriptor.bits_per_pixel();
    let frame_bits =
        u64::from(bits_per_pixel) * u64::from(first.width) * u64::from(first.height);
    if frame_bits > SAMPLE_MEMORY_BUDGET_BITS {
        return Err(FramePickError::TooLarge {
            width: first.width,
            height: first.height,
            bits_per_pixel,
        });
    }

    let budget = plan_sample_budget(
        stream.frame_count_hint,
        stream.attached_picture,
        first.width,
        first.height,
        bits_per_pixel,
    );

    let mut store = SampleStore::new(budget, descriptor.histogram_size())?;
    let histogram = Histogram::of_frame(&first, descriptor)?;
    store.push(first, histogram)?;

    while !store.is_full() {
        match pump.next_frame()? {
            Some(frame) => {
                let histogram = Histogram::of_frame(&frame, descriptor)?;
                store.push(frame, histogram)?;
            }
            None => {
                log::debug!(
                    "Stream ended after {} of {} budgeted frames",
                    store.len(),
                    store.capacity()
                );
                break;
            }
        }
    }

    let sampled = store.len();
    let index = store.select()?;
    let frame = store
        .into_frame(index)
        .ok_or(FramePickError::NoFramesSampled)?;

    Ok(Selection {
        frame,
        index,
        sampled,
    })
}
