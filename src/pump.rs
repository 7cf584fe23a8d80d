//! Bounded-retry decode loop.
//!
//! [`FramePump`] pulls packets for one target stream, drives a
//! [`FrameDecoder`], and yields decoded frames one at a time. Transient
//! submission rejections are tolerated up to a fixed ceiling; end of stream
//! is a normal `Ok(None)`, never an error.

use crate::decode::{DecodePoll, FrameDecoder, PacketSource};
use crate::error::FramePickError;
use crate::frame::VideoFrame;

/// Maximum consecutive packet-submission rejections tolerated per
/// [`next_frame`](FramePump::next_frame) call before giving up.
pub const MAX_SUBMIT_REJECTIONS: u32 = 10;

/// Pull-based decode loop over a packet source and decoder pair.
///
/// Packets belonging to other streams are discarded. Each packet's storage
/// lives for exactly one loop iteration, on every path — discard, rejection,
/// and success alike.
pub struct FramePump<S, D> {
    source: S,
    decoder: D,
    target_stream: usize,
}

impl<S: PacketSource, D: FrameDecoder> FramePump<S, D> {
    /// Create a pump that decodes packets of `target_stream`.
    pub fn new(source: S, decoder: D, target_stream: usize) -> Self {
        Self {
            source,
            decoder,
            target_stream,
        }
    }

    /// Decode and return the next frame of the target stream.
    ///
    /// Returns `Ok(None)` when the source (or a drained decoder) is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`FramePickError::DecodeSubmissionFailure`] after more than
    /// [`MAX_SUBMIT_REJECTIONS`] consecutive rejected submissions; any hard
    /// decoder or demux error propagates immediately.
    pub fn next_frame(&mut self) -> Result<Option<VideoFrame>, FramePickError> {
        // A frame may already be buffered from earlier input.
        match self.decoder.receive()? {
            DecodePoll::Frame(frame) => return Ok(Some(frame)),
            DecodePoll::Drained => return Ok(None),
            DecodePoll::Pending => {}
        }

        let mut rejections = 0u32;
        loop {
            let packet = match self.source.next_packet()? {
                Some(packet) => packet,
                None => return Ok(None),
            };

            if packet.stream_index != self.target_stream {
                log::trace!(
                    "Discarding packet for stream {} (target {})",
                    packet.stream_index,
                    self.target_stream
                );
                continue;
            }

            if let Err(rejection) = self.decoder.submit(&packet) {
                rejections += 1;
                if rejections > MAX_SUBMIT_REJECTIONS {
                    return Err(FramePickError::DecodeSubmissionFailure {
                        attempts: rejections,
                    });
                }
                log::trace!("Packet submission rejected ({rejections}): {rejection}");
                continue;
            }

            match self.decoder.receive()? {
                DecodePoll::Frame(frame) => return Ok(Some(frame)),
                DecodePoll::Drained => return Ok(None),
                DecodePoll::Pending => {}
            }
        }
    }
}
