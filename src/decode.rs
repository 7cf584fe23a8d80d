//! Decoder collaborator contracts.
//!
//! The selection engine never talks to a media library directly. It drives
//! two small traits — [`PacketSource`] for demuxed packets and
//! [`FrameDecoder`] for turning packets into frames — so the engine can be
//! exercised with scripted collaborators in tests and backed by FFmpeg in
//! production (see the `ffmpeg` feature).

use crate::error::FramePickError;
use crate::frame::VideoFrame;

/// One demuxed, still-compressed packet.
///
/// Packets are owned values: the pump drops each one at the end of the loop
/// iteration that read it, so no packet storage is held across iterations.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Index of the stream this packet belongs to.
    pub stream_index: usize,
    /// Compressed payload.
    pub data: Vec<u8>,
    /// Presentation timestamp in stream time base, if known.
    pub pts: Option<i64>,
}

/// Result of polling a decoder for output.
#[derive(Debug)]
pub enum DecodePoll {
    /// A decoded frame is ready.
    Frame(VideoFrame),
    /// The decoder needs more input before it can produce a frame.
    Pending,
    /// The decoder has been drained; no further frames will appear.
    Drained,
}

/// A source of demuxed packets.
pub trait PacketSource {
    /// Read the next packet.
    ///
    /// `Ok(None)` signals end of source — a normal terminal condition, not
    /// an error. Errors are hard demux failures.
    fn next_packet(&mut self) -> Result<Option<Packet>, FramePickError>;
}

/// A decoder for one elementary stream.
pub trait FrameDecoder {
    /// Feed one compressed packet to the decoder.
    ///
    /// An `Err` here is a *rejection*: the pump treats it as retryable and
    /// gives up only after too many consecutive rejections.
    fn submit(&mut self, packet: &Packet) -> Result<(), FramePickError>;

    /// Poll for decoded output.
    ///
    /// An `Err` here is a hard decoder failure and propagates immediately.
    fn receive(&mut self) -> Result<DecodePoll, FramePickError>;
}
