//! Decode pump integration tests.
//!
//! These tests drive [`FramePump`] with scripted collaborators to verify
//! stream filtering, the bounded submission retry policy, and the
//! end-of-stream contract.

use std::collections::VecDeque;

use framepick::{
    DecodePoll, FrameDecoder, FramePickError, FramePump, Packet, PacketSource, VideoFrame,
};

struct ScriptedSource {
    packets: VecDeque<Packet>,
}

impl ScriptedSource {
    fn new(packets: Vec<Packet>) -> Self {
        Self {
            packets: packets.into(),
        }
    }
}

impl PacketSource for ScriptedSource {
    fn next_packet(&mut self) -> Result<Option<Packet>, FramePickError> {
        Ok(self.packets.pop_front())
    }
}

/// Decoder that rejects the first `reject_next` submissions, then queues one
/// frame per accepted packet. Each frame carries the packet's first payload
/// byte so tests can check ordering.
struct ScriptedDecoder {
    reject_next: usize,
    frame_delay: usize,
    accepted: usize,
    ready: VecDeque<VideoFrame>,
    drained: bool,
}

impl ScriptedDecoder {
    fn new() -> Self {
        Self {
            reject_next: 0,
            frame_delay: 0,
            accepted: 0,
            ready: VecDeque::new(),
            drained: false,
        }
    }

    fn rejecting(reject_next: usize) -> Self {
        Self {
            reject_next,
            ..Self::new()
        }
    }

    /// Withhold output until `delay` packets have been accepted.
    fn with_delay(delay: usize) -> Self {
        Self {
            frame_delay: delay,
            ..Self::new()
        }
    }

    fn preloaded(frame: VideoFrame) -> Self {
        let mut decoder = Self::new();
        decoder.ready.push_back(frame);
        decoder
    }

    fn drained() -> Self {
        Self {
            drained: true,
            ..Self::new()
        }
    }
}

impl FrameDecoder for ScriptedDecoder {
    fn submit(&mut self, packet: &Packet) -> Result<(), FramePickError> {
        if self.reject_next > 0 {
            self.reject_next -= 1;
            return Err(FramePickError::Decode("decoder input full".to_string()));
        }
        self.accepted += 1;
        if self.accepted > self.frame_delay {
            let value = packet.data.first().copied().unwrap_or_default();
            self.ready.push_back(VideoFrame::filled(2, 2, value));
        }
        Ok(())
    }

    fn receive(&mut self) -> Result<DecodePoll, FramePickError> {
        if let Some(frame) = self.ready.pop_front() {
            return Ok(DecodePoll::Frame(frame));
        }
        if self.drained {
            return Ok(DecodePoll::Drained);
        }
        Ok(DecodePoll::Pending)
    }
}

fn packet(stream_index: usize, value: u8) -> Packet {
    Packet {
        stream_index,
        data: vec![value],
        pts: None,
    }
}

#[test]
fn yields_frames_in_packet_order() {
    let source = ScriptedSource::new(vec![packet(0, 1), packet(0, 2), packet(0, 3)]);
    let mut pump = FramePump::new(source, ScriptedDecoder::new(), 0);

    for expected in 1u8..=3 {
        let frame = pump.next_frame().unwrap().expect("expected a frame");
        assert_eq!(frame.planes[0].data[0], expected);
    }
    assert!(pump.next_frame().unwrap().is_none());
}

#[test]
fn discards_packets_of_other_streams() {
    let source = ScriptedSource::new(vec![
        packet(1, 10),
        packet(0, 1),
        packet(2, 20),
        packet(2, 21),
        packet(0, 2),
    ]);
    let mut pump = FramePump::new(source, ScriptedDecoder::new(), 0);

    assert_eq!(pump.next_frame().unwrap().unwrap().planes[0].data[0], 1);
    assert_eq!(pump.next_frame().unwrap().unwrap().planes[0].data[0], 2);
    assert!(pump.next_frame().unwrap().is_none());
}

#[test]
fn exhausted_source_with_no_frames_is_not_an_error() {
    let source = ScriptedSource::new(vec![packet(1, 10), packet(3, 30)]);
    let mut pump = FramePump::new(source, ScriptedDecoder::new(), 0);
    assert!(pump.next_frame().unwrap().is_none());
}

#[test]
fn buffered_frame_is_returned_before_reading_packets() {
    // The decoder already holds output; an empty source must not matter.
    let source = ScriptedSource::new(Vec::new());
    let decoder = ScriptedDecoder::preloaded(VideoFrame::filled(2, 2, 9));
    let mut pump = FramePump::new(source, decoder, 0);

    assert_eq!(pump.next_frame().unwrap().unwrap().planes[0].data[0], 9);
    assert!(pump.next_frame().unwrap().is_none());
}

#[test]
fn drained_decoder_ends_the_stream() {
    let source = ScriptedSource::new(vec![packet(0, 1)]);
    let mut pump = FramePump::new(source, ScriptedDecoder::drained(), 0);
    assert!(pump.next_frame().unwrap().is_none());
}

#[test]
fn tolerates_up_to_ten_rejected_submissions() {
    let packets: Vec<Packet> = (0..11).map(|_| packet(0, 5)).collect();
    let source = ScriptedSource::new(packets);
    let mut pump = FramePump::new(source, ScriptedDecoder::rejecting(10), 0);

    let frame = pump
        .next_frame()
        .expect("ten rejections should still recover")
        .expect("expected a frame after the rejections stop");
    assert_eq!(frame.planes[0].data[0], 5);
}

#[test]
fn fails_on_the_eleventh_rejected_submission() {
    let packets: Vec<Packet> = (0..20).map(|_| packet(0, 5)).collect();
    let source = ScriptedSource::new(packets);
    let mut pump = FramePump::new(source, ScriptedDecoder::rejecting(20), 0);

    match pump.next_frame() {
        Err(FramePickError::DecodeSubmissionFailure { attempts }) => assert_eq!(attempts, 11),
        other => panic!("expected a submission failure, got {other:?}"),
    }
}

#[test]
fn keeps_feeding_while_the_decoder_is_pending() {
    // Output lags input by two packets, as with reordered streams.
    let source = ScriptedSource::new(vec![packet(0, 1), packet(0, 2), packet(0, 3)]);
    let mut pump = FramePump::new(source, ScriptedDecoder::with_delay(2), 0);

    let frame = pump.next_frame().unwrap().expect("expected a frame");
    assert_eq!(frame.planes[0].data[0], 3);
    assert!(pump.next_frame().unwrap().is_none());
}
