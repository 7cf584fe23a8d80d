//! End-to-end selection integration tests.
//!
//! These tests run [`select_best_frame`] over scripted decoder output and
//! verify budget capping, aggregation, and the winner-by-least-deviation
//! rule.

use std::collections::VecDeque;

use framepick::{
    DecodePoll, FrameDecoder, FramePickError, FramePlane, FramePump, Packet, PacketSource,
    PixelDescriptor, StreamInfo, VideoFrame, select_best_frame,
};

/// Source that is already exhausted. The paired decoder holds every frame
/// up front, so the pump never needs a packet.
struct EmptySource;

impl PacketSource for EmptySource {
    fn next_packet(&mut self) -> Result<Option<Packet>, FramePickError> {
        Ok(None)
    }
}

struct FrameQueue {
    frames: VecDeque<VideoFrame>,
}

impl FrameQueue {
    fn new(frames: Vec<VideoFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl FrameDecoder for FrameQueue {
    fn submit(&mut self, _packet: &Packet) -> Result<(), FramePickError> {
        Ok(())
    }

    fn receive(&mut self) -> Result<DecodePoll, FramePickError> {
        match self.frames.pop_front() {
            Some(frame) => Ok(DecodePoll::Frame(frame)),
            None => Ok(DecodePoll::Pending),
        }
    }
}

fn pump_of(frames: Vec<VideoFrame>) -> FramePump<EmptySource, FrameQueue> {
    FramePump::new(EmptySource, FrameQueue::new(frames), 0)
}

fn gray_frame(pixels: &[u8]) -> VideoFrame {
    VideoFrame {
        width: pixels.len() as u32,
        height: 1,
        planes: vec![FramePlane {
            data: pixels.to_vec(),
            stride: pixels.len(),
        }],
    }
}

fn stream(frame_count_hint: Option<u64>) -> StreamInfo {
    StreamInfo {
        frame_count_hint,
        attached_picture: false,
    }
}

#[test]
fn picks_the_frame_closest_to_the_mean_histogram() {
    // Five 4-pixel frames of values 0 and 1. Their histograms over bins
    // 0 and 1 are [4,0], [0,4], [2,2], [2,2], [1,3]; the mean is
    // [1.8, 2.2], so the [2,2] frames deviate least and the earlier one
    // (index 2) must win.
    let frames = vec![
        gray_frame(&[0, 0, 0, 0]),
        gray_frame(&[1, 1, 1, 1]),
        gray_frame(&[0, 0, 1, 1]),
        gray_frame(&[0, 1, 0, 1]),
        gray_frame(&[0, 1, 1, 1]),
    ];
    let mut pump = pump_of(frames);

    // A 16-frame hint budgets exactly five samples.
    let selection =
        select_best_frame(&mut pump, &stream(Some(16)), &PixelDescriptor::gray8()).unwrap();

    assert_eq!(selection.index, 2);
    assert_eq!(selection.sampled, 5);
    assert_eq!(selection.frame.planes[0].data, vec![0, 0, 1, 1]);
}

#[test]
fn identical_frames_tie_and_the_first_wins() {
    let frames = vec![gray_frame(&[3, 3, 5, 5]); 4];
    let mut pump = pump_of(frames);

    let selection =
        select_best_frame(&mut pump, &stream(Some(16)), &PixelDescriptor::gray8()).unwrap();

    assert_eq!(selection.index, 0);
    assert_eq!(selection.sampled, 4);
}

#[test]
fn budget_caps_how_many_frames_are_sampled() {
    let frames: Vec<VideoFrame> = (0u8..10).map(|value| gray_frame(&[value; 4])).collect();
    let mut pump = pump_of(frames);

    // A 7-frame hint budgets two samples.
    let selection =
        select_best_frame(&mut pump, &stream(Some(7)), &PixelDescriptor::gray8()).unwrap();

    assert_eq!(selection.sampled, 2);
}

#[test]
fn attached_picture_samples_exactly_one_frame() {
    let frames = vec![gray_frame(&[1, 2]), gray_frame(&[3, 4]), gray_frame(&[5, 6])];
    let mut pump = pump_of(frames);
    let info = StreamInfo {
        frame_count_hint: Some(3),
        attached_picture: true,
    };

    let selection = select_best_frame(&mut pump, &info, &PixelDescriptor::gray8()).unwrap();

    assert_eq!(selection.sampled, 1);
    assert_eq!(selection.index, 0);
    assert_eq!(selection.frame.planes[0].data, vec![1, 2]);
}

#[test]
fn short_stream_ends_sampling_early() {
    let frames = vec![gray_frame(&[0; 4]), gray_frame(&[1; 4]), gray_frame(&[0; 4])];
    let mut pump = pump_of(frames);

    // No frame count hint budgets the full ceiling of 100.
    let selection =
        select_best_frame(&mut pump, &stream(None), &PixelDescriptor::gray8()).unwrap();

    assert_eq!(selection.sampled, 3);
}

#[test]
fn empty_stream_yields_no_frames_sampled() {
    let mut pump = pump_of(Vec::new());
    let result = select_best_frame(&mut pump, &stream(None), &PixelDescriptor::gray8());
    assert!(matches!(result, Err(FramePickError::NoFramesSampled)));
}

#[test]
fn oversized_frames_are_rejected_before_sampling() {
    // 8192 x 4097 at 32 bits per pixel is just past the 2^30-bit ceiling.
    let frame = VideoFrame::filled(8192, 4097, 0);
    let mut pump = pump_of(vec![frame]);

    let result = select_best_frame(&mut pump, &stream(None), &PixelDescriptor::rgba());
    match result {
        Err(FramePickError::TooLarge {
            width,
            height,
            bits_per_pixel,
        }) => {
            assert_eq!((width, height), (8192, 4097));
            assert_eq!(bits_per_pixel, 32);
        }
        other => panic!("expected a size rejection, got {other:?}"),
    }
}
