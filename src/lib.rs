//! # framepick
//!
//! Pick the most representative frame of a video stream — the natural
//! thumbnail — by sampling decoded frames and comparing their color
//! histograms.
//!
//! `framepick` samples a budgeted number of frames from the start of a
//! stream, builds a per-channel color histogram for each, averages the
//! histograms into a per-bin reference, and returns the frame whose
//! histogram deviates least from that reference. The core engine is
//! generic over a [`PacketSource`] and a [`FrameDecoder`]; an FFmpeg-backed
//! pair (via the [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)
//! crate) is available behind the `ffmpeg` feature.
//!
//! ## Quick Start
//!
//! ### Pick a Thumbnail Frame
//!
//! ```no_run
//! # #[cfg(feature = "ffmpeg")] {
//! use framepick::ffmpeg::FfmpegInput;
//!
//! let input = FfmpegInput::open("input.mp4").unwrap();
//! let orientation = input.orientation();
//! let selection = input.pick_best_frame().unwrap();
//! println!(
//!     "frame {} of {} sampled, orientation {}",
//!     selection.index,
//!     selection.sampled,
//!     orientation.code(),
//! );
//! # }
//! ```
//!
//! ### Drive the Engine with Your Own Decoder
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
//! let stream = StreamInfo { frame_count_hint: Some(300), attached_picture: false };
//! let selection = select_best_frame(&mut pump, &stream, &PixelDescriptor::yuv420p()).unwrap();
//! ```
//!
//! ## Features
//!
//! - **Budget planning** — sample counts sized from the container's frame
//!   count hint, the frame dimensions, and a fixed memory ceiling
//! - **Histogram extraction** — bit-packed, byte-aligned, and 16-bit word
//!   layouts, planar and interleaved, with chroma subsampling
//! - **Bounded-retry decoding** — transient packet rejections tolerated up
//!   to a fixed ceiling; end of stream is never an error
//! - **Orientation resolution** — display-matrix rotation normalized to
//!   EXIF orientation codes
//! - **Codec gate** — process-wide serialization of the two non-reentrant
//!   decoder-library calls
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ffmpeg` | FFmpeg-backed [`PacketSource`]/[`FrameDecoder`] collaborators and `ffmpeg::FfmpegInput` |
//!
//! ## Requirements
//!
//! The core engine has no system dependencies. With the `ffmpeg` feature
//! enabled, the FFmpeg development libraries must be installed.

pub mod budget;
pub mod decode;
pub mod error;
#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;
pub mod frame;
pub mod histogram;
pub mod lock;
pub mod orientation;
pub mod picker;
pub mod pixel;
pub mod pump;
pub mod store;

pub use budget::{
    MAX_SAMPLED_FRAMES, SAMPLE_MEMORY_BUDGET_BITS, SHORT_STREAM_FRAMES, plan_sample_budget,
};
pub use decode::{DecodePoll, FrameDecoder, Packet, PacketSource};
pub use error::FramePickError;
pub use frame::{FramePlane, VideoFrame};
pub use histogram::Histogram;
pub use lock::CodecGate;
pub use orientation::{
    Orientation, orientation_from_angle, resolve_display_rotation, rotation_from_display_matrix,
};
pub use picker::{Selection, StreamInfo, select_best_frame};
pub use pixel::{MAX_CHROMA_LOG2, ChannelDescriptor, Endianness, PixelDescriptor, SampleLayout};
pub use pump::{FramePump, MAX_SUBMIT_REJECTIONS};
pub use store::{Sample, SampleStore};
