//! FFmpeg-backed collaborator implementations.
//!
//! This module supplies the demuxer and decoder collaborators the selection
//! engine needs, powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate. It is the
//! only part of the crate that touches a media library; everything else
//! operates on the crate's own frame and descriptor types.
//!
//! Opening a codec and probing stream information are serialized through
//! the process-wide [`CodecGate`], because the underlying libraries are not
//! reentrant for those two calls.
//!
//! # Example
//!
//! ```no_run
//! use framepick::ffmpeg::FfmpegInput;
//!
//! let input = FfmpegInput::open("input.mp4")?;
//! println!("orientation code: {}", input.orientation().code());
//! let selection = input.pick_best_frame()?;
//! println!("picked frame {} of {}", selection.index, selection.sampled);
//! # Ok::<(), framepick::FramePickError>(())
//! ```

use std::path::Path;

use ffmpeg_next::{
    Error as FfmpegError, Packet as FfmpegPacket, codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder, format::Pixel, format::context::Input, frame::Video as RawFrame,
    media::Type, packet::side_data::Type as SideDataType, util::error::EAGAIN,
};

use crate::decode::{DecodePoll, FrameDecoder, Packet, PacketSource};
use crate::error::FramePickError;
use crate::frame::{FramePlane, VideoFrame};
use crate::lock::CodecGate;
use crate::orientation::{Orientation, resolve_display_rotation, rotation_from_display_matrix};
use crate::picker::{Selection, StreamInfo, select_best_frame};
use crate::pixel::{Endianness, PixelDescriptor};
use crate::pump::FramePump;

/// Packet source over an FFmpeg demuxer context.
pub struct FfmpegPacketSource {
    input: Input,
}

impl PacketSource for FfmpegPacketSource {
    fn next_packet(&mut self) -> Result<Option<Packet>, FramePickError> {
        let mut packet = FfmpegPacket::empty();
        match packet.read(&mut self.input) {
            Ok(()) => Ok(Some(Packet {
                stream_index: packet.stream(),
                data: packet.data().map(<[u8]>::to_vec).unwrap_or_default(),
                pts: packet.pts(),
            })),
            Err(FfmpegError::Eof) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}

/// Frame decoder over an opened FFmpeg video decoder.
pub struct FfmpegFrameDecoder {
    decoder: VideoDecoder,
}

impl FrameDecoder for FfmpegFrameDecoder {
    fn submit(&mut self, packet: &Packet) -> Result<(), FramePickError> {
        let raw = FfmpegPacket::copy(&packet.data);
        self.decoder.send_packet(&raw).map_err(Into::into)
    }

    fn receive(&mut self) -> Result<DecodePoll, FramePickError> {
        let mut frame = RawFrame::empty();
        match self.decoder.receive_frame(&mut frame) {
            Ok(()) => Ok(DecodePoll::Frame(copy_frame(&frame))),
            Err(FfmpegError::Other { errno: EAGAIN }) => Ok(DecodePoll::Pending),
            Err(FfmpegError::Eof) => Ok(DecodePoll::Drained),
            Err(error) => Err(error.into()),
        }
    }
}

/// Copy a decoded FFmpeg frame into the crate's owned representation.
fn copy_frame(frame: &RawFrame) -> VideoFrame {
    let planes = (0..frame.planes())
        .map(|index| FramePlane {
            data: frame.data(index).to_vec(),
            stride: frame.stride(index),
        })
        .collect();
    VideoFrame {
        width: frame.width(),
        height: frame.height(),
        planes,
    }
}

/// Map a decode format tag to the descriptor the histogram extractor needs.
///
/// Channel order within the descriptor does not affect selection — the
/// sum-of-squared error is invariant under a consistent permutation of bin
/// ranges — so BGR variants share the RGB layout.
///
/// # Errors
///
/// Returns [`FramePickError::InvalidFormat`] for formats the extractor has
/// no layout description for.
pub fn descriptor_for(pixel: Pixel) -> Result<PixelDescriptor, FramePickError> {
    match pixel {
        Pixel::GRAY8 => Ok(PixelDescriptor::gray8()),
        Pixel::GRAY16LE => Ok(PixelDescriptor::gray16(Endianness::Little)),
        Pixel::GRAY16BE => Ok(PixelDescriptor::gray16(Endianness::Big)),
        Pixel::RGB24 | Pixel::BGR24 => Ok(PixelDescriptor::rgb24()),
        Pixel::RGBA | Pixel::BGRA | Pixel::ARGB | Pixel::ABGR => Ok(PixelDescriptor::rgba()),
        Pixel::YUV420P | Pixel::YUVJ420P => Ok(PixelDescriptor::yuv420p()),
        Pixel::YUV422P | Pixel::YUVJ422P => Ok(PixelDescriptor::yuv422p()),
        Pixel::YUV444P | Pixel::YUVJ444P => Ok(PixelDescriptor::yuv444p()),
        Pixel::NV12 => Ok(PixelDescriptor::nv12()),
        Pixel::YUV420P10LE => Ok(PixelDescriptor::yuv420p10le()),
        Pixel::MONOWHITE | Pixel::MONOBLACK => Ok(PixelDescriptor::mono1()),
        Pixel::RGB565LE => Ok(PixelDescriptor::rgb565(Endianness::Little)),
        Pixel::RGB565BE => Ok(PixelDescriptor::rgb565(Endianness::Big)),
        other => Err(FramePickError::InvalidFormat(format!(
            "no layout description for pixel format {other:?}"
        ))),
    }
}

/// An opened media input ready for best-frame selection.
///
/// Holds the demuxer, the opened video decoder, and the stream facts the
/// engine needs (frame-count hint, attached-picture disposition, pixel
/// layout, display orientation).
pub struct FfmpegInput {
    input: Input,
    decoder: VideoDecoder,
    stream_index: usize,
    stream: StreamInfo,
    descriptor: PixelDescriptor,
    orientation: Orientation,
}

impl FfmpegInput {
    /// Open a media file and prepare its best video stream for sampling.
    ///
    /// Stream probing and codec opening run under the process-wide
    /// [`CodecGate`]. The frame size is validated against the sampling
    /// memory ceiling before any decoding happens.
    ///
    /// # Errors
    ///
    /// Returns [`FramePickError::InvalidFormat`] if the file has no video
    /// stream or an undescribable pixel format,
    /// [`FramePickError::DecoderNotFound`] if no decoder exists for the
    /// codec, [`FramePickError::TooLarge`] for oversized frames, and
    /// [`FramePickError::LockFailure`] if the gate is poisoned.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramePickError> {
        let path = path.as_ref();
        let gate = CodecGate::global();

        ffmpeg_next::init()?;

        log::debug!("Opening media input: {}", path.display());
        // Opening the input probes stream info, one of the two
        // non-reentrant library calls.
        let input = gate.serialized(|| ffmpeg_next::format::input(&path))??;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| FramePickError::InvalidFormat("no video stream found".to_string()))?;
        let stream_index = stream.index();

        let frames = stream.frames();
        let frame_count_hint = if frames > 0 { Some(frames as u64) } else { None };
        let attached_picture = stream
            .disposition()
            .contains(ffmpeg_next::format::stream::Disposition::ATTACHED_PIC);

        let orientation = resolve_display_rotation(display_rotation(&stream));

        let parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(parameters)?;
        // Codec opening is the other non-reentrant call.
        let decoder = gate.serialized(|| decoder_context.decoder().video())??;

        if decoder.format() == Pixel::None {
            return Err(FramePickError::InvalidFormat(
                "stream has no decode pixel format".to_string(),
            ));
        }
        let descriptor = descriptor_for(decoder.format())?;

        let (width, height) = (decoder.width(), decoder.height());
        let bits_per_pixel = descriptor.bits_per_pixel();
        let frame_bits = u64::from(bits_per_pixel) * u64::from(width) * u64::from(height);
        if frame_bits > crate::budget::SAMPLE_MEMORY_BUDGET_BITS {
            return Err(FramePickError::TooLarge {
                width,
                height,
                bits_per_pixel,
            });
        }

        log::debug!(
            "Prepared stream {stream_index}: {width}x{height}, {:?}, hint={frame_count_hint:?}, attached={attached_picture}, orientation={}",
            decoder.format(),
            orientation.code(),
        );

        Ok(Self {
            input,
            decoder,
            stream_index,
            stream: StreamInfo {
                frame_count_hint,
                attached_picture,
            },
            descriptor,
            orientation,
        })
    }

    /// Stream facts consumed by the budget planner.
    pub fn stream_info(&self) -> StreamInfo {
        self.stream
    }

    /// The pixel layout of the decode format.
    pub fn descriptor(&self) -> &PixelDescriptor {
        &self.descriptor
    }

    /// Display orientation resolved from the stream's rotation side data.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Sample the stream and return its most representative frame.
    ///
    /// Consumes the input; see
    /// [`select_best_frame`](crate::select_best_frame) for the selection
    /// semantics.
    pub fn pick_best_frame(self) -> Result<Selection, FramePickError> {
        let stream = self.stream;
        let descriptor = self.descriptor;
        let mut pump = FramePump::new(
            FfmpegPacketSource { input: self.input },
            FfmpegFrameDecoder {
                decoder: self.decoder,
            },
            self.stream_index,
        );
        select_best_frame(&mut pump, &stream, &descriptor)
    }
}

/// Read the display-matrix rotation from a stream's side data, if present.
fn display_rotation(stream: &ffmpeg_next::format::stream::Stream<'_>) -> Option<f64> {
    for side_data in stream.side_data() {
        if side_data.kind() != SideDataType::DisplayMatrix {
            continue;
        }
        let bytes = side_data.data();
        if bytes.len() < 36 {
            continue;
        }
        let mut matrix = [0i32; 9];
        for (value, chunk) in matrix.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = i32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        return rotation_from_display_matrix(&matrix);
    }
    None
}
