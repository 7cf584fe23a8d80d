//! Per-frame intensity histograms.
//!
//! [`Histogram::of_frame`] turns one decoded frame plus its
//! [`PixelDescriptor`](crate::PixelDescriptor) into a flat histogram: for
//! every channel, a count of how many samples take each possible intensity
//! value. Channel `c` owns the bin sub-range starting at the sum of the
//! previous channels' value ranges.
//!
//! Extraction is a pure function over immutable inputs — no shared state,
//! identical results regardless of traversal order — which also makes it
//! safe to run per-frame in parallel if a caller chooses to.

use crate::error::FramePickError;
use crate::frame::VideoFrame;
use crate::pixel::{Endianness, PixelDescriptor, SampleLayout};

/// A per-channel intensity histogram for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: Vec<u32>,
}

impl Histogram {
    /// Wrap a raw bin vector.
    ///
    /// Intended for callers that compute histograms out of band (and for
    /// tests); [`of_frame`](Histogram::of_frame) is the normal entry point.
    pub fn from_bins(bins: Vec<u32>) -> Self {
        Self { bins }
    }

    /// The raw bin counts.
    pub fn bins(&self) -> &[u32] {
        &self.bins
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// `true` if the histogram has no bins.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Compute the histogram of one decoded frame.
    ///
    /// Walks every channel of the frame according to the descriptor's
    /// per-channel [`SampleLayout`](crate::SampleLayout), honoring chroma
    /// subsampling for channels 1 and 2.
    ///
    /// # Errors
    ///
    /// Returns [`FramePickError::InvalidFormat`] if a channel references a
    /// missing plane or the plane data is shorter than the descriptor
    /// implies, and [`FramePickError::OutOfMemory`] if the bin buffer cannot
    /// be allocated.
    pub fn of_frame(
        frame: &VideoFrame,
        descriptor: &PixelDescriptor,
    ) -> Result<Self, FramePickError> {
        let hist_size = descriptor.histogram_size();
        let mut bins = Vec::new();
        bins.try_reserve_exact(hist_size)
            .map_err(|_| FramePickError::OutOfMemory)?;
        bins.resize(hist_size, 0u32);

        let mut base = 0usize;
        for (index, channel) in descriptor.channels().iter().enumerate() {
            let (width, height) = channel_extent(frame, descriptor, index);
            let plane = frame.plane(channel.plane).ok_or_else(|| {
                FramePickError::InvalidFormat(format!(
                    "channel {index} references missing plane {}",
                    channel.plane
                ))
            })?;

            let range = 1usize << channel.depth;
            let channel_bins = &mut bins[base..base + range];

            for row_index in 0..height as usize {
                let row = plane.row(row_index).ok_or_else(|| {
                    FramePickError::InvalidFormat(format!(
                        "plane {} ends before row {row_index}",
                        channel.plane
                    ))
                })?;
                match channel.layout {
                    SampleLayout::BitPacked {
                        bit_offset,
                        bit_step,
                    } => accumulate_bit_packed(
                        row,
                        width,
                        channel.depth,
                        bit_offset,
                        bit_step,
                        channel_bins,
                    )?,
                    SampleLayout::Byte {
                        byte_offset,
                        shift,
                        byte_step,
                        endianness,
                    } => accumulate_byte(
                        row,
                        width,
                        channel.depth,
                        byte_offset,
                        shift,
                        byte_step,
                        endianness,
                        channel_bins,
                    )?,
                    SampleLayout::Word {
                        byte_offset,
                        shift,
                        byte_step,
                        endianness,
                    } => accumulate_word(
                        row,
                        width,
                        channel.depth,
                        byte_offset,
                        shift,
                        byte_step,
                        endianness,
                        channel_bins,
                    )?,
                }
            }

            base += range;
        }

        Ok(Self { bins })
    }
}

/// Effective sample extent for one channel of a frame.
///
/// Chroma channels (indices 1 and 2) of a subsampled format cover a reduced
/// region; everything else covers the full frame. The reduced dimension
/// rounds up, matching the decoder's plane sizing.
fn channel_extent(frame: &VideoFrame, descriptor: &PixelDescriptor, index: usize) -> (u32, u32) {
    let is_chroma = index == 1 || index == 2;
    let width = if descriptor.chroma_log2_w() != 0 && is_chroma {
        ceil_shift_right(frame.width, descriptor.chroma_log2_w())
    } else {
        frame.width
    };
    let height = if descriptor.chroma_log2_h() != 0 && is_chroma {
        ceil_shift_right(frame.height, descriptor.chroma_log2_h())
    } else {
        frame.height
    };
    (width, height)
}

fn ceil_shift_right(value: u32, shift: u32) -> u32 {
    (value + (1 << shift) - 1) >> shift
}

fn short_row_error(needed: usize, have: usize) -> FramePickError {
    FramePickError::InvalidFormat(format!(
        "row too short for channel layout: need {needed} bytes, have {have}"
    ))
}

/// Walk a row of sub-byte samples packed across byte boundaries.
///
/// Starts at byte `bit_offset / 8` with shift `8 - depth - (bit_offset % 8)`;
/// after each sample the shift drops by `bit_step`, and the byte cursor
/// advances whenever the shift underflows the current byte (the shift is then
/// taken modulo 8).
fn accumulate_bit_packed(
    row: &[u8],
    width: u32,
    depth: u32,
    bit_offset: u32,
    bit_step: u32,
    bins: &mut [u32],
) -> Result<(), FramePickError> {
    if width == 0 {
        return Ok(());
    }
    let last_bit = bit_offset as u64 + (width as u64 - 1) * bit_step as u64 + depth as u64;
    let needed = last_bit.div_ceil(8) as usize;
    if row.len() < needed {
        return Err(short_row_error(needed, row.len()));
    }

    let mask = (1u32 << depth) - 1;
    let mut byte = (bit_offset >> 3) as usize;
    let mut shift = 8i32 - depth as i32 - (bit_offset & 7) as i32;
    for _ in 0..width {
        let value = (u32::from(row[byte]) >> shift) & mask;
        bins[value as usize] += 1;
        shift -= bit_step as i32;
        // Arithmetic shift: a negative shift pulls the cursor forward.
        byte = (byte as isize - (shift >> 3) as isize) as usize;
        shift &= 7;
    }
    Ok(())
}

/// Walk a row of byte-aligned samples that fit in a single byte.
///
/// Big-endian formats store the meaningful byte one position further into
/// the backing word.
#[allow(clippy::too_many_arguments)]
fn accumulate_byte(
    row: &[u8],
    width: u32,
    depth: u32,
    byte_offset: usize,
    shift: u32,
    byte_step: usize,
    endianness: Endianness,
    bins: &mut [u32],
) -> Result<(), FramePickError> {
    if width == 0 {
        return Ok(());
    }
    let base = byte_offset + usize::from(endianness == Endianness::Big);
    let needed = base + (width as usize - 1) * byte_step + 1;
    if row.len() < needed {
        return Err(short_row_error(needed, row.len()));
    }

    let mask = (1u32 << depth) - 1;
    let mut position = base;
    for _ in 0..width {
        let value = (u32::from(row[position]) >> shift) & mask;
        bins[value as usize] += 1;
        position += byte_step;
    }
    Ok(())
}

/// Walk a row of 16-bit word samples, honoring the declared endianness.
#[allow(clippy::too_many_arguments)]
fn accumulate_word(
    row: &[u8],
    width: u32,
    depth: u32,
    byte_offset: usize,
    shift: u32,
    byte_step: usize,
    endianness: Endianness,
    bins: &mut [u32],
) -> Result<(), FramePickError> {
    if width == 0 {
        return Ok(());
    }
    let needed = byte_offset + (width as usize - 1) * byte_step + 2;
    if row.len() < needed {
        return Err(short_row_error(needed, row.len()));
    }

    let mask = (1u32 << depth) - 1;
    let mut position = byte_offset;
    for _ in 0..width {
        let word = match endianness {
            Endianness::Big => u16::from_be_bytes([row[position], row[position + 1]]),
            Endianness::Little => u16::from_le_bytes([row[position], row[position + 1]]),
        };
        let value = (u32::from(word) >> shift) & mask;
        bins[value as usize] += 1;
        position += byte_step;
    }
    Ok(())
}
