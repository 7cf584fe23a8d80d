//! Pixel format descriptions.
//!
//! [`PixelDescriptor`] is an immutable description of a decode pixel format:
//! the ordered channel list, per-channel bit depth and sample layout, and the
//! chroma subsampling factors. It is everything the histogram extractor needs
//! to walk a decoded frame without knowing which codec produced it.
//!
//! Sample addressing is expressed as a tagged [`SampleLayout`] per channel —
//! bit-packed, single-byte, or 16-bit word — so each traversal strategy is
//! isolated and testable on its own.

use crate::error::FramePickError;

/// Largest accepted log2 chroma subsampling factor. Real decode formats
/// stay at 2 or below (4:1:0 is 2x2).
pub const MAX_CHROMA_LOG2: u32 = 4;

/// Byte order of multi-byte (or wider-than-sample) backing words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

/// How one channel's samples are laid out within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// Sub-byte samples packed contiguously across the row (1/2/4-bit
    /// formats). Offsets and steps are in bits.
    BitPacked {
        /// Bit offset of the first sample from the start of the row.
        bit_offset: u32,
        /// Bits between consecutive samples.
        bit_step: u32,
    },
    /// Samples whose meaningful bits fit within a single byte
    /// (`shift + depth <= 8`).
    Byte {
        /// Byte offset of the first sample from the start of the row.
        byte_offset: usize,
        /// Number of least-significant bits to shift away.
        shift: u32,
        /// Bytes between consecutive samples.
        byte_step: usize,
        /// Byte order of the backing word. Big-endian formats store the
        /// meaningful byte one position further into the word.
        endianness: Endianness,
    },
    /// Samples read as 16-bit words.
    Word {
        /// Byte offset of the first sample from the start of the row.
        byte_offset: usize,
        /// Number of least-significant bits to shift away.
        shift: u32,
        /// Bytes between consecutive samples.
        byte_step: usize,
        /// Byte order of the 16-bit read.
        endianness: Endianness,
    },
}

/// Description of a single color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDescriptor {
    /// Index of the frame plane holding this channel's samples.
    pub plane: usize,
    /// Meaningful bits per sample, in `[1, 16]`.
    pub depth: u32,
    /// Sample addressing within a row.
    pub layout: SampleLayout,
}

/// Immutable description of a decode pixel format.
///
/// Channels appear in format order; for subsampled YUV formats channels 1
/// and 2 are the chroma channels and are stored at reduced resolution.
///
/// # Example
///
/// ```
/// use framepick::PixelDescriptor;
///
/// let desc = PixelDescriptor::yuv420p();
/// assert_eq!(desc.channels().len(), 3);
/// assert_eq!(desc.histogram_size(), 3 * 256);
/// assert_eq!(desc.bits_per_pixel(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelDescriptor {
    channels: Vec<ChannelDescriptor>,
    chroma_log2_w: u32,
    chroma_log2_h: u32,
}

impl PixelDescriptor {
    /// Create a descriptor from a channel list and chroma subsampling
    /// factors (log2 of the horizontal/vertical reduction).
    ///
    /// # Errors
    ///
    /// Returns [`FramePickError::InvalidFormat`] if the channel list is
    /// empty, any depth falls outside `[1, 16]`, a channel's samples do
    /// not fit their declared layout (a bit-packed sample crossing a byte
    /// boundary, or a shift pushing the sample past its backing word), or
    /// a chroma subsampling factor exceeds [`MAX_CHROMA_LOG2`].
    pub fn new(
        channels: Vec<ChannelDescriptor>,
        chroma_log2_w: u32,
        chroma_log2_h: u32,
    ) -> Result<Self, FramePickError> {
        if channels.is_empty() {
            return Err(FramePickError::InvalidFormat(
                "pixel format has no channels".to_string(),
            ));
        }
        if chroma_log2_w > MAX_CHROMA_LOG2 || chroma_log2_h > MAX_CHROMA_LOG2 {
            return Err(FramePickError::InvalidFormat(format!(
                "chroma subsampling factors log2 {chroma_log2_w}x{chroma_log2_h} exceed the supported maximum of {MAX_CHROMA_LOG2}"
            )));
        }
        for (index, channel) in channels.iter().enumerate() {
            if channel.depth < 1 || channel.depth > 16 {
                return Err(FramePickError::InvalidFormat(format!(
                    "channel depth {} is outside the supported range [1, 16]",
                    channel.depth
                )));
            }
            match channel.layout {
                SampleLayout::BitPacked { bit_offset, .. } => {
                    if channel.depth + (bit_offset & 7) > 8 {
                        return Err(FramePickError::InvalidFormat(format!(
                            "channel {index}: bit-packed sample of depth {} at bit offset {bit_offset} crosses a byte boundary",
                            channel.depth
                        )));
                    }
                }
                SampleLayout::Byte { shift, .. } => {
                    if shift + channel.depth > 8 {
                        return Err(FramePickError::InvalidFormat(format!(
                            "channel {index}: depth {} at shift {shift} does not fit in one byte",
                            channel.depth
                        )));
                    }
                }
                SampleLayout::Word { shift, .. } => {
                    if shift + channel.depth > 16 {
                        return Err(FramePickError::InvalidFormat(format!(
                            "channel {index}: depth {} at shift {shift} does not fit in a 16-bit word",
                            channel.depth
                        )));
                    }
                }
            }
        }
        Ok(Self {
            channels,
            chroma_log2_w,
            chroma_log2_h,
        })
    }

    /// The ordered channel descriptors.
    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    /// Log2 of the horizontal chroma subsampling factor.
    pub fn chroma_log2_w(&self) -> u32 {
        self.chroma_log2_w
    }

    /// Log2 of the vertical chroma subsampling factor.
    pub fn chroma_log2_h(&self) -> u32 {
        self.chroma_log2_h
    }

    /// Total histogram length: the sum of `2^depth` over all channels.
    pub fn histogram_size(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| 1usize << channel.depth)
            .sum()
    }

    /// First histogram bin belonging to `channel_index`.
    pub fn bin_base(&self, channel_index: usize) -> usize {
        self.channels[..channel_index]
            .iter()
            .map(|channel| 1usize << channel.depth)
            .sum()
    }

    /// Average bits per pixel of the format.
    ///
    /// Chroma channels contribute at their subsampled resolution: each
    /// non-chroma channel's depth is scaled by the number of pixels sharing
    /// one chroma sample before the total is normalised back down.
    pub fn bits_per_pixel(&self) -> u32 {
        let log2_pixels = self.chroma_log2_w + self.chroma_log2_h;
        let mut bits = 0u32;
        for (index, channel) in self.channels.iter().enumerate() {
            let scale = if index == 1 || index == 2 {
                0
            } else {
                log2_pixels
            };
            bits += channel.depth << scale;
        }
        bits >> log2_pixels
    }
}

/// Constructors for the common decode formats.
impl PixelDescriptor {
    fn planar_8bit(plane_count: usize, chroma_log2_w: u32, chroma_log2_h: u32) -> Self {
        let channels = (0..plane_count)
            .map(|plane| ChannelDescriptor {
                plane,
                depth: 8,
                layout: SampleLayout::Byte {
                    byte_offset: 0,
                    shift: 0,
                    byte_step: 1,
                    endianness: Endianness::Little,
                },
            })
            .collect();
        Self {
            channels,
            chroma_log2_w,
            chroma_log2_h,
        }
    }

    /// 8-bit grayscale, one plane.
    pub fn gray8() -> Self {
        Self::planar_8bit(1, 0, 0)
    }

    /// 16-bit grayscale, one plane.
    pub fn gray16(endianness: Endianness) -> Self {
        Self {
            channels: vec![ChannelDescriptor {
                plane: 0,
                depth: 16,
                layout: SampleLayout::Word {
                    byte_offset: 0,
                    shift: 0,
                    byte_step: 2,
                    endianness,
                },
            }],
            chroma_log2_w: 0,
            chroma_log2_h: 0,
        }
    }

    /// Packed 8-bit RGB, one plane, 3 bytes per pixel.
    pub fn rgb24() -> Self {
        Self {
            channels: (0..3)
                .map(|index| ChannelDescriptor {
                    plane: 0,
                    depth: 8,
                    layout: SampleLayout::Byte {
                        byte_offset: index,
                        shift: 0,
                        byte_step: 3,
                        endianness: Endianness::Little,
                    },
                })
                .collect(),
            chroma_log2_w: 0,
            chroma_log2_h: 0,
        }
    }

    /// Packed 8-bit RGBA, one plane, 4 bytes per pixel.
    pub fn rgba() -> Self {
        Self {
            channels: (0..4)
                .map(|index| ChannelDescriptor {
                    plane: 0,
                    depth: 8,
                    layout: SampleLayout::Byte {
                        byte_offset: index,
                        shift: 0,
                        byte_step: 4,
                        endianness: Endianness::Little,
                    },
                })
                .collect(),
            chroma_log2_w: 0,
            chroma_log2_h: 0,
        }
    }

    /// Planar 8-bit YUV with 2x2 chroma subsampling.
    pub fn yuv420p() -> Self {
        Self::planar_8bit(3, 1, 1)
    }

    /// Planar 8-bit YUV with 2x1 chroma subsampling.
    pub fn yuv422p() -> Self {
        Self::planar_8bit(3, 1, 0)
    }

    /// Planar 8-bit YUV without chroma subsampling.
    pub fn yuv444p() -> Self {
        Self::planar_8bit(3, 0, 0)
    }

    /// Semi-planar 8-bit YUV: full-resolution luma plane plus one plane of
    /// interleaved 2x2-subsampled chroma pairs.
    pub fn nv12() -> Self {
        Self {
            channels: vec![
                ChannelDescriptor {
                    plane: 0,
                    depth: 8,
                    layout: SampleLayout::Byte {
                        byte_offset: 0,
                        shift: 0,
                        byte_step: 1,
                        endianness: Endianness::Little,
                    },
                },
                ChannelDescriptor {
                    plane: 1,
                    depth: 8,
                    layout: SampleLayout::Byte {
                        byte_offset: 0,
                        shift: 0,
                        byte_step: 2,
                        endianness: Endianness::Little,
                    },
                },
                ChannelDescriptor {
                    plane: 1,
                    depth: 8,
                    layout: SampleLayout::Byte {
                        byte_offset: 1,
                        shift: 0,
                        byte_step: 2,
                        endianness: Endianness::Little,
                    },
                },
            ],
            chroma_log2_w: 1,
            chroma_log2_h: 1,
        }
    }

    /// Planar 10-bit YUV in 16-bit little-endian words, 2x2 subsampled.
    pub fn yuv420p10le() -> Self {
        Self {
            channels: (0..3)
                .map(|plane| ChannelDescriptor {
                    plane,
                    depth: 10,
                    layout: SampleLayout::Word {
                        byte_offset: 0,
                        shift: 0,
                        byte_step: 2,
                        endianness: Endianness::Little,
                    },
                })
                .collect(),
            chroma_log2_w: 1,
            chroma_log2_h: 1,
        }
    }

    /// 1-bit monochrome, eight pixels per byte, most significant bit first.
    ///
    /// Both `monowhite` and `monoblack` share this layout; they differ only
    /// in which bit value means white, which the histogram does not care
    /// about.
    pub fn mono1() -> Self {
        Self {
            channels: vec![ChannelDescriptor {
                plane: 0,
                depth: 1,
                layout: SampleLayout::BitPacked {
                    bit_offset: 0,
                    bit_step: 1,
                },
            }],
            chroma_log2_w: 0,
            chroma_log2_h: 0,
        }
    }

    /// Packed 16-bit RGB 5:6:5.
    pub fn rgb565(endianness: Endianness) -> Self {
        let channel = |depth: u32, shift: u32| ChannelDescriptor {
            plane: 0,
            depth,
            layout: SampleLayout::Word {
                byte_offset: 0,
                shift,
                byte_step: 2,
                endianness,
            },
        };
        Self {
            channels: vec![channel(5, 11), channel(6, 5), channel(5, 0)],
            chroma_log2_w: 0,
            chroma_log2_h: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_size_sums_channel_ranges() {
        assert_eq!(PixelDescriptor::gray8().histogram_size(), 256);
        assert_eq!(PixelDescriptor::rgb24().histogram_size(), 768);
        assert_eq!(PixelDescriptor::yuv420p10le().histogram_size(), 3 * 1024);
        assert_eq!(PixelDescriptor::mono1().histogram_size(), 2);
        assert_eq!(PixelDescriptor::rgb565(Endianness::Little).histogram_size(), 32 + 64 + 32);
    }

    #[test]
    fn bin_base_is_prefix_sum_of_channel_ranges() {
        let desc = PixelDescriptor::rgb565(Endianness::Little);
        assert_eq!(desc.bin_base(0), 0);
        assert_eq!(desc.bin_base(1), 32);
        assert_eq!(desc.bin_base(2), 96);
    }

    #[test]
    fn bits_per_pixel_accounts_for_chroma_subsampling() {
        assert_eq!(PixelDescriptor::gray8().bits_per_pixel(), 8);
        assert_eq!(PixelDescriptor::rgb24().bits_per_pixel(), 24);
        assert_eq!(PixelDescriptor::rgba().bits_per_pixel(), 32);
        assert_eq!(PixelDescriptor::yuv420p().bits_per_pixel(), 12);
        assert_eq!(PixelDescriptor::yuv422p().bits_per_pixel(), 16);
        assert_eq!(PixelDescriptor::yuv444p().bits_per_pixel(), 24);
        assert_eq!(PixelDescriptor::nv12().bits_per_pixel(), 12);
        assert_eq!(PixelDescriptor::yuv420p10le().bits_per_pixel(), 15);
        assert_eq!(PixelDescriptor::mono1().bits_per_pixel(), 1);
        assert_eq!(PixelDescriptor::rgb565(Endianness::Big).bits_per_pixel(), 16);
    }

    #[test]
    fn rejects_out_of_range_depth() {
        let channel = ChannelDescriptor {
            plane: 0,
            depth: 17,
            layout: SampleLayout::Word {
                byte_offset: 0,
                shift: 0,
                byte_step: 2,
                endianness: Endianness::Little,
            },
        };
        assert!(PixelDescriptor::new(vec![channel], 0, 0).is_err());
    }

    #[test]
    fn rejects_empty_channel_list() {
        assert!(PixelDescriptor::new(Vec::new(), 0, 0).is_err());
    }

    #[test]
    fn rejects_bit_packed_sample_crossing_a_byte_boundary() {
        // An 8-bit sample starting 4 bits into a byte would need a
        // negative initial shift in the row walker.
        let channel = ChannelDescriptor {
            plane: 0,
            depth: 8,
            layout: SampleLayout::BitPacked {
                bit_offset: 4,
                bit_step: 8,
            },
        };
        assert!(matches!(
            PixelDescriptor::new(vec![channel], 0, 0),
            Err(FramePickError::InvalidFormat(_))
        ));

        // The same depth byte-aligned is fine.
        let aligned = ChannelDescriptor {
            layout: SampleLayout::BitPacked {
                bit_offset: 8,
                bit_step: 8,
            },
            ..channel
        };
        assert!(PixelDescriptor::new(vec![aligned], 0, 0).is_ok());
    }

    #[test]
    fn rejects_samples_wider_than_their_backing_word() {
        let byte = ChannelDescriptor {
            plane: 0,
            depth: 6,
            layout: SampleLayout::Byte {
                byte_offset: 0,
                shift: 4,
                byte_step: 1,
                endianness: Endianness::Little,
            },
        };
        assert!(PixelDescriptor::new(vec![byte], 0, 0).is_err());

        let word = ChannelDescriptor {
            plane: 0,
            depth: 8,
            layout: SampleLayout::Word {
                byte_offset: 0,
                shift: 12,
                byte_step: 2,
                endianness: Endianness::Little,
            },
        };
        assert!(PixelDescriptor::new(vec![word], 0, 0).is_err());
    }

    #[test]
    fn rejects_oversized_chroma_subsampling() {
        let channel = ChannelDescriptor {
            plane: 0,
            depth: 8,
            layout: SampleLayout::Byte {
                byte_offset: 0,
                shift: 0,
                byte_step: 1,
                endianness: Endianness::Little,
            },
        };
        assert!(PixelDescriptor::new(vec![channel], MAX_CHROMA_LOG2 + 1, 0).is_err());
        assert!(PixelDescriptor::new(vec![channel], 0, 31).is_err());
        assert!(PixelDescriptor::new(vec![channel], 2, 2).is_ok());
    }
}
