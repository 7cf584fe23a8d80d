//! Owned decoded-frame buffers.
//!
//! [`VideoFrame`] is the crate's frame representation: dimensions plus one
//! or more byte planes, each with its own stride. Decoder collaborators
//! produce these; the sample store owns them until selection hands the
//! winning frame to the caller.

/// A single plane of decoded pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePlane {
    /// Raw plane bytes, at least `stride * rows` long.
    pub data: Vec<u8>,
    /// Bytes per row, including any alignment padding.
    pub stride: usize,
}

impl FramePlane {
    /// The bytes of row `row`, or `None` if the plane is too short.
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        let start = row.checked_mul(self.stride)?;
        let end = start.checked_add(self.stride)?;
        self.data.get(start..end)
    }
}

/// One owned decoded video frame.
///
/// # Example
///
/// ```
/// use framepick::{FramePlane, VideoFrame};
///
/// let frame = VideoFrame {
///     width: 4,
///     height: 2,
///     planes: vec![FramePlane { data: vec![0u8; 8], stride: 4 }],
/// };
/// assert_eq!(frame.plane(0).unwrap().row(1).unwrap().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel planes in format order.
    pub planes: Vec<FramePlane>,
}

impl VideoFrame {
    /// The plane at `index`, if present.
    pub fn plane(&self, index: usize) -> Option<&FramePlane> {
        self.planes.get(index)
    }

    /// Build a single-plane frame filled with a constant byte value.
    ///
    /// Handy for constructing uniform test inputs and benchmarks for
    /// single-byte-per-sample formats.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        let stride = width as usize;
        Self {
            width,
            height,
            planes: vec![FramePlane {
                data: vec![value; stride * height as usize],
                stride,
            }],
        }
    }
}
