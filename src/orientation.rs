//! Display orientation resolution.
//!
//! Containers report display rotation as a 3x3 fixed-point matrix attached
//! to the stream. This module normalizes that side signal into one of four
//! canonical orientation codes (the EXIF values 1, 3, 6, and 8) so callers
//! can rotate the selected thumbnail without touching pixel data.
//!
//! All functions here are pure.

/// Canonical display orientation, using EXIF code values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Orientation {
    /// No rotation.
    Normal = 1,
    /// Rotated 180 degrees.
    Rotate180 = 3,
    /// Rotated 90 degrees clockwise.
    Rotate90 = 6,
    /// Rotated 270 degrees clockwise.
    Rotate270 = 8,
}

impl Orientation {
    /// The numeric EXIF orientation code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Bucket a rotation angle into a canonical orientation.
///
/// The angle is wrapped into `[0, 360)` with a small upward bias so values
/// sitting just below a 90-degree boundary round up, then snapped to the
/// nearest multiple of 90.
///
/// # Example
///
/// ```
/// use framepick::{Orientation, orientation_from_angle};
///
/// assert_eq!(orientation_from_angle(95.0), Orientation::Rotate90);
/// assert_eq!(orientation_from_angle(-45.0), Orientation::Normal);
/// assert_eq!(orientation_from_angle(181.0), Orientation::Rotate180);
/// ```
pub fn orientation_from_angle(angle: f64) -> Orientation {
    let theta = angle - 360.0 * (angle / 360.0 + 0.9 / 360.0).floor();
    let rotation = (90.0 * (theta / 90.0).round()) as i32 % 360;
    match rotation {
        90 => Orientation::Rotate90,
        180 => Orientation::Rotate180,
        270 => Orientation::Rotate270,
        _ => Orientation::Normal,
    }
}

/// Resolve the orientation from a stream's reported rotation.
///
/// A missing value means no rotation. A present value is negated first:
/// containers report the rotation applied to the *source*, while the
/// orientation code describes how to rotate the *output*.
pub fn resolve_display_rotation(reported: Option<f64>) -> Orientation {
    orientation_from_angle(reported.map_or(0.0, |rotation| -rotation))
}

/// Extract the rotation, in degrees, from a 3x3 display matrix.
///
/// The matrix uses 16.16 fixed-point values. Returns `None` when either
/// scale column is degenerate (all-zero matrix). The result is the value a
/// container reports, suitable for [`resolve_display_rotation`].
pub fn rotation_from_display_matrix(matrix: &[i32; 9]) -> Option<f64> {
    let to_float = |value: i32| f64::from(value) / 65536.0;
    let scale_x = to_float(matrix[0]).hypot(to_float(matrix[3]));
    let scale_y = to_float(matrix[1]).hypot(to_float(matrix[4]));
    if scale_x == 0.0 || scale_y == 0.0 {
        return None;
    }
    let rotation = (to_float(matrix[1]) / scale_y)
        .atan2(to_float(matrix[0]) / scale_x)
        .to_degrees();
    Some(-rotation)
}
