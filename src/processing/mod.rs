//! Frame processing module
//!
//! Provides the pixel level operations on [`Frame`](crate::types::Frame):
//! - Scaling (nearest neighbour and bilinear, with aspect ratio modes)
//! - Pixel format conversion from 24-bit RGB/BGR
//! - Mirroring, channel swap and color adjustment

mod adjust;
mod convert;
mod scale;
pub mod tables;

pub use convert::{can_convert, conversion_targets, convert_frame, ConvertFn};
pub use scale::{scale_frame, Scaler};

use crate::types::PixelFormat;

/// Byte offsets of the red, green and blue samples in a 24-bit pixel
pub(crate) fn rgb_index(format: PixelFormat) -> (usize, usize, usize) {
    match format {
        PixelFormat::Bgr24 => (2, 1, 0),
        _ => (0, 1, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_index() {
        assert_eq!(rgb_index(PixelFormat::Rgb24), (0, 1, 2));
        assert_eq!(rgb_index(PixelFormat::Bgr24), (2, 1, 0));
    }
}
