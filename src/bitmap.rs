//! BMP (Windows Bitmap) decoder
//!
//! Supports uncompressed 24-bit and 32-bit files with a BITMAPINFOHEADER
//! (`BI_RGB`, or `BI_BITFIELDS` for 32-bit).
//! Pixels are always decoded into a top-down RGB24 [`Frame`].

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Frame, PixelFormat, VideoFormat};

/// "BM" magic plus the 12 byte file header
const FILE_HEADER_SIZE: usize = 14;
/// BITMAPINFOHEADER
const INFO_HEADER_SIZE: usize = 40;

/// Uncompressed pixels
const BI_RGB: u32 = 0;
/// Uncompressed pixels with channel masks, only meaningful for 16/32-bit
const BI_BITFIELDS: u32 = 3;

fn read_u16(data: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([data[off], data[off + 1]])
}

fn read_u32(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

fn read_i32(data: &[u8], off: usize) -> i32 {
    i32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

/// The header fields the decoder relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    /// Offset of the pixel data from the start of the file
    pub data_offset: u32,
    pub width: i32,
    /// Positive for bottom-up storage, negative for top-down
    pub height: i32,
    pub bit_count: u16,
    pub compression: u32,
}

impl BmpHeader {
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    /// Size of the decoded RGB24 frame, empty for degenerate dimensions
    pub fn video_format(&self) -> VideoFormat {
        if self.width <= 0 || self.height == 0 {
            return VideoFormat::default();
        }

        VideoFormat::new(
            PixelFormat::Rgb24,
            self.width.unsigned_abs(),
            self.height.unsigned_abs(),
        )
    }
}

/// Read the file and image headers without touching pixel data
pub fn parse_header(data: &[u8]) -> Result<BmpHeader> {
    if data.len() < 2 || &data[..2] != b"BM" {
        return Err(Error::BadSignature);
    }

    let needed = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    if data.len() < needed {
        return Err(Error::Truncated {
            needed,
            actual: data.len(),
        });
    }

    Ok(BmpHeader {
        data_offset: read_u32(data, 10),
        width: read_i32(data, 18),
        height: read_i32(data, 22),
        bit_count: read_u16(data, 28),
        compression: read_u32(data, 30),
    })
}

/// Decode a complete bitmap file held in memory
pub fn decode(data: &[u8]) -> Result<Frame> {
    let header = parse_header(data)?;
    let format = header.video_format();

    if format.size() < 1 {
        return Err(Error::EmptyImage {
            width: i64::from(header.width),
            height: i64::from(header.height),
        });
    }

    let bytes_per_pixel = match header.bit_count {
        24 => 3,
        32 => 4,
        depth => return Err(Error::UnsupportedBitDepth(depth)),
    };

    match (header.compression, header.bit_count) {
        (BI_RGB, _) | (BI_BITFIELDS, 32) => {}
        (compression, _) => return Err(Error::UnsupportedCompression(compression)),
    }

    let width = format.width as usize;
    let height = format.height as usize;
    // Rows are padded to 32 bits
    let stride = (width * bytes_per_pixel + 3) & !3;
    let offset = header.data_offset as usize;
    let needed = offset + stride * (height - 1) + width * bytes_per_pixel;

    if data.len() < needed {
        return Err(Error::Truncated {
            needed,
            actual: data.len(),
        });
    }

    let mut frame = Frame::new(format);

    for y in 0..height {
        let src_start = offset + y * stride;
        let src_line = &data[src_start..src_start + width * bytes_per_pixel];
        let dst_y = if header.is_top_down() {
            y
        } else {
            height - y - 1
        };
        let dst_line = frame.line_mut(0, dst_y);

        for (dst, src) in dst_line
            .chunks_exact_mut(3)
            .zip(src_line.chunks_exact(bytes_per_pixel))
        {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
        }
    }

    tracing::debug!(
        "Decoded {}-bit bitmap into {}",
        header.bit_count,
        frame.format()
    );

    Ok(frame)
}

impl Frame {
    /// Decode a bitmap file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Frame> {
        let data = std::fs::read(path)?;
        decode(&data)
    }

    /// Replace this frame with the bitmap at `path`.
    ///
    /// Returns `false` and leaves the frame empty when the file can't be read
    /// or isn't a supported bitmap.
    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();

        match Frame::from_file(path) {
            Ok(frame) => {
                *self = frame;
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load bitmap {}: {}", path.display(), e);
                self.clear();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Build a BMP file from rows given in storage order
    fn bitmap(width: i32, height: i32, bit_count: u16, rows: &[Vec<u8>]) -> Vec<u8> {
        let offset = (FILE_HEADER_SIZE + INFO_HEADER_SIZE) as u32;
        let pixels: Vec<u8> = rows
            .iter()
            .flat_map(|row| {
                let mut padded = row.clone();
                padded.resize((row.len() + 3) & !3, 0);
                padded
            })
            .collect();

        let mut data = Vec::new();
        data.extend_from_slice(b"BM");
        data.extend_from_slice(&(offset + pixels.len() as u32).to_le_bytes());
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&offset.to_le_bytes());
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&bit_count.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&(pixels.len() as u32).to_le_bytes());
        data.extend_from_slice(&[0; 16]);
        data.extend_from_slice(&pixels);
        data
    }

    #[test]
    fn test_decode_bottom_up_24() {
        let data = bitmap(1, 2, 24, &[vec![10, 20, 30], vec![40, 50, 60]]);
        let frame = decode(&data).unwrap();

        assert_eq!(frame.pixel_format(), PixelFormat::Rgb24);
        assert_eq!((frame.width(), frame.height()), (1, 2));
        assert_eq!(frame.line(0, 0), &[60, 50, 40]);
        assert_eq!(frame.line(0, 1), &[30, 20, 10]);
    }

    #[test]
    fn test_decode_padded_rows() {
        // 3 pixels * 3 bytes = 9, padded to 12
        let data = bitmap(
            3,
            1,
            24,
            &[vec![1, 2, 3, 4, 5, 6, 7, 8, 9]],
        );
        let frame = decode(&data).unwrap();
        assert_eq!(frame.data(), &[3, 2, 1, 6, 5, 4, 9, 8, 7]);
    }

    #[test]
    fn test_decode_32_bit_top_down() {
        let data = bitmap(
            2,
            -2,
            32,
            &[
                vec![1, 2, 3, 255, 4, 5, 6, 255],
                vec![7, 8, 9, 255, 10, 11, 12, 255],
            ],
        );
        let frame = decode(&data).unwrap();
        assert_eq!(frame.line(0, 0), &[3, 2, 1, 6, 5, 4]);
        assert_eq!(frame.line(0, 1), &[9, 8, 7, 12, 11, 10]);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode(b"PN"), Err(Error::BadSignature)));
        assert!(matches!(decode(b"BM1234"), Err(Error::Truncated { .. })));

        let paletted = bitmap(1, 1, 8, &[vec![0]]);
        assert!(matches!(
            decode(&paletted),
            Err(Error::UnsupportedBitDepth(8))
        ));

        let empty = bitmap(0, 4, 24, &[]);
        assert!(matches!(decode(&empty), Err(Error::EmptyImage { .. })));

        let mut short = bitmap(2, 2, 24, &[vec![0; 6], vec![0; 6]]);
        short.truncate(short.len() - 4);
        assert!(matches!(decode(&short), Err(Error::Truncated { .. })));
    }

    fn with_compression(mut data: Vec<u8>, compression: u32) -> Vec<u8> {
        data[30..34].copy_from_slice(&compression.to_le_bytes());
        data
    }

    #[test]
    fn test_decode_rejects_compressed() {
        let rle = with_compression(bitmap(1, 1, 24, &[vec![1, 2, 3]]), 1);
        assert_eq!(parse_header(&rle).unwrap().compression, 1);
        assert!(matches!(
            decode(&rle),
            Err(Error::UnsupportedCompression(1))
        ));

        let bitfields_24 = with_compression(bitmap(1, 1, 24, &[vec![1, 2, 3]]), BI_BITFIELDS);
        assert!(matches!(
            decode(&bitfields_24),
            Err(Error::UnsupportedCompression(BI_BITFIELDS))
        ));

        let bitfields_32 =
            with_compression(bitmap(1, 1, 32, &[vec![1, 2, 3, 255]]), BI_BITFIELDS);
        assert_eq!(decode(&bitfields_32).unwrap().data(), &[3, 2, 1]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bitmap(1, 2, 24, &[vec![10, 20, 30], vec![40, 50, 60]]))
            .unwrap();

        let mut frame = Frame::default();
        assert!(frame.load(file.path()));
        assert_eq!(frame.data(), &[60, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn test_load_failure_clears_frame() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bitmap(1, 1, 16, &[vec![0, 0]])).unwrap();

        let mut frame = Frame::new(VideoFormat::new(PixelFormat::Rgb24, 2, 2));
        assert!(!frame.load(file.path()));
        assert!(frame.is_empty());
        assert!(frame.format().is_empty());

        let dir = tempfile::tempdir().unwrap();
        assert!(!frame.load(dir.path().join("missing.bmp")));
        assert!(matches!(
            Frame::from_file(dir.path().join("missing.bmp")),
            Err(Error::Io(_))
        ));
    }
}
