//! Pixel format conversion
//!
//! Conversions are looked up in a fixed table keyed by
//! `(source, destination)`. Only the two 24-bit formats are sources; every
//! other format is a destination only.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::rgb_index;
use crate::types::{Frame, PixelFormat};

/// A conversion routine. Output has the same dimensions as the input.
pub type ConvertFn = fn(&Frame) -> Frame;

static CONVERTERS: OnceLock<HashMap<(PixelFormat, PixelFormat), ConvertFn>> = OnceLock::new();

fn converters() -> &'static HashMap<(PixelFormat, PixelFormat), ConvertFn> {
    CONVERTERS.get_or_init(|| {
        use PixelFormat::*;

        let table: [(PixelFormat, PixelFormat, ConvertFn); 22] = [
            (Bgr24, Rgb32, to_rgb32),
            (Bgr24, Rgb24, to_rgb24),
            (Bgr24, Rgb16, to_rgb16),
            (Bgr24, Rgb15, to_rgb15),
            (Bgr24, Bgr32, to_bgr32),
            (Bgr24, Bgr16, to_bgr16),
            (Bgr24, Bgr15, to_bgr15),
            (Bgr24, Uyvy, to_uyvy),
            (Bgr24, Yuy2, to_yuy2),
            (Bgr24, Nv12, to_nv12),
            (Bgr24, Nv21, to_nv21),
            (Rgb24, Rgb32, to_rgb32),
            (Rgb24, Rgb16, to_rgb16),
            (Rgb24, Rgb15, to_rgb15),
            (Rgb24, Bgr32, to_bgr32),
            (Rgb24, Bgr24, to_bgr24),
            (Rgb24, Bgr16, to_bgr16),
            (Rgb24, Bgr15, to_bgr15),
            (Rgb24, Uyvy, to_uyvy),
            (Rgb24, Yuy2, to_yuy2),
            (Rgb24, Nv12, to_nv12),
            (Rgb24, Nv21, to_nv21),
        ];

        table
            .into_iter()
            .map(|(from, to, convert)| ((from, to), convert))
            .collect()
    })
}

/// Is there a way to get from `from` to `to`?
pub fn can_convert(from: PixelFormat, to: PixelFormat) -> bool {
    from == to || converters().contains_key(&(from, to))
}

/// Formats `from` converts to, excluding itself
pub fn conversion_targets(from: PixelFormat) -> Vec<PixelFormat> {
    PixelFormat::ALL
        .into_iter()
        .filter(|&to| to != from && converters().contains_key(&(from, to)))
        .collect()
}

/// Convert `frame` to `to`.
///
/// Returns a copy when the frame already is in `to`, and the empty frame
/// when no conversion is registered.
pub fn convert_frame(frame: &Frame, to: PixelFormat) -> Frame {
    let from = frame.pixel_format();

    if from == to {
        return frame.clone();
    }

    match converters().get(&(from, to)) {
        Some(convert) => convert(frame),
        None => {
            tracing::debug!("No conversion from {} to {}", from, to);
            Frame::empty()
        }
    }
}

impl Frame {
    /// See [`convert_frame`]
    pub fn convert(&self, to: PixelFormat) -> Frame {
        convert_frame(self, to)
    }

    /// See [`can_convert`]
    pub fn can_convert(from: PixelFormat, to: PixelFormat) -> bool {
        can_convert(from, to)
    }
}

// BT.601 studio swing
fn rgb_y(r: i32, g: i32, b: i32) -> u8 {
    (((66 * r + 129 * g + 25 * b + 128) >> 8) + 16) as u8
}

fn rgb_u(r: i32, g: i32, b: i32) -> u8 {
    (((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128) as u8
}

fn rgb_v(r: i32, g: i32, b: i32) -> u8 {
    (((112 * r - 94 * g - 18 * b + 128) >> 8) + 128) as u8
}

/// Map every 24-bit source pixel to an `N` byte destination pixel
fn convert_packed<const N: usize>(
    src: &Frame,
    to: PixelFormat,
    pack: impl Fn(u8, u8, u8) -> [u8; N],
) -> Frame {
    let (ri, gi, bi) = rgb_index(src.pixel_format());
    let mut dst = Frame::new(src.format().with_format(to));

    for y in 0..src.height() as usize {
        let src_line = src.line(0, y);
        let dst_line = dst.line_mut(0, y);

        for (pixel, out) in src_line.chunks_exact(3).zip(dst_line.chunks_exact_mut(N)) {
            out.copy_from_slice(&pack(pixel[ri], pixel[gi], pixel[bi]));
        }
    }

    dst
}

fn to_rgb32(src: &Frame) -> Frame {
    convert_packed(src, PixelFormat::Rgb32, |r, g, b| [r, g, b, 255])
}

fn to_bgr32(src: &Frame) -> Frame {
    convert_packed(src, PixelFormat::Bgr32, |r, g, b| [b, g, r, 255])
}

fn to_rgb24(src: &Frame) -> Frame {
    convert_packed(src, PixelFormat::Rgb24, |r, g, b| [r, g, b])
}

fn to_bgr24(src: &Frame) -> Frame {
    convert_packed(src, PixelFormat::Bgr24, |r, g, b| [b, g, r])
}

fn pack_565(hi: u8, mid: u8, lo: u8) -> [u8; 2] {
    let value = u16::from(hi >> 3) << 11 | u16::from(mid >> 2) << 5 | u16::from(lo >> 3);
    value.to_le_bytes()
}

// Top bit is padding and always set
fn pack_1555(hi: u8, mid: u8, lo: u8) -> [u8; 2] {
    let value =
        1 << 15 | u16::from(hi >> 3) << 10 | u16::from(mid >> 3) << 5 | u16::from(lo >> 3);
    value.to_le_bytes()
}

fn to_rgb16(src: &Frame) -> Frame {
    convert_packed(src, PixelFormat::Rgb16, |r, g, b| pack_565(r, g, b))
}

fn to_bgr16(src: &Frame) -> Frame {
    convert_packed(src, PixelFormat::Bgr16, |r, g, b| pack_565(b, g, r))
}

fn to_rgb15(src: &Frame) -> Frame {
    convert_packed(src, PixelFormat::Rgb15, |r, g, b| pack_1555(r, g, b))
}

fn to_bgr15(src: &Frame) -> Frame {
    convert_packed(src, PixelFormat::Bgr15, |r, g, b| pack_1555(b, g, r))
}

/// Packed 4:2:2. Chroma comes from the first pixel of each pair; an odd
/// trailing pixel is paired with itself.
fn convert_422(src: &Frame, to: PixelFormat, pack: fn(u8, u8, u8, u8) -> [u8; 4]) -> Frame {
    let (ri, gi, bi) = rgb_index(src.pixel_format());
    let width = src.width() as usize;
    let mut dst = Frame::new(src.format().with_format(to));

    for y in 0..src.height() as usize {
        let src_line = src.line(0, y);
        let dst_line = dst.line_mut(0, y);

        for (x, out) in (0..width).step_by(2).zip(dst_line.chunks_exact_mut(4)) {
            let p0 = &src_line[3 * x..3 * x + 3];
            let x1 = (x + 1).min(width - 1);
            let p1 = &src_line[3 * x1..3 * x1 + 3];

            let (r0, g0, b0) = (i32::from(p0[ri]), i32::from(p0[gi]), i32::from(p0[bi]));
            let (r1, g1, b1) = (i32::from(p1[ri]), i32::from(p1[gi]), i32::from(p1[bi]));

            out.copy_from_slice(&pack(
                rgb_y(r0, g0, b0),
                rgb_u(r0, g0, b0),
                rgb_y(r1, g1, b1),
                rgb_v(r0, g0, b0),
            ));
        }
    }

    dst
}

fn to_uyvy(src: &Frame) -> Frame {
    convert_422(src, PixelFormat::Uyvy, |y0, u, y1, v| [u, y0, v, y1])
}

fn to_yuy2(src: &Frame) -> Frame {
    convert_422(src, PixelFormat::Yuy2, |y0, u, y1, v| [y0, u, y1, v])
}

/// Luma plane plus 2x2 subsampled chroma plane. Chroma is taken from the
/// pixel at even `(x, y)`.
fn convert_semi_planar(src: &Frame, to: PixelFormat, pack: fn(u8, u8) -> [u8; 2]) -> Frame {
    let (ri, gi, bi) = rgb_index(src.pixel_format());
    let mut dst = Frame::new(src.format().with_format(to));

    for y in 0..src.height() as usize {
        let src_line = src.line(0, y);
        let (luma, chroma) = dst.planar_lines_mut(y);

        for (x, pixel) in src_line.chunks_exact(3).enumerate() {
            let r = i32::from(pixel[ri]);
            let g = i32::from(pixel[gi]);
            let b = i32::from(pixel[bi]);

            luma[x] = rgb_y(r, g, b);

            if x & 1 == 0 && y & 1 == 0 {
                chroma[x..x + 2].copy_from_slice(&pack(rgb_u(r, g, b), rgb_v(r, g, b)));
            }
        }
    }

    dst
}

fn to_nv12(src: &Frame) -> Frame {
    convert_semi_planar(src, PixelFormat::Nv12, |u, v| [v, u])
}

fn to_nv21(src: &Frame) -> Frame {
    convert_semi_planar(src, PixelFormat::Nv21, |u, v| [u, v])
}
