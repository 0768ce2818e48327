//! Common types used throughout vcamframe
//!
//! Byte layouts:
//! - 24/32-bit formats name their bytes in memory order (`Rgb24` is `R, G, B`,
//!   `Bgr32` is `B, G, R, X`).
//! - 15/16-bit formats name their bit fields from the most significant bit
//!   down and are stored as little-endian `u16` (`Rgb16` is `RRRRRGGG GGGBBBBB`).
//! - `Uyvy` is `U, Y0, V, Y1` and `Yuy2` is `Y0, U, Y1, V` per pixel pair.
//! - `Nv12`/`Nv21` are a full resolution luma plane followed by a 2x2
//!   subsampled interleaved chroma plane.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const fn mkfourcc(a: u8, b: u8, c: u8, d: u8) -> u32 {
    (a as u32) << 24 | (b as u32) << 16 | (c as u32) << 8 | d as u32
}

/// Pixel format / encoding tag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Rgb32,
    #[default]
    Rgb24,
    Rgb16,
    Rgb15,
    Bgr32,
    Bgr24,
    Bgr16,
    Bgr15,
    /// Packed 4:2:2, `U Y0 V Y1`
    Uyvy,
    /// Packed 4:2:2, `Y0 U Y1 V`
    Yuy2,
    /// Y plane + interleaved chroma plane
    Nv12,
    /// Y plane + interleaved chroma plane, swapped chroma order
    Nv21,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 12] = [
        PixelFormat::Rgb32,
        PixelFormat::Rgb24,
        PixelFormat::Rgb16,
        PixelFormat::Rgb15,
        PixelFormat::Bgr32,
        PixelFormat::Bgr24,
        PixelFormat::Bgr16,
        PixelFormat::Bgr15,
        PixelFormat::Uyvy,
        PixelFormat::Yuy2,
        PixelFormat::Nv12,
        PixelFormat::Nv21,
    ];

    /// Four character code identifying the format
    pub const fn fourcc(&self) -> u32 {
        match self {
            PixelFormat::Rgb32 => mkfourcc(b'R', b'G', b'B', 32),
            PixelFormat::Rgb24 => mkfourcc(b'R', b'G', b'B', 24),
            PixelFormat::Rgb16 => mkfourcc(b'R', b'G', b'B', 16),
            PixelFormat::Rgb15 => mkfourcc(b'R', b'G', b'B', 15),
            PixelFormat::Bgr32 => mkfourcc(b'B', b'G', b'R', 32),
            PixelFormat::Bgr24 => mkfourcc(b'B', b'G', b'R', 24),
            PixelFormat::Bgr16 => mkfourcc(b'B', b'G', b'R', 16),
            PixelFormat::Bgr15 => mkfourcc(b'B', b'G', b'R', 15),
            PixelFormat::Uyvy => mkfourcc(b'U', b'Y', b'V', b'Y'),
            PixelFormat::Yuy2 => mkfourcc(b'Y', b'U', b'Y', b'2'),
            PixelFormat::Nv12 => mkfourcc(b'N', b'V', b'1', b'2'),
            PixelFormat::Nv21 => mkfourcc(b'N', b'V', b'2', b'1'),
        }
    }

    pub fn from_fourcc(fourcc: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.fourcc() == fourcc)
    }

    /// Average bits per pixel
    pub fn bits_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::Rgb32 | PixelFormat::Bgr32 => 32,
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => 24,
            PixelFormat::Rgb16
            | PixelFormat::Rgb15
            | PixelFormat::Bgr16
            | PixelFormat::Bgr15
            | PixelFormat::Uyvy
            | PixelFormat::Yuy2 => 16,
            PixelFormat::Nv12 | PixelFormat::Nv21 => 12,
        }
    }

    pub fn plane_count(&self) -> usize {
        match self {
            PixelFormat::Nv12 | PixelFormat::Nv21 => 2,
            _ => 1,
        }
    }

    /// Can frames in this format be mirrored, scaled, swapped or color adjusted?
    pub fn is_adjustable(&self) -> bool {
        matches!(self, PixelFormat::Rgb24 | PixelFormat::Bgr24)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PixelFormat::Rgb32 => "RGB32",
            PixelFormat::Rgb24 => "RGB24",
            PixelFormat::Rgb16 => "RGB16",
            PixelFormat::Rgb15 => "RGB15",
            PixelFormat::Bgr32 => "BGR32",
            PixelFormat::Bgr24 => "BGR24",
            PixelFormat::Bgr16 => "BGR16",
            PixelFormat::Bgr15 => "BGR15",
            PixelFormat::Uyvy => "UYVY",
            PixelFormat::Yuy2 => "YUY2",
            PixelFormat::Nv12 => "NV12",
            PixelFormat::Nv21 => "NV21",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownPixelFormat(s.to_string()))
    }
}

/// Video resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Calculate total pixels
    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = Error;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x720`
    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::InvalidResolution(s.to_string()))?;

        match (w.trim().parse(), h.trim().parse()) {
            (Ok(width), Ok(height)) => Ok(Self::new(width, height)),
            _ => Err(Error::InvalidResolution(s.to_string())),
        }
    }
}

/// Scaling algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scaling {
    /// Nearest neighbor
    #[default]
    Fast,
    /// Bilinear when enlarging, nearest neighbor when shrinking
    Linear,
}

impl FromStr for Scaling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fast" | "nearest" => Ok(Scaling::Fast),
            "linear" | "bilinear" => Ok(Scaling::Linear),
            _ => Err(Error::UnknownOption(s.to_string())),
        }
    }
}

/// Aspect ratio policy used when scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    /// Stretch to the exact target size
    #[default]
    Ignore,
    /// Fit inside the target, letterboxing the remainder
    Keep,
    /// Fill the target, cropping the source
    Expanding,
}

impl FromStr for AspectRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(AspectRatio::Ignore),
            "keep" => Ok(AspectRatio::Keep),
            "expanding" | "expand" => Ok(AspectRatio::Expanding),
            _ => Err(Error::UnknownOption(s.to_string())),
        }
    }
}

/// Frame layout: pixel format plus dimensions
///
/// Every size is derived from these three fields, never from buffer contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VideoFormat {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
}

impl VideoFormat {
    pub const fn new(format: PixelFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
        }
    }

    /// Round `width` and `height` down to a multiple of `align`.
    ///
    /// Chroma subsampled formats need even dimensions, hence the usual
    /// alignment of 2.
    pub fn round_nearest(width: u32, height: u32, align: u32) -> (u32, u32) {
        let align = align.max(1);
        (align * (width / align), align * (height / align))
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    pub fn plane_count(&self) -> usize {
        self.format.plane_count()
    }

    /// Bytes per line (stride) of `plane`
    pub fn bytes_per_line(&self, plane: usize) -> usize {
        if plane >= self.plane_count() {
            return 0;
        }

        let width = self.width as usize;

        match self.format {
            PixelFormat::Rgb32 | PixelFormat::Bgr32 => width.saturating_mul(4),
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => width.saturating_mul(3),
            PixelFormat::Rgb16
            | PixelFormat::Rgb15
            | PixelFormat::Bgr16
            | PixelFormat::Bgr15 => width.saturating_mul(2),
            // One 4 byte macropixel per pixel pair
            PixelFormat::Uyvy | PixelFormat::Yuy2 => width.div_ceil(2).saturating_mul(4),
            PixelFormat::Nv12 | PixelFormat::Nv21 => match plane {
                0 => width,
                _ => width.div_ceil(2).saturating_mul(2),
            },
        }
    }

    /// Number of lines in `plane`
    pub fn plane_height(&self, plane: usize) -> usize {
        let height = self.height as usize;

        match (self.format.plane_count(), plane) {
            (_, 0) => height,
            (2, 1) => height.div_ceil(2),
            _ => 0,
        }
    }

    /// Size of `plane` in bytes, zero if it doesn't fit in `usize`
    pub fn plane_size(&self, plane: usize) -> usize {
        self.checked_plane_size(plane).unwrap_or(0)
    }

    fn checked_plane_size(&self, plane: usize) -> Option<usize> {
        self.bytes_per_line(plane)
            .checked_mul(self.plane_height(plane))
    }

    /// Byte offset of `plane` from the start of the frame buffer
    pub fn plane_offset(&self, plane: usize) -> usize {
        (0..plane.min(self.plane_count()))
            .map(|p| self.plane_size(p))
            .fold(0, usize::saturating_add)
    }

    /// Total buffer size in bytes.
    ///
    /// Zero when either dimension is zero or the size overflows `usize`.
    pub fn size(&self) -> usize {
        if self.width == 0 || self.height == 0 {
            return 0;
        }

        (0..self.plane_count())
            .try_fold(0usize, |total, p| {
                total.checked_add(self.checked_plane_size(p)?)
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Same dimensions, different pixel format
    pub fn with_format(&self, format: PixelFormat) -> Self {
        Self { format, ..*self }
    }

    pub fn with_size(&self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..*self
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.format, self.width, self.height)
    }
}

/// A video frame
///
/// Owns its buffer; cloning duplicates it. The empty frame (zero sized
/// format, zero length buffer) is what every operation returns when it cannot
/// proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    format: VideoFormat,
    data: Vec<u8>,
}

impl Frame {
    /// Create a new zero filled frame
    pub fn new(format: VideoFormat) -> Self {
        Self {
            format,
            data: vec![0u8; format.size()],
        }
    }

    /// The empty frame
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an existing buffer, which must be exactly `format.size()` bytes
    pub fn from_data(format: VideoFormat, data: Vec<u8>) -> Option<Self> {
        if data.len() != format.size() {
            return None;
        }

        Some(Self { format, data })
    }

    pub fn format(&self) -> &VideoFormat {
        &self.format
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format.format
    }

    pub fn width(&self) -> u32 {
        self.format.width
    }

    pub fn height(&self) -> u32 {
        self.format.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.format.clear();
        self.data.clear();
    }

    /// Raw bytes of line `y` in `plane`
    pub fn line(&self, plane: usize, y: usize) -> &[u8] {
        let (start, end) = self.line_range(plane, y);
        &self.data[start..end]
    }

    pub fn line_mut(&mut self, plane: usize, y: usize) -> &mut [u8] {
        let (start, end) = self.line_range(plane, y);
        &mut self.data[start..end]
    }

    fn line_range(&self, plane: usize, y: usize) -> (usize, usize) {
        let bypl = self.format.bytes_per_line(plane);
        let start = self.format.plane_offset(plane) + y * bypl;
        (start, start + bypl)
    }

    /// Mutable luma line and chroma line of a two plane frame
    pub(crate) fn planar_lines_mut(&mut self, y: usize) -> (&mut [u8], &mut [u8]) {
        let luma_bypl = self.format.bytes_per_line(0);
        let chroma_bypl = self.format.bytes_per_line(1);
        let chroma_offset = self.format.plane_offset(1);
        let (luma, chroma) = self.data.split_at_mut(chroma_offset);
        let luma_start = y * luma_bypl;
        let chroma_start = (y / 2) * chroma_bypl;

        (
            &mut luma[luma_start..luma_start + luma_bypl],
            &mut chroma[chroma_start..chroma_start + chroma_bypl],
        )
    }
}
