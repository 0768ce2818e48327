//! vcamframe — virtual camera frame engine
//!
//! Pixel format descriptors, frame buffers and the operations a virtual
//! camera needs to turn an incoming picture into the format a client asked
//! for.
//!
//! # Features
//!
//! - **Formats**: packed RGB/BGR (15/16/24/32-bit), UYVY, YUY2, NV12, NV21
//! - **Scale**: nearest neighbour or bilinear, with keep/expanding aspect ratio
//! - **Adjust**: mirror, red/blue swap, HSL, gamma, contrast, grayscale
//! - **Convert**: 24-bit RGB/BGR to every other format
//! - **Bitmap**: 24/32-bit BMP loading for test pictures
//!
//! # Example
//!
//! ```rust,no_run
//! use vcamframe::{AdapterConfig, Frame, FrameAdapter, PixelFormat, VideoFormat};
//!
//! fn main() -> vcamframe::Result<()> {
//!     let picture = Frame::from_file("picture.bmp")?;
//!     let adapter = FrameAdapter::new(AdapterConfig::default().with_mirror(true, false));
//!
//!     let target = VideoFormat::new(PixelFormat::Nv12, 1280, 720);
//!     let frame = adapter.apply(&picture, &target);
//!     assert_eq!(frame.data().len(), target.size());
//!     Ok(())
//! }
//! ```

pub mod bitmap;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod processing;
pub mod types;

// Re-exports for convenience
pub use config::{AdapterConfig, ColorAdjustments};
pub use error::{Error, Result};
pub use pipeline::{FrameAdapter, StreamFrames};
pub use processing::{can_convert, conversion_targets, Scaler};
pub use types::{AspectRatio, Frame, PixelFormat, Resolution, Scaling, VideoFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
