//! Stream side frame adaptation
//!
//! Connects incoming frame → adjust → mirror → swap → scale → convert, in the
//! order that keeps the expensive steps on the smaller image.

use std::path::Path;

use parking_lot::Mutex;
use rand::RngCore;

use crate::config::AdapterConfig;
use crate::types::{Frame, VideoFormat};

/// Adapts frames to the format negotiated for a stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameAdapter {
    config: AdapterConfig,
}

impl FrameAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AdapterConfig) {
        self.config = config;
    }

    /// Produce `frame` in the `target` format, or the empty frame when any
    /// step is unsupported.
    pub fn apply(&self, frame: &Frame, target: &VideoFormat) -> Frame {
        if frame.is_empty() || target.is_empty() {
            return Frame::empty();
        }

        let config = &self.config;
        let a = &config.adjustments;
        let src_area = frame.width() as u64 * frame.height() as u64;
        let dst_area = target.width as u64 * target.height as u64;

        let adapted = if dst_area > src_area {
            // Enlarging: pixel work first, while the image is small
            frame
                .adjust(
                    a.hue,
                    a.saturation,
                    a.luminance,
                    a.gamma,
                    a.contrast,
                    a.gray,
                )
                .mirror(config.horizontal_mirror, config.vertical_mirror)
                .swap_rgb_if(config.swap_rgb)
                .scaled(
                    target.width,
                    target.height,
                    config.scaling,
                    config.aspect_ratio,
                )
        } else {
            frame
                .scaled(
                    target.width,
                    target.height,
                    config.scaling,
                    config.aspect_ratio,
                )
                .adjust(
                    a.hue,
                    a.saturation,
                    a.luminance,
                    a.gamma,
                    a.contrast,
                    a.gray,
                )
                .mirror(config.horizontal_mirror, config.vertical_mirror)
                .swap_rgb_if(config.swap_rgb)
        };

        // Every step maps empty to empty, converting it would only log noise
        if adapted.is_empty() {
            tracing::debug!("Can't adapt {} frame to {}", frame.format(), target);
            return adapted;
        }

        adapted.convert(target.format)
    }
}

/// Random bytes in the layout of `format`, sent when there is nothing else
fn noise_frame(format: &VideoFormat) -> Frame {
    let mut data = vec![0u8; format.size()];
    rand::thread_rng().fill_bytes(&mut data);
    Frame::from_data(*format, data).unwrap_or_default()
}

struct StreamState {
    adapter: FrameAdapter,
    format: VideoFormat,
    test_frame: Frame,
    test_frame_adapted: Frame,
    current_frame: Frame,
    broadcasting: bool,
}

impl StreamState {
    fn update_test_frame(&mut self) {
        self.test_frame_adapted = self.adapter.apply(&self.test_frame, &self.format);

        if !self.broadcasting {
            self.current_frame = self.test_frame_adapted.clone();
        }
    }
}

/// The current frame of one stream, shared between the thread feeding
/// frames in and the one delivering them.
///
/// While nothing is broadcasting, the adapted test picture is delivered.
/// Without a usable picture, random noise is.
pub struct StreamFrames {
    state: Mutex<StreamState>,
}

impl StreamFrames {
    pub fn new(format: VideoFormat, config: AdapterConfig) -> Self {
        Self {
            state: Mutex::new(StreamState {
                adapter: FrameAdapter::new(config),
                format,
                test_frame: Frame::empty(),
                test_frame_adapted: Frame::empty(),
                current_frame: Frame::empty(),
                broadcasting: false,
            }),
        }
    }

    /// Replace the picture shown while nothing is broadcasting
    pub fn set_test_picture(&self, picture: Frame) {
        let mut state = self.state.lock();
        state.test_frame = picture;
        state.update_test_frame();
    }

    /// Load the test picture from a bitmap file; on failure the stream
    /// falls back to an empty picture.
    pub fn load_test_picture(&self, path: impl AsRef<Path>) -> bool {
        let mut picture = Frame::empty();
        let loaded = picture.load(path);
        self.set_test_picture(picture);
        loaded
    }

    /// Change the negotiated output format
    pub fn set_format(&self, format: VideoFormat) {
        let mut state = self.state.lock();

        if state.format == format {
            return;
        }

        tracing::info!("Stream format changed to {}", format);
        state.format = format;
        state.update_test_frame();
    }

    pub fn set_config(&self, config: AdapterConfig) {
        let mut state = self.state.lock();

        if *state.adapter.config() == config {
            return;
        }

        state.adapter.set_config(config);
        state.update_test_frame();
    }

    pub fn format(&self) -> VideoFormat {
        self.state.lock().format
    }

    pub fn config(&self) -> AdapterConfig {
        *self.state.lock().adapter.config()
    }

    /// Accept a frame from the broadcaster
    pub fn frame_ready(&self, frame: &Frame) {
        let mut state = self.state.lock();

        if !state.broadcasting {
            tracing::info!("Broadcast started");
            state.broadcasting = true;
        }

        let adapted = state.adapter.apply(frame, &state.format);

        state.current_frame = if adapted.is_empty() {
            tracing::warn!(
                "Can't adapt {} to {}, showing test picture",
                frame.format(),
                state.format
            );
            state.test_frame_adapted.clone()
        } else {
            adapted
        };
    }

    /// Stop broadcasting and go back to the test picture
    pub fn clear_broadcast(&self) {
        let mut state = self.state.lock();

        if state.broadcasting {
            tracing::info!("Broadcast stopped");
        }

        state.broadcasting = false;
        state.current_frame = state.test_frame_adapted.clone();
    }

    pub fn is_broadcasting(&self) -> bool {
        self.state.lock().broadcasting
    }

    /// Copy of the frame to deliver next, noise when there is none
    pub fn current_frame(&self) -> Frame {
        let state = self.state.lock();

        if state.current_frame.is_empty() {
            return noise_frame(&state.format);
        }

        state.current_frame.clone()
    }
}
