//! Configuration types for vcamframe

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::processing::tables::{MAX_LEVEL, MIN_LEVEL};
use crate::types::{AspectRatio, Scaling};

/// Color adjustments applied to every frame of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorAdjustments {
    /// Hue rotation in degrees
    pub hue: i32,
    /// Saturation shift, `-255..=255`
    pub saturation: i32,
    /// Luminance shift, `-255..=255`
    pub luminance: i32,
    /// Gamma level, `-255..=255`
    pub gamma: i32,
    /// Contrast level, `-255..=255`
    pub contrast: i32,
    /// Convert to grayscale
    pub gray: bool,
}

impl ColorAdjustments {
    /// True when applying these adjustments changes nothing
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_hue(mut self, hue: i32) -> Self {
        self.hue = hue;
        self
    }

    pub fn with_saturation(mut self, saturation: i32) -> Self {
        self.saturation = saturation;
        self
    }

    pub fn with_luminance(mut self, luminance: i32) -> Self {
        self.luminance = luminance;
        self
    }

    pub fn with_gamma(mut self, gamma: i32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_contrast(mut self, contrast: i32) -> Self {
        self.contrast = contrast;
        self
    }

    pub fn with_gray(mut self, gray: bool) -> Self {
        self.gray = gray;
        self
    }

    fn validate(&self) -> Result<()> {
        let levels = [
            ("saturation", self.saturation),
            ("luminance", self.luminance),
            ("gamma", self.gamma),
            ("contrast", self.contrast),
        ];

        for (name, value) in levels {
            if !(MIN_LEVEL..=MAX_LEVEL).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must be within {}..={}, got {}",
                    name, MIN_LEVEL, MAX_LEVEL, value
                )));
            }
        }

        Ok(())
    }
}

/// Per stream adaptation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub scaling: Scaling,
    pub aspect_ratio: AspectRatio,
    pub horizontal_mirror: bool,
    pub vertical_mirror: bool,
    /// Exchange red and blue
    pub swap_rgb: bool,
    pub adjustments: ColorAdjustments,
}

impl AdapterConfig {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.adjustments.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded adapter config from {}", path.display());
        Ok(config)
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_mirror(mut self, horizontal: bool, vertical: bool) -> Self {
        self.horizontal_mirror = horizontal;
        self.vertical_mirror = vertical;
        self
    }

    pub fn with_swap_rgb(mut self, swap: bool) -> Self {
        self.swap_rgb = swap;
        self
    }

    pub fn with_adjustments(mut self, adjustments: ColorAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }
}
