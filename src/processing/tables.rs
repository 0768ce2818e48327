//! Gamma and contrast lookup tables
//!
//! Both tables hold one 256 entry curve per level in `-255..=255`, stored
//! flat: the curve for `level` starts at `(level + 255) * 256`. They are built
//! on first use and never change afterwards.

use std::sync::OnceLock;

/// Number of curves per table (`-255..=255`)
pub const LEVELS: usize = 511;

/// Lowest and highest accepted adjustment level
pub const MIN_LEVEL: i32 = -255;
pub const MAX_LEVEL: i32 = 255;

static GAMMA_TABLE: OnceLock<Vec<u8>> = OnceLock::new();
static CONTRAST_TABLE: OnceLock<Vec<u8>> = OnceLock::new();

/// Build both tables now instead of on the first adjusted frame.
pub fn warmup() {
    let _ = gamma_table();
    let _ = contrast_table();
}

/// The full flat gamma table, `LEVELS * 256` bytes
pub fn gamma_table() -> &'static [u8] {
    GAMMA_TABLE.get_or_init(build_gamma_table)
}

/// The full flat contrast table, `LEVELS * 256` bytes
pub fn contrast_table() -> &'static [u8] {
    CONTRAST_TABLE.get_or_init(build_contrast_table)
}

/// Gamma curve for `level`, clamped to `-255..=255`
pub fn gamma_curve(level: i32) -> &'static [u8] {
    curve(gamma_table(), level)
}

/// Contrast curve for `level`, clamped to `-255..=255`
pub fn contrast_curve(level: i32) -> &'static [u8] {
    curve(contrast_table(), level)
}

fn curve(table: &'static [u8], level: i32) -> &'static [u8] {
    let offset = table_offset(level);
    &table[offset..offset + 256]
}

fn table_offset(level: i32) -> usize {
    ((level.clamp(MIN_LEVEL, MAX_LEVEL) - MIN_LEVEL) as usize) << 8
}

fn build_gamma_table() -> Vec<u8> {
    let mut table = Vec::with_capacity(LEVELS * 256);

    for level in MIN_LEVEL..=MAX_LEVEL {
        // -255 would divide by zero; it uses the steepest finite curve instead
        let k = if level == MIN_LEVEL {
            255.0
        } else {
            255.0 / f64::from(level + 255)
        };

        table.extend((0..=255u8).map(|v| {
            let value = 255.0 * (f64::from(v) / 255.0).powf(k);
            value.round().clamp(0.0, 255.0) as u8
        }));
    }

    tracing::debug!("Gamma table built ({} bytes)", table.len());
    table
}

fn build_contrast_table() -> Vec<u8> {
    let mut table = Vec::with_capacity(LEVELS * 256);

    for level in MIN_LEVEL..=MAX_LEVEL {
        let c = f64::from(level);
        let f = 259.0 * (255.0 + c) / (255.0 * (259.0 - c));

        table.extend((0..=255u8).map(|v| {
            let value = f * (f64::from(v) - 128.0) + 128.0;
            value.round().clamp(0.0, 255.0) as u8
        }));
    }

    tracing::debug!("Contrast table built ({} bytes)", table.len());
    table
}
