//! Mirroring, channel swapping and color adjustment
//!
//! Everything here works on 24-bit frames only; any other pixel format
//! yields the empty frame. Neutral arguments return an unchanged copy.

use super::rgb_index;
use super::tables::{contrast_curve, gamma_curve, MAX_LEVEL, MIN_LEVEL};
use crate::types::Frame;

fn unsupported(frame: &Frame, operation: &str) -> Frame {
    tracing::debug!("Can't {} {} frames", operation, frame.pixel_format());
    Frame::empty()
}

/// Apply `f` to every pixel as `(r, g, b)`, whatever the byte order
fn map_pixels(frame: &Frame, f: impl Fn(i32, i32, i32) -> (i32, i32, i32)) -> Frame {
    let (ri, gi, bi) = rgb_index(frame.pixel_format());
    let mut dst = Frame::new(*frame.format());

    for y in 0..frame.height() as usize {
        let src_line = frame.line(0, y);
        let dst_line = dst.line_mut(0, y);

        for (src, out) in src_line.chunks_exact(3).zip(dst_line.chunks_exact_mut(3)) {
            let (r, g, b) = f(i32::from(src[ri]), i32::from(src[gi]), i32::from(src[bi]));
            out[ri] = r.clamp(0, 255) as u8;
            out[gi] = g.clamp(0, 255) as u8;
            out[bi] = b.clamp(0, 255) as u8;
        }
    }

    dst
}

fn gray_value(r: i32, g: i32, b: i32) -> i32 {
    (11 * r + 16 * g + 5 * b) >> 5
}

/// RGB to HSL, hue in degrees, saturation and luminance in `0..=255`
fn rgb_to_hsl(r: i32, g: i32, b: i32) -> (i32, i32, i32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let c = max - min;
    let l = (max + min) / 2;

    if c == 0 {
        return (0, 0, l);
    }

    let h = if max == r {
        (g - b).rem_euclid(6 * c)
    } else if max == g {
        b - r + 2 * c
    } else {
        r - g + 4 * c
    };

    let h = 60 * h / c;
    let s = 255 * c / (255 - (max + min - 255).abs());

    (h, s, l)
}

fn hsl_to_rgb(h: i32, s: i32, l: i32) -> (i32, i32, i32) {
    let c = s * (255 - (2 * l - 255).abs()) / 255;
    let x = c * (60 - ((h % 120) - 60).abs()) / 60;

    let (r, g, b) = match h {
        0..=59 => (c, x, 0),
        60..=119 => (x, c, 0),
        120..=179 => (0, c, x),
        180..=239 => (0, x, c),
        240..=299 => (x, 0, c),
        300..=359 => (c, 0, x),
        _ => (0, 0, 0),
    };

    let m = 2 * l - c;

    ((2 * r + m) / 2, (2 * g + m) / 2, (2 * b + m) / 2)
}

fn rotate_hsl(
    (r, g, b): (i32, i32, i32),
    hue: i32,
    saturation: i32,
    luminance: i32,
) -> (i32, i32, i32) {
    let (h, s, l) = rgb_to_hsl(r, g, b);

    hsl_to_rgb(
        (h + hue.rem_euclid(360)) % 360,
        s.saturating_add(saturation).clamp(0, 255),
        l.saturating_add(luminance).clamp(0, 255),
    )
}

impl Frame {
    /// Reflect the frame horizontally, vertically or both
    pub fn mirror(&self, horizontal: bool, vertical: bool) -> Frame {
        if !horizontal && !vertical {
            return self.clone();
        }

        if !self.pixel_format().is_adjustable() {
            return unsupported(self, "mirror");
        }

        let height = self.height() as usize;
        let mut dst = Frame::new(*self.format());

        for y in 0..height {
            let src_y = if vertical { height - y - 1 } else { y };
            let src_line = self.line(0, src_y);
            let dst_line = dst.line_mut(0, y);

            if horizontal {
                for (out, src) in dst_line
                    .chunks_exact_mut(3)
                    .zip(src_line.chunks_exact(3).rev())
                {
                    out.copy_from_slice(src);
                }
            } else {
                dst_line.copy_from_slice(src_line);
            }
        }

        dst
    }

    /// Exchange the red and blue samples of every pixel
    pub fn swap_rgb(&self) -> Frame {
        if !self.pixel_format().is_adjustable() {
            return unsupported(self, "swap");
        }

        let mut dst = self.clone();

        for px in dst.data_mut().chunks_exact_mut(3) {
            px.swap(0, 2);
        }

        dst
    }

    /// [`swap_rgb`](Self::swap_rgb) when `swap` is set, a copy otherwise
    pub fn swap_rgb_if(&self, swap: bool) -> Frame {
        if swap {
            self.swap_rgb()
        } else {
            self.clone()
        }
    }

    /// Rotate hue (degrees) and shift saturation and luminance
    pub fn adjust_hsl(&self, hue: i32, saturation: i32, luminance: i32) -> Frame {
        if hue == 0 && saturation == 0 && luminance == 0 {
            return self.clone();
        }

        if !self.pixel_format().is_adjustable() {
            return unsupported(self, "adjust");
        }

        map_pixels(self, |r, g, b| rotate_hsl((r, g, b), hue, saturation, luminance))
    }

    /// Remap every sample through the gamma curve for `gamma` (`-255..=255`)
    pub fn adjust_gamma(&self, gamma: i32) -> Frame {
        if gamma == 0 {
            return self.clone();
        }

        if !self.pixel_format().is_adjustable() {
            return unsupported(self, "adjust");
        }

        let curve = gamma_curve(gamma);
        map_pixels(self, |r, g, b| {
            (
                i32::from(curve[r as usize]),
                i32::from(curve[g as usize]),
                i32::from(curve[b as usize]),
            )
        })
    }

    /// Remap every sample through the contrast curve for `contrast` (`-255..=255`)
    pub fn adjust_contrast(&self, contrast: i32) -> Frame {
        if contrast == 0 {
            return self.clone();
        }

        if !self.pixel_format().is_adjustable() {
            return unsupported(self, "adjust");
        }

        let curve = contrast_curve(contrast);
        map_pixels(self, |r, g, b| {
            (
                i32::from(curve[r as usize]),
                i32::from(curve[g as usize]),
                i32::from(curve[b as usize]),
            )
        })
    }

    /// Replace every pixel with its luma, `(11 R + 16 G + 5 B) >> 5`
    pub fn to_grayscale(&self) -> Frame {
        if !self.pixel_format().is_adjustable() {
            return unsupported(self, "gray");
        }

        map_pixels(self, |r, g, b| {
            let luma = gray_value(r, g, b);
            (luma, luma, luma)
        })
    }

    /// All color adjustments in a single pass: HSL, then gamma, then
    /// contrast, then grayscale.
    pub fn adjust(
        &self,
        hue: i32,
        saturation: i32,
        luminance: i32,
        gamma: i32,
        contrast: i32,
        gray: bool,
    ) -> Frame {
        let hsl = hue != 0 || saturation != 0 || luminance != 0;

        if !hsl && gamma == 0 && contrast == 0 && !gray {
            return self.clone();
        }

        if !self.pixel_format().is_adjustable() {
            return unsupported(self, "adjust");
        }

        let gamma_lut = (gamma != 0).then(|| gamma_curve(gamma.clamp(MIN_LEVEL, MAX_LEVEL)));
        let contrast_lut =
            (contrast != 0).then(|| contrast_curve(contrast.clamp(MIN_LEVEL, MAX_LEVEL)));

        map_pixels(self, |r, g, b| {
            let mut rgb = (r, g, b);

            if hsl {
                rgb = rotate_hsl(rgb, hue, saturation, luminance);
            }

            for lut in [gamma_lut, contrast_lut].into_iter().flatten() {
                rgb = (
                    i32::from(lut[rgb.0.clamp(0, 255) as usize]),
                    i32::from(lut[rgb.1.clamp(0, 255) as usize]),
                    i32::from(lut[rgb.2.clamp(0, 255) as usize]),
                );
            }

            if gray {
                let luma = gray_value(rgb.0, rgb.1, rgb.2);
                rgb = (luma, luma, luma);
            }

            rgb
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PixelFormat, VideoFormat};

    fn frame(format: PixelFormat, width: u32, height: u32, pixels: &[[u8; 3]]) -> Frame {
        let data = pixels.iter().flatten().copied().collect();
        Frame::from_data(VideoFormat::new(format, width, height), data).unwrap()
    }

    fn sample() -> Frame {
        frame(
            PixelFormat::Rgb24,
            3,
            2,
            &[
                [1, 2, 3],
                [4, 5, 6],
                [7, 8, 9],
                [10, 11, 12],
                [13, 14, 15],
                [16, 17, 18],
            ],
        )
    }

    #[test]
    fn test_mirror_horizontal() {
        let mirrored = sample().mirror(true, false);
        assert_eq!(mirrored.line(0, 0), &[7, 8, 9, 4, 5, 6, 1, 2, 3]);
        assert_eq!(mirrored.line(0, 1), &[16, 17, 18, 13, 14, 15, 10, 11, 12]);
    }

    #[test]
    fn test_mirror_vertical() {
        let mirrored = sample().mirror(false, true);
        assert_eq!(mirrored.line(0, 0), sample().line(0, 1));
        assert_eq!(mirrored.line(0, 1), sample().line(0, 0));
    }

    #[test]
    fn test_mirror_both_twice_is_identity() {
        let frame = sample();
        let once = frame.mirror(true, true);
        assert_ne!(once, frame);
        assert_eq!(once.line(0, 0), &[16, 17, 18, 13, 14, 15, 10, 11, 12]);
        assert_eq!(once.mirror(true, true), frame);
    }

    #[test]
    fn test_mirror_rejects_other_formats() {
        let nv12 = Frame::new(VideoFormat::new(PixelFormat::Nv12, 2, 2));
        assert!(nv12.mirror(true, false).is_empty());
        assert_eq!(nv12.mirror(false, false), nv12);
    }

    #[test]
    fn test_swap_rgb() {
        let swapped = sample().swap_rgb();
        assert_eq!(&swapped.data()[..3], &[3, 2, 1]);
        assert_eq!(swapped.pixel_format(), PixelFormat::Rgb24);
        assert_eq!(sample().swap_rgb_if(false), sample());
        assert!(Frame::new(VideoFormat::new(PixelFormat::Rgb32, 1, 1))
            .swap_rgb()
            .is_empty());
    }

    #[test]
    fn test_grayscale() {
        let src = sample();
        let gray = src.to_grayscale();
        for (out, px) in gray.data().chunks_exact(3).zip(src.data().chunks_exact(3)) {
            let expected = (11 * px[0] as i32 + 16 * px[1] as i32 + 5 * px[2] as i32) >> 5;
            assert_eq!(out, &[expected as u8; 3]);
        }
    }

    #[test]
    fn test_grayscale_honors_byte_order() {
        let rgb = frame(PixelFormat::Rgb24, 1, 1, &[[255, 0, 0]]);
        let bgr = frame(PixelFormat::Bgr24, 1, 1, &[[0, 0, 255]]);
        // Both are pure red
        assert_eq!(rgb.to_grayscale().data(), &[87, 87, 87]);
        assert_eq!(bgr.to_grayscale().data(), &[87, 87, 87]);
    }

    #[test]
    fn test_neutral_gamma_is_identity() {
        let src = frame(PixelFormat::Bgr24, 2, 2, &[[50, 100, 200]; 4]);
        assert_eq!(src.adjust_gamma(0), src);
        assert_eq!(src.adjust_contrast(0), src);
        assert_eq!(src.adjust_hsl(0, 0, 0), src);
    }

    #[test]
    fn test_neutral_adjust_is_identity() {
        let src = sample();
        assert_eq!(src.adjust(0, 0, 0, 0, 0, false), src);
        let nv21 = Frame::new(VideoFormat::new(PixelFormat::Nv21, 2, 2));
        assert_eq!(nv21.adjust(0, 0, 0, 0, 0, false), nv21);
        assert!(nv21.adjust(0, 0, 0, 10, 0, false).is_empty());
    }

    #[test]
    fn test_gamma_and_contrast_use_tables() {
        let src = frame(PixelFormat::Rgb24, 1, 1, &[[0, 128, 255]]);
        let curve = gamma_curve(80);
        assert_eq!(src.adjust_gamma(80).data(), &[curve[0], curve[128], curve[255]]);

        let flat = src.adjust_contrast(-255);
        assert_eq!(flat.data(), &[128, 128, 128]);
    }

    #[test]
    fn test_hsl_roundtrip_helpers() {
        assert_eq!(rgb_to_hsl(255, 0, 0), (0, 255, 127));
        assert_eq!(rgb_to_hsl(0, 0, 255), (240, 255, 127));
        assert_eq!(rgb_to_hsl(90, 90, 90), (0, 0, 90));
        assert_eq!(hsl_to_rgb(0, 0, 90), (90, 90, 90));
    }

    #[test]
    fn test_hue_rotation() {
        let red = frame(PixelFormat::Rgb24, 1, 1, &[[255, 0, 0]]);
        assert_eq!(red.adjust_hsl(120, 0, 0).data(), &[0, 254, 0]);
        // Negative rotation wraps around
        assert_eq!(red.adjust_hsl(-240, 0, 0).data(), &[0, 254, 0]);

        let bgr_red = frame(PixelFormat::Bgr24, 1, 1, &[[0, 0, 255]]);
        assert_eq!(bgr_red.adjust_hsl(120, 0, 0).data(), &[0, 254, 0]);
    }

    #[test]
    fn test_saturation_and_luminance_clamp() {
        let red = frame(PixelFormat::Rgb24, 1, 1, &[[255, 0, 0]]);
        assert_eq!(red.adjust_hsl(0, -255, 0).data(), &[127, 127, 127]);
        assert_eq!(red.adjust_hsl(0, 0, 255).data(), &[255, 255, 255]);
        assert_eq!(red.adjust_hsl(0, 0, -1000).data(), &[0, 0, 0]);
    }

    #[test]
    fn test_extreme_hsl_arguments() {
        let blue = frame(PixelFormat::Rgb24, 1, 1, &[[0, 0, 255]]);
        assert_eq!(blue.adjust_hsl(0, i32::MAX, 0), blue.adjust_hsl(0, 255, 0));
        assert_eq!(blue.adjust_hsl(0, 0, i32::MAX).data(), &[255, 255, 255]);
        assert_eq!(blue.adjust_hsl(0, 0, i32::MIN).data(), &[0, 0, 0]);
        // i32::MAX is 127 modulo 360, i32::MIN is 232
        assert_eq!(blue.adjust_hsl(i32::MAX, 0, 0), blue.adjust_hsl(127, 0, 0));
        assert_eq!(blue.adjust_hsl(i32::MIN, 0, 0), blue.adjust_hsl(-128, 0, 0));
        assert_eq!(
            blue.adjust(i32::MAX, i32::MAX, i32::MIN, 0, 0, false).data(),
            &[0, 0, 0]
        );
    }

    #[test]
    fn test_fused_matches_chained() {
        let src = sample().scaled(8, 8, crate::Scaling::Linear, crate::AspectRatio::Ignore);
        let fused = src.adjust(30, 20, -10, 40, 25, true);
        let chained = src
            .adjust_hsl(30, 20, -10)
            .adjust_gamma(40)
            .adjust_contrast(25)
            .to_grayscale();
        assert_eq!(fused, chained);
    }
}
