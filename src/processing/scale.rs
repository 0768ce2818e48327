//! Frame scaling
//!
//! All geometry is integer: aspect decisions compare `width * src_height`
//! against `src_width * height`, and each destination coordinate maps to a
//! source coordinate through a rational `num / den` plus a centering shift.

use crate::types::{AspectRatio, Frame, Scaling};

/// Frame scaler with a fixed algorithm and aspect policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Scaler {
    scaling: Scaling,
    aspect_ratio: AspectRatio,
}

impl Scaler {
    pub fn new(scaling: Scaling) -> Self {
        Self {
            scaling,
            aspect_ratio: AspectRatio::Ignore,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Scale a frame
    pub fn scale(&self, frame: &Frame, width: u32, height: u32) -> Frame {
        scale_frame(frame, width, height, self.scaling, self.aspect_ratio)
    }
}

impl Frame {
    /// See [`scale_frame`]
    pub fn scaled(
        &self,
        width: u32,
        height: u32,
        scaling: Scaling,
        aspect_ratio: AspectRatio,
    ) -> Frame {
        scale_frame(self, width, height, scaling, aspect_ratio)
    }

    /// Scale to the largest size whose area fits in `max_area`, keeping the
    /// aspect ratio and rounding the width down to a multiple of `align`.
    pub fn scaled_to_area(&self, max_area: usize, scaling: Scaling, align: u32) -> Frame {
        if self.is_empty() {
            return Frame::empty();
        }

        let src_width = f64::from(self.width());
        let src_height = f64::from(self.height());
        let width = (max_area as f64 * src_width / src_height).sqrt() as u64;
        let height = (max_area as f64 * src_height / src_width).sqrt() as u64;

        if width == 0 {
            return Frame::empty();
        }

        let align = u64::from(align.max(1));
        let out_width = align * (width / align);
        let out_height = height * out_width / width;

        match (u32::try_from(out_width), u32::try_from(out_height)) {
            (Ok(w), Ok(h)) => self.scaled(w, h, scaling, AspectRatio::Ignore),
            _ => Frame::empty(),
        }
    }
}

/// Destination to source mapping along one axis
#[derive(Debug, Clone, Copy)]
struct Axis {
    num: i64,
    den: i64,
    shift: i64,
    /// Last valid source coordinate
    last: i64,
}

/// Two source coordinates and the weight `k_num / k_den` of the second
#[derive(Debug, Clone, Copy)]
struct Sample {
    min: usize,
    max: usize,
    k_num: i64,
    k_den: i64,
}

impl Axis {
    fn clamp(&self, coord: i64) -> usize {
        coord.clamp(0, self.last.max(0)) as usize
    }

    fn source(&self, dst: i64) -> i64 {
        if self.den == 0 {
            return 0;
        }

        (self.num * dst + self.shift) / self.den
    }

    fn nearest(&self, dst: i64) -> usize {
        self.clamp(self.source(dst))
    }

    /// Blend the two source samples around `dst`
    fn extrapolate_up(&self, dst: i64) -> Sample {
        let min = self.source(dst);
        let max = min + 1;

        if self.num == 0 {
            return self.extrapolate_down(dst);
        }

        let dst_min = (self.den * min - self.shift) / self.num;
        let dst_max = (self.den * max - self.shift) / self.num;
        let k_den = dst_max - dst_min;

        if k_den <= 0 {
            return self.extrapolate_down(dst);
        }

        Sample {
            min: self.clamp(min),
            max: self.clamp(max),
            k_num: dst - dst_min,
            k_den,
        }
    }

    /// Collapse to the single nearest source sample
    fn extrapolate_down(&self, dst: i64) -> Sample {
        let coord = self.nearest(dst);

        Sample {
            min: coord,
            max: coord,
            k_num: 0,
            k_den: 1,
        }
    }

    fn sample(&self, dst: i64, enlarging: bool) -> Sample {
        if enlarging {
            self.extrapolate_up(dst)
        } else {
            self.extrapolate_down(dst)
        }
    }
}

fn lerp(min: u8, max: u8, k_num: i64, k_den: i64) -> u8 {
    let (min, max) = (i64::from(min), i64::from(max));
    ((k_num * (max - min) + k_den * min) / k_den) as u8
}

fn lerp_pixel(min: &[u8], max: &[u8], k_num: i64, k_den: i64) -> [u8; 3] {
    [
        lerp(min[0], max[0], k_num, k_den),
        lerp(min[1], max[1], k_num, k_den),
        lerp(min[2], max[2], k_num, k_den),
    ]
}

fn pixel(line: &[u8], x: usize) -> &[u8] {
    &line[3 * x..3 * x + 3]
}

/// Scale frame data
///
/// Returns a copy when the size is unchanged and the empty frame when the
/// pixel format cannot be scaled. With [`AspectRatio::Keep`] the area outside
/// the fitted rectangle stays zeroed.
pub fn scale_frame(
    frame: &Frame,
    width: u32,
    height: u32,
    scaling: Scaling,
    aspect_ratio: AspectRatio,
) -> Frame {
    if frame.width() == width && frame.height() == height {
        return frame.clone();
    }

    if !frame.pixel_format().is_adjustable() {
        tracing::debug!("Can't scale {} frames", frame.pixel_format());
        return Frame::empty();
    }

    let mut dst = Frame::new(frame.format().with_size(width, height));

    if frame.is_empty() || dst.is_empty() {
        return Frame::empty();
    }

    let src_w = i64::from(frame.width());
    let src_h = i64::from(frame.height());
    let w = i64::from(width);
    let h = i64::from(height);

    let mut x_dst_min = 0;
    let mut y_dst_min = 0;
    let mut x_dst_max = w;
    let mut y_dst_max = h;

    if aspect_ratio == AspectRatio::Keep {
        if w * src_h > src_w * h {
            // Bars left and right
            x_dst_min = (w * src_h - src_w * h) / (2 * src_h);
            x_dst_max = (w * src_h + src_w * h) / (2 * src_h);
        } else if w * src_h < src_w * h {
            // Bars top and bottom
            y_dst_min = (src_w * h - w * src_h) / (2 * src_w);
            y_dst_max = (src_w * h + w * src_h) / (2 * src_w);
        }
    }

    let mut i_width = src_w - 1;
    let mut i_height = src_h - 1;
    let mut o_width = x_dst_max - x_dst_min - 1;
    let mut o_height = y_dst_max - y_dst_min - 1;

    let mut x_axis = Axis {
        num: i_width,
        den: o_width,
        shift: 0,
        last: src_w - 1,
    };
    let mut y_axis = Axis {
        num: i_height,
        den: o_height,
        shift: 0,
        last: src_h - 1,
    };

    if aspect_ratio == AspectRatio::Expanding {
        // Leave room for the second bilinear sample
        if scaling == Scaling::Linear {
            i_width -= 1;
            i_height -= 1;
            o_width -= 1;
            o_height -= 1;
        }

        if w * src_h < src_w * h {
            // Crop left and right
            x_axis.num = 2 * i_height;
            x_axis.den = 2 * o_height;
            x_axis.shift = i_width * o_height - o_width * i_height;
        } else if w * src_h > src_w * h {
            // Crop top and bottom
            y_axis.num = 2 * i_width;
            y_axis.den = 2 * o_width;
            y_axis.shift = o_width * i_height - i_width * o_height;
        }
    }

    let columns = (x_dst_min as usize)..(x_dst_max as usize);

    match scaling {
        Scaling::Fast => {
            let src_x: Vec<usize> = (0..columns.len() as i64).map(|x| x_axis.nearest(x)).collect();

            for y in y_dst_min..y_dst_max {
                let src_line = frame.line(0, y_axis.nearest(y - y_dst_min));
                let dst_line = dst.line_mut(0, y as usize);

                for (x, &sx) in columns.clone().zip(&src_x) {
                    dst_line[3 * x..3 * x + 3].copy_from_slice(pixel(src_line, sx));
                }
            }
        }
        Scaling::Linear => {
            let enlarge_x = src_w < w;
            let enlarge_y = src_h < h;
            let samples_x: Vec<Sample> = (0..columns.len() as i64)
                .map(|x| x_axis.sample(x, enlarge_x))
                .collect();

            for y in y_dst_min..y_dst_max {
                let sy = y_axis.sample(y - y_dst_min, enlarge_y);
                let min_line = frame.line(0, sy.min);
                let max_line = frame.line(0, sy.max);
                let dst_line = dst.line_mut(0, y as usize);

                for (x, sx) in columns.clone().zip(&samples_x) {
                    let color_min = lerp_pixel(
                        pixel(min_line, sx.min),
                        pixel(min_line, sx.max),
                        sx.k_num,
                        sx.k_den,
                    );
                    let color_max = lerp_pixel(
                        pixel(max_line, sx.min),
                        pixel(max_line, sx.max),
                        sx.k_num,
                        sx.k_den,
                    );

                    dst_line[3 * x..3 * x + 3]
                        .copy_from_slice(&lerp_pixel(&color_min, &color_max, sy.k_num, sy.k_den));
                }
            }
        }
    }

    dst
}
