//! Core utilities for image processing filters.
//!
//! This module provides shared functionality used by multiple filters:
//! - Gaussian kernel generation and reflected border sampling
//! - Bayer threshold matrices and level quantization
//! - Region averaging and the variable-size dot rasterizer used by the
//!   halftone, lines and pointillism families
//! - Parameter clamping

use std::fmt::Display;

use log::debug;
use ndarray::Array2;

use crate::error::{RasterError, Result};
use crate::parallel::{execute, Band, ParallelConfig};
use crate::raster::{Pixel, Raster, Sample, CHANNELS};

/// Clamp a filter parameter into `[min, max]`.
///
/// Out-of-range parameters are never an error. NaN clamps to `min`.
pub fn clamp_param<V>(name: &str, value: V, min: V, max: V) -> V
where
    V: PartialOrd + Copy + Display,
{
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    let clamped = if !(value >= min) {
        min
    } else if value > max {
        max
    } else {
        value
    };
    if clamped != value {
        debug!("{name}={value} clamped to {clamped} (valid range {min}..={max})");
    }
    clamped
}

// ============================================================================
// Convolution kernels
// ============================================================================

/// Normalized 1D convolution kernel of odd length.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    weights: Vec<f64>,
}

impl Kernel {
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Taps on each side of the center.
    pub fn radius(&self) -> usize {
        self.weights.len() / 2
    }
}

/// Generate a 1D Gaussian kernel.
///
/// Even sizes are bumped to the next odd size. `sigma = size / 6` so the
/// kernel spans three standard deviations on each side.
///
/// # Arguments
/// * `size` - Number of taps
///
/// # Returns
/// Kernel whose weights sum to 1.0
pub fn gaussian_kernel(size: usize) -> Kernel {
    let size = if size % 2 == 0 { size + 1 } else { size };
    let sigma = size as f64 / 6.0;
    let center = (size / 2) as f64;
    let norm = (2.0 * std::f64::consts::PI).sqrt() * sigma;

    let mut weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (-(x * x) / (2.0 * sigma * sigma)).exp() / norm
        })
        .collect();

    let sum: f64 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= sum;
    }

    Kernel { weights }
}

/// Mirror an out-of-range sample index back into `[0, extent)`.
///
/// `-i` below zero, `2 * extent - i - 1` past the end. Kernels wider than
/// the image can still land outside after one reflection; those clamp to
/// the nearest edge.
#[inline]
pub fn reflect(i: isize, extent: usize) -> usize {
    let n = extent as isize;
    let mut i = i;
    if i < 0 {
        i = -i;
    }
    if i >= n {
        i = 2 * n - i - 1;
    }
    i.clamp(0, n - 1) as usize
}

// ============================================================================
// Threshold matrices and quantization
// ============================================================================

/// Build a Bayer threshold matrix with values in `[0, 1)`.
///
/// `size` is rounded up to the next power of two (minimum 2). The matrix is
/// indexed `[[x, y]]`; the 2x2 base is `[[0, 0.5], [0.75, 0.25]]` and each
/// doubling embeds four scaled-and-offset copies of the smaller matrix.
pub fn bayer_matrix(size: usize) -> Array2<f64> {
    let size = size.max(2).next_power_of_two();
    if size == 2 {
        return ndarray::arr2(&[[0.0, 0.5], [0.75, 0.25]]);
    }

    let half = size / 2;
    let smaller = bayer_matrix(half);
    let mut matrix = Array2::<f64>::zeros((size, size));

    for x in 0..half {
        for y in 0..half {
            let quarter = smaller[[x, y]] / 4.0;
            matrix[[x, y]] = quarter;
            matrix[[x, y + half]] = quarter + 0.5;
            matrix[[x + half, y]] = quarter + 0.75;
            matrix[[x + half, y + half]] = quarter + 0.25;
        }
    }

    matrix
}

/// Evenly spaced quantization of samples in `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantizer {
    levels: u32,
    max: f64,
}

impl Quantizer {
    /// A single level maps everything to zero; zero levels is rejected.
    pub fn new(levels: u32, max: f64) -> Result<Self> {
        if levels == 0 {
            return Err(RasterError::InvalidArgument(
                "quantization needs at least one level".into(),
            ));
        }
        Ok(Quantizer { levels, max })
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Snap a sample to the nearest level, truncated to an integer sample.
    #[inline]
    pub fn quantize(&self, value: f64) -> f64 {
        if self.levels == 1 {
            return 0.0;
        }
        let steps = (self.levels - 1) as f64;
        let step = self.max / steps;
        ((value * steps / self.max).round() * step)
            .trunc()
            .clamp(0.0, self.max)
    }

    /// Snap a normalized value to `floor(v * (levels - 1) + 0.5) / (levels - 1)`.
    #[inline]
    pub fn snap_unit(&self, normalized: f64) -> f64 {
        if self.levels == 1 {
            return 0.0;
        }
        let steps = (self.levels - 1) as f64;
        (normalized * steps + 0.5).floor() / steps
    }
}

// ============================================================================
// Neighborhood primitives
// ============================================================================

/// Average color of a list of pixels, channel by channel.
///
/// Returns transparent black for an empty list.
pub fn color_average<T: Sample>(pixels: &[Pixel<T>]) -> Pixel<T> {
    if pixels.is_empty() {
        return [T::default(); CHANNELS];
    }
    let mut sums = [0i64; CHANNELS];
    for px in pixels {
        for c in 0..CHANNELS {
            sums[c] += px[c].to_i64();
        }
    }
    let count = pixels.len() as i64;
    sums.map(|s| T::from_i64(s / count))
}

/// In-bounds pixels of the half-open rectangle `[x0, x1) x [y0, y1)`.
pub fn sample_region<T: Sample>(
    src: &Raster<T>,
    x0: isize,
    y0: isize,
    x1: isize,
    y1: isize,
) -> Vec<Pixel<T>> {
    let xs = x0.max(0)..x1.min(src.width() as isize);
    let ys = y0.max(0)..y1.min(src.height() as isize);
    let mut pixels = Vec::with_capacity(xs.len() * ys.len());
    for y in ys {
        for x in xs.clone() {
            pixels.push(src.pixel(x as usize, y as usize));
        }
    }
    pixels
}

/// Dot radius for a cell: darker cells get bigger dots.
///
/// `(1 - luminance / max) * cell / 2`, truncated.
#[inline]
pub fn dot_radius(luminance: f64, max: f64, cell: usize) -> isize {
    ((1.0 - luminance / max) * cell as f64 / 2.0) as isize
}

/// A filled circle to be rasterized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dot<T: Sample> {
    pub x: isize,
    pub y: isize,
    pub radius: isize,
    pub color: Pixel<T>,
}

/// Fill the part of a circle that falls inside `band`.
///
/// A radius of 0 paints the center pixel; negative radii paint nothing.
pub fn fill_disc<T: Sample>(band: &mut Band<'_, T>, cx: isize, cy: isize, radius: isize, px: Pixel<T>) {
    let rows = band.rows();
    let top = (cy - radius).max(rows.start as isize);
    let bottom = (cy + radius).min(rows.end as isize - 1);
    let r_sq = radius * radius;

    for y in top..=bottom {
        let dy = y - cy;
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r_sq {
                band.put(cx + dx, y, px);
            }
        }
    }
}

/// Rasterize `dots` in order onto a transparent `width` x `height` canvas.
///
/// Every band replays the full list and keeps only its own rows, so
/// overlapping dots resolve exactly as a sequential painter would.
pub fn render_dots<T: Sample>(width: usize, height: usize, dots: &[Dot<T>]) -> Result<Raster<T>> {
    execute(&ParallelConfig::default(), width, height, |band| {
        let rows = band.rows();
        for dot in dots {
            if dot.y + dot.radius < rows.start as isize || dot.y - dot.radius >= rows.end as isize {
                continue;
            }
            fill_disc(band, dot.x, dot.y, dot.radius, dot.color);
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_forced_odd() {
        assert_eq!(gaussian_kernel(0).len(), 1);
        assert_eq!(gaussian_kernel(1).len(), 1);
        assert_eq!(gaussian_kernel(4).len(), 5);
        assert_eq!(gaussian_kernel(30).len(), 31);
    }

    #[test]
    fn test_kernel_weights_sum_to_one() {
        for size in 0..=31 {
            let sum: f64 = gaussian_kernel(size).weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "size {size} sums to {sum}");
        }
    }

    #[test]
    fn test_kernel_is_symmetric_and_peaked() {
        let k = gaussian_kernel(7);
        let w = k.weights();
        assert_eq!(k.radius(), 3);
        for i in 0..3 {
            assert!((w[i] - w[6 - i]).abs() < 1e-12);
            assert!(w[i] < w[i + 1]);
        }
        assert_eq!(gaussian_kernel(1).weights(), &[1.0]);
    }

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(-1, 5), 1);
        assert_eq!(reflect(-2, 5), 2);
        assert_eq!(reflect(0, 5), 0);
        assert_eq!(reflect(5, 5), 4);
        assert_eq!(reflect(6, 5), 3);
        // Wider than the image: falls back to the nearest edge
        assert_eq!(reflect(-3, 2), 0);
        assert_eq!(reflect(-1, 1), 0);
        assert_eq!(reflect(7, 2), 0);
    }

    #[test]
    fn test_bayer_2() {
        let m = bayer_matrix(2);
        assert_eq!(m, ndarray::arr2(&[[0.0, 0.5], [0.75, 0.25]]));
    }

    #[test]
    fn test_bayer_4() {
        let m = bayer_matrix(4);
        let expected = ndarray::arr2(&[
            [0.0, 0.125, 0.5, 0.625],
            [0.1875, 0.0625, 0.6875, 0.5625],
            [0.75, 0.875, 0.25, 0.375],
            [0.9375, 0.8125, 0.4375, 0.3125],
        ]);
        assert_eq!(m, expected);
    }

    #[test]
    fn test_bayer_rounds_up_to_power_of_two() {
        assert_eq!(bayer_matrix(0).dim(), (2, 2));
        assert_eq!(bayer_matrix(3), bayer_matrix(4));
        assert_eq!(bayer_matrix(6).dim(), (8, 8));

        // Every threshold k/64 appears exactly once
        let mut values: Vec<f64> = bayer_matrix(8).iter().map(|v| v * 64.0).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (i, v) in values.iter().enumerate() {
            assert_eq!(*v, i as f64);
        }
    }

    #[test]
    fn test_quantizer_rejects_zero_levels() {
        assert!(matches!(
            Quantizer::new(0, 255.0),
            Err(RasterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_quantizer_levels() {
        let q = Quantizer::new(2, 255.0).unwrap();
        assert_eq!(q.quantize(100.0), 0.0);
        assert_eq!(q.quantize(200.0), 255.0);

        let q = Quantizer::new(4, 255.0).unwrap();
        assert_eq!(q.quantize(100.0), 85.0);
        assert_eq!(q.quantize(128.0), 170.0);

        let single = Quantizer::new(1, 255.0).unwrap();
        assert_eq!(single.quantize(200.0), 0.0);
        assert_eq!(single.snap_unit(0.7), 0.0);
    }

    #[test]
    fn test_color_average() {
        let pixels: [Pixel<u8>; 2] = [[0, 100, 255, 255], [100, 100, 0, 255]];
        assert_eq!(color_average(&pixels), [50, 100, 127, 255]);
        assert_eq!(color_average::<u8>(&[]), [0, 0, 0, 0]);
    }

    #[test]
    fn test_dot_radius() {
        assert_eq!(dot_radius(0.0, 255.0, 10), 5);
        assert_eq!(dot_radius(255.0, 255.0, 10), 0);
        assert_eq!(dot_radius(127.5, 255.0, 10), 2);
    }

    #[test]
    fn test_clamp_param() {
        assert_eq!(clamp_param("level", 45, 0, 30), 30);
        assert_eq!(clamp_param("level", -3, 0, 30), 0);
        assert_eq!(clamp_param("level", 12, 0, 30), 12);
        assert_eq!(clamp_param("variation", f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_render_dots_later_dot_wins() {
        let dots = [
            Dot { x: 2, y: 2, radius: 2, color: [255u8, 0, 0, 255] },
            Dot { x: 3, y: 2, radius: 0, color: [0, 255, 0, 255] },
        ];
        let img = render_dots(6, 5, &dots).unwrap();
        assert_eq!(img.pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(img.pixel(3, 2), [0, 255, 0, 255]);
        assert_eq!(img.pixel(2, 0), [255, 0, 0, 255]);
        assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(img.pixel(5, 2), [0, 0, 0, 0]);
    }
}
