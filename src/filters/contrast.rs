//! Contrast enhancement: unsharp masking, linear stretching and the
//! logarithmic transform.

use log::trace;
use ndarray::Axis;

use super::blur::gaussian_blur;
use super::core::clamp_param;
use crate::error::Result;
use crate::parallel::execute_like;
use crate::raster::{Raster, Sample};

/// Sharpen by adding back the difference to a blurred copy.
///
/// `out = v + (v - blurred) * variation` on RGB, clamped. Alpha is kept.
///
/// # Arguments
/// * `src` - Source raster
/// * `variation` - Sharpening strength, clamped to 0.0..=1.0
/// * `blur_level` - Blur applied to build the mask, clamped to 1..=20
pub fn unsharp_mask<T: Sample>(src: &Raster<T>, variation: f64, blur_level: u32) -> Result<Raster<T>> {
    let variation = clamp_param("variation", variation, 0.0, 1.0);
    let blur_level = clamp_param("blur_level", blur_level, 1, 20);
    let blurred = gaussian_blur(src, blur_level)?;
    let width = src.width();
    trace!("unsharp_mask variation={variation} blur_level={blur_level}");

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let px = src.pixel(x, y);
                let bl = blurred.pixel(x, y);
                let mut out = px;
                for c in 0..3 {
                    let diff = px[c].to_i64() - bl[c].to_i64();
                    out[c] = T::from_i64(px[c].to_i64() + (diff as f64 * variation) as i64);
                }
                band.set_pixel(x, y, out);
            }
        }
        Ok(())
    })
}

/// Min and max sample of channel `c` over the whole raster.
fn channel_range<T: Sample>(src: &Raster<T>, c: usize) -> (T, T) {
    src.view()
        .index_axis(Axis(2), c)
        .fold((T::MAX, T::default()), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Linearly map `[min, max]` onto the full sample range.
#[inline]
fn stretch<T: Sample>(value: T, min: T, max: T) -> T {
    if max == min {
        return value;
    }
    let span = (max.to_i64() - min.to_i64()) as f64;
    T::from_f64(T::MAX_F64 * ((value.to_i64() - min.to_i64()) as f64 / span))
}

/// Stretch each RGB channel independently to the full range.
///
/// Channels that hold a single value are left as they are. Alpha is kept.
pub fn linear_contrast_stretch<T: Sample>(src: &Raster<T>) -> Result<Raster<T>> {
    let ranges = [
        channel_range(src, 0),
        channel_range(src, 1),
        channel_range(src, 2),
    ];
    trace!("linear_contrast_stretch ranges={ranges:?}");
    let width = src.width();

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let mut px = src.pixel(x, y);
                for (c, &(lo, hi)) in ranges.iter().enumerate() {
                    px[c] = stretch(px[c], lo, hi);
                }
                band.set_pixel(x, y, px);
            }
        }
        Ok(())
    })
}

#[inline]
fn channel_mean<T: Sample>(px: &[T; 4]) -> T {
    T::from_i64((px[0].to_i64() + px[1].to_i64() + px[2].to_i64()) / 3)
}

/// Convert to gray (mean of RGB) and stretch the gray range to full scale.
///
/// The result is opaque.
pub fn linear_contrast_stretch_gray<T: Sample>(src: &Raster<T>) -> Result<Raster<T>> {
    let (lo, hi) = src
        .view()
        .lanes(Axis(2))
        .into_iter()
        .map(|lane| channel_mean(&[lane[0], lane[1], lane[2], lane[3]]))
        .fold((T::MAX, T::default()), |(lo, hi), v| (lo.min(v), hi.max(v)));
    trace!("linear_contrast_stretch_gray range={lo:?}..={hi:?}");
    let width = src.width();

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let gray = stretch(channel_mean(&src.pixel(x, y)), lo, hi);
                band.set_pixel(x, y, [gray, gray, gray, T::MAX]);
            }
        }
        Ok(())
    })
}

/// Apply `ln(1 + k*v) / ln(1 + k)` to normalized RGB.
///
/// Positive `k` lifts shadows, negative `k` deepens them. `k = 0` and
/// `k = -1` are singular and are nudged to 0.01 and -0.99 before the pass.
///
/// # Arguments
/// * `src` - Source raster
/// * `variation` - `k`, clamped to -1.0..=1.0
pub fn logarithmic_transform<T: Sample>(src: &Raster<T>, variation: f64) -> Result<Raster<T>> {
    let mut k = clamp_param("variation", variation, -1.0, 1.0);
    if k == 0.0 {
        k = 0.01;
    } else if k == -1.0 {
        k = -0.99;
    }
    let denom = (1.0 + k).ln();
    let width = src.width();
    trace!("logarithmic_transform k={k}");

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let mut px = src.pixel(x, y);
                for v in px.iter_mut().take(3) {
                    let n = v.to_f64() / T::MAX_F64;
                    *v = T::from_f64((1.0 + k * n).ln() / denom * T::MAX_F64);
                }
                band.set_pixel(x, y, px);
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Rgba16, Rgba8};

    fn step_edge() -> Rgba8 {
        let mut img = Rgba8::new(8, 4);
        for y in 0..4 {
            for x in 0..8 {
                let v = if x < 4 { 60 } else { 180 };
                img.set_pixel(x, y, [v, v, v, 200]);
            }
        }
        img
    }

    #[test]
    fn test_unsharp_zero_variation_is_identity() {
        let img = step_edge();
        assert_eq!(unsharp_mask(&img, 0.0, 5).unwrap(), img);
    }

    #[test]
    fn test_unsharp_flat_is_identity() {
        let img = Rgba8::filled(6, 6, [90, 10, 250, 255]);
        assert_eq!(unsharp_mask(&img, 1.0, 7).unwrap(), img);
    }

    #[test]
    fn test_unsharp_increases_edge_contrast() {
        let img = step_edge();
        let result = unsharp_mask(&img, 1.0, 5).unwrap();
        assert!(result.pixel(3, 1)[0] < 60);
        assert!(result.pixel(4, 1)[0] > 180);
        assert_eq!(result.pixel(3, 1)[3], 200);
    }

    #[test]
    fn test_linear_stretch_per_channel() {
        let mut img = Rgba8::new(2, 1);
        img.set_pixel(0, 0, [50, 7, 0, 9]);
        img.set_pixel(1, 0, [150, 7, 255, 9]);
        let result = linear_contrast_stretch(&img).unwrap();
        assert_eq!(result.pixel(0, 0), [0, 7, 0, 9]);
        assert_eq!(result.pixel(1, 0), [255, 7, 255, 9]);
    }

    #[test]
    fn test_linear_stretch_midpoint() {
        let mut img = Rgba16::new(3, 1);
        img.set_pixel(0, 0, [1000, 0, 0, 65535]);
        img.set_pixel(1, 0, [2000, 0, 0, 65535]);
        img.set_pixel(2, 0, [3000, 0, 0, 65535]);
        let result = linear_contrast_stretch(&img).unwrap();
        assert_eq!(result.pixel(1, 0)[0], 32767);
    }

    #[test]
    fn test_linear_stretch_gray() {
        let mut img = Rgba8::new(3, 1);
        img.set_pixel(0, 0, [90, 90, 90, 10]);
        img.set_pixel(1, 0, [100, 110, 120, 10]);
        img.set_pixel(2, 0, [130, 130, 130, 10]);
        let result = linear_contrast_stretch_gray(&img).unwrap();
        assert_eq!(result.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(result.pixel(1, 0), [127, 127, 127, 255]);
        assert_eq!(result.pixel(2, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_log_transform_fixed_points() {
        let mut img = Rgba16::new(2, 1);
        img.set_pixel(0, 0, [0, 0, 0, 123]);
        img.set_pixel(1, 0, [65535, 65535, 65535, 123]);
        for k in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let result = logarithmic_transform(&img, k).unwrap();
            assert_eq!(result.pixel(0, 0), [0, 0, 0, 123]);
            assert_eq!(result.pixel(1, 0), [65535, 65535, 65535, 123]);
        }
    }

    #[test]
    fn test_log_transform_direction() {
        let img = Rgba8::filled(1, 1, [128, 128, 128, 255]);
        let bright = logarithmic_transform(&img, 1.0).unwrap().pixel(0, 0)[0];
        let dark = logarithmic_transform(&img, -0.9).unwrap().pixel(0, 0)[0];
        assert!(bright > 128, "got {bright}");
        assert!(dark < 128, "got {dark}");
    }
}
