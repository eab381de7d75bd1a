//! Gaussian blur for RGBA rasters.
//!
//! Separable 2-pass convolution (horizontal then vertical), each pass run
//! band-parallel over the output rows. Borders are sampled by reflection.
//! Alpha is blurred along with RGB.

use log::trace;

use super::core::{clamp_param, gaussian_kernel, reflect, Kernel};
use crate::error::Result;
use crate::parallel::execute_like;
use crate::raster::{Raster, Sample, CHANNELS};

/// Apply Gaussian blur to an RGBA raster.
///
/// # Arguments
/// * `src` - Source raster
/// * `level` - Kernel size, clamped to 0..=30. Levels 0 and 1 produce a
///   single-tap kernel and leave the image unchanged.
///
/// # Returns
/// Blurred raster with the same dimensions. Convolved samples are rounded
/// to the nearest value, not truncated.
pub fn gaussian_blur<T: Sample>(src: &Raster<T>, level: u32) -> Result<Raster<T>> {
    let level = clamp_param("level", level, 0, 30);
    let kernel = gaussian_kernel(level as usize);
    trace!("gaussian_blur level={level} taps={}", kernel.len());
    blur_with_kernel(src, &kernel)
}

/// Run both separable passes with an explicit kernel.
pub(crate) fn blur_with_kernel<T: Sample>(src: &Raster<T>, kernel: &Kernel) -> Result<Raster<T>> {
    let horizontal = convolve_pass(src, kernel, Direction::Horizontal)?;
    convolve_pass(&horizontal, kernel, Direction::Vertical)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Horizontal,
    Vertical,
}

fn convolve_pass<T: Sample>(src: &Raster<T>, kernel: &Kernel, direction: Direction) -> Result<Raster<T>> {
    let (width, height) = (src.width(), src.height());
    let pad = kernel.radius() as isize;
    let weights = kernel.weights();

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let mut acc = [0.0f64; CHANNELS];

                for (k, &w) in weights.iter().enumerate() {
                    let offset = k as isize - pad;
                    let (sx, sy) = match direction {
                        Direction::Horizontal => (reflect(x as isize + offset, width), y),
                        Direction::Vertical => (x, reflect(y as isize + offset, height)),
                    };
                    let px = src.pixel(sx, sy);
                    for c in 0..CHANNELS {
                        acc[c] += px[c].to_f64() * w;
                    }
                }

                band.set_pixel(x, y, acc.map(|v| T::from_f64(v.round())));
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Rgba16, Rgba8};

    fn checkerboard(width: usize, height: usize) -> Rgba8 {
        let mut img = Rgba8::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                img.set_pixel(x, y, [v, v / 2, 255 - v, 255]);
            }
        }
        img
    }

    #[test]
    fn test_blur_level_zero_and_one_are_identity() {
        let img = checkerboard(7, 5);
        assert_eq!(gaussian_blur(&img, 0).unwrap(), img);
        assert_eq!(gaussian_blur(&img, 1).unwrap(), img);
    }

    #[test]
    fn test_blur_rounds_to_nearest() {
        let mut img = Rgba8::filled(3, 1, [0, 0, 0, 255]);
        img.set_pixel(1, 0, [100, 0, 0, 255]);
        let result = gaussian_blur(&img, 3).unwrap();
        // Center tap weight is about 0.787, so 78.7 rounds up
        assert_eq!(result.pixel(1, 0), [79, 0, 0, 255]);
        assert_eq!(result.pixel(0, 0), [21, 0, 0, 255]);
    }

    #[test]
    fn test_blur_uniform_is_invariant() {
        let img = Rgba16::filled(9, 6, [40000, 1234, 65535, 65535]);
        let result = gaussian_blur(&img, 12).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_blur_smooths_checkerboard() {
        let img = checkerboard(8, 8);
        let result = gaussian_blur(&img, 5).unwrap();
        let center = result.pixel(4, 4);
        assert!(center[0] > 60 && center[0] < 195, "got {:?}", center);
        assert_eq!(center[3], 255);
    }

    #[test]
    fn test_blur_level_clamped() {
        let img = checkerboard(6, 6);
        assert_eq!(
            gaussian_blur(&img, 500).unwrap(),
            gaussian_blur(&img, 30).unwrap()
        );
    }

    #[test]
    fn test_blur_kernel_wider_than_image() {
        let img = Rgba8::filled(2, 1, [255, 255, 255, 255]);
        let result = gaussian_blur(&img, 30).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_blur_empty() {
        let img = Rgba8::new(0, 0);
        assert!(gaussian_blur(&img, 3).unwrap().is_empty());
    }
}
