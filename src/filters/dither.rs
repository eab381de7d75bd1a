//! Error-diffusion and ordered (Bayer) dithering.
//!
//! Error diffusion is a single raster-scan pass: each pixel is quantized in
//! place and its residual is pushed onto not-yet-visited neighbors, so it
//! runs sequentially. Ordered dithering is independent per pixel and runs
//! band-parallel.

use std::fmt;
use std::str::FromStr;

use log::trace;

use super::core::{bayer_matrix, clamp_param, Quantizer};
use crate::error::{RasterError, Result};
use crate::parallel::execute_like;
use crate::raster::{Raster, Sample, CHANNELS};

// ============================================================================
// Error diffusion
// ============================================================================

/// Error-diffusion weight pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiffusionKernel {
    FloydSteinberg,
    FalseFloydSteinberg,
    JarvisJudiceNinke,
    Stucki,
    Atkinson,
    Sierra,
    TwoRowSierra,
    SierraLite,
    /// Plain quantization, nothing is diffused.
    None,
}

/// `(dx, dy, weight)` offsets relative to the current pixel.
type Tap = (isize, isize, f64);

const FLOYD_STEINBERG: &[Tap] = &[
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

const FALSE_FLOYD_STEINBERG: &[Tap] = &[(1, 0, 3.0 / 8.0), (0, 1, 3.0 / 8.0), (1, 1, 2.0 / 8.0)];

const JARVIS_JUDICE_NINKE: &[Tap] = &[
    (1, 0, 7.0 / 48.0),
    (2, 0, 5.0 / 48.0),
    (-2, 1, 3.0 / 48.0),
    (-1, 1, 5.0 / 48.0),
    (0, 1, 7.0 / 48.0),
    (1, 1, 5.0 / 48.0),
    (2, 1, 3.0 / 48.0),
    (-2, 2, 1.0 / 48.0),
    (-1, 2, 3.0 / 48.0),
    (0, 2, 5.0 / 48.0),
    (1, 2, 3.0 / 48.0),
    (2, 2, 1.0 / 48.0),
];

const STUCKI: &[Tap] = &[
    (1, 0, 8.0 / 42.0),
    (2, 0, 4.0 / 42.0),
    (-2, 1, 2.0 / 42.0),
    (-1, 1, 4.0 / 42.0),
    (0, 1, 8.0 / 42.0),
    (1, 1, 4.0 / 42.0),
    (2, 1, 2.0 / 42.0),
    (-2, 2, 1.0 / 42.0),
    (-1, 2, 2.0 / 42.0),
    (0, 2, 4.0 / 42.0),
    (1, 2, 2.0 / 42.0),
    (2, 2, 1.0 / 42.0),
];

// Diffuses only 6/8 of the residual.
const ATKINSON: &[Tap] = &[
    (1, 0, 1.0 / 8.0),
    (2, 0, 1.0 / 8.0),
    (-1, 1, 1.0 / 8.0),
    (0, 1, 1.0 / 8.0),
    (1, 1, 1.0 / 8.0),
    (0, 2, 1.0 / 8.0),
];

const SIERRA: &[Tap] = &[
    (1, 0, 5.0 / 32.0),
    (2, 0, 3.0 / 32.0),
    (-2, 1, 2.0 / 32.0),
    (-1, 1, 4.0 / 32.0),
    (0, 1, 5.0 / 32.0),
    (1, 1, 4.0 / 32.0),
    (2, 1, 2.0 / 32.0),
    (-1, 2, 2.0 / 32.0),
    (0, 2, 3.0 / 32.0),
    (1, 2, 2.0 / 32.0),
];

const TWO_ROW_SIERRA: &[Tap] = &[
    (1, 0, 4.0 / 16.0),
    (2, 0, 3.0 / 16.0),
    (-2, 1, 1.0 / 16.0),
    (-1, 1, 2.0 / 16.0),
    (0, 1, 3.0 / 16.0),
    (1, 1, 2.0 / 16.0),
    (2, 1, 1.0 / 16.0),
];

const SIERRA_LITE: &[Tap] = &[(1, 0, 2.0 / 4.0), (-1, 1, 1.0 / 4.0), (0, 1, 1.0 / 4.0)];

impl DiffusionKernel {
    pub const ALL: [DiffusionKernel; 9] = [
        DiffusionKernel::FloydSteinberg,
        DiffusionKernel::FalseFloydSteinberg,
        DiffusionKernel::JarvisJudiceNinke,
        DiffusionKernel::Stucki,
        DiffusionKernel::Atkinson,
        DiffusionKernel::Sierra,
        DiffusionKernel::TwoRowSierra,
        DiffusionKernel::SierraLite,
        DiffusionKernel::None,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DiffusionKernel::FloydSteinberg => "floyd-steinberg",
            DiffusionKernel::FalseFloydSteinberg => "false-floyd-steinberg",
            DiffusionKernel::JarvisJudiceNinke => "jarvis-judice-ninke",
            DiffusionKernel::Stucki => "stucki",
            DiffusionKernel::Atkinson => "atkinson",
            DiffusionKernel::Sierra => "sierra",
            DiffusionKernel::TwoRowSierra => "two-row-sierra",
            DiffusionKernel::SierraLite => "sierra-lite",
            DiffusionKernel::None => "none",
        }
    }

    /// Neighbor offsets and the share of the residual each receives.
    pub fn taps(&self) -> &'static [(isize, isize, f64)] {
        match self {
            DiffusionKernel::FloydSteinberg => FLOYD_STEINBERG,
            DiffusionKernel::FalseFloydSteinberg => FALSE_FLOYD_STEINBERG,
            DiffusionKernel::JarvisJudiceNinke => JARVIS_JUDICE_NINKE,
            DiffusionKernel::Stucki => STUCKI,
            DiffusionKernel::Atkinson => ATKINSON,
            DiffusionKernel::Sierra => SIERRA,
            DiffusionKernel::TwoRowSierra => TWO_ROW_SIERRA,
            DiffusionKernel::SierraLite => SIERRA_LITE,
            DiffusionKernel::None => &[],
        }
    }
}

impl fmt::Display for DiffusionKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiffusionKernel {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        if name == "two-row-seirra" {
            return Ok(DiffusionKernel::TwoRowSierra);
        }
        DiffusionKernel::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| RasterError::UnknownName {
                kind: "diffusion kernel",
                name: s.to_string(),
            })
    }
}

/// Apply error-diffusion dithering.
///
/// All four channels are quantized to `level` evenly spaced values. The
/// residual of each pixel is added, truncated and clamped, to its in-bounds
/// neighbors per `kernel`; neighbors outside the image are skipped.
///
/// # Arguments
/// * `src` - Source raster
/// * `kernel` - Diffusion pattern
/// * `level` - Number of levels per channel, clamped to 1..=10
pub fn error_diffusion_dither<T: Sample>(
    src: &Raster<T>,
    kernel: DiffusionKernel,
    level: u32,
) -> Result<Raster<T>> {
    let level = clamp_param("level", level, 1, 10);
    let quantizer = Quantizer::new(level, T::MAX_F64)?;
    let taps = kernel.taps();
    trace!("error_diffusion_dither kernel={kernel} level={level}");

    let mut img = src.clone();
    for y in 0..img.height() {
        for x in 0..img.width() {
            let old = img.pixel(x, y);
            let mut residual = [0i64; CHANNELS];
            let mut new = old;
            for c in 0..CHANNELS {
                let q = T::from_f64(quantizer.quantize(old[c].to_f64()));
                residual[c] = old[c].to_i64() - q.to_i64();
                new[c] = q;
            }
            img.set_pixel(x, y, new);

            for &(dx, dy, weight) in taps {
                let (nx, ny) = (x as isize + dx, y as isize + dy);
                let Some(mut neighbor) = img.get(nx, ny) else {
                    continue;
                };
                for c in 0..CHANNELS {
                    let share = (residual[c] as f64 * weight) as i64;
                    neighbor[c] = T::from_i64(neighbor[c].to_i64() + share);
                }
                img.set_pixel(nx as usize, ny as usize, neighbor);
            }
        }
    }

    Ok(img)
}

// ============================================================================
// Ordered dithering
// ============================================================================

/// Dither one sample against a threshold in `[0, 1)`.
///
/// The sample is normalized, shifted by `(threshold - 0.5) / levels`,
/// snapped to the nearest level and scaled back.
#[inline]
pub fn ordered_dither_value<T: Sample>(value: T, quantizer: &Quantizer, threshold: f64) -> T {
    let normalized = value.to_f64() / T::MAX_F64;
    let adjusted = normalized + (threshold - 0.5) / quantizer.levels() as f64;
    let snapped = quantizer.snap_unit(adjusted);
    T::from_f64((snapped * T::MAX_F64).clamp(0.0, T::MAX_F64))
}

/// Apply ordered dithering with a tiled Bayer matrix.
///
/// # Arguments
/// * `src` - Source raster
/// * `level` - Number of levels per channel, clamped to 1..=20
/// * `size` - Matrix side, rounded up to a power of two
pub fn ordered_dither<T: Sample>(src: &Raster<T>, level: u32, size: usize) -> Result<Raster<T>> {
    let level = clamp_param("level", level, 1, 20);
    let quantizer = Quantizer::new(level, T::MAX_F64)?;
    let matrix = bayer_matrix(size);
    let n = matrix.nrows();
    let width = src.width();
    trace!("ordered_dither level={level} matrix={n}x{n}");

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let threshold = matrix[[x % n, y % n]];
                let px = src.pixel(x, y).map(|v| ordered_dither_value(v, &quantizer, threshold));
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

    fn gradient(width: usize, height: usize) -> Rgba8 {
        let mut img = Rgba8::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 255) / (width - 1).max(1)) as u8;
                img.set_pixel(x, y, [v, 255 - v, (y * 30) as u8, 255]);
            }
        }
        img
    }

    #[test]
    fn test_kernel_names_round_trip() {
        for kernel in DiffusionKernel::ALL {
            assert_eq!(kernel.name().parse::<DiffusionKernel>().unwrap(), kernel);
        }
        assert_eq!(
            "two-row-seirra".parse::<DiffusionKernel>().unwrap(),
            DiffusionKernel::TwoRowSierra
        );
        assert_eq!("Sierra".parse::<DiffusionKernel>().unwrap(), DiffusionKernel::Sierra);
    }

    #[test]
    fn test_unknown_kernel_name() {
        let err = "burkes".parse::<DiffusionKernel>().unwrap_err();
        assert_eq!(
            err,
            RasterError::UnknownName {
                kind: "diffusion kernel",
                name: "burkes".into()
            }
        );
    }

    #[test]
    fn test_kernel_weights() {
        for kernel in DiffusionKernel::ALL {
            let sum: f64 = kernel.taps().iter().map(|t| t.2).sum();
            let expected = match kernel {
                DiffusionKernel::Atkinson => 0.75,
                DiffusionKernel::None => 0.0,
                _ => 1.0,
            };
            assert!((sum - expected).abs() < 1e-12, "{kernel} sums to {sum}");
            // Only forward neighbors
            for &(dx, dy, _) in kernel.taps() {
                assert!(dy > 0 || (dy == 0 && dx > 0));
            }
        }
    }

    #[test]
    fn test_none_is_pure_quantization() {
        let img = gradient(17, 5);
        let result = error_diffusion_dither(&img, DiffusionKernel::None, 3).unwrap();
        let q = Quantizer::new(3, 255.0).unwrap();
        for y in 0..5 {
            for x in 0..17 {
                let expected = img.pixel(x, y).map(|v| q.quantize(v as f64) as u8);
                assert_eq!(result.pixel(x, y), expected);
            }
        }
    }

    #[test]
    fn test_floyd_steinberg_is_binary_at_two_levels() {
        let img = Rgba8::filled(16, 16, [128, 128, 128, 255]);
        let result = error_diffusion_dither(&img, DiffusionKernel::FloydSteinberg, 2).unwrap();
        let (mut black, mut white) = (0, 0);
        for y in 0..16 {
            for x in 0..16 {
                let p = result.pixel(x, y);
                match p[0] {
                    0 => black += 1,
                    255 => white += 1,
                    v => panic!("unexpected level {v}"),
                }
                assert_eq!(p[3], 255);
            }
        }
        assert!(black > 0 && white > 0);
    }

    #[test]
    fn test_diffusion_pushes_residual_right() {
        // 100 quantizes to 0 at two levels; 7/16 of 100 lands on the next pixel.
        let img = Rgba8::filled(2, 1, [100, 100, 100, 255]);
        let result = error_diffusion_dither(&img, DiffusionKernel::FloydSteinberg, 2).unwrap();
        assert_eq!(result.pixel(0, 0), [0, 0, 0, 255]);
        // 100 + 43 = 143 rounds up to 255
        assert_eq!(result.pixel(1, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_single_level_is_black() {
        let img = gradient(6, 3);
        let result = error_diffusion_dither(&img, DiffusionKernel::Atkinson, 0).unwrap();
        assert!(result.as_array().iter().all(|&v| v == 0));
        let ordered = ordered_dither(&img, 1, 4).unwrap();
        assert!(ordered.as_array().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_ordered_dither_pattern() {
        let img = Rgba16::filled(4, 4, [32768, 32768, 32768, 65535]);
        let result = ordered_dither(&img, 2, 2).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let expected = match (x % 2, y % 2) {
                    (0, 0) | (1, 1) => 0,
                    _ => 65535,
                };
                let p = result.pixel(x, y);
                assert_eq!(p[0], expected, "at ({x}, {y})");
                assert_eq!(p[3], 65535);
            }
        }
    }

    #[test]
    fn test_ordered_dither_extremes_stay_put() {
        let q = Quantizer::new(4, 255.0).unwrap();
        for th in [0.0, 0.25, 0.5, 0.9375] {
            assert_eq!(ordered_dither_value(0u8, &q, th), 0);
            assert_eq!(ordered_dither_value(255u8, &q, th), 255);
        }
    }

    #[test]
    fn test_ordered_dither_odd_size_matches_power_of_two() {
        let img = gradient(9, 9);
        assert_eq!(
            ordered_dither(&img, 3, 3).unwrap(),
            ordered_dither(&img, 3, 4).unwrap()
        );
    }
}
