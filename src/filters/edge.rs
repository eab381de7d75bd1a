//! Edge detection filters: gradient operators, Difference of Gaussians and
//! Laplacian of Gaussian.
//!
//! All filters work on BT.601 luminance and return an opaque grayscale
//! raster (R = G = B, A = max). Pixels without a full kernel footprint
//! inside the image are set to black.

use std::fmt;
use std::str::FromStr;

use log::trace;

use super::blur::gaussian_blur;
use super::core::clamp_param;
use crate::error::{RasterError, Result};
use crate::parallel::execute_like;
use crate::raster::{luminance, Raster, Sample};

#[inline]
fn gray<T: Sample>(value: f64) -> [T; 4] {
    let v = T::from_f64(value.clamp(0.0, T::MAX_F64));
    [v, v, v, T::MAX]
}

// ============================================================================
// Gradient operators
// ============================================================================

/// First-derivative kernel pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeOperator {
    Sobel,
    Prewitt,
    RobertsCross,
    Scharr,
}

type Kernel3 = [[i32; 3]; 3];

const SOBEL: (Kernel3, Kernel3) = (
    [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]],
    [[-1, -2, -1], [0, 0, 0], [1, 2, 1]],
);

const PREWITT: (Kernel3, Kernel3) = (
    [[-1, 0, 1], [-1, 0, 1], [-1, 0, 1]],
    [[-1, -1, -1], [0, 0, 0], [1, 1, 1]],
);

// 2x2, stored in the top-left corner.
const ROBERTS_CROSS: (Kernel3, Kernel3) = (
    [[1, 0, 0], [0, -1, 0], [0, 0, 0]],
    [[0, 1, 0], [-1, 0, 0], [0, 0, 0]],
);

const SCHARR: (Kernel3, Kernel3) = (
    [[-3, 0, 3], [-10, 0, 10], [-3, 0, 3]],
    [[-3, -10, -3], [0, 0, 0], [3, 10, 3]],
);

impl EdgeOperator {
    pub const ALL: [EdgeOperator; 4] = [
        EdgeOperator::Sobel,
        EdgeOperator::Prewitt,
        EdgeOperator::RobertsCross,
        EdgeOperator::Scharr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EdgeOperator::Sobel => "sobel",
            EdgeOperator::Prewitt => "prewitt",
            EdgeOperator::RobertsCross => "robert-cross",
            EdgeOperator::Scharr => "scharr",
        }
    }

    /// Kernel side: 3, or 2 for Roberts cross.
    pub fn size(&self) -> usize {
        match self {
            EdgeOperator::RobertsCross => 2,
            _ => 3,
        }
    }

    /// Horizontal and vertical kernels, indexed `[row][col]`.
    fn kernels(&self) -> &'static (Kernel3, Kernel3) {
        match self {
            EdgeOperator::Sobel => &SOBEL,
            EdgeOperator::Prewitt => &PREWITT,
            EdgeOperator::RobertsCross => &ROBERTS_CROSS,
            EdgeOperator::Scharr => &SCHARR,
        }
    }
}

impl fmt::Display for EdgeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeOperator {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        EdgeOperator::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| RasterError::UnknownName {
                kind: "edge operator",
                name: s.to_string(),
            })
    }
}

/// Gradient-magnitude edge detection.
///
/// The kernel footprint spans offsets `-1..=size-2` around each pixel.
///
/// # Arguments
/// * `src` - Source raster
/// * `operator` - Kernel pair to convolve luminance with
///
/// # Returns
/// Grayscale raster of `sqrt(gx^2 + gy^2)`, clamped to the sample range
pub fn kernel_edge_detect<T: Sample>(src: &Raster<T>, operator: EdgeOperator) -> Result<Raster<T>> {
    let (width, height) = (src.width(), src.height());
    let size = operator.size();
    let (kx, ky) = operator.kernels();
    trace!("kernel_edge_detect operator={operator}");

    let covered = |pos: usize, extent: usize| pos >= 1 && pos + size - 1 <= extent;

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                if !covered(x, width) || !covered(y, height) {
                    band.set_pixel(x, y, gray(0.0));
                    continue;
                }

                let (mut gx, mut gy) = (0.0f64, 0.0f64);
                for row in 0..size {
                    for col in 0..size {
                        let lum = luminance(&src.pixel(x + col - 1, y + row - 1));
                        gx += lum * kx[row][col] as f64;
                        gy += lum * ky[row][col] as f64;
                    }
                }

                band.set_pixel(x, y, gray((gx * gx + gy * gy).sqrt()));
            }
        }
        Ok(())
    })
}

// ============================================================================
// Gaussian-based detectors
// ============================================================================

/// Difference of Gaussians.
///
/// Blurs the source twice and outputs `|lum(blur1) - lum(blur2)|` as gray.
///
/// # Arguments
/// * `src` - Source raster
/// * `blur_one` - First blur level, clamped to 0..=20
/// * `blur_two` - Second blur level, clamped to 0..=20
pub fn difference_of_gaussians<T: Sample>(src: &Raster<T>, blur_one: u32, blur_two: u32) -> Result<Raster<T>> {
    let blur_one = clamp_param("blur_one", blur_one, 0, 20);
    let blur_two = clamp_param("blur_two", blur_two, 0, 20);
    let first = gaussian_blur(src, blur_one)?;
    let second = gaussian_blur(src, blur_two)?;
    let width = src.width();
    trace!("difference_of_gaussians {blur_one} - {blur_two}");

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let diff = luminance(&first.pixel(x, y)) - luminance(&second.pixel(x, y));
                band.set_pixel(x, y, gray(diff.abs()));
            }
        }
        Ok(())
    })
}

const LAPLACIAN: Kernel3 = [[0, 1, 0], [1, -4, 1], [0, 1, 0]];

/// Laplacian of Gaussian.
///
/// Blurs the source, convolves luminance with the 4-neighbor Laplacian and
/// outputs `|sum| * scaling` as gray. The one-pixel frame is black.
///
/// # Arguments
/// * `src` - Source raster
/// * `blur_level` - Pre-blur level, clamped to 0..=20
/// * `scaling` - Response gain, clamped to 5.0..=20.0
pub fn laplacian_of_gaussian<T: Sample>(src: &Raster<T>, blur_level: u32, scaling: f64) -> Result<Raster<T>> {
    let blur_level = clamp_param("blur_level", blur_level, 0, 20);
    let scaling = clamp_param("scaling", scaling, 5.0, 20.0);
    let blurred = gaussian_blur(src, blur_level)?;
    let (width, height) = (src.width(), src.height());
    trace!("laplacian_of_gaussian blur_level={blur_level} scaling={scaling}");

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
                    band.set_pixel(x, y, gray(0.0));
                    continue;
                }

                let mut sum = 0.0f64;
                for (row, weights) in LAPLACIAN.iter().enumerate() {
                    for (col, &w) in weights.iter().enumerate() {
                        if w != 0 {
                            sum += luminance(&blurred.pixel(x + col - 1, y + row - 1)) * w as f64;
                        }
                    }
                }

                band.set_pixel(x, y, gray(sum.abs() * scaling));
            }
        }
        Ok(())
    })
}
