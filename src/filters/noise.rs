//! Noise generation, noise blending and median noise removal.
//!
//! Generators draw every sample sequentially from the caller's RNG so a
//! seeded generator always produces the same image. Blending and the
//! median filter run band-parallel.

use std::str::FromStr;

use log::trace;
use rand::Rng;

use super::core::clamp_param;
use crate::error::{RasterError, Result};
use crate::parallel::execute_like;
use crate::raster::{luminance, Pixel, Raster, Sample, CHANNELS};

// ============================================================================
// Median filter
// ============================================================================

/// Apply a median filter to an RGBA raster.
///
/// Each channel of the `box` x `box` window is sorted independently and the
/// element at `len / 2` is taken, so the output color need not appear in the
/// window. Only pixels whose whole window lies inside the image are
/// filtered; the remaining border pixels are copied unchanged.
///
/// # Arguments
/// * `src` - Source raster
/// * `box_size` - Window side, clamped to 3..=30
pub fn median<T: Sample>(src: &Raster<T>, box_size: u32) -> Result<Raster<T>> {
    let box_size = clamp_param("box", box_size, 3, 30) as usize;
    let edge = box_size / 2;
    let (width, height) = (src.width(), src.height());
    trace!("median box={box_size} on {width}x{height}");

    let interior = |pos: usize, extent: usize| pos >= edge && pos + box_size - edge <= extent;

    execute_like(src, |band| {
        let mut window: [Vec<T>; CHANNELS] = std::array::from_fn(|_| Vec::with_capacity(box_size * box_size));

        for y in band.rows() {
            for x in 0..width {
                if !interior(x, width) || !interior(y, height) {
                    band.set_pixel(x, y, src.pixel(x, y));
                    continue;
                }

                for samples in window.iter_mut() {
                    samples.clear();
                }
                for wy in (y - edge)..(y - edge + box_size) {
                    for wx in (x - edge)..(x - edge + box_size) {
                        let px = src.pixel(wx, wy);
                        for c in 0..CHANNELS {
                            window[c].push(px[c]);
                        }
                    }
                }

                let mid = box_size * box_size / 2;
                let mut out: Pixel<T> = [T::default(); CHANNELS];
                for c in 0..CHANNELS {
                    let (_, m, _) = window[c].select_nth_unstable(mid);
                    out[c] = *m;
                }
                band.set_pixel(x, y, out);
            }
        }
        Ok(())
    })
}

// ============================================================================
// Noise generators
// ============================================================================

/// Kind of noise mixed in by [`blend_noise`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoiseKind {
    /// Independent random R, G and B.
    Color,
    /// Random luminance, R = G = B.
    Gray,
    /// Luminance thresholded at 50% to black or white.
    Binary,
}

impl FromStr for NoiseKind {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "color" => Ok(NoiseKind::Color),
            "gray" => Ok(NoiseKind::Gray),
            "binary" => Ok(NoiseKind::Binary),
            _ => Err(RasterError::UnknownName {
                kind: "noise",
                name: s.to_string(),
            }),
        }
    }
}

/// Generate an opaque color-noise raster.
pub fn noise_color<T: Sample>(width: usize, height: usize, rng: &mut impl Rng) -> Raster<T> {
    let max = T::MAX.to_i64();
    let mut img = Raster::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = T::from_i64(rng.gen_range(0..max));
            let g = T::from_i64(rng.gen_range(0..max));
            let b = T::from_i64(rng.gen_range(0..max));
            img.set_pixel(x, y, [r, g, b, T::MAX]);
        }
    }
    img
}

/// 50% of the 8-bit range, in whole levels.
const BINARY_THRESHOLD: f64 = 127.0;

/// Random 8-bit luminance in `[0, 255)`.
fn random_luminance(rng: &mut impl Rng) -> f64 {
    let px: Pixel<u8> = [rng.gen_range(0..255), rng.gen_range(0..255), rng.gen_range(0..255), 255];
    luminance(&px)
}

/// Generate an opaque black-and-white noise raster.
pub fn noise_binary<T: Sample>(width: usize, height: usize, rng: &mut impl Rng) -> Raster<T> {
    let mut img = Raster::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = if random_luminance(rng) > BINARY_THRESHOLD {
                T::MAX
            } else {
                T::default()
            };
            img.set_pixel(x, y, [v, v, v, T::MAX]);
        }
    }
    img
}

/// Generate an opaque grayscale noise raster.
pub fn noise_gray<T: Sample>(width: usize, height: usize, rng: &mut impl Rng) -> Raster<T> {
    let scale = T::MAX_F64 / 255.0;
    let mut img = Raster::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let level = random_luminance(rng).trunc() * scale;
            let v = T::from_f64(level.round());
            img.set_pixel(x, y, [v, v, v, T::MAX]);
        }
    }
    img
}

/// Blend generated noise into an image.
///
/// `out = alpha * src + (1 - alpha) * noise` on every channel, alpha
/// included. Higher `alpha` keeps more of the source.
///
/// # Arguments
/// * `src` - Source raster
/// * `alpha` - Blend factor, clamped to 0.0..=1.0
/// * `kind` - Noise pattern to mix in
/// * `rng` - Random source for the noise pattern
pub fn blend_noise<T: Sample>(
    src: &Raster<T>,
    alpha: f64,
    kind: NoiseKind,
    rng: &mut impl Rng,
) -> Result<Raster<T>> {
    let alpha = clamp_param("alpha", alpha, 0.0, 1.0);
    let (width, height) = (src.width(), src.height());
    let noise: Raster<T> = match kind {
        NoiseKind::Color => noise_color(width, height, rng),
        NoiseKind::Gray => noise_gray(width, height, rng),
        NoiseKind::Binary => noise_binary(width, height, rng),
    };
    trace!("blend_noise alpha={alpha} kind={kind:?}");

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let a = src.pixel(x, y);
                let b = noise.pixel(x, y);
                let mut out = [T::default(); CHANNELS];
                for c in 0..CHANNELS {
                    out[c] = T::from_f64(alpha * a[c].to_f64() + (1.0 - alpha) * b[c].to_f64());
                }
                band.set_pixel(x, y, out);
            }
        }
        Ok(())
    })
}
