//! Stylize filters: Voronoi pixelation, Kuwahara, chromatic aberration.

use log::trace;
use rand::Rng;

use super::core::{clamp_param, color_average, sample_region};
use crate::error::Result;
use crate::parallel::execute_like;
use crate::raster::{Pixel, Raster, Sample};

// ============================================================================
// Voronoi Pixelation
// ============================================================================

/// Voronoi cell site with the source color under it.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Site<T: Sample> {
    x: i64,
    y: i64,
    color: Pixel<T>,
}

/// Fill every pixel with the color of its nearest random site.
///
/// Sites are drawn sequentially from `rng` before the parallel pass.
/// Equidistant sites resolve to the one drawn first.
///
/// # Arguments
/// * `src` - Source raster
/// * `seeds` - Number of sites, clamped to 1..=100000
/// * `rng` - Random source for site placement
pub fn voronoi_pixelation<T: Sample>(src: &Raster<T>, seeds: u32, rng: &mut impl Rng) -> Result<Raster<T>> {
    let seeds = clamp_param("seeds", seeds, 1, 100_000);
    let (width, height) = (src.width(), src.height());
    if src.is_empty() {
        return Ok(Raster::new(width, height));
    }

    let sites: Vec<Site<T>> = (0..seeds)
        .map(|_| {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            Site {
                x: x as i64,
                y: y as i64,
                color: src.pixel(x, y),
            }
        })
        .collect();
    trace!("voronoi_pixelation sites={}", sites.len());

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let (px, py) = (x as i64, y as i64);
                let mut best = &sites[0];
                let mut best_dist = i64::MAX;
                for site in &sites {
                    let (dx, dy) = (site.x - px, site.y - py);
                    let dist = dx * dx + dy * dy;
                    if dist < best_dist {
                        best_dist = dist;
                        best = site;
                    }
                }
                band.set_pixel(x, y, best.color);
            }
        }
        Ok(())
    })
}

// ============================================================================
// Kuwahara
// ============================================================================

/// HSV value (max of RGB) normalized to `[0, 1]`.
#[inline]
fn brightness<T: Sample>(px: &Pixel<T>) -> f64 {
    px[0].max(px[1]).max(px[2]).to_f64() / T::MAX_F64
}

/// Population standard deviation of the brightness of `pixels`.
fn brightness_std_dev<T: Sample>(pixels: &[Pixel<T>]) -> f64 {
    let n = pixels.len() as f64;
    let mean = pixels.iter().map(brightness).sum::<f64>() / n;
    let variance = pixels
        .iter()
        .map(|px| {
            let d = brightness(px) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Edge-preserving smoothing.
///
/// The `size` x `size` window around each pixel is split into four
/// overlapping quadrants; the pixel takes the mean RGB of the quadrant with
/// the lowest brightness spread. Quadrants are clipped to the image and
/// empty ones are skipped. The result is opaque.
///
/// # Arguments
/// * `src` - Source raster
/// * `size` - Window side, clamped to 1..=20
pub fn kuwahara<T: Sample>(src: &Raster<T>, size: u32) -> Result<Raster<T>> {
    let size = clamp_param("size", size, 1, 20) as isize;
    let half = size / 2;
    let quad = (size + 1) / 2;
    let width = src.width();
    trace!("kuwahara size={size}");

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let (left, top) = (x as isize - half, y as isize - half);
                let (mid_x, mid_y) = (left + quad, top + quad);
                let (right, bottom) = (left + size, top + size);
                let quadrants = [
                    (left, top, mid_x, mid_y),
                    (mid_x, top, right, mid_y),
                    (left, mid_y, mid_x, bottom),
                    (mid_x, mid_y, right, bottom),
                ];

                let mut best: Option<(f64, Vec<Pixel<T>>)> = None;
                for (x0, y0, x1, y1) in quadrants {
                    let pixels = sample_region(src, x0, y0, x1, y1);
                    if pixels.is_empty() {
                        continue;
                    }
                    let spread = brightness_std_dev(&pixels);
                    if best.as_ref().map_or(true, |(s, _)| spread < *s) {
                        best = Some((spread, pixels));
                    }
                }

                let mut out = match best {
                    Some((_, pixels)) => color_average(&pixels),
                    None => src.pixel(x, y),
                };
                out[3] = T::MAX;
                band.set_pixel(x, y, out);
            }
        }
        Ok(())
    })
}

// ============================================================================
// Chromatic Aberration
// ============================================================================

/// Misalign the color channels like a cheap lens.
///
/// Red is sampled at `(x + dx, y + dy)`, green in place and blue at
/// `(x - dx, y - dy)`. Samples outside the image read as 0. Alpha is kept.
///
/// # Arguments
/// * `src` - Source raster
/// * `x_offset` - Horizontal shift, clamped to 1..=20
/// * `y_offset` - Vertical shift, clamped to 1..=20
pub fn chromatic_aberration<T: Sample>(src: &Raster<T>, x_offset: u32, y_offset: u32) -> Result<Raster<T>> {
    let dx = clamp_param("x_offset", x_offset, 1, 20) as isize;
    let dy = clamp_param("y_offset", y_offset, 1, 20) as isize;
    let width = src.width();
    trace!("chromatic_aberration offset=({dx}, {dy})");

    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                let (sx, sy) = (x as isize, y as isize);
                let center = src.pixel(x, y);
                let red = src.get(sx + dx, sy + dy).map_or(T::default(), |p| p[0]);
                let blue = src.get(sx - dx, sy - dy).map_or(T::default(), |p| p[2]);
                band.set_pixel(x, y, [red, center[1], blue, center[3]]);
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Rgba8;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quadrant_image() -> Rgba8 {
        let mut img = Rgba8::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                let v = (x / 4 * 2 + y / 4) as u8 * 60;
                img.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        img
    }

    #[test]
    fn test_voronoi_single_seed_fills_image() {
        let img = quadrant_image();
        let result = voronoi_pixelation(&img, 0, &mut StdRng::seed_from_u64(5)).unwrap();
        let first = result.pixel(0, 0);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(result.pixel(x, y), first);
            }
        }
    }

    #[test]
    fn test_voronoi_is_reproducible_and_uses_source_colors() {
        let img = quadrant_image();
        let a = voronoi_pixelation(&img, 20, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = voronoi_pixelation(&img, 20, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
        for y in 0..8 {
            for x in 0..8 {
                assert!([0, 60, 120, 180].contains(&a.pixel(x, y)[0]));
            }
        }
    }

    #[test]
    fn test_voronoi_empty() {
        let img = Rgba8::new(0, 3);
        let result = voronoi_pixelation(&img, 10, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!((result.width(), result.height()), (0, 3));
    }

    #[test]
    fn test_kuwahara_flat_is_identity() {
        let img = Rgba8::filled(5, 5, [10, 20, 30, 255]);
        assert_eq!(kuwahara(&img, 5).unwrap(), img);
    }

    #[test]
    fn test_kuwahara_preserves_hard_edges() {
        let img = quadrant_image();
        let result = kuwahara(&img, 5).unwrap();
        // Each pixel sits in a homogeneous quadrant of its window.
        assert_eq!(result, img);
    }

    #[test]
    fn test_kuwahara_output_is_opaque() {
        let img = Rgba8::filled(3, 3, [10, 20, 30, 7]);
        let result = kuwahara(&img, 3).unwrap();
        assert_eq!(result.pixel(1, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_chromatic_aberration_shifts_channels() {
        let mut img = Rgba8::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                img.set_pixel(x, y, [(x * 10) as u8, (y * 10) as u8, (x + y) as u8, 200]);
            }
        }
        let result = chromatic_aberration(&img, 1, 1).unwrap();
        assert_eq!(result.pixel(2, 2), [30, 20, 2, 200]);
        // Red reads past the right edge, blue before the top-left corner
        assert_eq!(result.pixel(4, 0), [0, 0, 0, 200]);
        assert_eq!(result.pixel(0, 0)[2], 0);
        // Offsets clamp up to 1
        assert_eq!(chromatic_aberration(&img, 0, 0).unwrap(), result);
    }
}
