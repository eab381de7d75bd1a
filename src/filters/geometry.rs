//! Geometric transforms: flips and resizing.

use log::trace;
use ndarray::s;

use crate::error::{RasterError, Result};
use crate::parallel::{execute, ParallelConfig};
use crate::raster::{Raster, Sample, CHANNELS};

/// Mirror along the vertical axis.
pub fn flip_horizontal<T: Sample>(src: &Raster<T>) -> Raster<T> {
    Raster::from_parts(src.view().slice(s![.., ..;-1, ..]).to_owned())
}

/// Mirror along the horizontal axis.
pub fn flip_vertical<T: Sample>(src: &Raster<T>) -> Raster<T> {
    Raster::from_parts(src.view().slice(s![..;-1, .., ..]).to_owned())
}

/// Height that keeps the aspect ratio of `src` at `new_width`.
///
/// # Returns
/// `(new_width, new_height)`, the height truncated
pub fn aspect_ratio<T: Sample>(src: &Raster<T>, new_width: usize) -> Result<(usize, usize)> {
    if src.width() == 0 {
        return Err(RasterError::InvalidDimensions(
            "cannot derive an aspect ratio from a zero-width image".into(),
        ));
    }
    let ratio = new_width as f64 / src.width() as f64;
    Ok((new_width, (src.height() as f64 * ratio) as usize))
}

fn check_resize<T: Sample>(src: &Raster<T>, new_width: usize, new_height: usize) -> Result<()> {
    if src.is_empty() && new_width > 0 && new_height > 0 {
        return Err(RasterError::InvalidDimensions(format!(
            "cannot resize a {}x{} image to {new_width}x{new_height}",
            src.width(),
            src.height()
        )));
    }
    Ok(())
}

/// Resize by nearest-neighbor sampling.
///
/// Output pixel `(x, y)` copies source pixel
/// `(x * width / new_width, y * height / new_height)`.
pub fn resize_nearest<T: Sample>(src: &Raster<T>, new_width: usize, new_height: usize) -> Result<Raster<T>> {
    check_resize(src, new_width, new_height)?;
    if new_width == 0 || new_height == 0 {
        return Ok(Raster::new(new_width, new_height));
    }
    let (width, height) = (src.width(), src.height());
    trace!("resize_nearest {width}x{height} -> {new_width}x{new_height}");

    execute(&ParallelConfig::default(), new_width, new_height, |band| {
        for y in band.rows() {
            let sy = y * height / new_height;
            for x in 0..new_width {
                band.set_pixel(x, y, src.pixel(x * width / new_width, sy));
            }
        }
        Ok(())
    })
}

/// Resize by bilinear interpolation of the four nearest source pixels.
///
/// Source coordinates are `x * width / new_width` (no half-pixel offset).
/// All four channels are interpolated; results are truncated.
pub fn resize_bilinear<T: Sample>(src: &Raster<T>, new_width: usize, new_height: usize) -> Result<Raster<T>> {
    check_resize(src, new_width, new_height)?;
    if new_width == 0 || new_height == 0 {
        return Ok(Raster::new(new_width, new_height));
    }
    let (width, height) = (src.width(), src.height());
    let ratio_x = width as f64 / new_width as f64;
    let ratio_y = height as f64 / new_height as f64;
    trace!("resize_bilinear {width}x{height} -> {new_width}x{new_height}");

    execute(&ParallelConfig::default(), new_width, new_height, |band| {
        for y in band.rows() {
            let src_y = y as f64 * ratio_y;
            let y0 = src_y.floor() as usize;
            let y1 = (y0 + 1).min(height - 1);
            let dy = src_y - y0 as f64;

            for x in 0..new_width {
                let src_x = x as f64 * ratio_x;
                let x0 = src_x.floor() as usize;
                let x1 = (x0 + 1).min(width - 1);
                let dx = src_x - x0 as f64;

                let (c00, c10) = (src.pixel(x0, y0), src.pixel(x1, y0));
                let (c01, c11) = (src.pixel(x0, y1), src.pixel(x1, y1));
                let mut out = [T::default(); CHANNELS];
                for c in 0..CHANNELS {
                    let v = (1.0 - dx) * (1.0 - dy) * c00[c].to_f64()
                        + dx * (1.0 - dy) * c10[c].to_f64()
                        + (1.0 - dx) * dy * c01[c].to_f64()
                        + dx * dy * c11[c].to_f64();
                    out[c] = T::from_f64(v);
                }
                band.set_pixel(x, y, out);
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Rgba16, Rgba8};

    fn numbered(width: usize, height: usize) -> Rgba8 {
        let mut img = Rgba8::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, [x as u8, y as u8, (x * y) as u8, 255]);
            }
        }
        img
    }

    #[test]
    fn test_flip_horizontal() {
        let img = numbered(3, 2);
        let flipped = flip_horizontal(&img);
        assert_eq!(flipped.pixel(0, 1), img.pixel(2, 1));
        assert_eq!(flipped.pixel(2, 0), img.pixel(0, 0));
        assert_eq!(flip_horizontal(&flipped), img);
    }

    #[test]
    fn test_flip_vertical() {
        let img = numbered(2, 3);
        let flipped = flip_vertical(&img);
        assert_eq!(flipped.pixel(1, 0), img.pixel(1, 2));
        assert_eq!(flip_vertical(&flipped), img);
    }

    #[test]
    fn test_flip_raw_layout_is_standard() {
        let flipped = flip_horizontal(&numbered(2, 1));
        assert_eq!(flipped.into_raw_vec(), vec![1, 0, 0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_aspect_ratio() {
        let img = Rgba8::new(400, 300);
        assert_eq!(aspect_ratio(&img, 200).unwrap(), (200, 150));
        assert_eq!(aspect_ratio(&img, 3).unwrap(), (3, 2));
        assert!(aspect_ratio(&Rgba8::new(0, 5), 10).is_err());
    }

    #[test]
    fn test_resize_nearest_upscale() {
        let img = numbered(2, 2);
        let result = resize_nearest(&img, 4, 4).unwrap();
        assert_eq!(result.pixel(0, 0), img.pixel(0, 0));
        assert_eq!(result.pixel(1, 1), img.pixel(0, 0));
        assert_eq!(result.pixel(2, 1), img.pixel(1, 0));
        assert_eq!(result.pixel(3, 3), img.pixel(1, 1));
    }

    #[test]
    fn test_resize_nearest_downscale() {
        let img = numbered(6, 4);
        let result = resize_nearest(&img, 3, 2).unwrap();
        assert_eq!(result.pixel(1, 1), img.pixel(2, 2));
        assert_eq!(result.pixel(2, 0), img.pixel(4, 0));
    }

    #[test]
    fn test_resize_bilinear_same_size_is_identity() {
        let img = numbered(5, 3);
        assert_eq!(resize_bilinear(&img, 5, 3).unwrap(), img);
    }

    #[test]
    fn test_resize_bilinear_interpolates() {
        let mut img = Rgba16::new(2, 1);
        img.set_pixel(0, 0, [0, 1000, 0, 0]);
        img.set_pixel(1, 0, [2000, 1000, 0, 65534]);
        let result = resize_bilinear(&img, 4, 1).unwrap();
        assert_eq!(result.pixel(1, 0), [1000, 1000, 0, 32767]);
        // Past the last source column the right neighbor clamps.
        assert_eq!(result.pixel(3, 0), [2000, 1000, 0, 65534]);
    }

    #[test]
    fn test_resize_empty() {
        let img = Rgba8::new(0, 0);
        assert!(resize_nearest(&img, 4, 4).is_err());
        assert!(resize_bilinear(&img, 2, 2).is_err());
        assert!(resize_nearest(&numbered(3, 3), 0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_resize_to_zero_width() {
        let img = Rgba8::new(0, 0);
        for result in [resize_bilinear(&img, 0, 3), resize_nearest(&img, 0, 3)] {
            let result = result.unwrap();
            assert_eq!((result.width(), result.height()), (0, 3));
        }
        let result = resize_bilinear(&numbered(4, 2), 5, 0).unwrap();
        assert_eq!((result.width(), result.height()), (5, 0));
    }
}
