//! Raster abstraction shared by every filter.
//!
//! A [`Raster`] owns a dense `(height, width, 4)` ndarray of RGBA samples.
//! The sample type fixes the bit depth:
//! - `u8`: 8-bit per channel (0-255)
//! - `u16`: 16-bit per channel (0-65535)
//!
//! Rasters always start at the origin. Filters read a borrowed raster and
//! return a freshly allocated one.

use ndarray::{Array3, ArrayView3};

use crate::error::{RasterError, Result};

/// Number of channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// BT.601 luma weights.
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// One RGBA pixel.
pub type Pixel<T> = [T; CHANNELS];

/// A channel sample of fixed bit depth.
pub trait Sample:
    Copy + Default + Ord + Send + Sync + std::fmt::Debug + 'static
{
    const MAX: Self;
    const MAX_F64: f64;

    fn to_f64(self) -> f64;
    fn to_i64(self) -> i64;

    /// Truncating, saturating conversion. NaN maps to 0.
    fn from_f64(value: f64) -> Self;

    /// Saturating conversion.
    fn from_i64(value: i64) -> Self;
}

impl Sample for u8 {
    const MAX: Self = u8::MAX;
    const MAX_F64: f64 = 255.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn to_i64(self) -> i64 {
        self as i64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as u8
    }

    #[inline]
    fn from_i64(value: i64) -> Self {
        value.clamp(0, 255) as u8
    }
}

impl Sample for u16 {
    const MAX: Self = u16::MAX;
    const MAX_F64: f64 = 65535.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn to_i64(self) -> i64 {
        self as i64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as u16
    }

    #[inline]
    fn from_i64(value: i64) -> Self {
        value.clamp(0, 65535) as u16
    }
}

/// Perceptual luminance of a pixel in sample units (BT.601 weights).
#[inline]
pub fn luminance<T: Sample>(px: &Pixel<T>) -> f64 {
    LUMA_R * px[0].to_f64() + LUMA_G * px[1].to_f64() + LUMA_B * px[2].to_f64()
}

/// Opaque black at the sample's bit depth.
#[inline]
pub fn opaque_black<T: Sample>() -> Pixel<T> {
    [T::default(), T::default(), T::default(), T::MAX]
}

/// Dense RGBA image.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<T: Sample> {
    data: Array3<T>,
}

pub type Rgba8 = Raster<u8>;
pub type Rgba16 = Raster<u16>;

impl<T: Sample> Raster<T> {
    /// Transparent black raster.
    pub fn new(width: usize, height: usize) -> Self {
        Raster {
            data: Array3::default((height, width, CHANNELS)),
        }
    }

    pub fn filled(width: usize, height: usize, px: Pixel<T>) -> Self {
        let mut data = Array3::default((height, width, CHANNELS));
        for mut pixel in data.lanes_mut(ndarray::Axis(2)) {
            for (c, v) in pixel.iter_mut().enumerate() {
                *v = px[c];
            }
        }
        Raster { data }
    }

    /// Wrap an existing `(height, width, 4)` array.
    pub fn from_array(data: Array3<T>) -> Result<Self> {
        let (_, _, channels) = data.dim();
        if channels != CHANNELS {
            return Err(RasterError::InvalidDimensions(format!(
                "expected {CHANNELS} channels, got {channels}"
            )));
        }
        Ok(Self::from_parts(data))
    }

    /// Wrap an array already known to hold four channels.
    pub(crate) fn from_parts(data: Array3<T>) -> Self {
        debug_assert_eq!(data.dim().2, CHANNELS);
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Raster { data }
    }

    /// Build from interleaved RGBA samples in row-major order.
    pub fn from_raw(width: usize, height: usize, samples: Vec<T>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or_else(|| RasterError::InvalidDimensions("image dimensions overflow".into()))?;
        if samples.len() != expected {
            return Err(RasterError::InvalidDimensions(format!(
                "expected {expected} samples for {width}x{height}, got {}",
                samples.len()
            )));
        }
        let data = Array3::from_shape_vec((height, width, CHANNELS), samples)
            .map_err(|e| RasterError::InvalidDimensions(e.to_string()))?;
        Ok(Raster { data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    #[inline]
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    /// Pixel at `(x, y)`. Panics when out of bounds, like array indexing.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Pixel<T> {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
            self.data[[y, x, 3]],
        ]
    }

    /// Bounds-checked sampling; `None` outside the raster.
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> Option<Pixel<T>> {
        if self.in_bounds(x, y) {
            Some(self.pixel(x as usize, y as usize))
        } else {
            None
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, px: Pixel<T>) {
        for (c, v) in px.into_iter().enumerate() {
            self.data[[y, x, c]] = v;
        }
    }

    #[inline]
    pub fn view(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array3<T> {
        &self.data
    }

    pub fn into_array(self) -> Array3<T> {
        self.data
    }

    /// Interleaved RGBA samples in row-major order.
    pub fn into_raw_vec(self) -> Vec<T> {
        self.data.into_raw_vec_and_offset().0
    }

    /// Convert to another bit depth by full-scale rescaling.
    pub fn convert<U: Sample>(&self) -> Raster<U> {
        let scale = U::MAX_F64 / T::MAX_F64;
        Raster {
            data: self.data.mapv(|v| U::from_f64((v.to_f64() * scale).round())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent_black() {
        let img = Rgba8::new(3, 2);
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
        assert_eq!(img.pixel(2, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let err = Rgba8::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, RasterError::InvalidDimensions(_)));
    }

    #[test]
    fn test_from_array_rejects_three_channels() {
        let err = Rgba16::from_array(Array3::zeros((2, 2, 3))).unwrap_err();
        assert!(matches!(err, RasterError::InvalidDimensions(_)));
    }

    #[test]
    fn test_raw_layout_is_row_major() {
        let samples: Vec<u8> = (0..16).collect();
        let img = Rgba8::from_raw(2, 2, samples.clone()).unwrap();
        assert_eq!(img.pixel(1, 0), [4, 5, 6, 7]);
        assert_eq!(img.pixel(0, 1), [8, 9, 10, 11]);
        assert_eq!(img.into_raw_vec(), samples);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let img = Rgba8::filled(2, 2, [1, 2, 3, 4]);
        assert_eq!(img.get(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(img.get(-1, 0), None);
        assert_eq!(img.get(0, 2), None);
    }

    #[test]
    fn test_convert_depth() {
        let img = Rgba8::filled(1, 1, [255, 128, 0, 255]);
        let wide: Rgba16 = img.convert();
        assert_eq!(wide.pixel(0, 0), [65535, 32896, 0, 65535]);
        let back: Rgba8 = wide.convert();
        assert_eq!(back, img);
    }

    #[test]
    fn test_luminance_white() {
        let white: Pixel<u8> = [255, 255, 255, 255];
        assert!((luminance(&white) - 255.0).abs() < 1e-9);
    }
}
