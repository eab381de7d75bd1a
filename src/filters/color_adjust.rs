//! Color adjustment filters: Invert, Grayscale, Gamma, Solarize, channel
//! levels, thresholds and HSL adjustments.
//!
//! Every output pixel depends only on the input pixel at the same position.
//! Results of floating-point mappings are rounded to the nearest sample.
//! Alpha is preserved unless noted.

use std::str::FromStr;

use log::trace;

use super::core::clamp_param;
use crate::error::{RasterError, Result};
use crate::parallel::execute_like;
use crate::raster::{luminance, Pixel, Raster, Sample};

/// Apply `f` to every pixel, band-parallel.
fn map_pixels<T, F>(src: &Raster<T>, f: F) -> Result<Raster<T>>
where
    T: Sample,
    F: Fn(Pixel<T>) -> Pixel<T> + Sync,
{
    let width = src.width();
    execute_like(src, |band| {
        for y in band.rows() {
            for x in 0..width {
                band.set_pixel(x, y, f(src.pixel(x, y)));
            }
        }
        Ok(())
    })
}

#[inline]
fn unit<T: Sample>(v: T) -> f64 {
    v.to_f64() / T::MAX_F64
}

#[inline]
fn from_unit<T: Sample>(v: f64) -> T {
    T::from_f64((v * T::MAX_F64).round().clamp(0.0, T::MAX_F64))
}

// ============================================================================
// Invert / Grayscale
// ============================================================================

/// Invert RGB: `max - v`.
pub fn invert<T: Sample>(src: &Raster<T>) -> Result<Raster<T>> {
    map_pixels(src, |px| {
        let inv = |v: T| T::from_i64(T::MAX.to_i64() - v.to_i64());
        [inv(px[0]), inv(px[1]), inv(px[2]), px[3]]
    })
}

/// Replace RGB with BT.601 luminance.
pub fn grayscale<T: Sample>(src: &Raster<T>) -> Result<Raster<T>> {
    map_pixels(src, |px| {
        let v = T::from_f64(luminance(&px).round().clamp(0.0, T::MAX_F64));
        [v, v, v, px[3]]
    })
}

// ============================================================================
// Gamma / Solarize
// ============================================================================

/// Gamma correction: `v' = v^gamma` on normalized RGB.
///
/// # Arguments
/// * `src` - Source raster
/// * `gamma` - Exponent, clamped to -10.0..=10.0. Zero is treated as 1 and a
///   negative value `-g` as `1 / g`, so negative values brighten.
pub fn gamma_correction<T: Sample>(src: &Raster<T>, gamma: f64) -> Result<Raster<T>> {
    let gamma = clamp_param("gamma", gamma, -10.0, 10.0);
    let exponent = if gamma == 0.0 {
        1.0
    } else if gamma < 0.0 {
        1.0 / -gamma
    } else {
        gamma
    };
    trace!("gamma_correction exponent={exponent}");

    map_pixels(src, |px| {
        let g = |v: T| from_unit::<T>(unit(v).powf(exponent));
        [g(px[0]), g(px[1]), g(px[2]), px[3]]
    })
}

/// Invert pixels whose luminance exceeds `level` percent of full scale.
///
/// # Arguments
/// * `src` - Source raster
/// * `level` - Threshold in percent, clamped to 1..=100
pub fn solarize<T: Sample>(src: &Raster<T>, level: u32) -> Result<Raster<T>> {
    let level = clamp_param("level", level, 1, 100);
    let threshold = T::MAX_F64 * level as f64 / 100.0;
    let max = T::MAX.to_i64();

    map_pixels(src, |px| {
        if luminance(&px) > threshold {
            let inv = |v: T| T::from_i64(max - v.to_i64());
            [inv(px[0]), inv(px[1]), inv(px[2]), px[3]]
        } else {
            px
        }
    })
}

// ============================================================================
// Channel levels and thresholds
// ============================================================================

/// Scale each RGB channel to a percentage of its value.
///
/// # Arguments
/// * `red`, `green`, `blue` - Percentages, each clamped to 1..=100
pub fn adjust_rgb<T: Sample>(src: &Raster<T>, red: u32, green: u32, blue: u32) -> Result<Raster<T>> {
    let pct = [
        clamp_param("red", red, 1, 100) as i64,
        clamp_param("green", green, 1, 100) as i64,
        clamp_param("blue", blue, 1, 100) as i64,
    ];
    map_pixels(src, |px| {
        let mut out = px;
        for c in 0..3 {
            out[c] = T::from_i64(px[c].to_i64() * pct[c] / 100);
        }
        out
    })
}

/// Binarize on luminance: white above `level` percent, black otherwise.
///
/// The result is opaque.
pub fn global_threshold<T: Sample>(src: &Raster<T>, level: u32) -> Result<Raster<T>> {
    let level = clamp_param("level", level, 1, 100);
    let threshold = (T::MAX.to_i64() * level as i64 / 100) as f64;
    map_pixels(src, |px| {
        let v = if luminance(&px) > threshold {
            T::MAX
        } else {
            T::default()
        };
        [v, v, v, T::MAX]
    })
}

/// Keep only the dominant RGB channel of each pixel.
///
/// Ties favor red, then green.
pub fn threshold_rgb<T: Sample>(src: &Raster<T>) -> Result<Raster<T>> {
    map_pixels(src, |px| {
        let [r, g, b, a] = px;
        let zero = T::default();
        if r >= g && r >= b {
            [r, zero, zero, a]
        } else if g >= b {
            [zero, g, zero, a]
        } else {
            [zero, zero, b, a]
        }
    })
}

/// Binarize each RGB channel on its own: full scale above `level` percent,
/// zero otherwise. Alpha is preserved.
pub fn global_threshold_color<T: Sample>(src: &Raster<T>, level: u32) -> Result<Raster<T>> {
    let level = clamp_param("level", level, 1, 100);
    let threshold = T::MAX.to_i64() * level as i64 / 100;
    map_pixels(src, |px| {
        let bin = |v: T| if v.to_i64() > threshold { T::MAX } else { T::default() };
        [bin(px[0]), bin(px[1]), bin(px[2]), px[3]]
    })
}

/// Descending band floors for `quantity` steps on a `0..=max` scale.
///
/// Floors sit at `max * i / 100` for `i = 101, 101 - step, ...` while
/// `i > step`, with `step = 100 / quantity`, capped at `max` and closed by 0.
fn band_floors(quantity: u32, max: i64) -> Vec<i64> {
    let step = (100 / quantity) as i64;
    let mut floors: Vec<i64> = (step + 1..=101)
        .rev()
        .step_by(step as usize)
        .map(|i| (max * i / 100).min(max))
        .collect();
    floors.push(0);
    floors
}

/// Largest floor not above `v`.
#[inline]
fn snap_down(floors: &[i64], v: i64) -> i64 {
    floors.iter().copied().find(|&f| v >= f).unwrap_or(0)
}

/// Band luminance into gray steps.
///
/// Luminance is taken in whole 8-bit levels and snapped down to the nearest
/// band floor. The result is opaque gray.
///
/// # Arguments
/// * `src` - Source raster
/// * `quantity` - Number of steps, clamped to 2..=100
pub fn multi_threshold<T: Sample>(src: &Raster<T>, quantity: u32) -> Result<Raster<T>> {
    let quantity = clamp_param("quantity", quantity, 2, 100);
    let floors = band_floors(quantity, 255);
    let max = T::MAX.to_i64();
    trace!("multi_threshold floors={floors:?}");

    map_pixels(src, |px| {
        let gray = (luminance(&px) * 255.0 / T::MAX_F64).round() as i64;
        let v = T::from_i64(snap_down(&floors, gray) * max / 255);
        [v, v, v, T::MAX]
    })
}

/// Band every RGB channel independently into `quantity` steps.
///
/// # Arguments
/// * `src` - Source raster
/// * `quantity` - Number of steps, clamped to 2..=10
pub fn multi_threshold_color<T: Sample>(src: &Raster<T>, quantity: u32) -> Result<Raster<T>> {
    let quantity = clamp_param("quantity", quantity, 2, 10);
    let floors = band_floors(quantity, T::MAX.to_i64());

    map_pixels(src, |px| {
        let snap = |v: T| T::from_i64(snap_down(&floors, v.to_i64()));
        [snap(px[0]), snap(px[1]), snap(px[2]), px[3]]
    })
}

/// Channel kept inside one band of [`multi_threshold_rgb`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelMask {
    Red,
    Green,
    Blue,
    /// Keep the pixel's own color.
    Original,
}

impl ChannelMask {
    fn apply<T: Sample>(self, px: Pixel<T>) -> Pixel<T> {
        let [r, g, b, a] = px;
        let zero = T::default();
        match self {
            ChannelMask::Red => [r, zero, zero, a],
            ChannelMask::Green => [zero, g, zero, a],
            ChannelMask::Blue => [zero, zero, b, a],
            ChannelMask::Original => px,
        }
    }
}

impl FromStr for ChannelMask {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "red" => Ok(ChannelMask::Red),
            "green" => Ok(ChannelMask::Green),
            "blue" => Ok(ChannelMask::Blue),
            "original" => Ok(ChannelMask::Original),
            _ => Err(RasterError::UnknownName {
                kind: "channel",
                name: s.to_string(),
            }),
        }
    }
}

/// 16-bit luminance floors of the white, `c1`, `c2` and `c3` bands.
const RGB_BAND_FLOORS: [f64; 4] = [53083.0, 39976.0, 26869.0, 13762.0];

/// Split luminance into five bands: white, `c1`, `c2`, `c3` and black.
///
/// Luminance is measured on the 16-bit scale and rounded. The bands start at
/// 53083, 39976, 26869 and 13762 (about 81%, 61%, 41% and 21%). Alpha is
/// preserved in every band.
pub fn multi_threshold_rgb<T: Sample>(
    src: &Raster<T>,
    c1: ChannelMask,
    c2: ChannelMask,
    c3: ChannelMask,
) -> Result<Raster<T>> {
    let scale = u16::MAX_F64 / T::MAX_F64;
    map_pixels(src, |px| {
        let lum = (luminance(&px) * scale).round();
        let a = px[3];
        if lum >= RGB_BAND_FLOORS[0] {
            [T::MAX, T::MAX, T::MAX, a]
        } else if lum >= RGB_BAND_FLOORS[1] {
            c1.apply(px)
        } else if lum >= RGB_BAND_FLOORS[2] {
            c2.apply(px)
        } else if lum >= RGB_BAND_FLOORS[3] {
            c3.apply(px)
        } else {
            [T::default(), T::default(), T::default(), a]
        }
    })
}

// ============================================================================
// HSL
// ============================================================================

/// Unit RGB to `(hue degrees, saturation, lightness)`.
#[inline]
fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        let mut h = (g - b) / d;
        if g < b {
            h += 6.0;
        }
        h * 60.0
    } else if max == g {
        ((b - r) / d + 2.0) * 60.0
    } else {
        ((r - g) / d + 4.0) * 60.0
    };

    (h, s, l)
}

/// Inverse of [`rgb_to_hsl`]; gray when saturation is zero.
#[inline]
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h_norm = h / 360.0;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 0.5 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    (
        hue_to_rgb(p, q, h_norm + 1.0 / 3.0),
        hue_to_rgb(p, q, h_norm),
        hue_to_rgb(p, q, h_norm - 1.0 / 3.0),
    )
}

/// Round-trip each pixel through HSL, letting `f` edit the triple.
fn map_hsl<T, F>(src: &Raster<T>, f: F) -> Result<Raster<T>>
where
    T: Sample,
    F: Fn(f64, f64, f64) -> (f64, f64, f64) + Sync,
{
    map_pixels(src, |px| {
        let (h, s, l) = rgb_to_hsl(unit(px[0]), unit(px[1]), unit(px[2]));
        let (h, s, l) = f(h, s, l);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        [from_unit(r), from_unit(g), from_unit(b), px[3]]
    })
}

/// Rotate hue by `degrees`, clamped to 0..=360.
pub fn adjust_hue<T: Sample>(src: &Raster<T>, degrees: f64) -> Result<Raster<T>> {
    let degrees = clamp_param("degrees", degrees, 0.0, 360.0);
    map_hsl(src, |h, s, l| ((h + degrees) % 360.0, s, l))
}

/// Scale saturation by `1 + change`, `change` clamped to -1.0..=1.0.
pub fn adjust_saturation<T: Sample>(src: &Raster<T>, change: f64) -> Result<Raster<T>> {
    let change = clamp_param("change", change, -1.0, 1.0);
    map_hsl(src, |h, s, l| (h, (s * (1.0 + change)).clamp(0.0, 1.0), l))
}

/// Scale lightness by `1 + change`, `change` clamped to -1.0..=1.0.
pub fn adjust_lightness<T: Sample>(src: &Raster<T>, change: f64) -> Result<Raster<T>> {
    let change = clamp_param("change", change, -1.0, 1.0);
    map_hsl(src, |h, s, l| (h, s, (l * (1.0 + change)).clamp(0.0, 1.0)))
}
