//! ASCII-art conversion.
//!
//! Every pixel becomes one character cell picked by its 8-bit gray level
//! from a caller-supplied charset ordered dark to light.

use log::trace;
use rayon::prelude::*;

use crate::error::{RasterError, Result};
use crate::raster::{luminance, Raster, Sample};

/// Reference size the font is scaled up to.
const DEFAULT_FONT_SIZE: f64 = 100.0;

/// One character of ASCII output with its styling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiCell {
    pub ch: char,
    pub font_size: u32,
    pub line_height: u32,
    /// CSS color: `rgb(r,g,b)` in 8-bit units, or `#fff` without color.
    pub color: String,
}

/// Scale font size up to the reference size, keeping the line-height ratio.
///
/// Neither value ever shrinks below the requested one.
fn scaled_metrics(line_height: u32, font_size: u32) -> (u32, u32) {
    let ratio = line_height as f64 / font_size as f64;
    let font = (font_size as f64 * (DEFAULT_FONT_SIZE / font_size as f64)).max(font_size as f64);
    let line = (font * ratio).max(line_height as f64);
    (font as u32, line as u32)
}

/// Convert a raster to rows of [`AsciiCell`]s.
///
/// # Arguments
/// * `src` - Source raster
/// * `charset` - Characters ordered from darkest to lightest
/// * `line_height` - Requested line height
/// * `font_size` - Requested font size
/// * `use_color` - Attach each pixel's color instead of white
///
/// # Returns
/// One `Vec` per image row, or `InvalidArgument` for an empty charset or a
/// zero font size
pub fn generate_ascii<T: Sample>(
    src: &Raster<T>,
    charset: &str,
    line_height: u32,
    font_size: u32,
    use_color: bool,
) -> Result<Vec<Vec<AsciiCell>>> {
    let density: Vec<char> = charset.chars().collect();
    if density.is_empty() {
        return Err(RasterError::InvalidArgument("ASCII charset is empty".into()));
    }
    if font_size == 0 {
        return Err(RasterError::InvalidArgument("font size must be positive".into()));
    }

    let (font_size, line_height) = scaled_metrics(line_height, font_size);
    let last = (density.len() - 1) as f64;
    let to_8bit = 255.0 / T::MAX_F64;
    trace!("generate_ascii charset={} font={font_size} line={line_height}", density.len());

    let rows = (0..src.height())
        .into_par_iter()
        .map(|y| {
            (0..src.width())
                .map(|x| {
                    let px = src.pixel(x, y);
                    let gray = (luminance(&px) * to_8bit).round().clamp(0.0, 255.0);
                    let ch = density[(last * gray / 255.0).floor() as usize];
                    let color = if use_color {
                        let [r, g, b, _] = px.map(|v| (v.to_f64() * to_8bit).round() as u8);
                        format!("rgb({r},{g},{b})")
                    } else {
                        "#fff".to_string()
                    };
                    AsciiCell {
                        ch,
                        font_size,
                        line_height,
                        color,
                    }
                })
                .collect()
        })
        .collect();

    Ok(rows)
}

/// Plain-text rendering, one line per row.
pub fn ascii_to_string(rows: &[Vec<AsciiCell>]) -> String {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.ch).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
