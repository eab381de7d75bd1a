//! WebAssembly exports for imgeffects filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Data Layout
//!
//! Images cross the boundary as flat RGBA byte arrays (the layout of
//! `ImageData.data`) together with their width and height. Filter errors
//! are thrown as JavaScript strings. Randomized filters take an explicit
//! `seed` so the same call always produces the same image.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::error::{RasterError, Result};
use crate::filters::color_adjust::ChannelMask;
use crate::filters::dither::DiffusionKernel;
use crate::filters::edge::EdgeOperator;
use crate::filters::halftone::Direction;
use crate::filters::noise::NoiseKind;
use crate::filters::{ascii, blur, color_adjust, contrast, dither, edge, geometry, halftone, noise, stylize};
use crate::raster::{Raster, Rgba8};

fn to_js(err: RasterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Wrap `data` as a raster, run `filter` and flatten the result.
fn run<F>(data: &[u8], width: usize, height: usize, filter: F) -> std::result::Result<Vec<u8>, JsValue>
where
    F: FnOnce(&Rgba8) -> Result<Rgba8>,
{
    let src = Raster::from_raw(width, height, data.to_vec()).map_err(to_js)?;
    filter(&src).map(Raster::into_raw_vec).map_err(to_js)
}

// ============================================================================
// Blur & Noise
// ============================================================================

/// Separable Gaussian blur.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `level` - Kernel size, clamped to 0-30
///
/// # Returns
/// Flat array of RGBA bytes
#[wasm_bindgen]
pub fn gaussian_blur_wasm(data: &[u8], width: usize, height: usize, level: u32) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| blur::gaussian_blur(src, level))
}

#[wasm_bindgen]
pub fn median_wasm(data: &[u8], width: usize, height: usize, box_size: u32) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| noise::median(src, box_size))
}

/// Mix `kind` noise ("color", "gray" or "binary") into the image.
#[wasm_bindgen]
pub fn blend_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    alpha: f64,
    kind: &str,
    seed: u64,
) -> std::result::Result<Vec<u8>, JsValue> {
    let kind: NoiseKind = kind.parse().map_err(to_js)?;
    let mut rng = StdRng::seed_from_u64(seed);
    run(data, width, height, |src| noise::blend_noise(src, alpha, kind, &mut rng))
}

// ============================================================================
// Dithering
// ============================================================================

#[wasm_bindgen]
pub fn error_diffusion_dither_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    kernel: &str,
    level: u32,
) -> std::result::Result<Vec<u8>, JsValue> {
    let kernel: DiffusionKernel = kernel.parse().map_err(to_js)?;
    run(data, width, height, |src| dither::error_diffusion_dither(src, kernel, level))
}

#[wasm_bindgen]
pub fn ordered_dither_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    level: u32,
    size: usize,
) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| dither::ordered_dither(src, level, size))
}

// ============================================================================
// Contrast & Edges
// ============================================================================

#[wasm_bindgen]
pub fn unsharp_mask_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    variation: f64,
    blur_level: u32,
) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| contrast::unsharp_mask(src, variation, blur_level))
}

#[wasm_bindgen]
pub fn linear_contrast_stretch_wasm(data: &[u8], width: usize, height: usize) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, contrast::linear_contrast_stretch)
}

#[wasm_bindgen]
pub fn edge_detect_wasm(data: &[u8], width: usize, height: usize, operator: &str) -> std::result::Result<Vec<u8>, JsValue> {
    let operator: EdgeOperator = operator.parse().map_err(to_js)?;
    run(data, width, height, |src| edge::kernel_edge_detect(src, operator))
}

#[wasm_bindgen]
pub fn difference_of_gaussians_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    blur_one: u32,
    blur_two: u32,
) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| edge::difference_of_gaussians(src, blur_one, blur_two))
}

// ============================================================================
// Stylize & Halftone
// ============================================================================

#[wasm_bindgen]
pub fn voronoi_pixelation_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    seeds: u32,
    seed: u64,
) -> std::result::Result<Vec<u8>, JsValue> {
    let mut rng = StdRng::seed_from_u64(seed);
    run(data, width, height, |src| stylize::voronoi_pixelation(src, seeds, &mut rng))
}

#[wasm_bindgen]
pub fn kuwahara_wasm(data: &[u8], width: usize, height: usize, size: u32) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| stylize::kuwahara(src, size))
}

#[wasm_bindgen]
pub fn halftone_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    dot_size: u32,
    use_color: bool,
) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| halftone::halftone(src, dot_size, use_color))
}

#[wasm_bindgen]
pub fn pointillism_luminance_grid_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    scaling: u32,
    direction: &str,
    seed: u64,
) -> std::result::Result<Vec<u8>, JsValue> {
    let direction: Direction = direction.parse().map_err(to_js)?;
    let mut rng = StdRng::seed_from_u64(seed);
    run(data, width, height, |src| {
        halftone::pointillism_luminance_grid(src, scaling, direction, &mut rng)
    })
}

// ============================================================================
// Geometry & Color
// ============================================================================

#[wasm_bindgen]
pub fn flip_horizontal_wasm(data: &[u8], width: usize, height: usize) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| Ok(geometry::flip_horizontal(src)))
}

#[wasm_bindgen]
pub fn flip_vertical_wasm(data: &[u8], width: usize, height: usize) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| Ok(geometry::flip_vertical(src)))
}

/// Bilinear resize to `new_width` x `new_height`.
#[wasm_bindgen]
pub fn resize_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    new_width: usize,
    new_height: usize,
) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| geometry::resize_bilinear(src, new_width, new_height))
}

#[wasm_bindgen]
pub fn grayscale_wasm(data: &[u8], width: usize, height: usize) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, color_adjust::grayscale)
}

#[wasm_bindgen]
pub fn adjust_hue_wasm(data: &[u8], width: usize, height: usize, degrees: f64) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| color_adjust::adjust_hue(src, degrees))
}

/// Five-band luminance threshold; `c1`..`c3` are "red", "green", "blue"
/// or "original".
#[wasm_bindgen]
pub fn multi_threshold_rgb_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    c1: &str,
    c2: &str,
    c3: &str,
) -> std::result::Result<Vec<u8>, JsValue> {
    let (c1, c2, c3): (ChannelMask, ChannelMask, ChannelMask) =
        (c1.parse().map_err(to_js)?, c2.parse().map_err(to_js)?, c3.parse().map_err(to_js)?);
    run(data, width, height, |src| color_adjust::multi_threshold_rgb(src, c1, c2, c3))
}

#[wasm_bindgen]
pub fn multi_threshold_wasm(data: &[u8], width: usize, height: usize, quantity: u32) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, width, height, |src| color_adjust::multi_threshold(src, quantity))
}

/// ASCII art as plain text, one line per row.
#[wasm_bindgen]
pub fn ascii_text_wasm(data: &[u8], width: usize, height: usize, charset: &str) -> std::result::Result<String, JsValue> {
    let src = Raster::from_raw(width, height, data.to_vec()).map_err(to_js)?;
    let rows = ascii::generate_ascii(&src, charset, 12, 10, false).map_err(to_js)?;
    Ok(ascii::ascii_to_string(&rows))
}
