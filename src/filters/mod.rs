//! Filter modules for image processing effects.
//!
//! ## Supported Formats
//!
//! Every filter is generic over the [`Sample`](crate::raster::Sample) type of
//! its input and works on RGBA rasters:
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGBA8 | (H, W, 4) | u8 | Red, green, blue, alpha, 0-255 |
//! | RGBA16 | (H, W, 4) | u16 | Red, green, blue, alpha, 0-65535 |
//!
//! ## Architecture
//!
//! - Filters never mutate their input; each returns a new raster.
//! - Out-of-range parameters are clamped into the documented range and
//!   logged at `debug`, never rejected.
//! - Per-pixel work runs on the band executor in [`crate::parallel`].
//!   Randomized filters draw all random values before the parallel pass.
//!
//! ## Filter Categories
//!
//! - **Blur**: separable Gaussian blur
//! - **Noise**: median, noise generators and blending
//! - **Dither**: error diffusion (8 kernels) and ordered Bayer dithering
//! - **Contrast**: unsharp mask, contrast stretching, logarithmic transform
//! - **Edge detection**: Sobel, Prewitt, Roberts cross, Scharr, DoG, LoG
//! - **Stylize**: Voronoi pixelation, Kuwahara, chromatic aberration
//! - **Halftone**: dots, lines and pointillism
//! - **Geometry**: flips and resizing
//! - **Color adjust**: invert, grayscale, gamma, solarize, thresholds, HSL
//! - **ASCII**: character-cell conversion

pub mod core;

pub mod ascii;
pub mod blur;
pub mod color_adjust;
pub mod contrast;
pub mod dither;
pub mod edge;
pub mod geometry;
pub mod halftone;
pub mod noise;
pub mod stylize;
