//! imgeffects Rust Extensions
//!
//! Parallel raster processing with a library of image filters, with
//! optional Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Images are RGBA rasters backed by `ndarray::Array3` of shape
//! `(height, width, 4)`. Two bit depths are supported:
//! - `u8`: 8-bit per channel (0-255), see [`Rgba8`]
//! - `u16`: 16-bit per channel (0-65535), see [`Rgba16`]
//!
//! ## Execution Model
//! Per-pixel work is split into horizontal bands of the output and run on
//! rayon (see [`parallel`]). Each band owns a disjoint slice of the output,
//! so workers never share mutable state. Bands are always dispatched
//! through rayon; on machines with fewer than
//! [`ParallelConfig::min_parallel`] hardware threads the output is a single
//! band.
//!
//! ## Example
//! ```
//! use imgeffects_rust::filters::blur::gaussian_blur;
//! use imgeffects_rust::Rgba8;
//!
//! let img = Rgba8::filled(16, 16, [200, 100, 50, 255]);
//! let blurred = gaussian_blur(&img, 5).unwrap();
//! assert_eq!(blurred.pixel(8, 8), [200, 100, 50, 255]);
//! ```

pub mod error;
pub mod filters;
pub mod parallel;
pub mod raster;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{RasterError, Result};
pub use parallel::{execute, execute_like, Band, ParallelConfig};
pub use raster::{luminance, Pixel, Raster, Rgba16, Rgba8, Sample, CHANNELS};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::error::RasterError;
    use crate::filters::color_adjust::ChannelMask;
    use crate::filters::dither::DiffusionKernel;
    use crate::filters::edge::EdgeOperator;
    use crate::filters::halftone::Direction;
    use crate::filters::noise::NoiseKind;
    use crate::filters::{ascii, blur, color_adjust, contrast, dither, edge, geometry, halftone, noise, stylize};
    use crate::raster::{Raster, Rgba16, Rgba8};

    impl From<RasterError> for PyErr {
        fn from(err: RasterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    fn to_raster(image: PyReadonlyArray3<'_, u8>) -> PyResult<Rgba8> {
        Ok(Raster::from_array(image.as_array().to_owned())?)
    }

    fn to_py<'py>(py: Python<'py>, raster: Rgba8) -> Bound<'py, PyArray3<u8>> {
        raster.into_array().into_pyarray(py)
    }

    // ========================================================================
    // Blur & Noise
    // ========================================================================

    /// Separable Gaussian blur.
    ///
    /// # Arguments
    /// * `image` - RGBA u8 image (H, W, 4)
    /// * `level` - Kernel size, clamped to 0-30 (0 and 1 are identity)
    #[pyfunction]
    pub fn gaussian_blur<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, level: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, blur::gaussian_blur(&src, level)?))
    }

    /// Per-channel median over a square window (3-30).
    #[pyfunction]
    pub fn median<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, box_size: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, noise::median(&src, box_size)?))
    }

    /// Noise image of the given kind ("color", "gray" or "binary").
    #[pyfunction]
    pub fn generate_noise<'py>(
        py: Python<'py>,
        width: usize,
        height: usize,
        kind: &str,
        seed: u64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let img: Rgba8 = match kind.parse::<NoiseKind>()? {
            NoiseKind::Color => noise::noise_color(width, height, &mut rng),
            NoiseKind::Gray => noise::noise_gray(width, height, &mut rng),
            NoiseKind::Binary => noise::noise_binary(width, height, &mut rng),
        };
        Ok(to_py(py, img))
    }

    /// Mix noise into an image: `alpha * image + (1 - alpha) * noise`.
    #[pyfunction]
    #[pyo3(signature = (image, alpha, kind="color", seed=0))]
    pub fn blend_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        alpha: f64,
        kind: &str,
        seed: u64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        let kind: NoiseKind = kind.parse()?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(to_py(py, noise::blend_noise(&src, alpha, kind, &mut rng)?))
    }

    // ========================================================================
    // Dithering
    // ========================================================================

    /// Error-diffusion dithering with a named kernel.
    ///
    /// # Arguments
    /// * `image` - RGBA u8 image (H, W, 4)
    /// * `kernel` - One of "none", "floyd-steinberg", "false-floyd-steinberg",
    ///   "jarvis-judice-ninke", "stucki", "atkinson", "sierra",
    ///   "two-row-sierra", "sierra-lite"
    /// * `level` - Levels per channel, clamped to 1-10
    #[pyfunction]
    pub fn error_diffusion_dither<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: &str,
        level: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        let kernel: DiffusionKernel = kernel.parse()?;
        Ok(to_py(py, dither::error_diffusion_dither(&src, kernel, level)?))
    }

    /// Ordered dithering with a Bayer matrix.
    #[pyfunction]
    #[pyo3(signature = (image, level, size=4))]
    pub fn ordered_dither<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        level: u32,
        size: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, dither::ordered_dither(&src, level, size)?))
    }

    // ========================================================================
    // Contrast
    // ========================================================================

    #[pyfunction]
    pub fn unsharp_mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        variation: f64,
        blur_level: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, contrast::unsharp_mask(&src, variation, blur_level)?))
    }

    #[pyfunction]
    pub fn linear_contrast_stretch<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, contrast::linear_contrast_stretch(&src)?))
    }

    #[pyfunction]
    pub fn linear_contrast_stretch_gray<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, contrast::linear_contrast_stretch_gray(&src)?))
    }

    #[pyfunction]
    pub fn logarithmic_transform<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        variation: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, contrast::logarithmic_transform(&src, variation)?))
    }

    // ========================================================================
    // Edge Detection
    // ========================================================================

    /// Gradient magnitude with "sobel", "prewitt", "robert-cross" or "scharr".
    #[pyfunction]
    #[pyo3(signature = (image, operator="sobel"))]
    pub fn edge_detect<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        operator: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        let operator: EdgeOperator = operator.parse()?;
        Ok(to_py(py, edge::kernel_edge_detect(&src, operator)?))
    }

    #[pyfunction]
    pub fn difference_of_gaussians<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        blur_one: u32,
        blur_two: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, edge::difference_of_gaussians(&src, blur_one, blur_two)?))
    }

    #[pyfunction]
    pub fn laplacian_of_gaussian<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        blur_level: u32,
        scaling: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, edge::laplacian_of_gaussian(&src, blur_level, scaling)?))
    }

    // ========================================================================
    // Stylize
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, seeds, seed=0))]
    pub fn voronoi_pixelation<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        seeds: u32,
        seed: u64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(to_py(py, stylize::voronoi_pixelation(&src, seeds, &mut rng)?))
    }

    #[pyfunction]
    pub fn kuwahara<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, size: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, stylize::kuwahara(&src, size)?))
    }

    #[pyfunction]
    pub fn chromatic_aberration<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        x_offset: u32,
        y_offset: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, stylize::chromatic_aberration(&src, x_offset, y_offset)?))
    }

    // ========================================================================
    // Halftone & Pointillism
    // ========================================================================

    /// Dot or line screen.
    ///
    /// # Arguments
    /// * `image` - RGBA u8 image (H, W, 4)
    /// * `pattern` - "dots", "dots-diagonal", "lines-horizontal",
    ///   "lines-vertical" or "lines-diagonal"
    /// * `dot_size` - Cell size, clamped to 1-20
    /// * `use_color` - Paint dots in the cell color instead of black
    #[pyfunction]
    #[pyo3(name = "halftone", signature = (image, dot_size, use_color=false, pattern="dots"))]
    pub fn halftone_screen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        dot_size: u32,
        use_color: bool,
        pattern: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        let result = match pattern {
            "dots" => halftone::halftone(&src, dot_size, use_color)?,
            "dots-diagonal" => halftone::halftone_diagonal(&src, dot_size, use_color)?,
            "lines-horizontal" => halftone::lines_horizontal(&src, dot_size, use_color)?,
            "lines-vertical" => halftone::lines_vertical(&src, dot_size, use_color)?,
            "lines-diagonal" => halftone::lines_diagonal(&src, dot_size, use_color)?,
            other => {
                return Err(RasterError::UnknownName {
                    kind: "halftone pattern",
                    name: other.to_string(),
                }
                .into())
            }
        };
        Ok(to_py(py, result))
    }

    #[pyfunction]
    pub fn pointillism_grid<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, radius: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, halftone::pointillism_grid(&src, radius)?))
    }

    #[pyfunction]
    #[pyo3(signature = (image, points, scaling, seed=0))]
    pub fn pointillism_luminance<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        points: u32,
        scaling: u32,
        seed: u64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(to_py(py, halftone::pointillism_luminance(&src, points, scaling, &mut rng)?))
    }

    #[pyfunction]
    #[pyo3(signature = (image, scaling, direction="down", seed=0))]
    pub fn pointillism_luminance_grid<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        scaling: u32,
        direction: &str,
        seed: u64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        let direction: Direction = direction.parse()?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(to_py(py, halftone::pointillism_luminance_grid(&src, scaling, direction, &mut rng)?))
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    #[pyfunction]
    pub fn flip_horizontal<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, geometry::flip_horizontal(&src)))
    }

    #[pyfunction]
    pub fn flip_vertical<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, geometry::flip_vertical(&src)))
    }

    /// Resize to `width` x `height`. When `height` is omitted the aspect
    /// ratio is kept.
    #[pyfunction]
    #[pyo3(signature = (image, width, height=None, bilinear=true))]
    pub fn resize<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        width: usize,
        height: Option<usize>,
        bilinear: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        let (width, height) = match height {
            Some(height) => (width, height),
            None => geometry::aspect_ratio(&src, width)?,
        };
        let result = if bilinear {
            geometry::resize_bilinear(&src, width, height)?
        } else {
            geometry::resize_nearest(&src, width, height)?
        };
        Ok(to_py(py, result))
    }

    // ========================================================================
    // Color Adjustments
    // ========================================================================

    #[pyfunction]
    pub fn invert<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::invert(&src)?))
    }

    /// BT.601 grayscale, alpha preserved.
    #[pyfunction]
    pub fn grayscale<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::grayscale(&src)?))
    }

    #[pyfunction]
    pub fn gamma_correction<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, gamma: f64) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::gamma_correction(&src, gamma)?))
    }

    #[pyfunction]
    pub fn solarize<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, level: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::solarize(&src, level)?))
    }

    /// Scale red, green and blue by percentages (1-100 each).
    #[pyfunction]
    pub fn adjust_rgb<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        red: u32,
        green: u32,
        blue: u32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::adjust_rgb(&src, red, green, blue)?))
    }

    #[pyfunction]
    pub fn global_threshold<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, level: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::global_threshold(&src, level)?))
    }

    #[pyfunction]
    pub fn threshold_rgb<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::threshold_rgb(&src)?))
    }

    #[pyfunction]
    pub fn global_threshold_color<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, level: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::global_threshold_color(&src, level)?))
    }

    #[pyfunction]
    pub fn multi_threshold<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, quantity: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::multi_threshold(&src, quantity)?))
    }

    #[pyfunction]
    pub fn multi_threshold_color<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, quantity: u32) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::multi_threshold_color(&src, quantity)?))
    }

    /// Five-band luminance threshold; `c1`..`c3` are "red", "green", "blue"
    /// or "original".
    #[pyfunction]
    #[pyo3(signature = (image, c1="red", c2="green", c3="blue"))]
    pub fn multi_threshold_rgb<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        c1: &str,
        c2: &str,
        c3: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let (c1, c2, c3): (ChannelMask, ChannelMask, ChannelMask) = (c1.parse()?, c2.parse()?, c3.parse()?);
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::multi_threshold_rgb(&src, c1, c2, c3)?))
    }

    #[pyfunction]
    pub fn adjust_hue<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, degrees: f64) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::adjust_hue(&src, degrees)?))
    }

    #[pyfunction]
    pub fn adjust_saturation<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, change: f64) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::adjust_saturation(&src, change)?))
    }

    #[pyfunction]
    pub fn adjust_lightness<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>, change: f64) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src = to_raster(image)?;
        Ok(to_py(py, color_adjust::adjust_lightness(&src, change)?))
    }

    // ========================================================================
    // ASCII Art
    // ========================================================================

    /// ASCII cells as rows of `(char, font_size, line_height, color)`.
    #[pyfunction]
    #[pyo3(signature = (image, charset, line_height=12, font_size=10, use_color=false))]
    pub fn generate_ascii(
        image: PyReadonlyArray3<'_, u8>,
        charset: &str,
        line_height: u32,
        font_size: u32,
        use_color: bool,
    ) -> PyResult<Vec<Vec<(char, u32, u32, String)>>> {
        let src = to_raster(image)?;
        let rows = ascii::generate_ascii(&src, charset, line_height, font_size, use_color)?;
        Ok(rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| (cell.ch, cell.font_size, cell.line_height, cell.color))
                    .collect()
            })
            .collect())
    }

    /// ASCII art as plain text, one line per image row.
    #[pyfunction]
    pub fn ascii_text(image: PyReadonlyArray3<'_, u8>, charset: &str) -> PyResult<String> {
        let src = to_raster(image)?;
        let rows = ascii::generate_ascii(&src, charset, 12, 10, false)?;
        Ok(ascii::ascii_to_string(&rows))
    }

    // ========================================================================
    // Bit Depth Conversion
    // ========================================================================

    /// Convert an 8-bit RGBA image to 16-bit.
    #[pyfunction]
    pub fn convert_u8_to_u16<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u16>>> {
        let src = to_raster(image)?;
        Ok(src.convert::<u16>().into_array().into_pyarray(py))
    }

    /// Convert a 16-bit RGBA image to 8-bit.
    #[pyfunction]
    pub fn convert_u16_to_u8<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u16>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let src: Rgba16 = Raster::from_array(image.as_array().to_owned())?;
        Ok(to_py(py, src.convert::<u8>()))
    }

    /// Python module definition
    #[pymodule]
    pub fn imgeffects_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Blur & noise
        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(median, m)?)?;
        m.add_function(wrap_pyfunction!(generate_noise, m)?)?;
        m.add_function(wrap_pyfunction!(blend_noise, m)?)?;

        // Dithering
        m.add_function(wrap_pyfunction!(error_diffusion_dither, m)?)?;
        m.add_function(wrap_pyfunction!(ordered_dither, m)?)?;

        // Contrast
        m.add_function(wrap_pyfunction!(unsharp_mask, m)?)?;
        m.add_function(wrap_pyfunction!(linear_contrast_stretch, m)?)?;
        m.add_function(wrap_pyfunction!(linear_contrast_stretch_gray, m)?)?;
        m.add_function(wrap_pyfunction!(logarithmic_transform, m)?)?;

        // Edge detection
        m.add_function(wrap_pyfunction!(edge_detect, m)?)?;
        m.add_function(wrap_pyfunction!(difference_of_gaussians, m)?)?;
        m.add_function(wrap_pyfunction!(laplacian_of_gaussian, m)?)?;

        // Stylize
        m.add_function(wrap_pyfunction!(voronoi_pixelation, m)?)?;
        m.add_function(wrap_pyfunction!(kuwahara, m)?)?;
        m.add_function(wrap_pyfunction!(chromatic_aberration, m)?)?;

        // Halftone & pointillism
        m.add_function(wrap_pyfunction!(halftone_screen, m)?)?;
        m.add_function(wrap_pyfunction!(pointillism_grid, m)?)?;
        m.add_function(wrap_pyfunction!(pointillism_luminance, m)?)?;
        m.add_function(wrap_pyfunction!(pointillism_luminance_grid, m)?)?;

        // Geometry
        m.add_function(wrap_pyfunction!(flip_horizontal, m)?)?;
        m.add_function(wrap_pyfunction!(flip_vertical, m)?)?;
        m.add_function(wrap_pyfunction!(resize, m)?)?;

        // Color adjustments
        m.add_function(wrap_pyfunction!(invert, m)?)?;
        m.add_function(wrap_pyfunction!(grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(gamma_correction, m)?)?;
        m.add_function(wrap_pyfunction!(solarize, m)?)?;
        m.add_function(wrap_pyfunction!(adjust_rgb, m)?)?;
        m.add_function(wrap_pyfunction!(global_threshold, m)?)?;
        m.add_function(wrap_pyfunction!(threshold_rgb, m)?)?;
        m.add_function(wrap_pyfunction!(global_threshold_color, m)?)?;
        m.add_function(wrap_pyfunction!(multi_threshold, m)?)?;
        m.add_function(wrap_pyfunction!(multi_threshold_color, m)?)?;
        m.add_function(wrap_pyfunction!(multi_threshold_rgb, m)?)?;
        m.add_function(wrap_pyfunction!(adjust_hue, m)?)?;
        m.add_function(wrap_pyfunction!(adjust_saturation, m)?)?;
        m.add_function(wrap_pyfunction!(adjust_lightness, m)?)?;

        // ASCII
        m.add_function(wrap_pyfunction!(generate_ascii, m)?)?;
        m.add_function(wrap_pyfunction!(ascii_text, m)?)?;

        // Conversion
        m.add_function(wrap_pyfunction!(convert_u8_to_u16, m)?)?;
        m.add_function(wrap_pyfunction!(convert_u16_to_u8, m)?)?;

        Ok(())
    }
}
