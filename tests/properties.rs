//! Cross-module properties of the executor and the filter library.

use imgeffects_rust::filters::blur::gaussian_blur;
use imgeffects_rust::filters::core::{bayer_matrix, gaussian_kernel, Quantizer};
use imgeffects_rust::filters::dither::{error_diffusion_dither, DiffusionKernel};
use imgeffects_rust::filters::edge::{kernel_edge_detect, EdgeOperator};
use imgeffects_rust::filters::geometry::{flip_horizontal, flip_vertical};
use imgeffects_rust::filters::noise::{median, noise_color};
use imgeffects_rust::parallel::band_ranges;
use imgeffects_rust::{execute, Band, ParallelConfig, Rgba16, Rgba8, Sample};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_image(width: usize, height: usize, seed: u64) -> Rgba8 {
    noise_color(width, height, &mut StdRng::seed_from_u64(seed))
}

// ============================================================================
// Blur
// ============================================================================

#[test]
fn test_blur_low_levels_are_identity() {
    let img = random_image(9, 7, 1);
    assert_eq!(gaussian_blur(&img, 0).unwrap(), img);
    assert_eq!(gaussian_blur(&img, 1).unwrap(), img);
}

#[test]
fn test_blur_small_white_image_unchanged() {
    let img = Rgba8::filled(2, 2, [255, 255, 255, 255]);
    let result = gaussian_blur(&img, 1).unwrap();
    for y in 0..2 {
        for x in 0..2 {
            for (out, expected) in result.pixel(x, y).iter().zip([255u8; 4]) {
                assert!(out.abs_diff(expected) <= 1);
            }
        }
    }
    // Wider kernels reflect past both edges and stay uniform.
    assert_eq!(gaussian_blur(&img, 9).unwrap(), img);
}

#[test]
fn test_kernel_weights_sum_to_one() {
    for size in 1..=61 {
        let kernel = gaussian_kernel(size);
        let sum: f64 = kernel.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "size {size} sums to {sum}");
        assert_eq!(kernel.len() % 2, 1);
    }
}

// ============================================================================
// Median
// ============================================================================

#[test]
fn test_median_flat_image_is_fixed_point() {
    let img = Rgba16::filled(12, 10, [1000, 20000, 40000, 65535]);
    for box_size in [3, 5, 8] {
        assert_eq!(median(&img, box_size).unwrap(), img);
    }
}

// ============================================================================
// Dithering
// ============================================================================

#[test]
fn test_bayer_matrices() {
    assert_eq!(bayer_matrix(2), ndarray::arr2(&[[0.0, 0.5], [0.75, 0.25]]));

    let expected = ndarray::arr2(&[
        [0.0, 0.125, 0.5, 0.625],
        [0.1875, 0.0625, 0.6875, 0.5625],
        [0.75, 0.875, 0.25, 0.375],
        [0.9375, 0.8125, 0.4375, 0.3125],
    ]);
    assert_eq!(bayer_matrix(4), expected);
}

#[test]
fn test_dither_none_is_plain_quantization() {
    let img = random_image(13, 11, 2);
    for level in [1, 2, 4, 10] {
        let quantizer = Quantizer::new(level, u8::MAX_F64).unwrap();
        let result = error_diffusion_dither(&img, DiffusionKernel::None, level).unwrap();
        for y in 0..img.height() {
            for x in 0..img.width() {
                let expected = img.pixel(x, y).map(|v| u8::from_f64(quantizer.quantize(v.to_f64())));
                assert_eq!(result.pixel(x, y), expected, "level {level} at ({x}, {y})");
            }
        }
    }
}

// ============================================================================
// Executor
// ============================================================================

#[test]
fn test_band_ranges_partition_rows() {
    for height in [1, 2, 7, 64, 101] {
        for workers in 1..=16 {
            let bands = band_ranges(height, workers);
            assert!(bands.len() <= workers);
            let mut next = 0;
            for band in &bands {
                assert_eq!(band.start, next, "gap or overlap at {height}/{workers}");
                assert!(band.end > band.start);
                next = band.end;
            }
            assert_eq!(next, height);
        }
    }
}

fn rotate_channels(src: &Rgba8, band: &mut Band<'_, u8>) -> imgeffects_rust::Result<()> {
    for y in band.rows() {
        for x in 0..src.width() {
            let [r, g, b, a] = src.pixel(x, y);
            band.set_pixel(x, y, [b, r, g, a]);
        }
    }
    Ok(())
}

#[test_log::test]
fn test_worker_count_does_not_change_output() {
    let src = random_image(31, 29, 3);
    let serial = execute(&ParallelConfig::serial(), 31, 29, |band| rotate_channels(&src, band)).unwrap();
    for workers in 1..=8 {
        let config = ParallelConfig::default().with_max_workers(workers);
        let result = execute(&config, 31, 29, |band| rotate_channels(&src, band)).unwrap();
        assert_eq!(result, serial, "{workers} worker(s)");
    }
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_flips_are_involutions() {
    let img = random_image(17, 5, 4);
    assert_eq!(flip_horizontal(&flip_horizontal(&img)), img);
    assert_eq!(flip_vertical(&flip_vertical(&img)), img);
    assert_ne!(flip_horizontal(&img), img);
}

// ============================================================================
// Edge detection
// ============================================================================

fn bright_center(size: usize) -> Rgba8 {
    let mut img = Rgba8::filled(size, size, [0, 0, 0, 255]);
    img.set_pixel(size / 2, size / 2, [255, 255, 255, 255]);
    img
}

#[test]
fn test_sobel_bright_center_3x3() {
    let result = kernel_edge_detect(&bright_center(3), EdgeOperator::Sobel).unwrap();
    // Corners lack a full 3x3 footprint and are written as black.
    for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
        assert_eq!(result.pixel(x, y), [0, 0, 0, 255]);
    }
    // The center sees a symmetric neighborhood, so both gradients cancel.
    assert_eq!(result.pixel(1, 1), [0, 0, 0, 255]);
}

#[test]
fn test_sobel_bright_center_lights_up_neighbors() {
    let result = kernel_edge_detect(&bright_center(5), EdgeOperator::Sobel).unwrap();
    for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
        assert_eq!(result.pixel(x, y), [255, 255, 255, 255], "at ({x}, {y})");
    }
    assert_eq!(result.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(result.pixel(4, 4), [0, 0, 0, 255]);
}

#[test]
fn test_every_operator_sees_a_step_edge() {
    let mut img = Rgba8::filled(6, 6, [0, 0, 0, 255]);
    for y in 0..6 {
        for x in 3..6 {
            img.set_pixel(x, y, [255, 255, 255, 255]);
        }
    }
    for operator in EdgeOperator::ALL {
        let result = kernel_edge_detect(&img, operator).unwrap();
        let peak = (0..6).map(|x| result.pixel(x, 3)[0]).max().unwrap_or(0);
        assert!(peak > 0, "{operator} found no edge");
        assert_eq!(result.width(), 6);
    }
}
