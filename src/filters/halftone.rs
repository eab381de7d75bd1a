//! Dot-based stylization: halftone, line screens and pointillism.
//!
//! Every filter here works in two phases. A sequential walk over the image
//! produces an ordered list of [`Dot`]s (all random draws happen here), then
//! [`render_dots`] rasterizes the list band-parallel onto a transparent
//! canvas. Later dots paint over earlier ones.

use std::fmt;
use std::str::FromStr;

use log::trace;
use rand::Rng;

use super::core::{clamp_param, color_average, dot_radius, render_dots, sample_region, Dot};
use crate::error::{RasterError, Result};
use crate::raster::{luminance, opaque_black, Pixel, Raster, Sample};

// ============================================================================
// Halftone and line screens
// ============================================================================

/// Row-by-row walk over cell origins.
struct CellWalk {
    /// Vertical distance between rows of cells.
    row_step: usize,
    /// Horizontal distance between cells in a row.
    col_step: usize,
    /// Shift each row right by one more pixel, wrapping after `cell + 1` rows.
    staggered: bool,
}

/// One dot per visited cell, sized by the cell's mean luminance.
fn cell_dots<T: Sample>(src: &Raster<T>, cell: usize, use_color: bool, walk: CellWalk) -> Vec<Dot<T>> {
    let (width, height) = (src.width(), src.height());
    let half = (cell / 2) as isize;
    let mut dots = Vec::new();
    let mut shift = 0usize;

    for y in (0..height).step_by(walk.row_step) {
        let start = if walk.staggered { shift } else { 0 };
        for x in (start..width).step_by(walk.col_step) {
            let (x, y) = (x as isize, y as isize);
            let region = sample_region(src, x, y, x + cell as isize, y + cell as isize);
            let average = color_average(&region);
            dots.push(Dot {
                x: x + half,
                y: y + half,
                radius: dot_radius(luminance(&average), T::MAX_F64, cell),
                color: if use_color { average } else { opaque_black() },
            });
        }
        if walk.staggered {
            shift = if shift >= cell { 0 } else { shift + 1 };
        }
    }

    dots
}

fn cell_filter<T: Sample>(
    name: &str,
    src: &Raster<T>,
    dot_size: u32,
    use_color: bool,
    walk: impl FnOnce(usize) -> CellWalk,
) -> Result<Raster<T>> {
    let cell = clamp_param("dot_size", dot_size, 1, 20) as usize;
    let dots = cell_dots(src, cell, use_color, walk(cell));
    trace!("{name}: {} dot(s) of cell {cell}", dots.len());
    render_dots(src.width(), src.height(), &dots)
}

/// Classic halftone: one dot per `dot_size` square, bigger where darker.
///
/// # Arguments
/// * `src` - Source raster
/// * `dot_size` - Cell side, clamped to 1..=20
/// * `use_color` - Paint dots with the cell's mean color instead of black
pub fn halftone<T: Sample>(src: &Raster<T>, dot_size: u32, use_color: bool) -> Result<Raster<T>> {
    cell_filter("halftone", src, dot_size, use_color, |cell| CellWalk {
        row_step: cell,
        col_step: cell,
        staggered: false,
    })
}

/// Halftone with each row of cells shifted one pixel further right.
pub fn halftone_diagonal<T: Sample>(src: &Raster<T>, dot_size: u32, use_color: bool) -> Result<Raster<T>> {
    cell_filter("halftone_diagonal", src, dot_size, use_color, |cell| CellWalk {
        row_step: cell,
        col_step: cell,
        staggered: true,
    })
}

/// Dots on every row, spaced `dot_size` apart, forming horizontal strokes.
pub fn lines_horizontal<T: Sample>(src: &Raster<T>, dot_size: u32, use_color: bool) -> Result<Raster<T>> {
    cell_filter("lines_horizontal", src, dot_size, use_color, |cell| CellWalk {
        row_step: 1,
        col_step: cell,
        staggered: false,
    })
}

/// Dots on every column, spaced `dot_size` apart, forming vertical strokes.
pub fn lines_vertical<T: Sample>(src: &Raster<T>, dot_size: u32, use_color: bool) -> Result<Raster<T>> {
    cell_filter("lines_vertical", src, dot_size, use_color, |cell| CellWalk {
        row_step: cell,
        col_step: 1,
        staggered: false,
    })
}

/// Dots on every row with a per-row shift, forming diagonal strokes.
pub fn lines_diagonal<T: Sample>(src: &Raster<T>, dot_size: u32, use_color: bool) -> Result<Raster<T>> {
    cell_filter("lines_diagonal", src, dot_size, use_color, |cell| CellWalk {
        row_step: 1,
        col_step: cell,
        staggered: true,
    })
}

// ============================================================================
// Pointillism
// ============================================================================

/// Grid pointillism: a disc of `radius` every `2 * radius` pixels, filled
/// with the mean color of a `radius`-wide square around the grid point
/// (edge-clamped sampling).
///
/// # Arguments
/// * `src` - Source raster
/// * `radius` - Point radius, clamped to 1..=20
pub fn pointillism_grid<T: Sample>(src: &Raster<T>, radius: u32) -> Result<Raster<T>> {
    let radius = clamp_param("radius", radius, 1, 20) as usize;
    let (width, height) = (src.width(), src.height());
    let edge = (radius / 2) as isize;
    let mut dots = Vec::new();

    if !src.is_empty() {
        let clamp_x = |v: isize| v.clamp(0, width as isize - 1) as usize;
        let clamp_y = |v: isize| v.clamp(0, height as isize - 1) as usize;
        let mut sampled = Vec::with_capacity(radius * radius);

        for y in (0..height).step_by(radius * 2) {
            for x in (0..width).step_by(radius * 2) {
                let (x0, y0) = (x as isize - edge, y as isize - edge);
                sampled.clear();
                for sy in y0..y0 + radius as isize {
                    for sx in x0..x0 + radius as isize {
                        sampled.push(src.pixel(clamp_x(sx), clamp_y(sy)));
                    }
                }
                dots.push(Dot {
                    x: x as isize,
                    y: y as isize,
                    radius: radius as isize,
                    color: color_average(&sampled),
                });
            }
        }
    }

    trace!("pointillism_grid: {} point(s) of radius {radius}", dots.len());
    render_dots(width, height, &dots)
}

/// Brush radius from a luminance-weighted sample.
///
/// `lum * scaling / (3 * max) * 5`, clamped to `1..=scaling`.
#[inline]
fn brush_radius<T: Sample>(px: &Pixel<T>, scaling: u32) -> isize {
    let weighted = luminance(px) * scaling as f64;
    let radius = (weighted / (3.0 * T::MAX_F64) * 5.0) as isize;
    radius.clamp(1, scaling as isize)
}

/// Random pointillism: `points` discs at random positions, each filled with
/// the source color under its center. Brighter pixels get bigger brushes;
/// the smallest brushes get a random radius in `0..5` instead.
///
/// # Arguments
/// * `src` - Source raster
/// * `points` - Number of discs, clamped to 10..=1000000
/// * `scaling` - Largest brush radius, clamped to 1..=30
/// * `rng` - Random source for positions and small-brush radii
pub fn pointillism_luminance<T: Sample>(
    src: &Raster<T>,
    points: u32,
    scaling: u32,
    rng: &mut impl Rng,
) -> Result<Raster<T>> {
    let points = clamp_param("points", points, 10, 1_000_000);
    let scaling = clamp_param("scaling", scaling, 1, 30);
    let (width, height) = (src.width(), src.height());
    if src.is_empty() {
        return Ok(Raster::new(width, height));
    }

    let dots: Vec<Dot<T>> = (0..points)
        .map(|_| {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            let color = src.pixel(x, y);
            let mut radius = brush_radius(&color, scaling);
            if radius == 1 {
                radius = rng.gen_range(0..5);
            }
            Dot {
                x: x as isize,
                y: y as isize,
                radius,
                color,
            }
        })
        .collect();

    trace!("pointillism_luminance: {points} point(s), scaling {scaling}");
    render_dots(width, height, &dots)
}

/// Traversal order of [`pointillism_luminance_grid`]; later points paint
/// over earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Rows top to bottom, each left to right.
    Up,
    /// Rows bottom to top, each right to left.
    Down,
    /// Columns left to right, each bottom to top.
    Left,
    /// Columns right to left, each bottom to top.
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Visited `(x, y)` points. Reverse walks run from `extent` down to 1.
    fn points(&self, width: usize, height: usize) -> Vec<(usize, usize)> {
        let forward_x = || 0..width;
        let forward_y = || 0..height;
        let reverse_x = || (1..=width).rev();
        let reverse_y = || (1..=height).rev();

        match self {
            Direction::Up => forward_y().flat_map(|y| forward_x().map(move |x| (x, y))).collect(),
            Direction::Down => reverse_y().flat_map(|y| reverse_x().map(move |x| (x, y))).collect(),
            Direction::Left => forward_x().flat_map(|x| reverse_y().map(move |y| (x, y))).collect(),
            Direction::Right => reverse_x().flat_map(|x| reverse_y().map(move |y| (x, y))).collect(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Direction::ALL
            .into_iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| RasterError::UnknownName {
                kind: "direction",
                name: s.to_string(),
            })
    }
}

/// Dense pointillism: one disc per pixel in traversal order, filled with the
/// mean of the 3x3 neighborhood. Brush radius follows luminance; the smallest
/// brushes get a random radius in `0..scaling / 2`.
///
/// # Arguments
/// * `src` - Source raster
/// * `scaling` - Largest brush radius, clamped to 1..=100
/// * `direction` - Traversal order
/// * `rng` - Random source for small-brush radii
pub fn pointillism_luminance_grid<T: Sample>(
    src: &Raster<T>,
    scaling: u32,
    direction: Direction,
    rng: &mut impl Rng,
) -> Result<Raster<T>> {
    let scaling = clamp_param("scaling", scaling, 1, 100);
    let (width, height) = (src.width(), src.height());
    let small = (scaling / 2) as isize;

    let mut dots = Vec::with_capacity(width * height);
    for (x, y) in direction.points(width, height) {
        let (x, y) = (x as isize, y as isize);
        let region = sample_region(src, x - 1, y - 1, x + 2, y + 2);
        let average = color_average(&region);
        let mut radius = brush_radius(&average, scaling);
        if radius == 1 {
            radius = if small > 0 { rng.gen_range(0..small) } else { 0 };
        }
        dots.push(Dot {
            x,
            y,
            radius,
            color: average,
        });
    }

    trace!("pointillism_luminance_grid: {} point(s), direction {direction}", dots.len());
    render_dots(width, height, &dots)
}
