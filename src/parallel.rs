//! Parallel band executor.
//!
//! Splits the row range of an output raster into contiguous bands and runs a
//! worker per band on rayon. Each worker receives a [`Band`], a mutable view
//! over its own rows only, so no pixel can be written by two workers and the
//! shared output needs no locking.
//!
//! The executor allocates the output once, blocks until every band has been
//! joined, and surfaces the first worker error or panic to the caller.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};
use ndarray::{Array3, ArrayViewMut3, Axis};
use rayon::prelude::*;

use crate::error::{RasterError, Result};
use crate::raster::{Pixel, Raster, Sample, CHANNELS};

/// Worker-count policy for the band executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Below this many hardware threads everything runs as a single band.
    pub min_parallel: usize,
    /// Threads held back for the calling thread.
    pub reserved: usize,
    /// Optional hard cap on the number of bands.
    pub max_workers: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        ParallelConfig {
            min_parallel: 4,
            reserved: 1,
            max_workers: None,
        }
    }
}

impl ParallelConfig {
    /// Always a single band.
    pub fn serial() -> Self {
        ParallelConfig {
            max_workers: Some(1),
            ..Self::default()
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers.max(1));
        self
    }

    /// Worker count for the current machine.
    pub fn worker_count(&self) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.workers_for(available)
    }

    /// Worker count given `available` hardware threads.
    pub fn workers_for(&self, available: usize) -> usize {
        let workers = if available >= self.min_parallel {
            available.saturating_sub(self.reserved).max(1)
        } else {
            1
        };
        match self.max_workers {
            Some(cap) => workers.min(cap.max(1)),
            None => workers,
        }
    }
}

/// Partition `[0, extent)` into at most `workers` contiguous bands of
/// `ceil(extent / workers)` rows; the last band is truncated.
pub fn band_ranges(extent: usize, workers: usize) -> Vec<Range<usize>> {
    if extent == 0 {
        return Vec::new();
    }
    let rows = extent.div_ceil(workers.max(1));
    (0..extent)
        .step_by(rows)
        .map(|start| start..(start + rows).min(extent))
        .collect()
}

/// Mutable view over one band of the output raster.
///
/// Coordinates are absolute image coordinates. Writes outside the band's
/// rows (or outside the image width) are dropped.
pub struct Band<'a, T: Sample> {
    index: usize,
    start: usize,
    view: ArrayViewMut3<'a, T>,
}

impl<'a, T: Sample> Band<'a, T> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.start + self.view.dim().0
    }

    pub fn width(&self) -> usize {
        self.view.dim().1
    }

    #[inline]
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0
            && y >= self.start as isize
            && (x as usize) < self.width()
            && ((y as usize) - self.start) < self.view.dim().0
    }

    /// Write a pixel; returns `false` when `(x, y)` is outside the band.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, px: Pixel<T>) -> bool {
        self.put(x as isize, y as isize, px)
    }

    /// Signed variant of [`Band::set_pixel`] for drawing routines.
    #[inline]
    pub fn put(&mut self, x: isize, y: isize, px: Pixel<T>) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let (x, row) = (x as usize, y as usize - self.start);
        for (c, v) in px.into_iter().enumerate() {
            self.view[[row, x, c]] = v;
        }
        true
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel<T>> {
        if !self.contains(x as isize, y as isize) {
            return None;
        }
        let row = y - self.start;
        Some([
            self.view[[row, x, 0]],
            self.view[[row, x, 1]],
            self.view[[row, x, 2]],
            self.view[[row, x, 3]],
        ])
    }
}

/// Run `worker` over every band of a freshly allocated `width` x `extent`
/// raster and return it once all bands have completed.
pub fn execute<T, F>(
    config: &ParallelConfig,
    width: usize,
    extent: usize,
    worker: F,
) -> Result<Raster<T>>
where
    T: Sample,
    F: Fn(&mut Band<'_, T>) -> Result<()> + Sync,
{
    let mut output = Array3::<T>::default((extent, width, CHANNELS));
    if extent == 0 || width == 0 {
        return Ok(Raster::from_parts(output));
    }

    let workers = config.worker_count();
    let bands = band_ranges(extent, workers);
    let band_rows = bands[0].len();
    debug!(
        "dispatching {} band(s) of {} row(s) over {}x{} ({} worker(s))",
        bands.len(),
        band_rows,
        width,
        extent,
        workers
    );

    output
        .axis_chunks_iter_mut(Axis(0), band_rows)
        .into_par_iter()
        .enumerate()
        .try_for_each(|(index, view)| run_band(&worker, index, index * band_rows, view))?;

    Ok(Raster::from_parts(output))
}

/// [`execute`] with the dimensions of `source`.
pub fn execute_like<S, T, F>(source: &Raster<S>, worker: F) -> Result<Raster<T>>
where
    S: Sample,
    T: Sample,
    F: Fn(&mut Band<'_, T>) -> Result<()> + Sync,
{
    execute(
        &ParallelConfig::default(),
        source.width(),
        source.height(),
        worker,
    )
}

fn run_band<T, F>(worker: &F, index: usize, start: usize, view: ArrayViewMut3<'_, T>) -> Result<()>
where
    T: Sample,
    F: Fn(&mut Band<'_, T>) -> Result<()> + Sync,
{
    let end = start + view.dim().0;
    let mut band = Band { index, start, view };
    match panic::catch_unwind(AssertUnwindSafe(|| worker(&mut band))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            warn!("band {index} (rows {start}..{end}) failed: {err}");
            Err(err)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!("band {index} (rows {start}..{end}) panicked: {message}");
            Err(RasterError::WorkerPanicked {
                band: index,
                start,
                end,
                message,
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
