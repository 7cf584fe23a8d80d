//! Fixed-capacity sample storage, aggregation, and best-frame selection.
//!
//! [`SampleStore`] owns up to `capacity` (frame, histogram) pairs while a
//! stream is being sampled. Once sampling ends, [`select`](SampleStore::select)
//! aggregates the histograms into a per-bin arithmetic mean and returns the
//! index of the sample with the smallest sum-of-squared deviation from it.
//! The aggregate is called the *median* throughout, following the domain
//! convention inherited from thumbnail pipelines — it is a mean, and that
//! exact behavior is load-bearing for downstream consumers.
//!
//! Capacity is decided once by the budget planner and never grown; the
//! store is an arena of pre-sized slots, not a growth-on-demand container.

use crate::error::FramePickError;
use crate::frame::VideoFrame;
use crate::histogram::Histogram;

/// One retained frame and its histogram.
#[derive(Debug, Clone)]
pub struct Sample {
    frame: VideoFrame,
    histogram: Histogram,
}

impl Sample {
    /// The retained frame.
    pub fn frame(&self) -> &VideoFrame {
        &self.frame
    }

    /// The frame's histogram.
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }
}

/// Fixed-capacity collection of samples pending selection.
///
/// # Example
///
/// ```
/// use framepick::{Histogram, SampleStore, VideoFrame};
///
/// let mut store = SampleStore::new(2, 2)?;
/// store.push(VideoFrame::filled(1, 1, 0), Histogram::from_bins(vec![4, 0]))?;
/// store.push(VideoFrame::filled(1, 1, 1), Histogram::from_bins(vec![2, 2]))?;
///
/// let best = store.select()?;
/// let frame = store.into_frame(best).unwrap();
/// # Ok::<(), framepick::FramePickError>(())
/// ```
#[derive(Debug)]
pub struct SampleStore {
    capacity: usize,
    hist_size: usize,
    samples: Vec<Sample>,
    median: Vec<f64>,
}

impl SampleStore {
    /// Create a store for up to `capacity` samples of `hist_size`-bin
    /// histograms.
    ///
    /// Storage for the full capacity is reserved up front so sampling never
    /// reallocates. The median starts as the zero vector and is only
    /// meaningful after [`select`](SampleStore::select).
    ///
    /// # Errors
    ///
    /// Returns [`FramePickError::OutOfMemory`] if either buffer cannot be
    /// reserved; anything allocated before the failure is released by drop.
    pub fn new(capacity: usize, hist_size: usize) -> Result<Self, FramePickError> {
        if capacity == 0 {
            return Err(FramePickError::InvalidFormat(
                "sample store capacity must be positive".to_string(),
            ));
        }
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(capacity)
            .map_err(|_| FramePickError::OutOfMemory)?;
        let mut median = Vec::new();
        median
            .try_reserve_exact(hist_size)
            .map_err(|_| FramePickError::OutOfMemory)?;
        median.resize(hist_size, 0.0);
        Ok(Self {
            capacity,
            hist_size,
            samples,
            median,
        })
    }

    /// Number of samples inserted so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` if no samples have been inserted.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The fixed capacity decided at creation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` once the store holds `capacity` samples.
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// The aggregated per-bin mean. All zeros until
    /// [`select`](SampleStore::select) has run.
    pub fn median(&self) -> &[f64] {
        &self.median
    }

    /// The histogram of sample `index`, if present.
    pub fn histogram(&self, index: usize) -> Option<&Histogram> {
        self.samples.get(index).map(Sample::histogram)
    }

    /// Insert one sampled frame with its histogram.
    ///
    /// # Errors
    ///
    /// Returns [`FramePickError::SampleStoreFull`] when the capacity is
    /// reached and [`FramePickError::HistogramSizeMismatch`] if the
    /// histogram's bin count differs from the store's.
    pub fn push(&mut self, frame: VideoFrame, histogram: Histogram) -> Result<(), FramePickError> {
        if self.is_full() {
            return Err(FramePickError::SampleStoreFull {
                capacity: self.capacity,
            });
        }
        if histogram.len() != self.hist_size {
            return Err(FramePickError::HistogramSizeMismatch {
                expected: self.hist_size,
                actual: histogram.len(),
            });
        }
        self.samples.push(Sample { frame, histogram });
        Ok(())
    }

    /// Finalize the store: aggregate the histograms and pick the most
    /// representative sample.
    ///
    /// Computes `median[i] = sum_j hist_j[i] / n` in floating point, then
    /// returns the index of the sample with the smallest sum-of-squared
    /// deviation from the median. Ties go to the earliest index.
    ///
    /// # Errors
    ///
    /// Returns [`FramePickError::NoFramesSampled`] on an empty store.
    pub fn select(&mut self) -> Result<usize, FramePickError> {
        if self.samples.is_empty() {
            return Err(FramePickError::NoFramesSampled);
        }

        let count = self.samples.len();
        self.median.fill(0.0);
        for sample in &self.samples {
            for (accumulated, &bin) in self.median.iter_mut().zip(sample.histogram.bins()) {
                *accumulated += f64::from(bin) / count as f64;
            }
        }

        let mut best_index = 0;
        let mut min_error = f64::MAX;
        for (index, sample) in self.samples.iter().enumerate() {
            let error = sum_squared_error(sample.histogram.bins(), &self.median);
            // Strict less-than: the earliest of tied minima wins.
            if error < min_error {
                min_error = error;
                best_index = index;
            }
        }

        log::debug!(
            "Selected sample {best_index} of {count} (sum-of-squared error {min_error:.3})"
        );
        Ok(best_index)
    }

    /// Consume the store, returning the frame at `index` and releasing
    /// every other retained frame.
    pub fn into_frame(self, index: usize) -> Option<VideoFrame> {
        self.samples
            .into_iter()
            .nth(index)
            .map(|sample| sample.frame)
    }
}

/// Unnormalized similarity score between a histogram and the aggregate.
///
/// Lower means more representative. No division by the bin count; the raw
/// sum is compared directly.
fn sum_squared_error(bins: &[u32], median: &[f64]) -> f64 {
    bins.iter()
        .zip(median)
        .map(|(&bin, &center)| {
            let deviation = center - f64::from(bin);
            deviation * deviation
        })
        .sum()
}
