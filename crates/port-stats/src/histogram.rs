//! Fixed-bucket, equal-width histograms.

use crate::{StatsError, StatsResult};

/// Slack applied to both bucket edges when placing a value.
pub const BUCKET_EPSILON: f64 = 1e-4;

/// Bucket count used for the report histograms.
pub const DEFAULT_BUCKETS: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramItem {
    pub start:  f64,
    pub end:    f64,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramData {
    pub start: f64,
    pub end:   f64,
    pub items: Vec<HistogramItem>,
}

impl HistogramData {
    /// Number of values binned.
    pub fn total(&self) -> u32 {
        self.items.iter().map(|i| i.height).sum()
    }
}

/// Bin `values` into `buckets` equal-width buckets spanning `[min, max]`.
///
/// A value belongs to the first bucket with
/// `start - ε <= value < end + ε`; a value matching none is an error.
pub fn build_histogram(
    values:  &[f64],
    min:     f64,
    max:     f64,
    buckets: usize,
) -> StatsResult<HistogramData> {
    if buckets == 0 {
        return Err(StatsError::InvalidBucketCount);
    }
    if !min.is_finite() || !max.is_finite() || max < min {
        return Err(StatsError::InvalidRange { start: min, end: max });
    }

    let width = (max - min) / buckets as f64;
    let mut items: Vec<HistogramItem> = (0..buckets)
        .map(|i| HistogramItem {
            start:  min + width * i as f64,
            end:    if i + 1 == buckets { max } else { min + width * (i + 1) as f64 },
            height: 0,
        })
        .collect();

    for &value in values {
        let bucket = items
            .iter_mut()
            .find(|b| b.start - BUCKET_EPSILON <= value && value < b.end + BUCKET_EPSILON)
            .ok_or(StatsError::HistogramOutOfRange { value, start: min, end: max })?;
        bucket.height += 1;
    }

    Ok(HistogramData { start: min, end: max, items })
}

/// Histogram over `[0, max(values)]`, the shape used in reports.
pub fn observed_histogram(values: &[f64], buckets: usize) -> StatsResult<HistogramData> {
    let max = values.iter().copied().fold(0.0, f64::max);
    build_histogram(values, 0.0, max, buckets)
}
