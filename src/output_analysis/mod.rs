//! The output analysis module turns finished voters into wait-time
//! statistics.  Each trial yields a `WaitStatistics` (population mean and
//! standard deviation of the wait, and counts of voters waiting too long),
//! while a `WaitHistogram` accumulates per-minute wait counts across all
//! the trials of one station count.

use std::collections::BTreeMap;

use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::models::Voter;
use crate::utils::{ceil_div, SECONDS_PER_MINUTE};

/// Widest histogram row, in marker characters, for the lowest wait bucket.
pub const HISTOGRAM_WIDTH: u64 = 50;

fn sum<T: Float>(points: &[T]) -> T
where
    f64: Into<T>,
{
    points.iter().fold(0.0.into(), |sum, point| sum + *point)
}

/// The mean over a fixed divisor, rather than the number of points.
fn population_mean<T: Float>(points: &[T], divisor: T) -> T
where
    f64: Into<T>,
{
    sum(points) / divisor
}

/// The standard deviation over a fixed divisor, given the mean.
fn population_deviation<T: Float>(points: &[T], mean: T, divisor: T) -> T
where
    f64: Into<T>,
{
    (points
        .iter()
        .fold(0.0.into(), |acc: T, point| acc + (*point - mean).powi(2))
        / divisor)
        .sqrt()
}

/// Counts of voters whose wait, in whole minutes, strictly exceeds the
/// too-long threshold, the threshold plus ten, and the threshold plus
/// twenty.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooLongCounts {
    pub over: usize,
    pub over_plus_10: usize,
    pub over_plus_20: usize,
}

/// Wait-time statistics for a single trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitStatistics {
    pub expected_voters: i64,
    pub voters_done: usize,
    /// `None` when the precinct expects no voters.
    pub wait_mean_seconds: Option<f64>,
    pub wait_dev_seconds: Option<f64>,
    pub too_long: TooLongCounts,
}

impl WaitStatistics {
    /// Computes the statistics of one trial and adds each voter's wait to
    /// the histogram.  Means are taken over the expected voter count, not
    /// the number of voters observed.
    pub fn compute(
        voters: &[Voter],
        expected_voters: i64,
        too_long_minutes: u64,
        histogram: &mut WaitHistogram,
    ) -> Self {
        let waits: Vec<u64> = voters.iter().filter_map(Voter::time_waiting).collect();
        let mut too_long = TooLongCounts::default();
        for wait in &waits {
            let minutes = wait / SECONDS_PER_MINUTE;
            histogram.record(minutes);
            if minutes > too_long_minutes {
                too_long.over += 1;
            }
            if minutes > too_long_minutes.saturating_add(10) {
                too_long.over_plus_10 += 1;
            }
            if minutes > too_long_minutes.saturating_add(20) {
                too_long.over_plus_20 += 1;
            }
        }
        let (wait_mean_seconds, wait_dev_seconds) = if expected_voters > 0 {
            let points: Vec<f64> = waits.iter().map(|wait| *wait as f64).collect();
            let divisor = expected_voters as f64;
            let mean = population_mean(&points, divisor);
            (
                Some(mean),
                Some(population_deviation(&points, mean, divisor)),
            )
        } else {
            (None, None)
        };
        Self {
            expected_voters,
            voters_done: waits.len(),
            wait_mean_seconds,
            wait_dev_seconds,
            too_long,
        }
    }

    pub fn has_data(&self) -> bool {
        self.wait_mean_seconds.is_some()
    }

    /// A count as a percentage of the expected voters, when there are any.
    pub fn percent_of_expected(&self, count: usize) -> Option<f64> {
        if self.expected_voters > 0 {
            Some(100.0 * count as f64 / self.expected_voters as f64)
        } else {
            None
        }
    }
}

/// Per-minute wait counts accumulated over every trial of a station count.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitHistogram {
    counts: BTreeMap<u64, u64>,
}

/// One rendered histogram line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramRow {
    pub minute: u64,
    /// The bucket count averaged over trials.
    pub average_count: f64,
    pub stars: usize,
}

impl WaitHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, minute: u64) {
        *self.counts.entry(minute).or_insert(0) += 1;
    }

    pub fn count(&self, minute: u64) -> u64 {
        self.counts.get(&minute).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn lowest(&self) -> Option<u64> {
        self.counts.keys().next().copied()
    }

    pub fn highest(&self) -> Option<u64> {
        self.counts.keys().next_back().copied()
    }

    /// Voters represented by one marker, sized so the lowest bucket's
    /// average row is at most about fifty markers wide.
    pub fn voters_per_star(&self, iterations: usize) -> u64 {
        let lowest_count = self.lowest().map(|minute| self.count(minute)).unwrap_or(0);
        let scale = HISTOGRAM_WIDTH * iterations.max(1) as u64;
        (lowest_count / scale).max(1)
    }

    /// One row per minute from the lowest to the highest recorded wait,
    /// including empty minutes in between.  An empty histogram has no rows.
    pub fn rows(&self, iterations: usize) -> Vec<HistogramRow> {
        let (lowest, highest) = match (self.lowest(), self.highest()) {
            (Some(lowest), Some(highest)) => (lowest, highest),
            _ => return Vec::new(),
        };
        let iterations = iterations.max(1) as f64;
        let voters_per_star = self.voters_per_star(iterations as usize) as f64;
        (lowest..=highest)
            .map(|minute| {
                let average_count = self.count(minute) as f64 / iterations;
                HistogramRow {
                    minute,
                    average_count,
                    stars: ceil_div(average_count, voters_per_star),
                }
            })
            .collect()
    }
}
