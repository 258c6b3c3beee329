use std::io::Write;

use crate::models::Precinct;
use crate::output_analysis::{HistogramRow, WaitStatistics};
use crate::utils::errors::SimulationError;
use crate::utils::SECONDS_PER_MINUTE;

pub(crate) const PCT_TAG: &str = "PCT: ";
pub(crate) const SIM_TAG: &str = "SIM: ";

/// The destination of report text.  Drivers emit complete lines, without
/// trailing newlines.
pub trait ReportSink {
    fn emit(&mut self, line: &str) -> Result<(), SimulationError>;
}

/// Collects report lines in memory.
impl ReportSink for Vec<String> {
    fn emit(&mut self, line: &str) -> Result<(), SimulationError> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes report lines to any `io::Write`, such as stdout or a file.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn emit(&mut self, line: &str) -> Result<(), SimulationError> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }
}

fn minutes(seconds: f64) -> f64 {
    seconds / SECONDS_PER_MINUTE as f64
}

fn count_and_percent(statistics: &WaitStatistics, count: usize) -> String {
    match statistics.percent_of_expected(count) {
        Some(percent) => format!["{:6} {:6.2}", count, percent],
        None => format!["{:6} {:>6}", count, "-"],
    }
}

/// The one-line summary of a single trial.
pub fn trial_summary(
    iteration: usize,
    precinct: &Precinct,
    stations_count: usize,
    statistics: &WaitStatistics,
) -> String {
    let prefix = format![
        "{}{:3} {:4} {:<25}{:6}{:4} stations,",
        PCT_TAG, iteration, precinct.number, precinct.name, precinct.expected_voters, stations_count
    ];
    match (statistics.wait_mean_seconds, statistics.wait_dev_seconds) {
        (Some(mean), Some(dev)) => format![
            "{} mean/dev wait (mins) {:8.2} {:8.2} toolong {}{}{}",
            prefix,
            minutes(mean),
            minutes(dev),
            count_and_percent(statistics, statistics.too_long.over),
            count_and_percent(statistics, statistics.too_long.over_plus_10),
            count_and_percent(statistics, statistics.too_long.over_plus_20),
        ],
        _ => format!["{} no data", prefix],
    }
}

/// The histogram block for one station count: a header, one line per
/// minute bucket, and a closing line.
pub fn histogram_lines(
    precinct: &Precinct,
    stations_count: usize,
    rows: &[HistogramRow],
) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!["{}HISTO {}", PCT_TAG, precinct],
        format!["{}HISTO STATIONS {:4}", PCT_TAG, stations_count],
    ];
    lines.extend(rows.iter().map(|row| {
        format![
            "{}HISTO {:6}: {:7.2}: {}",
            PCT_TAG,
            row.minute,
            row.average_count,
            "*".repeat(row.stars)
        ]
    }));
    lines.push(String::from("HISTO"));
    lines.push(String::new());
    lines
}
