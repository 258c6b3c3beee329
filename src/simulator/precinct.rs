use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::report::{histogram_lines, trial_summary, PCT_TAG};
use super::{AllocationOutcome, ReportSink, StationAllocation};
use crate::config::Configuration;
use crate::input_modeling::RandomSource;
use crate::models::{Precinct, VoterPopulationGenerator};
use crate::output_analysis::{WaitHistogram, WaitStatistics};
use crate::utils::errors::SimulationError;

/// The trials of one candidate station count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationCountResult {
    pub stations_count: usize,
    pub trials: Vec<WaitStatistics>,
    /// Wait minutes accumulated over every trial.
    pub histogram: WaitHistogram,
}

impl StationCountResult {
    /// Voters waiting too long, summed over every trial.
    pub fn too_long_total(&self) -> usize {
        self.trials.iter().map(|trial| trial.too_long.over).sum()
    }

    /// No voter waited too long in any trial.
    pub fn is_satisfied(&self) -> bool {
        self.too_long_total() == 0
    }
}

/// The sweep of one precinct over candidate station counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecinctOutcome {
    pub precinct_number: i64,
    pub min_stations: usize,
    pub max_stations: usize,
    pub results: Vec<StationCountResult>,
}

impl PrecinctOutcome {
    /// The last station count attempted.
    pub fn final_stations_count(&self) -> Option<usize> {
        self.results.last().map(|result| result.stations_count)
    }

    /// Whether the sweep stopped at a station count where nobody waited too
    /// long, rather than running out of candidates.
    pub fn is_satisfied(&self) -> bool {
        self.results
            .last()
            .map(StationCountResult::is_satisfied)
            .unwrap_or(false)
    }
}

/// The precinct simulation sweeps the station count upward from the
/// minimum the expected workload requires.  Each station count runs the
/// configured number of independent trials, each with a freshly generated
/// population, and the sweep stops at the first station count where no
/// trial had a voter wait too long.  The sweep gives up, without error,
/// once it has tried one extra station per hour of the election day.
#[derive(Debug, Clone)]
pub struct PrecinctSimulation<'a> {
    configuration: &'a Configuration,
    generator: VoterPopulationGenerator,
}

impl<'a> PrecinctSimulation<'a> {
    pub fn new(configuration: &'a Configuration) -> Result<Self, SimulationError> {
        configuration.validate()?;
        Ok(Self {
            configuration,
            generator: VoterPopulationGenerator::new(configuration)?,
        })
    }

    /// Candidate station counts: from the stations needed to serve the
    /// expected voters back to back over the day (at least one), up to one
    /// extra station per hour of the day.
    pub fn station_range(&self, expected_voters: i64) -> RangeInclusive<usize> {
        let workload_seconds =
            expected_voters.max(0) as f64 * self.configuration.time_to_vote_mean_seconds as f64;
        let day_seconds = self.configuration.election_day_length_seconds() as f64;
        let min_stations = ((workload_seconds / day_seconds).round() as usize).max(1);
        min_stations..=min_stations + self.configuration.election_day_length_hours as usize
    }

    /// Generates a population and replays it against `stations_count`
    /// stations.
    pub fn run_trial(
        &self,
        precinct: &Precinct,
        stations_count: usize,
        random: &mut dyn RandomSource,
    ) -> Result<AllocationOutcome, SimulationError> {
        let voters = self.generator.generate(precinct.expected_voters, random)?;
        StationAllocation::new(voters, stations_count)?.run()
    }

    fn run_station_count(
        &self,
        precinct: &Precinct,
        stations_count: usize,
        random: &mut dyn RandomSource,
        sink: &mut dyn ReportSink,
    ) -> Result<StationCountResult, SimulationError> {
        let mut histogram = WaitHistogram::new();
        let mut trials = Vec::with_capacity(self.configuration.number_of_iterations);
        for iteration in 0..self.configuration.number_of_iterations {
            let outcome = self.run_trial(precinct, stations_count, random)?;
            let statistics = WaitStatistics::compute(
                &outcome.voters,
                precinct.expected_voters,
                self.configuration.wait_time_minutes_that_is_too_long,
                &mut histogram,
            );
            sink.emit(&trial_summary(
                iteration,
                precinct,
                stations_count,
                &statistics,
            ))?;
            trials.push(statistics);
        }
        Ok(StationCountResult {
            stations_count,
            trials,
            histogram,
        })
    }

    fn emit_histogram(
        &self,
        precinct: &Precinct,
        result: &StationCountResult,
        sink: &mut dyn ReportSink,
    ) -> Result<(), SimulationError> {
        if result.histogram.is_empty() {
            debug!(
                precinct = precinct.number,
                stations = result.stations_count,
                "No finished voters; histogram skipped"
            );
            return Ok(());
        }
        let rows = result
            .histogram
            .rows(self.configuration.number_of_iterations);
        histogram_lines(precinct, result.stations_count, &rows)
            .iter()
            .try_for_each(|line| sink.emit(line))
    }

    /// Runs the station-count sweep for one precinct, emitting a summary
    /// line per trial and the histograms the precinct asks for.
    pub fn run(
        &self,
        precinct: &Precinct,
        random: &mut dyn RandomSource,
        sink: &mut dyn ReportSink,
    ) -> Result<PrecinctOutcome, SimulationError> {
        let stations = self.station_range(precinct.expected_voters);
        if precinct.expected_voters <= 0 {
            warn!(
                precinct = precinct.number,
                expected_voters = precinct.expected_voters,
                "Precinct expects no voters; statistics will report no data"
            );
        }
        info!(
            precinct = precinct.number,
            name = %precinct.name,
            expected_voters = precinct.expected_voters,
            min_stations = *stations.start(),
            max_stations = *stations.end(),
            "Starting station sweep"
        );
        let mut outcome = PrecinctOutcome {
            precinct_number: precinct.number,
            min_stations: *stations.start(),
            max_stations: *stations.end(),
            results: Vec::new(),
        };
        for stations_count in stations {
            sink.emit(&format!["{}{}", PCT_TAG, precinct])?;
            let result = self.run_station_count(precinct, stations_count, random, sink)?;
            debug!(
                precinct = precinct.number,
                stations = stations_count,
                too_long = result.too_long_total(),
                "Station count trials finished"
            );
            if precinct.is_histogram_station_count(stations_count) {
                self.emit_histogram(precinct, &result, sink)?;
            }
            let satisfied = result.is_satisfied();
            outcome.results.push(result);
            if satisfied {
                break;
            }
        }
        match (outcome.is_satisfied(), outcome.final_stations_count()) {
            (true, Some(stations_count)) => info!(
                precinct = precinct.number,
                stations = stations_count,
                "No voter waits too long"
            ),
            (_, stations_count) => info!(
                precinct = precinct.number,
                stations = ?stations_count,
                "Station sweep exhausted with voters still waiting too long"
            ),
        }
        Ok(outcome)
    }
}
