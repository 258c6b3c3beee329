//! The config module loads and validates the simulation parameters shared by
//! every precinct in a batch.  Configurations are read from YAML or JSON,
//! or from the legacy plain-text pair of a parameter file and a file of
//! observed service durations.  Every loader validates before returning, so
//! a bad configuration fails before any precinct is simulated.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::input_modeling::EmpiricalServiceTime;
use crate::utils::errors::SimulationError;
use crate::utils::tokens::Tokens;
use crate::utils::{SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// Hour of the day at which the polls open, used for report labels.
const POLLS_OPEN_HOUR: u64 = 6;
const TAG: &str = "CONFIG: ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub seed: u64,
    pub election_day_length_hours: u64,
    pub time_to_vote_mean_seconds: u64,
    pub min_expected_to_simulate: i64,
    pub max_expected_to_simulate: i64,
    pub wait_time_minutes_that_is_too_long: u64,
    pub number_of_iterations: usize,
    /// Percent of the expected voters waiting when the polls open.
    pub arrival_zero: f64,
    /// Percent of the expected voters arriving in each hour of the day.
    pub arrival_fractions: Vec<f64>,
    /// Observed service durations, in seconds.
    pub service_times: Vec<u64>,
}

impl Configuration {
    pub fn from_yaml_str(text: &str) -> Result<Self, SimulationError> {
        let configuration: Configuration = serde_yaml::from_str(text)?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SimulationError> {
        let configuration: Configuration = serde_json::from_str(text)?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Loads a YAML (`.yaml`, `.yml`) or JSON (`.json`) configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(SimulationError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }

    /// Loads the legacy plain-text configuration.  The first line holds the
    /// seed, election day length (hours), time-to-vote mean (seconds), min
    /// and max expected voters to simulate, the too-long wait (minutes) and
    /// the iteration count.  The second line holds the arrival-zero
    /// percentage followed by one arrival percentage per hour.  The service
    /// time text is a whitespace-separated list of durations in seconds.
    pub fn from_legacy_text(
        config_text: &str,
        service_times_text: &str,
    ) -> Result<Self, SimulationError> {
        let mut lines = config_text.lines().filter(|line| !line.trim().is_empty());
        let mut parameters = Tokens::new("configuration line 1", lines.next().unwrap_or(""));
        let seed = parameters.next_value("seed")?;
        let election_day_length_hours: u64 = parameters.next_value("election day length")?;
        let time_to_vote_mean_seconds = parameters.next_value("time to vote mean")?;
        let min_expected_to_simulate = parameters.next_value("min expected to simulate")?;
        let max_expected_to_simulate = parameters.next_value("max expected to simulate")?;
        let wait_time_minutes_that_is_too_long = parameters.next_value("too-long wait minutes")?;
        let number_of_iterations = parameters.next_value("number of iterations")?;

        let mut arrivals = Tokens::new("configuration line 2", lines.next().unwrap_or(""));
        let arrival_zero = arrivals.next_value("arrival zero percentage")?;
        let arrival_fractions = (0..election_day_length_hours)
            .map(|_| arrivals.next_value("hourly arrival percentage"))
            .collect::<Result<Vec<f64>, SimulationError>>()?;

        let service_times =
            Tokens::new("service times", service_times_text).remaining("service time seconds")?;

        let configuration = Configuration {
            seed,
            election_day_length_hours,
            time_to_vote_mean_seconds,
            min_expected_to_simulate,
            max_expected_to_simulate,
            wait_time_minutes_that_is_too_long,
            number_of_iterations,
            arrival_zero,
            arrival_fractions,
            service_times,
        };
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn from_legacy_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        config_path: P,
        service_times_path: Q,
    ) -> Result<Self, SimulationError> {
        Self::from_legacy_text(
            &fs::read_to_string(config_path)?,
            &fs::read_to_string(service_times_path)?,
        )
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |message: String| Err(SimulationError::InvalidConfiguration(message));
        if self.election_day_length_hours == 0 {
            return invalid(String::from("election day length must be at least one hour"));
        }
        if self.arrival_fractions.len() as u64 != self.election_day_length_hours {
            return invalid(format![
                "expected {} hourly arrival fractions, found {}",
                self.election_day_length_hours,
                self.arrival_fractions.len()
            ]);
        }
        if !(self.arrival_zero.is_finite() && self.arrival_zero >= 0.0) {
            return invalid(format!["arrival zero percentage {} is invalid", self.arrival_zero]);
        }
        if let Some(fraction) = self
            .arrival_fractions
            .iter()
            .find(|fraction| !(fraction.is_finite() && **fraction >= 0.0))
        {
            return invalid(format!["hourly arrival percentage {} is invalid", fraction]);
        }
        if self.service_times.is_empty() {
            return invalid(String::from("the service time table is empty"));
        }
        if self.number_of_iterations == 0 {
            return invalid(String::from("the number of iterations must be at least one"));
        }
        if self.min_expected_to_simulate > self.max_expected_to_simulate {
            return invalid(format![
                "min expected to simulate {} exceeds max {}",
                self.min_expected_to_simulate, self.max_expected_to_simulate
            ]);
        }
        Ok(())
    }

    pub fn election_day_length_seconds(&self) -> u64 {
        self.election_day_length_hours * SECONDS_PER_HOUR
    }

    pub fn max_service_subscript(&self) -> usize {
        self.service_times.len().saturating_sub(1)
    }

    /// The service-time table as an empirical distribution.
    pub fn service_time_distribution(&self) -> Result<EmpiricalServiceTime, SimulationError> {
        EmpiricalServiceTime::new(self.service_times.clone())
    }

    /// Whether a precinct of this size falls inside the batch bounds.  The
    /// lower bound is exclusive and the upper bound inclusive.
    pub fn in_simulation_bounds(&self, expected_voters: i64) -> bool {
        expected_voters > self.min_expected_to_simulate
            && expected_voters <= self.max_expected_to_simulate
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day_seconds = self.election_day_length_seconds();
        writeln!(f)?;
        writeln!(f, "{}RN seed:              {:8}", TAG, self.seed)?;
        writeln!(
            f,
            "{}Election Day length:  {:8} ={:8.2} hours",
            TAG,
            day_seconds,
            day_seconds as f64 / SECONDS_PER_HOUR as f64
        )?;
        writeln!(
            f,
            "{}Time to vote mean:    {:8} ={:8.2} minutes",
            TAG,
            self.time_to_vote_mean_seconds,
            self.time_to_vote_mean_seconds as f64 / SECONDS_PER_MINUTE as f64
        )?;
        writeln!(
            f,
            "{}Min and max expected voters for this simulation: {:8}{:8}",
            TAG, self.min_expected_to_simulate, self.max_expected_to_simulate
        )?;
        writeln!(
            f,
            "{}Wait time (minutes) that is 'too long': {:8}",
            TAG, self.wait_time_minutes_that_is_too_long
        )?;
        writeln!(
            f,
            "{}Number of iterations to perform: {:4}",
            TAG, self.number_of_iterations
        )?;
        writeln!(
            f,
            "{}Max service time subscript: {:6}",
            TAG,
            self.max_service_subscript()
        )?;
        writeln!(f, "{}{:02}-{:02} : {:7.2}", TAG, 0, 0, self.arrival_zero)?;
        for (hour, fraction) in self.arrival_fractions.iter().enumerate() {
            let hour = hour as u64 + POLLS_OPEN_HOUR;
            writeln!(f, "{}{:02}-{:02} : {:7.2}", TAG, hour, hour + 1, fraction)?;
        }
        Ok(())
    }
}
