use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::clock_time;
use crate::utils::errors::SimulationError;

const TAG: &str = "VOTER: ";

/// A single simulated voter.  The arrival time and vote duration are fixed
/// at creation; the station assignment (and with it the start, completion
/// and wait times) is recorded exactly once, when the voter reaches a free
/// station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    sequence: usize,
    time_arrival_seconds: u64,
    time_vote_duration_seconds: u64,
    #[serde(default)]
    assignment: Option<Assignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Assignment {
    station: usize,
    time_start_voting_seconds: u64,
}

impl Voter {
    pub fn new(sequence: usize, arrival_seconds: u64, duration_seconds: u64) -> Self {
        Self {
            sequence,
            time_arrival_seconds: arrival_seconds,
            time_vote_duration_seconds: duration_seconds,
            assignment: None,
        }
    }

    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn time_arrival(&self) -> u64 {
        self.time_arrival_seconds
    }

    pub fn time_vote_duration(&self) -> u64 {
        self.time_vote_duration_seconds
    }

    pub fn station(&self) -> Option<usize> {
        self.assignment.map(|assignment| assignment.station)
    }

    pub fn time_start_voting(&self) -> Option<u64> {
        self.assignment
            .map(|assignment| assignment.time_start_voting_seconds)
    }

    pub fn time_done_voting(&self) -> Option<u64> {
        self.time_start_voting()
            .map(|start| start + self.time_vote_duration_seconds)
    }

    pub fn time_waiting(&self) -> Option<u64> {
        self.time_start_voting()
            .map(|start| start - self.time_arrival_seconds)
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// Records the station and start time.  A voter can only be assigned
    /// once, and never before arriving.
    pub(crate) fn assign_station(
        &mut self,
        station: usize,
        start_seconds: u64,
    ) -> Result<(), SimulationError> {
        if self.assignment.is_some() || start_seconds < self.time_arrival_seconds {
            return Err(SimulationError::InvalidVoterState(self.sequence));
        }
        self.assignment = Some(Assignment {
            station,
            time_start_voting_seconds: start_seconds,
        });
        Ok(())
    }

    pub fn header() -> String {
        format![
            "{}{:>7}  {:>15} {:>15} {:>15} {:>15} {:>15}  {:>4}",
            TAG, "Seq", "Arr", "Start", "Dur", "End", "Wait", "Stn"
        ]
    }
}

fn seconds_and_clock(seconds: Option<u64>) -> String {
    match seconds {
        Some(seconds) => format!["{:6} {}", seconds, clock_time(seconds)],
        None => format!["{:>6} {:>8}", "-", "--:--:--"],
    }
}

impl fmt::Display for Voter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:7}: {} {} {} {} {}: {:>4}",
            TAG,
            self.sequence,
            seconds_and_clock(Some(self.time_arrival_seconds)),
            seconds_and_clock(self.time_start_voting()),
            seconds_and_clock(Some(self.time_vote_duration_seconds)),
            seconds_and_clock(self.time_done_voting()),
            seconds_and_clock(self.time_waiting()),
            self.station()
                .map(|station| station.to_string())
                .unwrap_or_else(|| String::from("-1"))
        )
    }
}

/// Renders a labelled table of voters, one per line, for inspecting a
/// single trial.
pub fn voter_table<'a, I>(label: &str, voters: I) -> String
where
    I: IntoIterator<Item = &'a Voter>,
{
    let rows: Vec<String> = voters.into_iter().map(|voter| voter.to_string()).collect();
    let mut table = format!["\n{} WITH {:6} ENTRIES\n{}\n", label, rows.len(), Voter::header()];
    rows.iter().for_each(|row| {
        table.push_str(row);
        table.push('\n');
    });
    table
}
