use std::collections::{BTreeMap, VecDeque};

use super::StationPool;
use crate::models::Voter;
use crate::utils::errors::SimulationError;

/// The station allocation replays one election day for a fixed number of
/// identical stations.  Simulated time advances one second per step.  Each
/// step first completes the voters finishing at the current second,
/// returning their stations to the pool, and then seats arrived voters in
/// arrival order at the lowest free stations.  A station freed in a step is
/// available to voters seated in that same step.
///
/// Voters live in an arena; `pending`, `voting` and `done` index into it,
/// and every voter is in exactly one of them.  Voters only ever move
/// pending to voting to done.
#[derive(Debug, Clone)]
pub struct StationAllocation {
    voters: Vec<Voter>,
    /// Voters not yet seated, in arrival order with ties in sequence order.
    pending: VecDeque<usize>,
    /// Seated voters keyed by completion time.
    voting: BTreeMap<u64, Vec<usize>>,
    /// Finished voters, in completion order.
    done: Vec<usize>,
    stations: StationPool,
    stations_count: usize,
    clock: u64,
}

/// The finished voters of one allocation run, in completion order.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    pub stations_count: usize,
    /// One second past the step in which the last voter finished, or zero
    /// for an empty day.
    pub end_time: u64,
    pub voters: Vec<Voter>,
}

impl StationAllocation {
    pub fn new(voters: Vec<Voter>, stations_count: usize) -> Result<Self, SimulationError> {
        if stations_count == 0 {
            return Err(SimulationError::NoStations);
        }
        let mut pending: Vec<usize> = (0..voters.len()).collect();
        pending.sort_by_key(|index| (voters[*index].time_arrival(), voters[*index].sequence()));
        Ok(Self {
            voters,
            pending: pending.into(),
            voting: BTreeMap::new(),
            done: Vec::new(),
            stations: StationPool::new(stations_count),
            stations_count,
            clock: 0,
        })
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn voting_count(&self) -> usize {
        self.voting.values().map(Vec::len).sum()
    }

    pub fn done_count(&self) -> usize {
        self.done.len()
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.voting.is_empty()
    }

    /// Moves every voter whose completion time has been reached to `done`,
    /// freeing its station.
    fn complete_voters(&mut self) -> Result<(), SimulationError> {
        let still_voting = self.voting.split_off(&(self.clock + 1));
        let finished = std::mem::replace(&mut self.voting, still_voting);
        for index in finished.into_values().flatten() {
            let station = self.voters[index]
                .station()
                .ok_or(SimulationError::InvalidVoterState(self.voters[index].sequence()))?;
            self.stations.release(station);
            self.done.push(index);
        }
        Ok(())
    }

    /// Seats arrived voters while stations are free.  Seated voters always
    /// form a prefix of the arrival order: once the pool runs dry no later
    /// voter can be seated in this step either, and the first voter still
    /// to arrive ends the scan.
    fn seat_voters(&mut self) -> Result<(), SimulationError> {
        while let Some(&index) = self.pending.front() {
            if self.voters[index].time_arrival() > self.clock || !self.stations.has_free() {
                break;
            }
            let station = self.stations.acquire().ok_or(SimulationError::NoStations)?;
            let voter = &mut self.voters[index];
            voter.assign_station(station, self.clock)?;
            let done_voting = voter
                .time_done_voting()
                .ok_or(SimulationError::InvalidVoterState(voter.sequence()))?;
            self.pending.pop_front();
            self.voting.entry(done_voting).or_default().push(index);
        }
        Ok(())
    }

    /// Executes one simulated second.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        self.complete_voters()?;
        self.seat_voters()?;
        self.clock += 1;
        Ok(())
    }

    /// Steps until every voter has finished.
    pub fn run(mut self) -> Result<AllocationOutcome, SimulationError> {
        while !self.is_finished() {
            self.step()?;
        }
        let mut voters: Vec<Option<Voter>> = self.voters.into_iter().map(Some).collect();
        let done_voters = self
            .done
            .iter()
            .filter_map(|index| voters[*index].take())
            .collect();
        Ok(AllocationOutcome {
            stations_count: self.stations_count,
            end_time: self.clock,
            voters: done_voters,
        })
    }
}
