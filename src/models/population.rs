use serde::{Deserialize, Serialize};

use super::Voter;
use crate::config::Configuration;
use crate::input_modeling::{EmpiricalServiceTime, Interarrival, RandomSource};
use crate::utils::errors::SimulationError;
use crate::utils::{round_to_count, SECONDS_PER_HOUR};

/// The population generator synthesizes one election day of voters for a
/// precinct.  A share of the expected voters is already waiting when the
/// polls open; the rest arrive hour by hour with exponential interarrival
/// times, at the rate implied by that hour's share of the expected voters.
/// Every voter's duration is drawn from the empirical service-time table.
///
/// Random draws happen in a fixed order (the waiting cohort first, then
/// each hour in turn, with an interarrival draw before each duration draw),
/// so a seeded `RandomSource` reproduces the population exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterPopulationGenerator {
    arrival_zero: f64,
    arrival_fractions: Vec<f64>,
    service_time: EmpiricalServiceTime,
}

impl VoterPopulationGenerator {
    pub fn new(configuration: &Configuration) -> Result<Self, SimulationError> {
        Ok(Self {
            arrival_zero: configuration.arrival_zero,
            arrival_fractions: configuration.arrival_fractions.clone(),
            service_time: configuration.service_time_distribution()?,
        })
    }

    /// The number of voters arriving in `hour`, with one extra voter on
    /// even hours to offset rounding down.
    pub fn voters_in_hour(&self, hour: usize, expected_voters: i64) -> u64 {
        let voters = self
            .arrival_fractions
            .get(hour)
            .map(|fraction| round_to_count(*fraction, expected_voters))
            .unwrap_or(0);
        if hour % 2 == 0 {
            voters + 1
        } else {
            voters
        }
    }

    pub fn voters_at_zero(&self, expected_voters: i64) -> u64 {
        round_to_count(self.arrival_zero, expected_voters)
    }

    /// Generates the population, ordered by arrival time with ties kept in
    /// sequence order.  A precinct expecting no voters gets none.
    pub fn generate(
        &self,
        expected_voters: i64,
        random: &mut dyn RandomSource,
    ) -> Result<Vec<Voter>, SimulationError> {
        let mut voters = Vec::new();
        if expected_voters <= 0 {
            return Ok(voters);
        }
        for _ in 0..self.voters_at_zero(expected_voters) {
            let duration = self.service_time.random_variate(random)?;
            voters.push(Voter::new(voters.len(), 0, duration));
        }
        for hour in 0..self.arrival_fractions.len() {
            let voters_this_hour = self.voters_in_hour(hour, expected_voters);
            let interarrival = Interarrival::for_hourly_count(voters_this_hour);
            let mut arrival = hour as u64 * SECONDS_PER_HOUR;
            for _ in 0..voters_this_hour {
                match interarrival.random_variate(random)? {
                    Some(gap) => arrival += gap,
                    None => break,
                }
                let duration = self.service_time.random_variate(random)?;
                voters.push(Voter::new(voters.len(), arrival, duration));
            }
        }
        voters.sort_by_key(|voter| voter.time_arrival());
        Ok(voters)
    }
}
