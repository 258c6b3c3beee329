//! Random variables underpin the stochastic voter population.  Service
//! (time-to-vote) durations come from an empirical table of observed
//! durations, drawn uniformly by index, and arrivals within an hour follow
//! exponential interarrival times.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use super::RandomSource;
use crate::utils::errors::SimulationError;
use crate::utils::SECONDS_PER_HOUR;

/// An empirical distribution over observed service durations, in seconds.
/// Every observation is equally likely.  Deserializes from a plain list of
/// durations, which must not be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct EmpiricalServiceTime {
    samples: Vec<u64>,
}

impl EmpiricalServiceTime {
    pub fn new(samples: Vec<u64>) -> Result<Self, SimulationError> {
        if samples.is_empty() {
            return Err(SimulationError::EmptyServiceTimes);
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    /// The largest valid index into the sample table.
    pub fn max_subscript(&self) -> usize {
        self.samples.len() - 1
    }

    /// Picks a uniform random index into the sample table and returns the
    /// duration observed at that index.
    pub fn random_variate(
        &self,
        random: &mut dyn RandomSource,
    ) -> Result<u64, SimulationError> {
        let subscript = random.uniform_int(0, self.max_subscript() as i64)?;
        self.samples
            .get(subscript as usize)
            .copied()
            .ok_or(SimulationError::EmptyServiceTimes)
    }
}

impl TryFrom<Vec<u64>> for EmpiricalServiceTime {
    type Error = SimulationError;

    fn try_from(samples: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl From<EmpiricalServiceTime> for Vec<u64> {
    fn from(service_time: EmpiricalServiceTime) -> Self {
        service_time.samples
    }
}

/// Exponential interarrival times for a single hour of the election day,
/// parameterized by the number of voters expected to arrive in that hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interarrival {
    Exp { lambda: f64 },
    /// No arrivals; drawing from this variable is never required.
    Idle,
}

impl Interarrival {
    pub fn for_hourly_count(voters_this_hour: u64) -> Self {
        if voters_this_hour == 0 {
            Interarrival::Idle
        } else {
            Interarrival::Exp {
                lambda: voters_this_hour as f64 / SECONDS_PER_HOUR as f64,
            }
        }
    }

    /// Returns the next interarrival gap in whole seconds, or `None` for an
    /// idle hour.
    pub fn random_variate(
        &self,
        random: &mut dyn RandomSource,
    ) -> Result<Option<u64>, SimulationError> {
        match self {
            Interarrival::Exp { lambda } => Ok(Some(random.exponential_int(*lambda)?)),
            Interarrival::Idle => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_modeling::SeededRandom;

    #[test]
    fn empty_service_table_is_rejected() {
        assert!(matches!(
            EmpiricalServiceTime::new(Vec::new()),
            Err(SimulationError::EmptyServiceTimes)
        ));
    }

    #[test]
    fn deserialized_table_must_not_be_empty() {
        assert!(serde_json::from_str::<EmpiricalServiceTime>("[]").is_err());
        let table: EmpiricalServiceTime = serde_json::from_str("[60, 90]").unwrap();
        assert_eq!(table.samples(), &[60, 90]);
        assert_eq!(table.max_subscript(), 1);
        assert_eq!(serde_json::to_string(&table).unwrap(), "[60,90]");
    }

    #[test]
    fn service_times_come_from_the_table() {
        let table = EmpiricalServiceTime::new(vec![60, 120, 300]).unwrap();
        let mut random = SeededRandom::new(42);
        let mut seen = [false; 3];
        (0..300).for_each(|_| {
            let duration = table.random_variate(&mut random).unwrap();
            let position = table.samples().iter().position(|s| *s == duration).unwrap();
            seen[position] = true;
        });
        assert_eq!(table.max_subscript(), 2);
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn idle_hours_never_draw() {
        let mut random = SeededRandom::new(42);
        let interarrival = Interarrival::for_hourly_count(0);
        assert!(interarrival.random_variate(&mut random).unwrap().is_none());
    }

    #[test]
    fn hourly_rate_sets_lambda() {
        match Interarrival::for_hourly_count(120) {
            Interarrival::Exp { lambda } => assert!((lambda - 120.0 / 3600.0).abs() < 1.0e-12),
            Interarrival::Idle => panic!("expected an exponential interarrival"),
        }
    }
}
