use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::report::SIM_TAG;
use super::{PrecinctOutcome, PrecinctSimulation, ReportSink};
use crate::config::Configuration;
use crate::input_modeling::RandomSource;
use crate::models::Precincts;
use crate::utils::errors::SimulationError;

/// The outcome of a batch, with precinct outcomes in ascending precinct
/// number order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub precincts_simulated: usize,
    pub precincts: Vec<PrecinctOutcome>,
}

/// The `BatchSimulation` runs the station sweep for every precinct whose
/// expected voter count falls inside the configured bounds.
#[derive(Debug, Clone)]
pub struct BatchSimulation {
    configuration: Configuration,
    precincts: Precincts,
}

impl BatchSimulation {
    /// This constructor method creates a batch from a validated
    /// configuration and the precincts to consider.
    pub fn post(configuration: Configuration, precincts: Precincts) -> Result<Self, SimulationError> {
        configuration.validate()?;
        Ok(Self {
            configuration,
            precincts,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn precincts(&self) -> &Precincts {
        &self.precincts
    }

    /// Precinct summaries, one line each, in number order.
    pub fn precinct_lines(&self) -> Vec<String> {
        self.precincts
            .values()
            .map(|precinct| format!["{}{}", SIM_TAG, precinct])
            .collect()
    }

    /// Runs every precinct in bounds, in ascending precinct number order,
    /// drawing from a single random stream.
    pub fn run(
        &self,
        random: &mut dyn RandomSource,
        sink: &mut dyn ReportSink,
    ) -> Result<BatchOutcome, SimulationError> {
        let simulation = PrecinctSimulation::new(&self.configuration)?;
        info!(
            precincts = self.precincts.len(),
            min_expected = self.configuration.min_expected_to_simulate,
            max_expected = self.configuration.max_expected_to_simulate,
            "Starting batch"
        );
        let mut outcomes = Vec::new();
        for precinct in self.precincts.values() {
            if !self
                .configuration
                .in_simulation_bounds(precinct.expected_voters)
            {
                debug!(
                    precinct = precinct.number,
                    expected_voters = precinct.expected_voters,
                    "Precinct outside the simulation bounds"
                );
                continue;
            }
            sink.emit(&format!["{}RunSimulation for pct", SIM_TAG])?;
            sink.emit(&format!["{}{}", SIM_TAG, precinct])?;
            outcomes.push(simulation.run(precinct, random, sink)?);
        }
        sink.emit(&format![
            "{}PRECINCT COUNT THIS BATCH {:4}",
            SIM_TAG,
            outcomes.len()
        ])?;
        info!(precincts_simulated = outcomes.len(), "Batch finished");
        Ok(BatchOutcome {
            precincts_simulated: outcomes.len(),
            precincts: outcomes,
        })
    }
}
