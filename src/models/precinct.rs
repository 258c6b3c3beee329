use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;
use crate::utils::tokens::Tokens;

/// One voting location, with its expected voter population and the station
/// counts at which a wait-time histogram should be reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Precinct {
    pub number: i64,
    pub name: String,
    pub turnout: f64,
    pub num_voters: i64,
    pub expected_voters: i64,
    pub expected_per_hour: i64,
    /// The station count configured on election day; informational only.
    pub stations: i64,
    pub minority: f64,
    pub stations_to_histo: BTreeSet<usize>,
}

impl Precinct {
    /// Reads one eleven-token precinct record.
    fn read(tokens: &mut Tokens) -> Result<Self, SimulationError> {
        let number = tokens.next_value("precinct number")?;
        let name = tokens.next_str("precinct name")?.to_string();
        let turnout = tokens.next_value("turnout")?;
        let num_voters = tokens.next_value("voter count")?;
        let expected_voters = tokens.next_value("expected voters")?;
        let expected_per_hour = tokens.next_value("expected voters per hour")?;
        let stations = tokens.next_value("station count")?;
        let minority = tokens.next_value("minority percentage")?;
        let stations_to_histo = (0..3)
            .map(|_| tokens.next_value("histogram station count"))
            .collect::<Result<BTreeSet<usize>, SimulationError>>()?;
        Ok(Self {
            number,
            name,
            turnout,
            num_voters,
            expected_voters,
            expected_per_hour,
            stations,
            minority,
            stations_to_histo,
        })
    }

    pub fn is_histogram_station_count(&self, stations_count: usize) -> bool {
        self.stations_to_histo.contains(&stations_count)
    }
}

/// Precincts keyed, and therefore ordered, by number.
pub type Precincts = BTreeMap<i64, Precinct>;

/// Reads whitespace-separated precinct records.  A later record with the
/// same number replaces an earlier one.
pub fn read_precincts(text: &str) -> Result<Precincts, SimulationError> {
    let mut tokens = Tokens::new("precincts", text);
    let mut precincts = Precincts::new();
    while tokens.has_next() {
        let precinct = Precinct::read(&mut tokens)?;
        precincts.insert(precinct.number, precinct);
    }
    Ok(precincts)
}

/// Keys a list of precincts, such as one deserialized from YAML or JSON,
/// by number.
pub fn index_precincts<I: IntoIterator<Item = Precinct>>(precincts: I) -> Precincts {
    precincts
        .into_iter()
        .map(|precinct| (precinct.number, precinct))
        .collect()
}

/// Loads precincts from a YAML (`.yaml`, `.yml`) or JSON (`.json`) list,
/// or from whitespace-separated records for any other extension.
pub fn load_precincts<P: AsRef<Path>>(path: P) -> Result<Precincts, SimulationError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    match path.extension().and_then(|extension| extension.to_str()) {
        Some("yaml") | Some("yml") => Ok(index_precincts(serde_yaml::from_str::<Vec<Precinct>>(
            &text,
        )?)),
        Some("json") => Ok(index_precincts(serde_json::from_str::<Vec<Precinct>>(
            &text,
        )?)),
        _ => read_precincts(&text),
    }
}

impl fmt::Display for Precinct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:4} {:<25}{:8.2}{:8}{:8}{:8}{:3}{:8.2} HH ",
            self.number,
            self.name,
            self.turnout,
            self.num_voters,
            self.expected_voters,
            self.expected_per_hour,
            self.stations,
            self.minority
        )?;
        for stations_count in &self.stations_to_histo {
            write!(f, "{:4}", stations_count)?;
        }
        write!(f, " HH")
    }
}
