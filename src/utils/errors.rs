use thiserror::Error;

/// `SimulationError` enumerates all possible errors returned by precinct_sim
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents a configuration value that fails validation
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Represents a malformed or truncated text input
    #[error("Failed to parse {input} at token {position}: expected {expected}")]
    ParseError {
        input: &'static str,
        position: usize,
        expected: &'static str,
    },

    /// Represents a configuration file with an extension that cannot be loaded
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Represents a uniform draw requested over an empty range
    #[error("Uniform bounds are empty: lower {lower}, upper {upper}")]
    InvalidUniformBounds { lower: f64, upper: f64 },

    /// Represents a station allocation requested with no stations
    #[error("A station allocation requires at least one station")]
    NoStations,

    /// Represents a voter assignment that would break the voter lifecycle
    #[error("Voter {0} cannot be assigned a station: already assigned or not yet arrived")]
    InvalidVoterState(usize),

    /// Represents a service-time draw from an empty sample table
    #[error("The service-time sample table is empty")]
    EmptyServiceTimes,

    /// Transparent I/O errors
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),

    /// Transparent Exponential distribution errors
    #[error(transparent)]
    ExpError(#[from] rand_distr::ExpError),

    /// Transparent Normal distribution errors
    #[error(transparent)]
    NormalError(#[from] rand_distr::NormalError),
}
