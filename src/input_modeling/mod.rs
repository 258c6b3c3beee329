//! The input modeling module provides the stochastic foundation of the
//! voter population.  The module includes the `RandomSource` capability
//! and its seeded implementation, along with the service-time and
//! interarrival random variables built on top of it.

pub mod random_source;
pub mod random_variable;

pub use random_source::{RandomSource, SeededRandom};
pub use random_variable::{EmpiricalServiceTime, Interarrival};
