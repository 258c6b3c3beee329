//! The models module holds the entities of a precinct simulation: voters,
//! precincts, and the generator that synthesizes a precinct's voter
//! population for one election day.

pub mod population;
pub mod precinct;
pub mod voter;

pub use self::population::VoterPopulationGenerator;
pub use self::precinct::{index_precincts, load_precincts, read_precincts, Precinct, Precincts};
pub use self::voter::{voter_table, Voter};
