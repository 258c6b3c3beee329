//! The simulator module provides the mechanics of a precinct simulation.
//! The `StationAllocation` replays one election day of voters against a
//! pool of identical stations, second by second, seating voters first come
//! first served.  The `PrecinctSimulation` sweeps a precinct over increasing
//! station counts, running repeated trials at each, until no voter waits
//! too long.  The `BatchSimulation` runs that sweep over every precinct in
//! the configured size bounds.
//!
//! Report text is written to an explicit `ReportSink`, while the drivers
//! also return their results as typed outcomes for further analysis.

pub mod allocation;
pub mod batch;
pub mod precinct;
pub mod report;
pub mod station_pool;

pub use self::allocation::{AllocationOutcome, StationAllocation};
pub use self::batch::{BatchOutcome, BatchSimulation};
pub use self::precinct::{PrecinctOutcome, PrecinctSimulation, StationCountResult};
pub use self::report::{ReportSink, WriterSink};
pub use self::station_pool::StationPool;
