//! Batch driver for the flock simulation: configuration loading, the step
//! loop, and the snapshot writers that persist each step's positions.

pub mod config;
pub mod error;
pub mod output;
pub mod simulation;

pub use error::{ConfigError, SimError, SnapshotError};
pub use output::{CsvFrameWriter, JsonLinesWriter, MemoryWriter, SnapshotWriter};
pub use simulation::{RunSummary, Simulation, WriteFailurePolicy};
