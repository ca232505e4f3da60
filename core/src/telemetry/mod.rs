//! telemetry/mod.rs
//! Per-compressor counters and their serializable snapshot.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
