//! telemetry/snapshot.rs
//! Immutable view of a compressor's counters, exportable as JSON.
use serde::{Deserialize, Serialize};

use crate::compression::stream::StreamState;
use crate::telemetry::counters::CompressorStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub finished: bool,
    pub calls_compress: u64,
    pub calls_flush: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub segments_allocated: u64,
    pub growth_events: u64,
    pub engine_errors: u64,
    pub compression_ratio: f64,
}

impl StatsSnapshot {
    pub fn from(stats: &CompressorStats, state: StreamState) -> Self {
        Self {
            finished: state == StreamState::Finished,
            calls_compress: stats.calls_compress,
            calls_flush: stats.calls_flush,
            bytes_in: stats.bytes_in,
            bytes_out: stats.bytes_out,
            segments_allocated: stats.segments_allocated,
            growth_events: stats.growth_events,
            engine_errors: stats.engine_errors,
            compression_ratio: stats.compression_ratio(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
