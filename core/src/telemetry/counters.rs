//! telemetry/counters.rs
//! Mutable counters updated by every compressor call.
//!
//! Summary: bytes in/out only count calls that returned output; failed calls
//! only bump `engine_errors`.
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressorStats {
    pub calls_compress: u64,
    pub calls_flush: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub segments_allocated: u64,
    pub growth_events: u64,
    pub engine_errors: u64,
}

impl CompressorStats {
    /// Record one successful `compress()` call.
    ///
    /// - `input_len`: chunk length
    /// - `output_len`: bytes returned to the caller
    /// - `segments`: output segments used by the call
    pub fn add_compress(&mut self, input_len: usize, output_len: usize, segments: usize) {
        self.calls_compress += 1;
        self.bytes_in += input_len as u64;
        self.add_output(output_len, segments);
    }

    /// Record one successful `flush()` call.
    pub fn add_flush(&mut self, output_len: usize, segments: usize) {
        self.calls_flush += 1;
        self.add_output(output_len, segments);
    }

    pub fn add_engine_error(&mut self) {
        self.engine_errors += 1;
    }

    fn add_output(&mut self, output_len: usize, segments: usize) {
        self.bytes_out += output_len as u64;
        self.segments_allocated += segments as u64;
        self.growth_events += segments.saturating_sub(1) as u64;
    }

    /// `bytes_out / bytes_in`, 0.0 before any input.
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_in == 0 {
            0.0
        } else {
            self.bytes_out as f64 / self.bytes_in as f64
        }
    }
}
