//! config.rs
//! Compressor configuration.
//!
//! Summary: plain serde struct with defaults from `constants.rs`. Can be built
//! in code with the `with_*` setters or loaded from JSON.
use serde::{Deserialize, Serialize};

use crate::compression::buffer::hint_from_raw;
use crate::compression::types::CompressorError;
use crate::constants::DEFAULT_LEVEL_ZSTD;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    pub level: i32,
    pub write_checksum: bool,
    pub write_content_size: bool,
    pub window_log: Option<u32>,
    /// Capacity of the first output segment of each call. `None` = default.
    pub segment_size_hint: Option<usize>,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL_ZSTD,
            write_checksum: false,
            write_content_size: true,
            window_log: None,
            segment_size_hint: None,
        }
    }
}

impl CompressorConfig {
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_checksum(mut self, enabled: bool) -> Self {
        self.write_checksum = enabled;
        self
    }

    pub fn with_content_size(mut self, enabled: bool) -> Self {
        self.write_content_size = enabled;
        self
    }

    pub fn with_window_log(mut self, window_log: u32) -> Self {
        self.window_log = Some(window_log);
        self
    }

    pub fn with_segment_size_hint(mut self, hint: usize) -> Self {
        self.segment_size_hint = Some(hint);
        self
    }

    /// Foreign-caller form of `with_segment_size_hint`: non-positive = default.
    pub fn with_raw_segment_size_hint(mut self, hint: i64) -> Self {
        self.segment_size_hint = hint_from_raw(hint);
        self
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, CompressorError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            CompressorError::InvalidArgument { reason: format!("config: {}", e) }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CompressorError> {
        let levels = zstd::compression_level_range();
        if !levels.contains(&self.level) {
            return Err(CompressorError::InvalidArgument {
                reason: format!(
                    "compression level {} outside {}..={}",
                    self.level,
                    levels.start(),
                    levels.end()
                ),
            });
        }
        if self.segment_size_hint == Some(0) {
            return Err(CompressorError::InvalidArgument {
                reason: "segment size hint must be > 0".into(),
            });
        }
        Ok(())
    }
}
