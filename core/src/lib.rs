//! zstream-core
//!
//! Pure Rust incremental compression object.
//! No Python, no PyO3, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod config;

pub mod compression;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{
        CompressionEngine, CompressorError, Directive, FlushMode, InputCursor,
        StreamState, StreamingCompressor, ZstdEngine,
    };
    pub use crate::config::CompressorConfig;
}
