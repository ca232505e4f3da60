//! compression/mod.rs
//! Incremental compression: engine seam, segmented output buffer and the
//! streaming compressor that ties them together.

pub mod types;
pub mod buffer;
pub mod engine;
pub mod stream;

pub use types::*;
pub use buffer::SegmentedBuffer;
pub use engine::{compress_bound, ZstdEngine};
pub use stream::{StreamState, StreamingCompressor};
