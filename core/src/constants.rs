//! constants.rs
//! Defaults shared by the compressor, its output buffer and the bindings.

/// Default zstd compression level (matches the reference CLI default).
pub const DEFAULT_LEVEL_ZSTD: i32 = 3;

/// Capacity of the first output segment when no size hint is given (32 KiB).
pub const DEFAULT_SEGMENT_SIZE: usize = 32 * 1024;

/// Smallest first segment accepted from a size hint.
pub const MIN_SEGMENT_SIZE: usize = 64;

/// Largest single segment; growth becomes linear once this is reached (256 MiB).
pub const MAX_SEGMENT_SIZE: usize = 256 * 1024 * 1024;

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

/// Capacity of the n-th segment. Entries past the end repeat the last one.
pub const SEGMENT_GROWTH_TABLE: &[usize] = &[
    32 * KB,
    64 * KB,
    256 * KB,
    MB,
    4 * MB,
    8 * MB,
    16 * MB,
    16 * MB,
    32 * MB,
    32 * MB,
    32 * MB,
    32 * MB,
    64 * MB,
    64 * MB,
    128 * MB,
    128 * MB,
    MAX_SEGMENT_SIZE,
];

/// Raw flush mode values as exposed to foreign callers.
pub mod flush_modes {
    pub const COMPRESSOBJ_FLUSH_FINISH: i32 = 0;
    pub const COMPRESSOBJ_FLUSH_BLOCK: i32 = 1;
}
