//! compression/types.rs
//! Engine seam, flush modes and the error taxonomy of the compressor.
use std::fmt;

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::flush_modes;

/// How `flush()` should end the current run of input.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum FlushMode {
    /// End the frame. The compressor cannot be used afterwards.
    Finish = flush_modes::COMPRESSOBJ_FLUSH_FINISH,
    /// Emit a synchronization point; the stream stays open.
    Block = flush_modes::COMPRESSOBJ_FLUSH_BLOCK,
}

impl FlushMode {
    /// Resolve a raw mode coming from a foreign caller.
    pub fn from_raw(raw: i32) -> Result<Self, CompressorError> {
        Self::try_from_primitive(raw).map_err(|_| CompressorError::InvalidArgument {
            reason: "flush mode not recognized".into(),
        })
    }

    pub fn directive(self) -> Directive {
        match self {
            FlushMode::Finish => Directive::End,
            FlushMode::Block  => Directive::Flush,
        }
    }
}

/// Per-call instruction handed to the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Directive {
    Continue,
    Flush,
    End,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Directive::Continue => "continue",
            Directive::Flush    => "flush",
            Directive::End      => "end",
        };
        f.write_str(name)
    }
}

/// Read-only input span with a position advanced as the engine consumes it.
#[derive(Debug, Clone, Copy)]
pub struct InputCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> InputCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor over no input, used by flushes.
    pub fn empty() -> Self {
        Self::new(&[])
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn is_consumed(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Mark `n` more bytes as consumed. Saturates at the end of the span.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.data.len());
    }
}

/// Failure reported by an engine for one call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}")]
pub struct EngineError {
    pub code: usize,
    pub description: String,
}

impl EngineError {
    pub fn new(code: usize, description: impl Into<String>) -> Self {
        Self { code, description: description.into() }
    }
}

/// A block/frame compression engine driven one call at a time.
///
/// `output` is the active write window: bytes go into its spare capacity,
/// starting at `output.len()` and never past `output.capacity()`. The engine
/// must not reallocate it. The returned value is the amount of work the
/// engine still has pending for `directive` (0 = drained).
pub trait CompressionEngine: Send {
    fn compress_stream(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut Vec<u8>,
        directive: Directive,
    ) -> Result<usize, EngineError>;
}

#[derive(Debug, Error)]
pub enum CompressorError {
    #[error("compressor object already finished")]
    StreamClosed,

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("unable to allocate {requested} bytes of output buffer")]
    Allocation { requested: usize },

    #[error("{context}: {description}")]
    Engine { context: &'static str, description: String },

    #[error("engine init failed: {msg}")]
    EngineInit { msg: String },
}

impl CompressorError {
    pub(crate) fn engine(context: &'static str, err: EngineError) -> Self {
        CompressorError::Engine { context, description: err.description }
    }

    pub fn is_stream_closed(&self) -> bool {
        matches!(self, CompressorError::StreamClosed)
    }
}
