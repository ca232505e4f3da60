//! compression/stream.rs
//! Incremental compression object.
//!
//! Summary: `StreamingCompressor` feeds arbitrarily sized chunks to an engine
//! and returns whatever compressed output each call produced. Output is
//! accumulated in a per-call `SegmentedBuffer`; only the engine context
//! survives between calls.
//!
//! - Output is all-or-nothing per call: on any error the call's buffer is
//!   discarded and nothing is returned.
//! - `flush(FlushMode::Finish)` moves the stream to `Finished` before the
//!   engine runs, so a failed finish still leaves the object closed.
//! - No internal locking. `&mut self` serializes calls.
use log::debug;

use crate::compression::buffer::{allocate_segment, SegmentAllocator, SegmentedBuffer};
use crate::compression::engine::ZstdEngine;
use crate::compression::types::{
    CompressionEngine, CompressorError, Directive, FlushMode, InputCursor,
};
use crate::config::CompressorConfig;
use crate::telemetry::{CompressorStats, StatsSnapshot};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamState {
    Open,
    Finished,
}

pub struct StreamingCompressor<E: CompressionEngine = ZstdEngine> {
    engine: E,
    state: StreamState,
    segment_size_hint: Option<usize>,
    allocator: SegmentAllocator,
    stats: CompressorStats,
}

impl StreamingCompressor<ZstdEngine> {
    /// Create a zstd-backed compressor.
    ///
    /// # Errors
    /// - `InvalidArgument` if the config does not validate.
    /// - `Allocation` / `EngineInit` if the zstd context cannot be set up.
    pub fn new(config: CompressorConfig) -> Result<Self, CompressorError> {
        config.validate()?;
        let engine = ZstdEngine::new(&config)?;
        Ok(Self::with_engine(engine, &config))
    }
}

impl<E: CompressionEngine> StreamingCompressor<E> {
    /// Wrap an already configured engine. Only the buffer settings of
    /// `config` are used.
    pub fn with_engine(engine: E, config: &CompressorConfig) -> Self {
        Self {
            engine,
            state: StreamState::Open,
            segment_size_hint: config.segment_size_hint,
            allocator: allocate_segment,
            stats: CompressorStats::default(),
        }
    }

    /// Source output segments (and each call's final result) from `allocator`.
    pub fn with_segment_allocator(mut self, allocator: SegmentAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == StreamState::Finished
    }

    pub fn stats(&self) -> &CompressorStats {
        &self.stats
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot::from(&self.stats, self.state)
    }

    /// Feed `chunk` to the engine and return the output it produced.
    ///
    /// The result may be empty when the engine buffered the input internally.
    pub fn compress(&mut self, chunk: &[u8]) -> Result<Vec<u8>, CompressorError> {
        self.ensure_open()?;

        let mut input = InputCursor::new(chunk);
        let (output, segments) =
            self.drive(&mut input, Directive::Continue, "zstd compress error")?;

        self.stats.add_compress(chunk.len(), output.len(), segments);
        Ok(output)
    }

    /// Drain buffered engine state.
    ///
    /// `Block` emits a synchronization point and keeps the stream open;
    /// `Finish` ends the frame and closes the stream for good.
    pub fn flush(&mut self, mode: FlushMode) -> Result<Vec<u8>, CompressorError> {
        self.ensure_open()?;

        if mode == FlushMode::Finish {
            self.state = StreamState::Finished;
            debug!("compressor finished; ending frame");
        }

        let mut input = InputCursor::empty();
        let (output, segments) =
            self.drive(&mut input, mode.directive(), "error ending compression stream")?;

        self.stats.add_flush(output.len(), segments);
        Ok(output)
    }

    /// `flush()` for callers holding a raw integer mode.
    pub fn flush_raw(&mut self, raw_mode: i32) -> Result<Vec<u8>, CompressorError> {
        self.ensure_open()?;
        let mode = FlushMode::from_raw(raw_mode)?;
        self.flush(mode)
    }

    fn ensure_open(&self) -> Result<(), CompressorError> {
        match self.state {
            StreamState::Open => Ok(()),
            StreamState::Finished => Err(CompressorError::StreamClosed),
        }
    }

    /// Run the engine until `input` is consumed (`Continue`) or the engine
    /// reports nothing pending (`Flush`/`End`). Returns the output and the
    /// number of segments it occupied.
    fn drive(
        &mut self,
        input: &mut InputCursor<'_>,
        directive: Directive,
        context: &'static str,
    ) -> Result<(Vec<u8>, usize), CompressorError> {
        let mut buffer = SegmentedBuffer::with_allocator(self.segment_size_hint, self.allocator)?;

        loop {
            if directive == Directive::Continue && input.is_consumed() {
                break;
            }

            let pending = match self.engine.compress_stream(input, buffer.active(), directive) {
                Ok(pending) => pending,
                Err(err) => {
                    debug!("{} ({}): {}", context, directive, err);
                    buffer.discard();
                    self.stats.add_engine_error();
                    return Err(CompressorError::engine(context, err));
                }
            };

            let drained = match directive {
                Directive::Continue => input.is_consumed(),
                Directive::Flush | Directive::End => pending == 0,
            };
            if drained {
                break;
            }

            if buffer.is_full() {
                if let Err(err) = buffer.grow() {
                    buffer.discard();
                    return Err(err);
                }
            }
        }

        let segments = buffer.segment_count();
        Ok((buffer.finish()?, segments))
    }
}
