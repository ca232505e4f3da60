//! compression/engine.rs
//!
//! zstd streaming engine behind the `CompressionEngine` seam.
//!
//! Design notes:
//! - Owns one `CCtx`; zstd frees it when the engine is dropped.
//! - Parameters are applied once at construction; rejections are mapped into
//!   `CompressorError::EngineInit` with zstd's own error name.
//! - Per-call failures carry `get_error_name` verbatim.
use log::trace;
use zstd_safe::zstd_sys::ZSTD_EndDirective;
use zstd_safe::{CCtx, CParameter, InBuffer, OutBuffer};

use crate::compression::types::{
    CompressionEngine, CompressorError, Directive, EngineError, InputCursor,
};
use crate::config::CompressorConfig;

/// Worst-case compressed size of `src_len` input bytes in a single frame.
pub fn compress_bound(src_len: usize) -> usize {
    zstd_safe::compress_bound(src_len)
}

fn end_directive(directive: Directive) -> ZSTD_EndDirective {
    match directive {
        Directive::Continue => ZSTD_EndDirective::ZSTD_e_continue,
        Directive::Flush    => ZSTD_EndDirective::ZSTD_e_flush,
        Directive::End      => ZSTD_EndDirective::ZSTD_e_end,
    }
}

pub struct ZstdEngine {
    cctx: CCtx<'static>,
}

impl ZstdEngine {
    /// Create a compression context configured from `config`.
    ///
    /// # Errors
    /// - `CompressorError::Allocation` if zstd cannot allocate the context.
    /// - `CompressorError::EngineInit` if zstd rejects a parameter.
    pub fn new(config: &CompressorConfig) -> Result<Self, CompressorError> {
        let cctx = CCtx::try_create().ok_or(CompressorError::Allocation {
            requested: std::mem::size_of::<CCtx<'static>>(),
        })?;
        let mut engine = Self { cctx };

        engine.set(CParameter::CompressionLevel(config.level))?;
        engine.set(CParameter::ChecksumFlag(config.write_checksum))?;
        engine.set(CParameter::ContentSizeFlag(config.write_content_size))?;
        if let Some(window_log) = config.window_log {
            engine.set(CParameter::WindowLog(window_log))?;
        }

        Ok(engine)
    }

    fn set(&mut self, param: CParameter) -> Result<(), CompressorError> {
        self.cctx
            .set_parameter(param)
            .map(|_| ())
            .map_err(|code| CompressorError::EngineInit {
                msg: zstd_safe::get_error_name(code).to_string(),
            })
    }
}

impl CompressionEngine for ZstdEngine {
    fn compress_stream(
        &mut self,
        input: &mut InputCursor<'_>,
        output: &mut Vec<u8>,
        directive: Directive,
    ) -> Result<usize, EngineError> {
        let write_pos = output.len();
        let mut in_buf = InBuffer::around(input.remaining());
        let mut out_buf = OutBuffer::around_pos(output, write_pos);

        let result = self
            .cctx
            .compress_stream2(&mut out_buf, &mut in_buf, end_directive(directive));

        let consumed = in_buf.pos();
        let produced = out_buf.pos() - write_pos;
        input.advance(consumed);

        trace!(
            "zstd {}: consumed {} produced {} -> {:?}",
            directive, consumed, produced, result
        );

        result.map_err(|code| EngineError::new(code, zstd_safe::get_error_name(code)))
    }
}
