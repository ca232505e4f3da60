//! ffi.rs
//! `ZstdCompressor` / `ZstdCompressionObj` Python classes.
//!
//! - Engine work runs inside `allow_threads`; the GIL is released for the
//!   CPU-bound part only.
//! - PyO3's borrow tracking turns concurrent use of one object from several
//!   threads into a `RuntimeError` instead of a data race.
use log::debug;
use pyo3::buffer::PyBuffer;
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyMemoryError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use zstream_core::compression::{CompressorError, StreamingCompressor};
use zstream_core::config::CompressorConfig;
use zstream_core::constants::flush_modes::{COMPRESSOBJ_FLUSH_BLOCK, COMPRESSOBJ_FLUSH_FINISH};
use zstream_core::constants::DEFAULT_LEVEL_ZSTD;

create_exception!(zstream, ZstdError, PyException);

#[derive(Copy, Clone)]
enum Call {
    Compress,
    Flush,
}

fn to_py_err(err: CompressorError, call: Call) -> PyErr {
    match err {
        CompressorError::StreamClosed => match call {
            Call::Compress => ZstdError::new_err("cannot call compress() after compressor finished"),
            Call::Flush => ZstdError::new_err("compressor object already finished"),
        },
        CompressorError::InvalidArgument { reason } => PyValueError::new_err(reason),
        CompressorError::Allocation { .. } => PyMemoryError::new_err(err.to_string()),
        CompressorError::Engine { .. } | CompressorError::EngineInit { .. } => {
            ZstdError::new_err(err.to_string())
        }
    }
}

/// Compression settings; hands out incremental compression objects.
#[pyclass(module = "zstream")]
pub struct ZstdCompressor {
    config: CompressorConfig,
}

#[pymethods]
impl ZstdCompressor {
    #[new]
    #[pyo3(signature = (level = DEFAULT_LEVEL_ZSTD, write_checksum = false, write_content_size = true))]
    fn new(level: i32, write_checksum: bool, write_content_size: bool) -> PyResult<Self> {
        let config = CompressorConfig::default()
            .with_level(level)
            .with_checksum(write_checksum)
            .with_content_size(write_content_size);
        config.validate().map_err(|e| to_py_err(e, Call::Compress))?;
        Ok(Self { config })
    }

    /// Create a compression object. `size_hint` seeds the first output
    /// segment of every call; negative means the default.
    #[pyo3(signature = (size_hint = -1))]
    fn compressobj(&self, size_hint: i64) -> PyResult<ZstdCompressionObj> {
        let config = self.config.clone().with_raw_segment_size_hint(size_hint);
        let inner = StreamingCompressor::new(config).map_err(|e| to_py_err(e, Call::Compress))?;
        debug!("compressobj created (level {})", self.config.level);
        Ok(ZstdCompressionObj { inner })
    }

    #[getter]
    fn level(&self) -> i32 {
        self.config.level
    }
}

/// Incremental compressor: feed chunks with `compress()`, end with `flush()`.
#[pyclass(module = "zstream")]
pub struct ZstdCompressionObj {
    inner: StreamingCompressor,
}

#[pymethods]
impl ZstdCompressionObj {
    /// compress data
    ///
    /// Accepts any buffer-protocol object. The chunk is copied out while the
    /// GIL is held so a mutable source cannot change during compression.
    fn compress<'py>(
        &mut self,
        py: Python<'py>,
        data: PyBuffer<u8>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let chunk = data.to_vec(py)?;
        data.release(py);

        let inner = &mut self.inner;
        let out = py
            .allow_threads(|| inner.compress(&chunk))
            .map_err(|e| to_py_err(e, Call::Compress))?;
        Ok(PyBytes::new_bound(py, &out))
    }

    /// finish compression operation
    #[pyo3(signature = (flush_mode = COMPRESSOBJ_FLUSH_FINISH))]
    fn flush<'py>(&mut self, py: Python<'py>, flush_mode: i32) -> PyResult<Bound<'py, PyBytes>> {
        let inner = &mut self.inner;
        let out = py
            .allow_threads(|| inner.flush_raw(flush_mode))
            .map_err(|e| to_py_err(e, Call::Flush))?;
        Ok(PyBytes::new_bound(py, &out))
    }

    #[getter]
    fn finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Counters for this object as a JSON string.
    fn stats_json(&self) -> PyResult<String> {
        self.inner
            .snapshot()
            .to_json()
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

pub fn register(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ZstdCompressor>()?;
    m.add_class::<ZstdCompressionObj>()?;
    m.add("ZstdError", py.get_type_bound::<ZstdError>())?;
    m.add("COMPRESSOBJ_FLUSH_FINISH", COMPRESSOBJ_FLUSH_FINISH)?;
    m.add("COMPRESSOBJ_FLUSH_BLOCK", COMPRESSOBJ_FLUSH_BLOCK)?;
    Ok(())
}
