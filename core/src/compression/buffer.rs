//! compression/buffer.rs
//! Append-only segmented output accumulator.
//!
//! Summary: output starts in one segment and grows by appending new segments
//! whenever the active one fills. Written bytes are never moved; `finish`
//! concatenates the segments once into the caller's result.
//!
//! - Each segment is a `Vec<u8>` whose capacity is fixed at allocation time.
//!   Its `len()` is the write cursor, its spare capacity the writable window.
//! - Only the last segment is ever written.
//! - Every allocation goes through `try_reserve_exact` so exhaustion surfaces
//!   as `CompressorError::Allocation` instead of aborting.
use log::{debug, trace};

use crate::compression::types::CompressorError;
use crate::constants::{
    DEFAULT_SEGMENT_SIZE, MAX_SEGMENT_SIZE, MIN_SEGMENT_SIZE, SEGMENT_GROWTH_TABLE,
};

/// Allocates an empty vector able to hold exactly `capacity` bytes.
pub type SegmentAllocator = fn(usize) -> Result<Vec<u8>, CompressorError>;

/// Default allocator: fallible reservation from the global allocator.
pub fn allocate_segment(capacity: usize) -> Result<Vec<u8>, CompressorError> {
    let mut segment = Vec::new();
    segment
        .try_reserve_exact(capacity)
        .map_err(|_| CompressorError::Allocation { requested: capacity })?;
    Ok(segment)
}

/// Translate the foreign "negative means no hint" convention.
pub fn hint_from_raw(size_hint: i64) -> Option<usize> {
    usize::try_from(size_hint).ok().filter(|h| *h > 0)
}

/// Capacity of the segment at `index` (0-based) under the default policy.
pub fn growth_capacity(index: usize) -> usize {
    let last = SEGMENT_GROWTH_TABLE.len() - 1;
    SEGMENT_GROWTH_TABLE[index.min(last)]
}

#[derive(Debug)]
pub struct SegmentedBuffer {
    segments: Vec<Vec<u8>>,
    allocator: SegmentAllocator,
}

impl SegmentedBuffer {
    /// Allocate the first segment.
    ///
    /// `None` selects `DEFAULT_SEGMENT_SIZE`; a hint is clamped to
    /// `[MIN_SEGMENT_SIZE, MAX_SEGMENT_SIZE]`.
    pub fn with_size_hint(size_hint: Option<usize>) -> Result<Self, CompressorError> {
        Self::with_allocator(size_hint, allocate_segment)
    }

    /// `with_size_hint`, taking segments and the final result from `allocator`.
    pub fn with_allocator(
        size_hint: Option<usize>,
        allocator: SegmentAllocator,
    ) -> Result<Self, CompressorError> {
        let capacity = match size_hint {
            None => DEFAULT_SEGMENT_SIZE,
            Some(hint) => hint.clamp(MIN_SEGMENT_SIZE, MAX_SEGMENT_SIZE),
        };

        let mut segments = Vec::new();
        segments
            .try_reserve(SEGMENT_GROWTH_TABLE.len())
            .map_err(|_| CompressorError::Allocation {
                requested: SEGMENT_GROWTH_TABLE.len() * std::mem::size_of::<Vec<u8>>(),
            })?;
        segments.push(allocator(capacity)?);

        trace!("output buffer initialized with {} byte segment", capacity);
        Ok(Self { segments, allocator })
    }

    /// The segment currently being written.
    pub fn active(&mut self) -> &mut Vec<u8> {
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    /// True when the active segment has no writable space left.
    pub fn is_full(&self) -> bool {
        self.segments
            .last()
            .map_or(true, |segment| segment.len() == segment.capacity())
    }

    /// Append a new segment and make it the active one.
    pub fn grow(&mut self) -> Result<(), CompressorError> {
        let capacity = growth_capacity(self.segments.len());
        self.segments
            .try_reserve(1)
            .map_err(|_| CompressorError::Allocation {
                requested: std::mem::size_of::<Vec<u8>>(),
            })?;
        self.segments.push((self.allocator)(capacity)?);

        debug!(
            "output buffer grew to {} segments (+{} bytes, {} bytes used)",
            self.segments.len(),
            capacity,
            self.len()
        );
        Ok(())
    }

    /// Total bytes written across all segments.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Concatenate every segment into one exact-size result.
    ///
    /// Segment storage is released whether or not the final allocation
    /// succeeds.
    pub fn finish(self) -> Result<Vec<u8>, CompressorError> {
        let total = self.len();
        let mut segments = self.segments;

        let mut result = (self.allocator)(total)?;
        for segment in segments.drain(..) {
            result.extend_from_slice(&segment);
        }

        trace!("output buffer finished: {} bytes", total);
        Ok(result)
    }

    /// Release every segment of a failed operation.
    pub fn discard(self) {
        trace!(
            "output buffer discarded: {} segments, {} bytes",
            self.segments.len(),
            self.len()
        );
        drop(self.segments);
    }
}
