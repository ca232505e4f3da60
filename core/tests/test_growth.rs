// Output buffer growth is an allocation detail only:
//
// * output spanning many segments comes back whole and in order
// * segment sizing never changes the emitted bytes
// * round trip holds for arbitrary chunkings (proptest)

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use zstream_core::compression::buffer::allocate_segment;
    use zstream_core::compression::{
        compress_bound, CompressionEngine, CompressorError, Directive, EngineError, FlushMode,
        InputCursor, StreamState, StreamingCompressor,
    };
    use zstream_core::config::CompressorConfig;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Deterministic, poorly compressible bytes.
    fn noise(len: usize, seed: u64) -> Vec<u8> {
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 33) as u8
            })
            .collect()
    }

    /// Identity "compression": copies input as-is and writes a fixed trailer
    /// on `End`, as much per call as the window allows.
    struct CopyEngine {
        trailer: Vec<u8>,
        trailer_pos: usize,
    }

    impl CopyEngine {
        fn new(trailer_len: usize) -> Self {
            Self { trailer: vec![0xEE; trailer_len], trailer_pos: 0 }
        }
    }

    impl CompressionEngine for CopyEngine {
        fn compress_stream(
            &mut self,
            input: &mut InputCursor<'_>,
            output: &mut Vec<u8>,
            directive: Directive,
        ) -> Result<usize, EngineError> {
            let space = output.capacity() - output.len();
            match directive {
                Directive::Continue => {
                    let n = input.remaining().len().min(space);
                    output.extend_from_slice(&input.remaining()[..n]);
                    input.advance(n);
                    Ok(0)
                }
                Directive::Flush => Ok(0),
                Directive::End => {
                    let rest = &self.trailer[self.trailer_pos..];
                    let n = rest.len().min(space);
                    output.extend_from_slice(&rest[..n]);
                    self.trailer_pos += n;
                    Ok(self.trailer.len() - self.trailer_pos)
                }
            }
        }
    }

    fn zstd_frame(data: &[u8], config: CompressorConfig) -> (Vec<u8>, u64) {
        let mut c = StreamingCompressor::new(config).unwrap();
        let mut frame = c.compress(data).unwrap();
        frame.extend(c.flush(FlushMode::Finish).unwrap());
        (frame, c.stats().growth_events)
    }

// # ✅ 1. Many segments, one ordered result

    #[test]
    fn multi_segment_output_is_contiguous_and_ordered() {
        init_logging();
        let data = noise(200_000, 1);
        let mut c = StreamingCompressor::with_engine(CopyEngine::new(0), &CompressorConfig::default());

        let out = c.compress(&data).unwrap();

        assert_eq!(out, data);
        // 32 KiB + 64 KiB + 256 KiB segments
        assert_eq!(c.stats().segments_allocated, 3);
        assert_eq!(c.stats().growth_events, 2);
    }

    #[test]
    fn flush_grows_while_engine_reports_pending_output() {
        init_logging();
        let config = CompressorConfig::default().with_segment_size_hint(64);
        let mut c = StreamingCompressor::with_engine(CopyEngine::new(100), &config);

        let out = c.flush(FlushMode::Finish).unwrap();

        assert_eq!(out, vec![0xEE; 100]);
        assert_eq!(c.stats().growth_events, 1);
    }

    #[test]
    fn exactly_full_segment_is_returned_intact() {
        init_logging();
        let config = CompressorConfig::default().with_segment_size_hint(64);
        let mut c = StreamingCompressor::with_engine(CopyEngine::new(0), &config);

        let data = noise(64, 2);
        assert_eq!(c.compress(&data).unwrap(), data);
        assert_eq!(c.stats().segments_allocated, 1);
        assert_eq!(c.stats().growth_events, 0);
    }

// # ❌ 2. Allocation failures discard the call's output

    /// Refuses segments larger than 64 KiB.
    fn at_most_64k(capacity: usize) -> Result<Vec<u8>, CompressorError> {
        if capacity > 64 * 1024 {
            return Err(CompressorError::Allocation { requested: capacity });
        }
        allocate_segment(capacity)
    }

    /// Refuses any request that is not a whole number of KiB.
    fn whole_kib_only(capacity: usize) -> Result<Vec<u8>, CompressorError> {
        if capacity % 1024 != 0 {
            return Err(CompressorError::Allocation { requested: capacity });
        }
        allocate_segment(capacity)
    }

    #[test]
    fn failed_growth_fails_call_and_keeps_stream_open() {
        init_logging();
        let mut c = StreamingCompressor::with_engine(CopyEngine::new(0), &CompressorConfig::default())
            .with_segment_allocator(at_most_64k);

        // 32 KiB + 64 KiB fill up, the 256 KiB segment is refused.
        let data = noise(200_000, 4);
        assert!(matches!(
            c.compress(&data),
            Err(CompressorError::Allocation { requested }) if requested == 256 * 1024
        ));
        assert_eq!(c.state(), StreamState::Open);
        assert_eq!(c.stats().calls_compress, 0);
        assert_eq!(c.stats().engine_errors, 0);

        let small = noise(1000, 5);
        assert_eq!(c.compress(&small).unwrap(), small);
    }

    #[test]
    fn failed_final_allocation_fails_call() {
        init_logging();
        let mut c = StreamingCompressor::with_engine(CopyEngine::new(0), &CompressorConfig::default())
            .with_segment_allocator(whole_kib_only);

        assert!(matches!(
            c.compress(&noise(40_000, 6)),
            Err(CompressorError::Allocation { requested: 40_000 })
        ));
        assert_eq!(c.state(), StreamState::Open);
        assert_eq!(c.stats().bytes_out, 0);

        let data = noise(2048, 7);
        assert_eq!(c.compress(&data).unwrap(), data);
    }

// # ✅ 3. Large repetitive input through zstd

    #[test]
    fn long_run_of_a_roundtrips_across_growth() {
        init_logging();
        let data = vec![b'a'; 8 * 1024 * 1024];
        let config = CompressorConfig::default().with_segment_size_hint(64);

        let (frame, growth_events) = zstd_frame(&data, config);

        assert!(growth_events >= 1);
        assert_eq!(zstd::stream::decode_all(&frame[..]).unwrap(), data);
    }

// # ✅ 4. Segment sizing does not change emitted bytes

    #[test]
    fn growth_matches_single_presized_segment() {
        init_logging();
        let data = noise(1024 * 1024, 3);

        let (grown, growth_events) = zstd_frame(&data, CompressorConfig::default());
        let presized = CompressorConfig::default().with_segment_size_hint(compress_bound(data.len()));
        let (single, _) = zstd_frame(&data, presized);

        assert!(growth_events > 0);
        assert_eq!(grown, single);
        assert_eq!(zstd::stream::decode_all(&grown[..]).unwrap(), data);
    }

// # ✅ 5. Property tests

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_chunked_stream_roundtrips(
            steps in prop::collection::vec(
                (prop::collection::vec(any::<u8>(), 0..4096), any::<bool>()),
                0..8,
            )
        ) {
            let mut c = StreamingCompressor::new(CompressorConfig::default()).unwrap();
            let mut frame = Vec::new();
            let mut expected = Vec::new();

            for (chunk, block_flush) in &steps {
                frame.extend(c.compress(chunk).unwrap());
                expected.extend_from_slice(chunk);
                if *block_flush {
                    frame.extend(c.flush(FlushMode::Block).unwrap());
                    prop_assert!(!c.is_finished());
                }
            }
            frame.extend(c.flush(FlushMode::Finish).unwrap());

            prop_assert_eq!(zstd::stream::decode_all(&frame[..]).unwrap(), expected);
        }

        #[test]
        fn prop_segment_hint_does_not_change_output(
            hint in 64usize..8192,
            seed in any::<u64>(),
            len in 0usize..200_000,
        ) {
            let data = noise(len, seed);
            let (small, _) = zstd_frame(&data, CompressorConfig::default().with_segment_size_hint(hint));
            let (default, _) = zstd_frame(&data, CompressorConfig::default());
            prop_assert_eq!(small, default);
        }
    }
}
