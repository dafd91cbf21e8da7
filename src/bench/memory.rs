//! Allocation and sort workload
//!
//! Fills a vector with fixed-length hex digests, sorts it and reports how far
//! the peak memory counter moved while doing so.

use std::collections::TryReserveError;

use md5::{Digest, Md5};
use tracing::debug;

use super::progress::{NoProgress, ProgressEvent, ProgressSink};
use super::Phase;
use crate::config::BenchConfig;
use crate::models::MemoryResult;
use crate::util::alloc::{self, PeakReading};
use crate::util::timer::Stopwatch;
use crate::util::units::delta_mib;
use crate::{BenchError, Result};

/// Length of every generated digest string
pub const DIGEST_LEN: usize = 32;

/// Lowercase hex MD5 digest of the decimal form of `index`
///
/// The string's heap buffer is reserved fallibly so exhaustion surfaces as an
/// error instead of an abort.
pub fn index_digest(index: usize) -> std::result::Result<String, TryReserveError> {
    let mut key = [0u8; 20];
    let mut encoded = [0u8; DIGEST_LEN];
    // 16 digest bytes always fill the 32-byte buffer exactly
    let _ = hex::encode_to_slice(Md5::digest(decimal(index, &mut key)), &mut encoded);

    let mut digest = String::new();
    digest.try_reserve_exact(DIGEST_LEN)?;
    digest.extend(encoded.iter().copied().map(char::from));
    Ok(digest)
}

/// ASCII decimal digits of `value`, written to the end of `buf`
fn decimal(mut value: usize, buf: &mut [u8; 20]) -> &[u8] {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    &buf[start..]
}

/// Memory benchmark executor
pub struct MemoryBenchmark {
    count: usize,
    progress_interval: usize,
}

impl MemoryBenchmark {
    /// Create a new memory benchmark from the configuration
    pub fn new(config: &BenchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            count: config.hash_count,
            progress_interval: config.progress_interval,
        })
    }

    /// Execute the benchmark
    pub fn run(&self, progress: &mut dyn ProgressSink) -> Result<MemoryResult> {
        progress.report(ProgressEvent::PhaseStarted(Phase::Memory));

        // Start from the live heap so earlier phases do not count
        alloc::reset_peak();
        let start = alloc::peak_memory();
        let allocations = alloc::allocation_count();
        let mut watch = Stopwatch::start();

        let digests = self.fill_and_sort(&mut watch, progress)?;

        watch.pause();
        let end = alloc::peak_memory();
        let allocations = alloc::allocation_count() - allocations;
        drop(digests);

        progress.report(ProgressEvent::PhaseCompleted(Phase::Memory));

        let result = MemoryResult {
            memory_used_mb: peak_delta_mib(start, end),
            time_ms: watch.elapsed_ms(),
            source: end.source,
        };
        debug!(
            "{} digests used {:.2} MB ({}) in {:.2} ms, {} allocations, {} bytes live after release",
            self.count,
            result.memory_used_mb,
            result.source,
            result.time_ms,
            allocations,
            alloc::live_bytes()
        );
        Ok(result)
    }

    /// Build and sort the digest vector
    ///
    /// `watch` is paused while progress is reported.
    pub fn fill_and_sort(
        &self,
        watch: &mut Stopwatch,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<String>> {
        self.fill_and_sort_with(watch, progress, index_digest)
    }

    fn fill_and_sort_with<F>(
        &self,
        watch: &mut Stopwatch,
        progress: &mut dyn ProgressSink,
        make_digest: F,
    ) -> Result<Vec<String>>
    where
        F: Fn(usize) -> std::result::Result<String, TryReserveError>,
    {
        let mut digests: Vec<String> = Vec::new();
        digests.try_reserve_exact(self.count).map_err(out_of_memory)?;

        for index in 0..self.count {
            digests.push(make_digest(index).map_err(out_of_memory)?);

            let done = index + 1;
            if done % self.progress_interval == 0 {
                watch.paused(|| {
                    progress.report(ProgressEvent::HashesGenerated {
                        done,
                        total: self.count,
                    })
                });
            }
        }

        // In-place sort; the stable sort's scratch buffer is an infallible allocation
        digests.sort_unstable();
        Ok(digests)
    }
}

fn out_of_memory(source: TryReserveError) -> BenchError {
    BenchError::OutOfMemory {
        phase: Phase::Memory,
        source,
    }
}

fn peak_delta_mib(start: PeakReading, end: PeakReading) -> f64 {
    delta_mib(start.bytes, end.bytes)
}

/// Run the memory benchmark with default sizes and no progress output
pub fn memory_benchmark() -> Result<MemoryResult> {
    MemoryBenchmark::new(&BenchConfig::new())?.run(&mut NoProgress)
}
