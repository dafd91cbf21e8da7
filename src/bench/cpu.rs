//! Recursive CPU workload

use std::hint::black_box;

use tracing::debug;

use super::progress::{NoProgress, ProgressEvent, ProgressSink};
use super::Phase;
use crate::config::BenchConfig;
use crate::models::CpuResult;
use crate::util::timer::{elapsed_ms, now};
use crate::Result;

/// Naive doubly recursive Fibonacci; the exponential call tree is the workload
pub fn fib(n: u32) -> u64 {
    if n < 2 {
        return n as u64;
    }
    fib(n - 1) + fib(n - 2)
}

/// CPU benchmark executor
pub struct CpuBenchmark {
    n: u32,
}

impl CpuBenchmark {
    /// Create a new CPU benchmark for the configured input
    pub fn new(config: &BenchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { n: config.fib_input })
    }

    /// Execute the benchmark
    pub fn run(&self, progress: &mut dyn ProgressSink) -> CpuResult {
        progress.report(ProgressEvent::PhaseStarted(Phase::Cpu));

        let start = now();
        let result = fib(black_box(self.n));
        let end = now();

        progress.report(ProgressEvent::PhaseCompleted(Phase::Cpu));

        let time_ms = elapsed_ms(start, end);
        debug!("fib({}) = {} in {:.2} ms", self.n, result, time_ms);
        CpuResult { result, time_ms }
    }
}

/// Time `fib(n)` without progress output
///
/// Inputs above `MAX_FIB_INPUT` overflow `u64` and are rejected.
pub fn cpu_benchmark(n: u32) -> Result<CpuResult> {
    let config = BenchConfig::new().with_fib_input(n);
    Ok(CpuBenchmark::new(&config)?.run(&mut NoProgress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_FIB_INPUT;
    use crate::BenchError;

    #[test]
    fn test_fib_boundaries() {
        assert_eq!(fib(0), 0);
        assert_eq!(fib(1), 1);
        assert_eq!(fib(2), 1);
        assert_eq!(fib(10), 55);
        assert_eq!(fib(20), 6765);
    }

    #[test]
    fn test_cpu_benchmark_small_input() {
        let result = cpu_benchmark(15).unwrap();
        assert_eq!(result.result, 610);
        assert!(result.time_ms >= 0.0);
    }

    #[test]
    fn test_cpu_benchmark_trivial_inputs() {
        assert_eq!(cpu_benchmark(0).unwrap().result, 0);
        assert_eq!(cpu_benchmark(1).unwrap().result, 1);
    }

    #[test]
    fn test_cpu_benchmark_rejects_overflowing_input() {
        let err = cpu_benchmark(MAX_FIB_INPUT + 1).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[test]
    fn test_progress_markers_surround_run() {
        let config = BenchConfig::new().with_fib_input(5);
        let bench = CpuBenchmark::new(&config).unwrap();
        let mut events = Vec::new();
        let result = bench.run(&mut |event: ProgressEvent| events.push(event));

        assert_eq!(result.result, 5);
        assert_eq!(
            events,
            vec![
                ProgressEvent::PhaseStarted(Phase::Cpu),
                ProgressEvent::PhaseCompleted(Phase::Cpu),
            ]
        );
    }
}
