//! Benchmark result data models
//!
//! One small record per benchmark plus the report that bundles them once a
//! run has completed.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::environment::EnvironmentInfo;
use crate::util::alloc::PeakSource;

/// Outcome of the recursive Fibonacci workload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuResult {
    /// Computed Fibonacci value
    pub result: u64,
    pub time_ms: f64,
}

/// Outcome of the allocation/sort workload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryResult {
    /// Peak memory growth in MiB; may be negative with the resident-set source
    pub memory_used_mb: f64,
    pub time_ms: f64,
    /// Counter the peak readings came from
    pub source: PeakSource,
}

/// Outcome of the file write/read workload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IoResult {
    pub bytes_written: u64,
    pub write_time_ms: f64,
    pub read_time_ms: f64,
}

/// Complete run: all three results plus run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// When the run started
    pub timestamp: DateTime<Local>,
    /// Input given to the Fibonacci workload
    pub fib_input: u32,
    pub cpu: CpuResult,
    pub memory: MemoryResult,
    pub io: IoResult,
    pub environment: EnvironmentInfo,
}

impl BenchmarkReport {
    /// Sum of every timed window in milliseconds
    pub fn total_time_ms(&self) -> f64 {
        self.cpu.time_ms + self.memory.time_ms + self.io.write_time_ms + self.io.read_time_ms
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} - fib({}) {:.2} ms - memory {:.2} MB {:.2} ms - io {} bytes {:.2}/{:.2} ms",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.fib_input,
            self.cpu.time_ms,
            self.memory.memory_used_mb,
            self.memory.time_ms,
            self.io.bytes_written,
            self.io.write_time_ms,
            self.io.read_time_ms
        )
    }
}
