//! Run configuration
//!
//! The benchmark takes no flags or config files; `BenchConfig` carries the
//! fixed workload sizes so library callers and tests can shrink them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{BenchError, Result, DEFAULT_IO_FILE};

/// Largest Fibonacci input whose result still fits in a `u64`
pub const MAX_FIB_INPUT: u32 = 93;

/// Benchmark configuration structure containing all workload parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Input to the recursive Fibonacci workload
    pub fib_input: u32,
    /// Number of digests generated by the memory workload
    pub hash_count: usize,
    /// Emit a progress event every this many digests
    pub progress_interval: usize,
    /// Line repeated to build the file payload
    pub io_line: String,
    /// Number of times `io_line` is repeated
    pub io_repeat: usize,
    /// Scratch file written and read by the I/O workload
    pub io_path: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            fib_input: 30,
            hash_count: 100_000,
            progress_interval: 20_000,
            io_line: "The quick brown fox jumps over the lazy dog.\n".to_string(),
            io_repeat: 10_000,
            io_path: PathBuf::from(DEFAULT_IO_FILE),
        }
    }
}

impl BenchConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.fib_input > MAX_FIB_INPUT {
            return Err(BenchError::Config(format!(
                "Fibonacci input too large: {} (max: {})",
                self.fib_input, MAX_FIB_INPUT
            )));
        }

        if self.progress_interval == 0 {
            return Err(BenchError::Config(
                "Progress interval must be greater than 0".to_string(),
            ));
        }

        if self.io_line.is_empty() {
            return Err(BenchError::Config(
                "I/O payload line must not be empty".to_string(),
            ));
        }

        if self.io_path.as_os_str().is_empty() {
            return Err(BenchError::Config(
                "I/O scratch file path must not be empty".to_string(),
            ));
        }

        if self.io_path.is_dir() {
            return Err(BenchError::Config(format!(
                "I/O scratch file path is a directory: {}",
                self.io_path.display()
            )));
        }

        Ok(())
    }

    /// Exact payload size in bytes
    pub fn payload_len(&self) -> usize {
        self.io_line.len() * self.io_repeat
    }

    /// Build the file payload
    pub fn payload(&self) -> Vec<u8> {
        self.io_line.repeat(self.io_repeat).into_bytes()
    }

    /// Set the Fibonacci input
    pub fn with_fib_input(mut self, n: u32) -> Self {
        self.fib_input = n;
        self
    }

    /// Set the number of generated digests
    pub fn with_hash_count(mut self, count: usize) -> Self {
        self.hash_count = count;
        self
    }

    /// Set how often the memory workload reports progress
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the payload line and repeat count
    pub fn with_payload(mut self, line: impl Into<String>, repeat: usize) -> Self {
        self.io_line = line.into();
        self.io_repeat = repeat;
        self
    }

    /// Set the scratch file path
    pub fn with_io_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.io_path = path.into();
        self
    }
}
