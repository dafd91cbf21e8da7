//! triobench - three-way machine benchmark
//!
//! Times a recursive CPU workload, an allocation-heavy hash/sort workload and a
//! small file write/read cycle, then renders the measurements as plain text
//! for a terminal or a CGI-style HTTP response.

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

pub mod bench;
pub mod config;
pub mod io;
pub mod models;
pub mod report;
pub mod util;

use bench::{IoStep, Phase};

/// Errors that end a benchmark run
#[derive(Debug, Error)]
pub enum BenchError {
    /// The memory benchmark could not reserve its working set
    #[error("{phase} benchmark ran out of memory: {source}")]
    OutOfMemory {
        phase: Phase,
        #[source]
        source: TryReserveError,
    },
    /// A file operation inside a benchmark failed
    #[error("{phase} benchmark failed while {step} {}: {source}", .path.display())]
    Io {
        phase: Phase,
        step: IoStep,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
    /// The report itself could not be written to its destination
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl BenchError {
    /// Phase the error happened in, if it came from a benchmark
    pub fn phase(&self) -> Option<Phase> {
        match self {
            BenchError::OutOfMemory { phase, .. } | BenchError::Io { phase, .. } => Some(*phase),
            BenchError::Config(_) | BenchError::Output(_) => None,
        }
    }
}

/// Result type alias for triobench operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Error presentation helpers for the binary
pub mod error {
    use super::BenchError;

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &BenchError) -> String {
        match error {
            BenchError::OutOfMemory { phase, .. } => format!(
                "The {} benchmark exhausted available memory. Close other programs or raise the memory limit.",
                phase
            ),
            BenchError::Io { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                format!(
                    "{}. Run the benchmark from a directory you can write to.",
                    error
                )
            }
            BenchError::Io { .. } => format!(
                "{}. Check free disk space and that the working directory is writable.",
                error
            ),
            BenchError::Config(msg) => {
                format!("Invalid workload parameter: {}.", msg)
            }
            BenchError::Output(_) => {
                "Failed to write the report. The output stream was closed.".to_string()
            }
        }
    }

    /// Process exit code for a fatal error
    pub fn exit_code(error: &BenchError) -> i32 {
        match error {
            BenchError::OutOfMemory { .. } => 3,
            BenchError::Io { .. } => 2,
            BenchError::Config(_) | BenchError::Output(_) => 1,
        }
    }
}

pub const APP_NAME: &str = "triobench";
pub const REPORT_TITLE: &str = "PHP Benchmark Results";
pub const DEFAULT_IO_FILE: &str = "benchmark_test_file.tmp";
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;
