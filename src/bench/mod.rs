//! Benchmark engine module
//!
//! Contains the three workloads (recursive CPU, allocation/sort, file
//! write/read) and the progress events they emit.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod cpu;
pub mod file_io;
pub mod memory;
pub mod progress;

// Re-export commonly used types
pub use cpu::{cpu_benchmark, fib, CpuBenchmark};
pub use file_io::{io_benchmark, IoBenchmark, IoRun};
pub use memory::{memory_benchmark, MemoryBenchmark};
pub use progress::{BarProgress, LineProgress, NoProgress, ProgressEvent, ProgressSink};

/// The three benchmark phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Cpu,
    Memory,
    Io,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Cpu => write!(f, "CPU"),
            Phase::Memory => write!(f, "Memory"),
            Phase::Io => write!(f, "IO"),
        }
    }
}

/// Sub-steps of the file I/O benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IoStep {
    Write,
    Read,
    Delete,
}

impl fmt::Display for IoStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoStep::Write => write!(f, "writing"),
            IoStep::Read => write!(f, "reading"),
            IoStep::Delete => write!(f, "deleting"),
        }
    }
}
