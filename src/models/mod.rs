//! Data models module
//!
//! Contains the per-benchmark result records, the aggregated report and the
//! host environment details shown in HTTP mode.

pub mod environment;
pub mod result;

// Re-export commonly used types
pub use environment::EnvironmentInfo;
pub use result::{BenchmarkReport, CpuResult, IoResult, MemoryResult};
