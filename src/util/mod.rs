//! Utility functions module
//!
//! Contains timing helpers, peak memory accounting and units formatting.

pub mod alloc;
pub mod timer;
pub mod units;

// Re-export commonly used functions
pub use alloc::{peak_memory, reset_peak, PeakAllocator, PeakReading, PeakSource};
pub use timer::{elapsed_ms, now, time_ms, Stopwatch};
pub use units::{delta_mib, format_bytes, format_fixed};
