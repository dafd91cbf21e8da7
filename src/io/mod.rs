//! I/O operations module
//!
//! Contains the scratch file used by the file I/O benchmark.

pub mod scratch;

pub use scratch::ScratchFile;
