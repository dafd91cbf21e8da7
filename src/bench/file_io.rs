//! File write/read workload
//!
//! Writes a fixed text payload to a scratch file, reads it back and deletes
//! it. Each sub-step is timed on its own; progress markers sit between the
//! timed windows.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::progress::{NoProgress, ProgressEvent, ProgressSink};
use super::{IoStep, Phase};
use crate::config::BenchConfig;
use crate::io::ScratchFile;
use crate::models::IoResult;
use crate::util::timer::time_ms;
use crate::{BenchError, Result};

/// Outcome of one write/read cycle, including the bytes read back
#[derive(Debug, Clone)]
pub struct IoRun {
    pub result: IoResult,
    pub read_back: Vec<u8>,
}

/// File I/O benchmark executor
pub struct IoBenchmark {
    path: PathBuf,
    payload: Vec<u8>,
}

impl IoBenchmark {
    /// Create a new file I/O benchmark from the configuration
    pub fn new(config: &BenchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            path: config.io_path.clone(),
            payload: config.payload(),
        })
    }

    /// Execute the benchmark
    pub fn run(&self, progress: &mut dyn ProgressSink) -> Result<IoResult> {
        self.run_cycle(progress).map(|run| run.result)
    }

    /// Execute the benchmark and keep the bytes read back
    pub fn run_cycle(&self, progress: &mut dyn ProgressSink) -> Result<IoRun> {
        progress.report(ProgressEvent::PhaseStarted(Phase::Io));

        // The guard removes a partially written file if a step below fails
        let scratch = ScratchFile::new(&self.path);

        progress.report(ProgressEvent::IoStarted(IoStep::Write));
        let (written, write_time_ms) = time_ms(|| scratch.write_all(&self.payload));
        let bytes_written = written.map_err(|source| self.io_error(IoStep::Write, source))?;
        progress.report(ProgressEvent::IoFinished(IoStep::Write));

        progress.report(ProgressEvent::IoStarted(IoStep::Read));
        let (read, read_time_ms) = time_ms(|| scratch.read_all());
        let read_back = read.map_err(|source| self.io_error(IoStep::Read, source))?;
        progress.report(ProgressEvent::IoFinished(IoStep::Read));

        progress.report(ProgressEvent::IoStarted(IoStep::Delete));
        match scratch.remove() {
            Ok(()) => progress.report(ProgressEvent::IoFinished(IoStep::Delete)),
            Err(err) => warn!(
                "Could not delete benchmark file {}: {}",
                self.path.display(),
                err
            ),
        }

        progress.report(ProgressEvent::PhaseCompleted(Phase::Io));

        debug!(
            "wrote {} bytes in {:.2} ms, read {} bytes in {:.2} ms",
            bytes_written,
            write_time_ms,
            read_back.len(),
            read_time_ms
        );

        Ok(IoRun {
            result: IoResult {
                bytes_written,
                write_time_ms,
                read_time_ms,
            },
            read_back,
        })
    }

    fn io_error(&self, step: IoStep, source: std::io::Error) -> BenchError {
        BenchError::Io {
            phase: Phase::Io,
            step,
            path: self.path.clone(),
            source,
        }
    }
}

/// Run the file I/O benchmark against `path` with the default payload
pub fn io_benchmark(path: impl AsRef<Path>) -> Result<IoResult> {
    let config = BenchConfig::new().with_io_path(path.as_ref());
    IoBenchmark::new(&config)?.run(&mut NoProgress)
}
