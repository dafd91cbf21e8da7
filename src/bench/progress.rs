//! Progress reporting
//!
//! Benchmarks emit `ProgressEvent`s through a `ProgressSink`. The sink decides
//! how (or whether) to show them; benchmarks keep every emission outside their
//! timed windows.

use std::fmt;
use std::io::Write;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use super::{IoStep, Phase};

/// Progress update sent during benchmark execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    PhaseStarted(Phase),
    PhaseCompleted(Phase),
    /// Digests appended so far by the memory workload
    HashesGenerated { done: usize, total: usize },
    IoStarted(IoStep),
    IoFinished(IoStep),
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::PhaseStarted(phase) => write!(f, "Starting {} Benchmark...", phase),
            ProgressEvent::PhaseCompleted(phase) => write!(f, "{} Benchmark Completed.", phase),
            ProgressEvent::HashesGenerated { done, total } => {
                write!(f, "  Generated {} of {} hashes...", done, total)
            }
            ProgressEvent::IoStarted(step) => match step {
                IoStep::Write => write!(f, "  Writing file..."),
                IoStep::Read => write!(f, "  Reading file..."),
                IoStep::Delete => write!(f, "  Deleting file..."),
            },
            ProgressEvent::IoFinished(step) => match step {
                IoStep::Write => write!(f, "  File written."),
                IoStep::Read => write!(f, "  File read."),
                IoStep::Delete => write!(f, "  File deleted."),
            },
        }
    }
}

/// Receiver of progress events
pub trait ProgressSink {
    fn report(&mut self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent),
{
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _event: ProgressEvent) {}
}

/// Writes each event as a line and flushes immediately
pub struct LineProgress<W: Write> {
    out: W,
}

impl<W: Write> LineProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for LineProgress<W> {
    fn report(&mut self, event: ProgressEvent) {
        // Progress output is best effort; a closed sink must not end the run
        if let Err(err) = writeln!(self.out, "{}", event).and_then(|_| self.out.flush()) {
            debug!("Dropped progress line: {}", err);
        }
    }
}

/// Line output plus a progress bar on stderr for the digest loop
///
/// The bar hides itself when stderr is not a terminal.
pub struct BarProgress<W: Write> {
    lines: LineProgress<W>,
    bar: Option<ProgressBar>,
}

impl<W: Write> BarProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            lines: LineProgress::new(out),
            bar: None,
        }
    }

    fn bar(&mut self, total: usize) -> &ProgressBar {
        self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::with_template("{spinner} {pos}/{len} hashes {wide_bar}") {
                bar.set_style(style);
            }
            bar
        })
    }
}

impl<W: Write> ProgressSink for BarProgress<W> {
    fn report(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::HashesGenerated { done, total } => {
                self.bar(total).set_position(done as u64);
            }
            ProgressEvent::PhaseCompleted(Phase::Memory) => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_and_clear();
                }
            }
            _ => {}
        }
        match &self.bar {
            // Hide the bar while the line is printed so the two do not interleave
            Some(bar) => bar.suspend(|| self.lines.report(event)),
            None => self.lines.report(event),
        }
    }
}
