//! Benchmark orchestration and text rendering
//!
//! `Reporter` runs the CPU, memory and file I/O benchmarks in that order and
//! writes the plain-text report for a terminal or a CGI-style HTTP response.

use std::ffi::OsString;
use std::io::Write;

use chrono::Local;
use tracing::{debug, info};

use crate::bench::{
    BarProgress, CpuBenchmark, IoBenchmark, LineProgress, MemoryBenchmark, NoProgress,
    ProgressSink,
};
use crate::config::BenchConfig;
use crate::models::{BenchmarkReport, CpuResult, EnvironmentInfo, IoResult, MemoryResult};
use crate::util::units::format_fixed;
use crate::{Result, REPORT_TITLE};

/// Header declaring the response body as plain text
pub const CONTENT_TYPE_HEADER: &str = "Content-Type: text/plain; charset=utf-8";

/// Where the report is going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Interactive or piped command-line output
    Terminal,
    /// Body of an HTTP response produced through CGI
    Http,
}

impl OutputTarget {
    /// Detect the target from the process environment
    pub fn detect() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Detect the target using `lookup` to read environment variables
    ///
    /// A web server running us as a CGI program always sets
    /// `GATEWAY_INTERFACE` and `REQUEST_METHOD`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let is_cgi = ["GATEWAY_INTERFACE", "REQUEST_METHOD"]
            .iter()
            .any(|name| lookup(name).is_some_and(|value| !value.is_empty()));
        if is_cgi {
            OutputTarget::Http
        } else {
            OutputTarget::Terminal
        }
    }
}

/// Runs the benchmarks and writes the report to `out`
pub struct Reporter<W: Write> {
    config: BenchConfig,
    target: OutputTarget,
    progress: bool,
    out: W,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter with progress output enabled
    pub fn new(target: OutputTarget, config: BenchConfig, out: W) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            target,
            progress: true,
            out,
        })
    }

    /// Enable or disable incremental progress lines
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run every benchmark and write the report
    ///
    /// The summary is only written once all three benchmarks succeeded.
    pub fn run(&mut self) -> Result<BenchmarkReport> {
        let timestamp = Local::now();

        if self.target == OutputTarget::Http {
            write!(self.out, "{}\r\n\r\n", CONTENT_TYPE_HEADER)?;
        }
        self.out.write_all(render_title().as_bytes())?;

        let environment = EnvironmentInfo::detect();
        if self.target == OutputTarget::Http {
            self.out.write_all(render_environment(&environment).as_bytes())?;
        }
        self.out.flush()?;

        let (cpu, memory, io) = {
            let mut sink: Box<dyn ProgressSink + '_> = match (self.progress, self.target) {
                (false, _) => Box::new(NoProgress),
                (true, OutputTarget::Terminal) => Box::new(BarProgress::new(&mut self.out)),
                (true, OutputTarget::Http) => Box::new(LineProgress::new(&mut self.out)),
            };
            run_benchmarks(&self.config, sink.as_mut())?
        };

        let report = BenchmarkReport {
            timestamp,
            fib_input: self.config.fib_input,
            cpu,
            memory,
            io,
            environment,
        };

        if self.progress {
            writeln!(self.out)?;
        }
        self.out.write_all(render_summary(&report).as_bytes())?;
        self.out.flush()?;

        info!("{} - total {:.2} ms", report.summary(), report.total_time_ms());
        Ok(report)
    }
}

/// Run CPU, memory and file I/O benchmarks in order
pub fn run_benchmarks(
    config: &BenchConfig,
    progress: &mut dyn ProgressSink,
) -> Result<(CpuResult, MemoryResult, IoResult)> {
    debug!("running benchmarks with {:?}", config);
    let cpu = CpuBenchmark::new(config)?.run(progress);
    let memory = MemoryBenchmark::new(config)?.run(progress)?;
    let io = IoBenchmark::new(config)?.run(progress)?;
    Ok((cpu, memory, io))
}

/// Title block that opens every report
pub fn render_title() -> String {
    format!("{}\n{}\n\n", REPORT_TITLE, "=".repeat(REPORT_TITLE.len()))
}

/// Environment header block (HTTP mode)
pub fn render_environment(environment: &EnvironmentInfo) -> String {
    let mut block = String::new();
    for line in environment.lines() {
        block.push_str(&line);
        block.push('\n');
    }
    block.push('\n');
    block
}

/// Final summary block
pub fn render_summary(report: &BenchmarkReport) -> String {
    format!(
        "Summary\n\
         =======\n\
         CPU Benchmark:\n\
         \x20 - Fibonacci({}) = {}\n\
         \x20 - Duration: {} ms\n\
         \n\
         Memory Benchmark:\n\
         \x20 - Peak Memory Used: {} MB\n\
         \x20 - Duration: {} ms\n\
         \n\
         IO Benchmark:\n\
         \x20 - Bytes Written: {} bytes\n\
         \x20 - Write Duration: {} ms\n\
         \x20 - Read Duration: {} ms\n",
        report.fib_input,
        report.cpu.result,
        format_fixed(report.cpu.time_ms),
        format_fixed(report.memory.memory_used_mb),
        format_fixed(report.memory.time_ms),
        report.io.bytes_written,
        format_fixed(report.io.write_time_ms),
        format_fixed(report.io.read_time_ms),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::alloc::PeakSource;
    use crate::BenchError;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn small_config(dir: &std::path::Path) -> BenchConfig {
        BenchConfig::new()
            .with_fib_input(12)
            .with_hash_count(200)
            .with_progress_interval(100)
            .with_io_path(dir.join("report.tmp"))
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_target_detection() {
        assert_eq!(OutputTarget::from_lookup(lookup_from(&[])), OutputTarget::Terminal);
        assert_eq!(
            OutputTarget::from_lookup(lookup_from(&[("GATEWAY_INTERFACE", "CGI/1.1")])),
            OutputTarget::Http
        );
        assert_eq!(
            OutputTarget::from_lookup(lookup_from(&[("REQUEST_METHOD", "GET")])),
            OutputTarget::Http
        );
        assert_eq!(
            OutputTarget::from_lookup(lookup_from(&[("REQUEST_METHOD", "")])),
            OutputTarget::Terminal
        );
    }

    #[test]
    fn test_render_title() {
        assert_eq!(
            render_title(),
            "PHP Benchmark Results\n=====================\n\n"
        );
    }

    #[test]
    fn test_render_summary_layout() {
        let report = BenchmarkReport {
            timestamp: Local::now(),
            fib_input: 30,
            cpu: CpuResult {
                result: 832040,
                time_ms: 101.239,
            },
            memory: MemoryResult {
                memory_used_mb: 11.5,
                time_ms: 52.0,
                source: PeakSource::Allocator,
            },
            io: IoResult {
                bytes_written: 450000,
                write_time_ms: 0.4,
                read_time_ms: 0.126,
            },
            environment: EnvironmentInfo::detect(),
        };

        let expected = concat!(
            "Summary\n",
            "=======\n",
            "CPU Benchmark:\n",
            "  - Fibonacci(30) = 832040\n",
            "  - Duration: 101.24 ms\n",
            "\n",
            "Memory Benchmark:\n",
            "  - Peak Memory Used: 11.50 MB\n",
            "  - Duration: 52.00 ms\n",
            "\n",
            "IO Benchmark:\n",
            "  - Bytes Written: 450000 bytes\n",
            "  - Write Duration: 0.40 ms\n",
            "  - Read Duration: 0.13 ms\n",
        );
        assert_eq!(render_summary(&report), expected);
    }

    #[test]
    fn test_terminal_run_without_progress() {
        let dir = tempdir().unwrap();
        let mut reporter = Reporter::new(OutputTarget::Terminal, small_config(dir.path()), Vec::new())
            .unwrap()
            .with_progress(false);

        let report = reporter.run().unwrap();
        assert_eq!(report.cpu.result, 144);
        assert_eq!(report.io.bytes_written, 450_000);

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.starts_with("PHP Benchmark Results\n=====================\n\nSummary\n"));
        assert!(text.contains("  - Fibonacci(12) = 144\n"));
        assert!(!text.contains("Content-Type"));
        assert!(!text.contains("Starting"));
        assert!(!dir.path().join("report.tmp").exists());
    }

    #[test]
    fn test_http_run_with_progress() {
        let dir = tempdir().unwrap();
        let mut reporter =
            Reporter::new(OutputTarget::Http, small_config(dir.path()), Vec::new()).unwrap();
        reporter.run().unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.starts_with("Content-Type: text/plain; charset=utf-8\r\n\r\nPHP Benchmark Results\n"));
        assert!(text.contains("Date/Time: "));
        assert!(text.contains("Operating System: "));

        let cpu_start = text.find("Starting CPU Benchmark...").unwrap();
        let memory_start = text.find("Starting Memory Benchmark...").unwrap();
        let io_start = text.find("Starting IO Benchmark...").unwrap();
        let summary = text.find("Summary\n=======").unwrap();
        assert!(text.find("Date/Time: ").unwrap() < cpu_start);
        assert!(cpu_start < memory_start && memory_start < io_start && io_start < summary);
        assert!(text.contains("  Generated 200 of 200 hashes...\n"));
    }

    #[test]
    fn test_failed_io_phase_prints_no_summary() {
        let dir = tempdir().unwrap();
        let config = small_config(dir.path()).with_io_path(dir.path().join("nope").join("x.tmp"));
        let mut reporter = Reporter::new(OutputTarget::Terminal, config, Vec::new()).unwrap();

        let err = reporter.run().unwrap_err();
        assert!(matches!(err, BenchError::Io { .. }));

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("Starting IO Benchmark..."));
        assert!(!text.contains("Summary"));
        assert!(!text.contains("IO Benchmark:"));
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = BenchConfig::new().with_progress_interval(0);
        let err = Reporter::new(OutputTarget::Terminal, config, Vec::new()).err().unwrap();
        assert!(matches!(err, BenchError::Config(_)));
    }
}
