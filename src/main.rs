use std::process;
use std::time::Instant;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use triobench::config::BenchConfig;
use triobench::error::{exit_code, user_friendly_message};
use triobench::report::{OutputTarget, Reporter};
use triobench::util::alloc::PeakAllocator;
use triobench::util::units::format_duration;

// Allocator-exact peak readings for the memory benchmark
#[global_allocator]
static GLOBAL: PeakAllocator = PeakAllocator;

fn main() {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let started = Instant::now();
    let target = OutputTarget::detect();
    info!("output target: {:?}", target);

    let stdout = std::io::stdout();
    let outcome = Reporter::new(target, BenchConfig::default(), stdout.lock())
        .and_then(|mut reporter| reporter.run());

    match outcome {
        Ok(_) => info!("benchmark run finished in {}", format_duration(started.elapsed())),
        Err(err) => {
            error!("benchmark run aborted: {}", err);
            eprintln!("Benchmark failed: {}", user_friendly_message(&err));
            process::exit(exit_code(&err));
        }
    }
}
