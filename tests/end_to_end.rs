//! Runs the built binary the way a user or a web server would

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn run_in(dir: &Path, cgi: bool) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_triobench"));
    command
        .current_dir(dir)
        .env_remove("GATEWAY_INTERFACE")
        .env_remove("REQUEST_METHOD");
    if cgi {
        command
            .env("GATEWAY_INTERFACE", "CGI/1.1")
            .env("REQUEST_METHOD", "GET");
    }
    command.output().expect("failed to start benchmark binary")
}

fn durations(stdout: &str) -> Vec<f64> {
    stdout
        .lines()
        .filter(|line| line.contains("Duration: "))
        .map(|line| {
            let value = line
                .split("Duration: ")
                .nth(1)
                .and_then(|rest| rest.strip_suffix(" ms"))
                .expect("duration line ends with ms");
            value.parse::<f64>().expect("duration is a number")
        })
        .collect()
}

#[test]
fn test_terminal_run_succeeds() {
    let dir = tempdir().unwrap();
    let output = run_in(dir.path(), false);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.starts_with("PHP Benchmark Results\n=====================\n"));
    assert!(stdout.contains("Summary\n=======\n"));
    assert!(stdout.contains("  - Fibonacci(30) = 832040\n"));
    assert!(stdout.contains("  - Bytes Written: 450000 bytes\n"));
    assert!(stdout.contains("  - Peak Memory Used: "));
    assert!(!stdout.contains("Content-Type"));

    let durations = durations(&stdout);
    assert_eq!(durations.len(), 4);
    assert!(durations.iter().all(|ms| *ms >= 0.0));
}

#[test]
fn test_cgi_run_declares_plain_text() {
    let dir = tempdir().unwrap();
    let output = run_in(dir.path(), true);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.starts_with("Content-Type: text/plain; charset=utf-8\r\n\r\n"));
    assert!(stdout.contains("Date/Time: "));
    assert!(stdout.contains("Max Execution Time: "));
    assert!(stdout.contains("Memory Limit: "));
    assert!(stdout.find("Operating System: ").unwrap() < stdout.find("Summary").unwrap());
}

#[test]
fn test_two_runs_leave_no_residual_files() {
    let dir = tempdir().unwrap();
    for _ in 0..2 {
        let output = run_in(dir.path(), false);
        assert!(output.status.success());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_unwritable_directory_fails_without_io_summary() {
    // Nobody, not even root, can create regular files in procfs
    let output = run_in(Path::new("/proc"), false);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(!stdout.contains("IO Benchmark:"));
    assert!(!stdout.contains("Summary"));
    assert!(stderr.contains("IO benchmark failed while writing"));
}
