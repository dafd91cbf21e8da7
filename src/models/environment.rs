//! Host environment captured for the HTTP header block

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::util::units::{format_bytes_limit, format_seconds_limit};
use crate::APP_NAME;

/// Environment details printed before the benchmarks in HTTP mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Local time formatted as `YYYY-MM-DD HH:MM:SS`
    pub date_time: String,
    /// Benchmark binary name and version
    pub runtime_version: String,
    /// Soft CPU-time limit in seconds, `None` when unlimited
    pub cpu_time_limit_secs: Option<u64>,
    /// Soft address-space limit in bytes, `None` when unlimited
    pub memory_limit_bytes: Option<u64>,
    pub os_name: String,
    pub os_release: String,
}

impl EnvironmentInfo {
    /// Detect the current process environment
    pub fn detect() -> Self {
        let (os_name, os_release) = detect_os();
        Self {
            date_time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            runtime_version: format!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION")),
            cpu_time_limit_secs: detect_cpu_time_limit(),
            memory_limit_bytes: detect_memory_limit(),
            os_name,
            os_release,
        }
    }

    /// Header lines, one `Label: value` pair each
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Date/Time: {}", self.date_time),
            format!("Runtime Version: {}", self.runtime_version),
            format!(
                "Max Execution Time: {}",
                format_seconds_limit(self.cpu_time_limit_secs)
            ),
            format!("Memory Limit: {}", format_bytes_limit(self.memory_limit_bytes)),
            format!("Operating System: {} {}", self.os_name, self.os_release),
        ]
    }
}

#[cfg(unix)]
fn soft_limit(resource: libc::c_int) -> Option<u64> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: getrlimit only writes into the struct we pass.
    if unsafe { libc::getrlimit(resource as _, &mut limit) } != 0 {
        return None;
    }
    if limit.rlim_cur == libc::RLIM_INFINITY {
        None
    } else {
        Some(limit.rlim_cur as u64)
    }
}

#[cfg(unix)]
fn detect_cpu_time_limit() -> Option<u64> {
    soft_limit(libc::RLIMIT_CPU as libc::c_int)
}

#[cfg(unix)]
fn detect_memory_limit() -> Option<u64> {
    soft_limit(libc::RLIMIT_AS as libc::c_int)
}

#[cfg(not(unix))]
fn detect_cpu_time_limit() -> Option<u64> {
    None
}

#[cfg(not(unix))]
fn detect_memory_limit() -> Option<u64> {
    None
}

#[cfg(unix)]
fn detect_os() -> (String, String) {
    use std::ffi::CStr;

    // SAFETY: uname fills the zeroed struct with NUL-terminated strings.
    unsafe {
        let mut name: libc::utsname = std::mem::zeroed();
        if libc::uname(&mut name) == 0 {
            let sysname = CStr::from_ptr(name.sysname.as_ptr()).to_string_lossy().into_owned();
            let release = CStr::from_ptr(name.release.as_ptr()).to_string_lossy().into_owned();
            return (sysname, release);
        }
    }
    fallback_os()
}

#[cfg(not(unix))]
fn detect_os() -> (String, String) {
    fallback_os()
}

fn fallback_os() -> (String, String) {
    (std::env::consts::OS.to_string(), "unknown".to_string())
}
