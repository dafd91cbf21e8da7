//! Peak memory accounting
//!
//! `PeakAllocator` wraps the system allocator and keeps a live byte count and
//! a high-water mark. Install it as the `#[global_allocator]` of a binary (or
//! integration test) to get allocator-exact readings. Without it the probe
//! falls back to the process peak resident set size reported by the OS.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);
static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);

/// System allocator wrapper tracking live and peak heap bytes
pub struct PeakAllocator;

impl PeakAllocator {
    #[inline]
    fn grow(size: usize) {
        let live = LIVE_BYTES.fetch_add(size, Ordering::Relaxed) + size;
        PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn shrink(size: usize) {
        LIVE_BYTES.fetch_sub(size, Ordering::Relaxed);
    }
}

// SAFETY: every call is forwarded unchanged to `System`; the counters are
// only bookkeeping and never influence the returned pointers.
unsafe impl GlobalAlloc for PeakAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            Self::grow(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            Self::grow(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        Self::shrink(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            Self::shrink(layout.size());
            Self::grow(new_size);
        }
        new_ptr
    }
}

/// Which counter a peak reading came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeakSource {
    /// High-water mark kept by `PeakAllocator`
    Allocator,
    /// Process-wide peak resident set size from the OS
    ResidentSet,
}

impl std::fmt::Display for PeakSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeakSource::Allocator => write!(f, "allocator peak"),
            PeakSource::ResidentSet => write!(f, "peak resident set"),
        }
    }
}

/// A single peak memory sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakReading {
    pub bytes: u64,
    pub source: PeakSource,
}

/// Whether `PeakAllocator` is serving this process
pub fn is_tracking() -> bool {
    // Anything in std allocates before main, so zero means nothing was counted
    ALLOCATIONS.load(Ordering::Relaxed) > 0
}

/// Bytes currently allocated through `PeakAllocator`
pub fn live_bytes() -> u64 {
    LIVE_BYTES.load(Ordering::Relaxed) as u64
}

/// Highest live byte count since start or the last `reset_peak`
pub fn peak_bytes() -> u64 {
    PEAK_BYTES.load(Ordering::Relaxed) as u64
}

/// Number of allocations served by `PeakAllocator`
pub fn allocation_count() -> u64 {
    ALLOCATIONS.load(Ordering::Relaxed)
}

/// Lower the high-water mark to the current live byte count
///
/// The OS resident-set peak cannot be lowered, so this only affects
/// allocator readings.
pub fn reset_peak() {
    PEAK_BYTES.store(LIVE_BYTES.load(Ordering::Relaxed), Ordering::Relaxed);
}

/// Read the best available peak counter
pub fn peak_memory() -> PeakReading {
    if is_tracking() {
        PeakReading {
            bytes: peak_bytes(),
            source: PeakSource::Allocator,
        }
    } else {
        PeakReading {
            bytes: peak_resident_bytes().unwrap_or(0),
            source: PeakSource::ResidentSet,
        }
    }
}

/// Peak resident set size of this process in bytes
#[cfg(unix)]
pub fn peak_resident_bytes() -> Option<u64> {
    // SAFETY: getrusage only writes into the zeroed struct we hand it.
    let usage = unsafe {
        let mut usage: libc::rusage = std::mem::zeroed();
        if libc::getrusage(libc::RUSAGE_SELF, &mut usage) != 0 {
            return None;
        }
        usage
    };
    let max_rss = u64::try_from(usage.ru_maxrss).ok()?;
    // Linux and the BSDs report KiB, macOS reports bytes
    if cfg!(target_os = "macos") {
        Some(max_rss)
    } else {
        Some(max_rss * 1024)
    }
}

#[cfg(not(unix))]
pub fn peak_resident_bytes() -> Option<u64> {
    None
}
