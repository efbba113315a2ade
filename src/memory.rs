//! Allocator Configuration
//!
//! With `memory_tracking`, every allocation goes through a counting wrapper
//! (over mimalloc when that feature is on, else the system allocator) so the
//! BEAM side can read live and peak Rust heap usage.

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    fn record_alloc(size: usize) {
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        let current = ALLOCATED.fetch_add(size, Ordering::Relaxed) + size;
        let mut peak = PEAK_ALLOCATED.load(Ordering::Relaxed);
        while current > peak {
            match PEAK_ALLOCATED.compare_exchange_weak(peak, current, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                record_alloc(layout.size());
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }

        unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
            let new_ptr = UNDERLYING.realloc(ptr, layout, new_size);
            if !new_ptr.is_null() {
                ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
                record_alloc(new_size);
            }
            new_ptr
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Snapshot of allocator counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStats {
    pub current: usize,
    pub peak: usize,
    pub allocations: usize,
}

#[cfg(feature = "memory_tracking")]
pub fn stats() -> MemoryStats {
    use std::sync::atomic::Ordering;
    MemoryStats {
        current: tracking::ALLOCATED.load(Ordering::SeqCst),
        peak: tracking::PEAK_ALLOCATED.load(Ordering::SeqCst),
        allocations: tracking::ALLOCATIONS.load(Ordering::SeqCst),
    }
}

/// Reset the peak to the current usage, returning the counters before reset
#[cfg(feature = "memory_tracking")]
pub fn reset_peak() -> MemoryStats {
    use std::sync::atomic::Ordering;
    let current = tracking::ALLOCATED.load(Ordering::SeqCst);
    MemoryStats {
        current,
        peak: tracking::PEAK_ALLOCATED.swap(current, Ordering::SeqCst),
        allocations: tracking::ALLOCATIONS.swap(0, Ordering::SeqCst),
    }
}

#[cfg(not(feature = "memory_tracking"))]
pub fn stats() -> MemoryStats {
    MemoryStats::default()
}

#[cfg(not(feature = "memory_tracking"))]
pub fn reset_peak() -> MemoryStats {
    MemoryStats::default()
}
