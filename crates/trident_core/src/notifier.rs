//! Change Notifier
//!
//! A single dirty flag between whoever changes parameters and the one
//! consumer that redraws the response curve. Any number of changes between
//! two polls collapse into one refresh.

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-reader dirty flag
///
/// Lock-free: `notify()` is a store, `take()` is a swap. Safe to call from
/// any thread, including the control surface's.
#[derive(Debug)]
pub struct ChangeNotifier {
    dirty: AtomicBool,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    /// Starts dirty so the first poll draws a curve
    pub fn new() -> Self {
        Self {
            dirty: AtomicBool::new(true),
        }
    }

    /// Mark parameters as changed
    #[inline]
    pub fn notify(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Test-and-clear. Returns true at most once per burst of changes.
    #[inline]
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}
