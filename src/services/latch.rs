// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Non-blocking single-flight latch.
//!
//! Callers either get the latch immediately or are told it is busy; nobody
//! waits. The guard releases the latch when dropped, so every exit path of
//! the guarded operation (success, error, `?`) frees it.

use std::sync::atomic::{AtomicBool, Ordering};

/// Boolean mutual-exclusion flag guarding one outstanding request.
#[derive(Debug, Default)]
pub struct Latch {
    held: AtomicBool,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the latch if it is free.
    pub fn try_acquire(&self) -> Option<LatchGuard<'_>> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LatchGuard { held: &self.held })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Releases the owning [`Latch`] on drop.
#[derive(Debug)]
pub struct LatchGuard<'a> {
    held: &'a AtomicBool,
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let latch = Latch::new();
        let guard = latch.try_acquire();
        assert!(guard.is_some());
        assert!(latch.is_held());
        assert!(latch.try_acquire().is_none());

        drop(guard);
        assert!(!latch.is_held());
        assert!(latch.try_acquire().is_some());
    }

    #[test]
    fn test_released_on_early_return() {
        fn guarded(latch: &Latch) -> Result<(), &'static str> {
            let _guard = latch.try_acquire().ok_or("busy")?;
            Err("request failed")
        }

        let latch = Latch::new();
        assert_eq!(guarded(&latch), Err("request failed"));
        assert!(!latch.is_held());
    }
}
