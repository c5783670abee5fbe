//! Re-entrancy guard for user-triggered operations.

use std::sync::atomic::{AtomicBool, Ordering};

/// Disables a trigger while its operation is in flight.
///
/// At most one [`InFlightPermit`] exists at a time; the trigger is enabled
/// again when the permit is dropped.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    busy: AtomicBool,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the permit, or returns `None` if an operation is already running.
    pub fn try_acquire(&self) -> Option<InFlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightPermit { busy: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// RAII permit - re-enables the trigger when dropped.
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    busy: &'a AtomicBool,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_rejected_while_held() {
        let guard = InFlightGuard::new();
        let permit = guard.try_acquire();
        assert!(permit.is_some());
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());
    }

    #[test]
    fn test_drop_releases() {
        let guard = InFlightGuard::new();
        {
            let _permit = guard.try_acquire().unwrap();
        }
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }
}
