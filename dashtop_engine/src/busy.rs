//! Single-flight gate for user-driven operations. A second request while
//! one is running is rejected, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::EngineError;

#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    inner: Arc<AtomicBool>,
}

impl BusyFlag {
    /// Claim the flag. The returned guard releases it on drop, including
    /// when the operation unwinds or is cancelled.
    pub fn try_begin(&self, what: &'static str) -> Result<BusyGuard, EngineError> {
        match self
            .inner
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(BusyGuard {
                flag: Arc::clone(&self.inner),
            }),
            Err(_) => Err(EngineError::Busy(what)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_rejected_until_guard_drops() {
        let flag = BusyFlag::default();
        let guard = flag.try_begin("op").unwrap();
        assert!(flag.is_busy());
        assert!(matches!(
            flag.try_begin("op"),
            Err(EngineError::Busy("op"))
        ));
        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_begin("op").is_ok());
    }

    #[test]
    fn clones_share_one_gate() {
        let a = BusyFlag::default();
        let b = a.clone();
        let _guard = a.try_begin("op").unwrap();
        assert!(b.try_begin("op").is_err());
    }
}
