//! # Cooperative Cancellation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A caller-owned flag polled once per training iteration.
///
/// When it reports `true`, training stops before starting the next merge;
/// every merge completed so far is kept.
pub trait StopSignal {
    /// Should training stop now?
    fn should_stop(&self) -> bool;
}

/// A [`StopSignal`] that never fires.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverStop;

impl StopSignal for NeverStop {
    fn should_stop(&self) -> bool {
        false
    }
}

impl StopSignal for AtomicBool {
    fn should_stop(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<S: StopSignal + ?Sized> StopSignal for Arc<S> {
    fn should_stop(&self) -> bool {
        self.as_ref().should_stop()
    }
}

impl<S: StopSignal + ?Sized> StopSignal for &S {
    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

/// Adapts a closure into a [`StopSignal`].
#[derive(Debug, Clone, Copy)]
pub struct StopFn<F>(pub F);

impl<F: Fn() -> bool> StopSignal for StopFn<F> {
    fn should_stop(&self) -> bool {
        (self.0)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_never_stop() {
        assert!(!NeverStop.should_stop());
    }

    #[test]
    fn test_atomic_bool() {
        let flag = Arc::new(AtomicBool::new(false));
        assert!(!flag.should_stop());
        flag.store(true, Ordering::Relaxed);
        assert!(flag.should_stop());
        assert!((&*flag).should_stop());
    }

    #[test]
    fn test_stop_fn() {
        let polls = Cell::new(0);
        let signal = StopFn(|| {
            polls.set(polls.get() + 1);
            polls.get() > 2
        });
        assert!(!signal.should_stop());
        assert!(!signal.should_stop());
        assert!(signal.should_stop());
    }
}
