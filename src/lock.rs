//! Process-wide serialization for non-reentrant decoder calls.
//!
//! The underlying decode library is not reentrant for exactly two
//! operations: opening a codec and probing stream information. Every caller
//! in the process must run those two calls under the single shared
//! [`CodecGate`]; nothing else in this crate takes a lock.
//!
//! # Example
//!
//! ```
//! use framepick::CodecGate;
//!
//! let gate = CodecGate::global();
//! let value = gate.serialized(|| 21 * 2)?;
//! assert_eq!(value, 42);
//! # Ok::<(), framepick::FramePickError>(())
//! ```

use std::sync::Mutex;

use crate::error::FramePickError;

static GATE: Mutex<()> = Mutex::new(());

/// Handle to the process-wide codec serialization lock.
///
/// Obtained via [`CodecGate::global`] and injected into decoder-open paths.
/// `Copy` so it threads through constructors freely.
#[derive(Debug, Clone, Copy)]
pub struct CodecGate {
    inner: &'static Mutex<()>,
}

impl CodecGate {
    /// The single shared gate for this process.
    pub fn global() -> Self {
        Self { inner: &GATE }
    }

    /// Run `operation` while holding the gate.
    ///
    /// # Errors
    ///
    /// Returns [`FramePickError::LockFailure`] if the lock is poisoned.
    /// Lock failure is fatal; callers propagate it immediately.
    pub fn serialized<T>(&self, operation: impl FnOnce() -> T) -> Result<T, FramePickError> {
        let guard = self.inner.lock().map_err(|_| FramePickError::LockFailure)?;
        let output = operation();
        drop(guard);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_runs_the_closure_and_returns_its_value() {
        let gate = CodecGate::global();
        assert_eq!(gate.serialized(|| 7).unwrap(), 7);
    }

    #[test]
    fn gate_is_reentrant_across_sequential_calls() {
        let gate = CodecGate::global();
        for index in 0..4 {
            assert_eq!(gate.serialized(move || index).unwrap(), index);
        }
    }

    #[test]
    fn gate_serializes_concurrent_critical_sections() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let inside = Arc::clone(&inside);
                let peak = Arc::clone(&peak);
                std::thread::spawn(move || {
                    CodecGate::global()
                        .serialized(|| {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            peak.fetch_max(now, Ordering::SeqCst);
                            std::thread::yield_now();
                            inside.fetch_sub(1, Ordering::SeqCst);
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }
}
