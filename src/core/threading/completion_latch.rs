use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// Counts finished bands for one render. The count and the wait predicate share
/// one mutex, so a completion can never slip between check and wait.
#[derive(Debug)]
pub struct CompletionLatch {
    expected: usize,
    completed: Mutex<usize>,
    done: Condvar,
}

impl CompletionLatch {
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            completed: Mutex::new(0),
            done: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.completed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[must_use]
    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn complete_one(&self) {
        let mut completed = self.lock();
        *completed += 1;
        self.done.notify_one();
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        *self.lock()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        *self.lock() >= self.expected
    }

    pub fn wait(&self) {
        let completed = self.lock();
        let _completed = self
            .done
            .wait_while(completed, |completed| *completed < self.expected)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
    }

    /// Returns `false` if `timeout` elapsed before every band reported.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let completed = self.lock();
        let (_completed, result) = self
            .done
            .wait_timeout_while(completed, timeout, |completed| *completed < self.expected)
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        !result.timed_out()
    }
}

/// Reports completion when dropped, so a band that panics still releases the
/// render waiting on it.
pub struct CompletionGuard<'a> {
    latch: &'a CompletionLatch,
}

impl<'a> CompletionGuard<'a> {
    #[must_use]
    pub fn new(latch: &'a CompletionLatch) -> Self {
        Self { latch }
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.latch.complete_one();
    }
}
