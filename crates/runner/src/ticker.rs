//! Tick driver registration
//!
//! A session acquires a [`TickerGuard`] when it starts playing and drops it
//! when it stops. Dropping the guard aborts the tick task, so the task can
//! never outlive the playing state, whatever path leaves it.

use std::future::Future;
use tokio::task::JoinHandle;

/// Owns a running tick task; aborts it on drop
#[derive(Debug)]
pub struct TickerGuard {
    generation: u64,
    handle: JoinHandle<()>,
}

impl TickerGuard {
    /// Spawn `task` on the current runtime, tagged with `generation`
    pub fn spawn<F>(generation: u64, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            generation,
            handle: tokio::spawn(task),
        }
    }

    /// Generation this ticker was started for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the task has already returned or been aborted
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
