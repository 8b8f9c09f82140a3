use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use thiserror::Error;

pub const DEFAULT_WORKERS: usize = 4;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool needs at least one worker")]
    NoWorkers,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

struct Queue {
    tasks: VecDeque<Task>,
    shutdown: bool,
}

struct SharedState {
    queue: Mutex<Queue>,
    wake: Condvar,
}

impl SharedState {
    // A task panic is caught outside the lock, so a poisoned queue is still
    // consistent and safe to keep using.
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fixed set of persistent threads serving one FIFO task queue.
///
/// Dropping the pool lets every queued task run, then joins the workers.
pub struct WorkerPool {
    shared: Arc<SharedState>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(num_workers: usize) -> Result<Self, PoolError> {
        if num_workers == 0 {
            return Err(PoolError::NoWorkers);
        }

        let shared = Arc::new(SharedState {
            queue: Mutex::new(Queue {
                tasks: VecDeque::new(),
                shutdown: false,
            }),
            wake: Condvar::new(),
        });

        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(num_workers),
        };

        for index in 0..num_workers {
            let worker_shared = Arc::clone(&pool.shared);

            // on error, dropping `pool` shuts down the workers spawned so far
            let handle = thread::Builder::new()
                .name(format!("mandelbrot-worker-{index}"))
                .spawn(move || Self::worker_loop(&worker_shared))?;

            pool.workers.push(handle);
        }

        tracing::debug!(workers = num_workers, "worker pool started");

        Ok(pool)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Appends `task` to the queue and wakes one idle worker.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut queue = self.shared.lock();
        queue.tasks.push_back(Box::new(task));
        self.shared.wake.notify_one();
    }

    fn worker_loop(shared: &Arc<SharedState>) {
        loop {
            let task = {
                let mut queue = shared.lock();
                loop {
                    if let Some(task) = queue.tasks.pop_front() {
                        break task;
                    }

                    if queue.shutdown {
                        return;
                    }

                    queue = shared
                        .wake
                        .wait(queue)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                }
            };

            if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                let current = thread::current();
                tracing::error!(
                    worker = current.name().unwrap_or("unnamed"),
                    "worker task panicked"
                );
            }
        }
    }

    fn shutdown(&mut self) {
        {
            let mut queue = self.shared.lock();
            queue.shutdown = true;
        }
        self.shared.wake.notify_all();

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
