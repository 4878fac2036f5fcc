//! Bounded worker pool for independent blocking jobs.
//!
//! Workers are scoped threads pulling item indices from a shared counter, so
//! each item is processed exactly once and at most `max_workers` jobs run at
//! any instant. Results are handed back to the calling thread in completion
//! order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

/// Fixed-size pool; `max_workers` is clamped to at least one.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    max_workers: usize,
}

impl WorkerPool {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Number of threads spawned for a batch of `items` jobs.
    pub fn workers_for(&self, items: usize) -> usize {
        self.max_workers.min(items)
    }

    /// Run `job` over every item, calling `on_done(index, output)` on the
    /// calling thread as each job finishes.
    pub fn run<T, R, F, C>(&self, items: &[T], job: F, mut on_done: C)
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync,
        C: FnMut(usize, R),
    {
        let workers = self.workers_for(items.len());
        if workers == 0 {
            return;
        }

        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<(usize, R)>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                let job = &job;
                scope.spawn(move || loop {
                    let idx = next.fetch_add(1, Ordering::Relaxed);
                    let Some(item) = items.get(idx) else {
                        break;
                    };
                    if tx.send((idx, job(item))).is_err() {
                        break;
                    }
                });
            }
            // Only worker senders remain, so the receiver ends when they do.
            drop(tx);
            for (idx, output) in rx {
                on_done(idx, output);
            }
        });
    }
}
