use anyhow::{anyhow, Context as _};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::Result;

/// A fixed number of worker threads consuming a queue of tasks.
///
/// At most `size` tasks run at the same time; the rest wait in the queue.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(anyhow!("Number of workers must be at least 1"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("cfgen-worker-{}", i))
            .build()
            .context("Could not build worker pool")?;
        Ok(Self { pool })
    }

    /// Runs `task` once for every item and blocks until all of them have finished.
    ///
    /// Results are returned in the order of `items`; completion order is unspecified.
    pub fn run_all<T, R, F>(&self, items: Vec<T>, task: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        self.pool
            .install(|| items.into_par_iter().map(task).collect())
    }
}
