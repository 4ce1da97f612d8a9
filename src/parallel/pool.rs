//! Rayon thread pool for voyage trials.
//!
//! A [WorkerPool] with a worker count owns a dedicated pool built once and
//! reused by every [WorkerPool::install]; without one, trials run on Rayon's
//! global pool (all CPU cores).

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    pool: Option<Arc<ThreadPool>>,
}

impl WorkerPool {
    /// Use all available CPU cores (Rayon default).
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads; 0 means the global pool. Falls back to
    /// the global pool if the dedicated one cannot be built.
    pub fn with_workers(n: usize) -> Self {
        if n == 0 {
            return Self::default();
        }
        match ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => Self {
                pool: Some(Arc::new(pool)),
            },
            Err(err) => {
                tracing::warn!(workers = n, error = %err, "thread pool build failed; using global pool");
                Self::default()
            }
        }
    }

    /// Threads that [WorkerPool::install] runs on.
    pub fn workers(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, |pool| pool.current_num_threads())
    }

    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_runs_on_requested_worker_count() {
        let pool = WorkerPool::with_workers(2);
        assert_eq!(pool.workers(), 2);
        assert_eq!(pool.install(rayon::current_num_threads), 2);
        // reused, not rebuilt
        assert_eq!(pool.clone().install(rayon::current_num_threads), 2);
    }

    #[test]
    fn zero_workers_runs_inline() {
        let pool = WorkerPool::with_workers(0);
        assert_eq!(pool.install(|| 7), 7);
        assert_eq!(pool.workers(), rayon::current_num_threads());
    }
}
