//! Runtime settings read from the environment.
//!
//! `VOYAGER_WORKERS` sets the trial thread count (0 = all cores),
//! `VOYAGER_SIMS` the default trial count and `VOYAGER_SEED` the base seed.

use std::str::FromStr;

use crate::parallel::WorkerPool;
use crate::voyage::{DEFAULT_SIMS, MIN_SIMS};

pub const WORKERS_VAR: &str = "VOYAGER_WORKERS";
pub const SIMS_VAR: &str = "VOYAGER_SIMS";
pub const SEED_VAR: &str = "VOYAGER_SEED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub workers: usize,
    pub sims: usize,
    pub seed: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            sims: DEFAULT_SIMS,
            seed: 0,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads each setting through `lookup`; unparsable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let sims = read_var(&lookup, SIMS_VAR, defaults.sims);
        let sims = if sims < MIN_SIMS {
            tracing::warn!(sims, min = MIN_SIMS, "{SIMS_VAR} below minimum, using {}", defaults.sims);
            defaults.sims
        } else {
            sims
        };
        Self {
            workers: read_var(&lookup, WORKERS_VAR, defaults.workers),
            sims,
            seed: read_var(&lookup, SEED_VAR, defaults.seed),
        }
    }

    pub fn worker_pool(&self) -> WorkerPool {
        WorkerPool::with_workers(self.workers)
    }
}

fn read_var<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = lookup(name) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!("invalid {name} '{raw}', defaulting to {default}");
        default
    })
}
