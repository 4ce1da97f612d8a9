use std::ops::Range;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::VoyageError;
use crate::parallel::{batch_ranges, CancellationToken, WorkerPool};
use crate::voyage::config::SimulationConfig;
use crate::voyage::rng::Rng;
use crate::voyage::simulator::{TrialOutcome, VoyageSimulator, HOURS_PER_CHECKPOINT, MAX_EXTENDS};

/// Trials (from index 0) that keep refilling until the long-voyage cutoff.
pub const MAX_LONG_VOYAGE_SIMS: usize = 100;

/// Percentile summary for one extension level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendResult {
    pub extend: usize,
    /// Median survival time, hours.
    pub result: f64,
    /// Time reached by 90% of trials.
    pub safe_result: f64,
    /// Time reached by 99% of trials.
    pub safer_result: f64,
    /// Last checkpoint (hours) reported with `checkpoint_chance`.
    pub last_checkpoint: u32,
    /// Percent of trials reaching `last_checkpoint`.
    pub checkpoint_chance: u32,
    /// Average refill cost paid to start this extension; 0 for the first leg.
    pub refill_cost: u32,
    pub samples: usize,
}

impl ExtendResult {
    /// Reduces survival times for one extension level. `times` must be sorted ascending.
    pub fn from_sorted(extend: usize, times: &[f64], refill_cost: u32) -> Self {
        let n = times.len();
        if n == 0 {
            return Self {
                extend,
                result: 0.0,
                safe_result: 0.0,
                safer_result: 0.0,
                last_checkpoint: 0,
                checkpoint_chance: 0,
                refill_cost,
                samples: 0,
            };
        }

        let mut last_checkpoint = 0u32;
        let mut first_reaching = 0usize;
        for (index, &hours) in times.iter().enumerate() {
            let checkpoint = (hours / f64::from(HOURS_PER_CHECKPOINT)).floor() as u32;
            if checkpoint > last_checkpoint {
                last_checkpoint = checkpoint;
                first_reaching = index;
            }
        }
        let mut checkpoint_chance = (100.0 * (n - first_reaching) as f64 / n as f64).round() as u32;
        // A vanishing chance of the last checkpoint reads better as a sure previous one.
        if checkpoint_chance == 0 {
            last_checkpoint = last_checkpoint.saturating_sub(1);
            checkpoint_chance = 100;
        }

        Self {
            extend,
            result: times[n / 2],
            safe_result: times[n / 10],
            safer_result: times[n / 100],
            last_checkpoint: last_checkpoint * HOURS_PER_CHECKPOINT,
            checkpoint_chance,
            refill_cost,
            samples: n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoyageEstimate {
    pub extends: Vec<ExtendResult>,
    /// Average cumulative refill cost to pass the long-voyage cutoff.
    pub long_voyage_refill_cost: u32,
    pub long_voyage_refills: u32,
    pub trials: usize,
    pub non_convergent: usize,
}

impl VoyageEstimate {
    pub fn first_leg(&self) -> Option<&ExtendResult> {
        self.extends.first()
    }

    /// Median of the first leg; 0 if nothing converged.
    pub fn median_hours(&self) -> f64 {
        self.first_leg().map_or(0.0, |leg| leg.result)
    }
}

/// Runs independent voyage trials for one configuration and reduces them to
/// per-extension statistics.
#[derive(Debug, Clone)]
pub struct ExtendAggregator {
    config: SimulationConfig,
    simulator: VoyageSimulator,
}

impl ExtendAggregator {
    pub fn new(config: SimulationConfig) -> Result<Self, VoyageError> {
        config.validate()?;
        let simulator = VoyageSimulator::from_config(&config);
        Ok(Self { config, simulator })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Parallel run on the global Rayon pool, without cancellation.
    pub fn run(&self) -> VoyageEstimate {
        let outcomes: Vec<TrialOutcome> = (0..self.config.sims)
            .into_par_iter()
            .map(|index| self.simulate(index))
            .collect();
        self.reduce(&outcomes)
    }

    pub fn run_parallel(
        &self,
        pool: &WorkerPool,
        cancel: &CancellationToken,
    ) -> Result<VoyageEstimate, VoyageError> {
        let outcomes = pool.install(|| self.run_range_parallel(0..self.config.sims, cancel))?;
        Ok(self.reduce(&outcomes))
    }

    pub fn run_sequential(&self, cancel: &CancellationToken) -> Result<VoyageEstimate, VoyageError> {
        let outcomes = (0..self.config.sims)
            .map(|index| self.run_one(index, cancel))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.reduce(&outcomes))
    }

    /// Like [ExtendAggregator::run_parallel] but runs trials in `num_batches`
    /// batches and calls `on_progress(done, total)` after each.
    pub fn run_with_progress<F>(
        &self,
        pool: &WorkerPool,
        cancel: &CancellationToken,
        num_batches: usize,
        mut on_progress: F,
    ) -> Result<VoyageEstimate, VoyageError>
    where
        F: FnMut(usize, usize),
    {
        let total = self.config.sims;
        on_progress(0, total);
        let mut outcomes = Vec::with_capacity(total);
        for batch in batch_ranges(total, num_batches) {
            let done = batch.end;
            outcomes.extend(pool.install(|| self.run_range_parallel(batch, cancel))?);
            on_progress(done, total);
        }
        Ok(self.reduce(&outcomes))
    }

    fn run_range_parallel(
        &self,
        trials: Range<usize>,
        cancel: &CancellationToken,
    ) -> Result<Vec<TrialOutcome>, VoyageError> {
        trials
            .into_par_iter()
            .map(|index| self.run_one(index, cancel))
            .collect()
    }

    fn run_one(&self, index: usize, cancel: &CancellationToken) -> Result<TrialOutcome, VoyageError> {
        if cancel.is_cancelled() {
            return Err(VoyageError::Cancelled);
        }
        Ok(self.simulate(index))
    }

    fn simulate(&self, index: usize) -> TrialOutcome {
        let mut rng = Rng::for_trial(self.config.seed, index as u64);
        let limit = if index < MAX_LONG_VOYAGE_SIMS {
            MAX_EXTENDS
        } else {
            self.config.extends
        };
        self.simulator.run_trial(&mut rng, limit)
    }

    /// Reduces trial outcomes (in trial order) to the estimate.
    pub fn reduce(&self, outcomes: &[TrialOutcome]) -> VoyageEstimate {
        let levels = self.config.extends + 1;
        let mut times: Vec<Vec<f64>> = vec![Vec::with_capacity(outcomes.len()); levels];
        let mut refill_totals = vec![0u64; levels];
        let mut converged = 0usize;

        for outcome in outcomes {
            let TrialOutcome::Completed(trial) = outcome else {
                continue;
            };
            converged += 1;
            for (extend, &hours) in trial.failures.iter().take(levels).enumerate() {
                times[extend].push(hours);
                refill_totals[extend] += u64::from(trial.cost_to_reach(extend));
            }
        }

        let non_convergent = outcomes.len() - converged;
        if non_convergent > 0 {
            tracing::warn!(
                non_convergent,
                trials = outcomes.len(),
                "trials hit the tick ceiling; excluded from percentiles"
            );
        }

        let extends = times
            .iter_mut()
            .zip(&refill_totals)
            .enumerate()
            .map(|(extend, (level_times, &refill_total))| {
                level_times.sort_by(f64::total_cmp);
                let refill_cost = if extend == 0 || converged == 0 {
                    0
                } else {
                    div_ceil(refill_total, converged as u64)
                };
                ExtendResult::from_sorted(extend, level_times, refill_cost)
            })
            .collect();

        let long_sims = MAX_LONG_VOYAGE_SIMS.min(outcomes.len());
        let (long_cost, long_refills) = outcomes
            .iter()
            .take(long_sims)
            .filter_map(|outcome| outcome.trial().long_voyage)
            .fold((0u64, 0u64), |(cost, refills), long| {
                (cost + u64::from(long.refill_cost), refills + u64::from(long.refills))
            });
        let (long_voyage_refill_cost, long_voyage_refills) = if long_sims == 0 {
            (0, 0)
        } else {
            (
                div_ceil(long_cost, long_sims as u64),
                (long_refills as f64 / long_sims as f64).round() as u32,
            )
        };

        tracing::debug!(
            trials = outcomes.len(),
            converged,
            seed = self.config.seed,
            "voyage estimate reduced"
        );

        VoyageEstimate {
            extends,
            long_voyage_refill_cost,
            long_voyage_refills,
            trials: outcomes.len(),
            non_convergent,
        }
    }
}

fn div_ceil(total: u64, count: u64) -> u32 {
    total.div_ceil(count) as u32
}

/// Validates `config` and runs it on the global pool.
pub fn estimate_voyage(config: SimulationConfig) -> Result<VoyageEstimate, VoyageError> {
    Ok(ExtendAggregator::new(config)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SkillCategory;

    fn config(sims: usize) -> SimulationConfig {
        SimulationConfig::from_ordered(
            SkillCategory::Security,
            SkillCategory::Command,
            [13000, 12000, 6000, 5000, 4000, 4000],
            2700,
        )
        .with_sims(sims)
        .with_seed(7)
    }

    #[test]
    fn percentiles_index_into_sorted_times() {
        let times: Vec<f64> = (0..200).map(|i| f64::from(i) * 0.05).collect();
        let result = ExtendResult::from_sorted(0, &times, 0);
        assert_eq!(result.result, times[100]);
        assert_eq!(result.safe_result, times[20]);
        assert_eq!(result.safer_result, times[2]);
        assert_eq!(result.samples, 200);
    }

    #[test]
    fn checkpoint_chance_counts_trials_at_last_checkpoint() {
        // 3 of 4 trials pass 4h, first one only reaches 2h.
        let times = [3.0, 4.5, 5.0, 5.5];
        let result = ExtendResult::from_sorted(0, &times, 0);
        assert_eq!(result.last_checkpoint, 4);
        assert_eq!(result.checkpoint_chance, 75);
    }

    #[test]
    fn vanishing_checkpoint_chance_falls_back_to_previous() {
        let mut times = vec![5.0; 999];
        times.push(6.5);
        let result = ExtendResult::from_sorted(0, &times, 0);
        assert_eq!(result.last_checkpoint, 4);
        assert_eq!(result.checkpoint_chance, 100);
    }

    #[test]
    fn empty_level_reports_zero_samples() {
        let result = ExtendResult::from_sorted(2, &[], 40);
        assert_eq!(result.samples, 0);
        assert_eq!(result.refill_cost, 40);
        assert_eq!(result.checkpoint_chance, 0);
    }

    #[test]
    fn sequential_and_parallel_runs_agree() {
        let aggregator = ExtendAggregator::new(config(300)).expect("valid config");
        let cancel = CancellationToken::new();
        let sequential = aggregator.run_sequential(&cancel).expect("not cancelled");
        let parallel = aggregator
            .run_parallel(&WorkerPool::with_workers(3), &cancel)
            .expect("not cancelled");
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn progress_reports_every_batch() {
        let aggregator = ExtendAggregator::new(config(200)).expect("valid config");
        let mut seen = Vec::new();
        let estimate = aggregator
            .run_with_progress(&WorkerPool::default(), &CancellationToken::new(), 4, |done, total| {
                seen.push((done, total))
            })
            .expect("not cancelled");
        assert_eq!(seen, vec![(0, 200), (50, 200), (100, 200), (150, 200), (200, 200)]);
        assert_eq!(estimate, aggregator.run());
    }

    #[test]
    fn cancelled_token_stops_the_run() {
        let aggregator = ExtendAggregator::new(config(500)).expect("valid config");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = aggregator
            .run_parallel(&WorkerPool::default(), &cancel)
            .unwrap_err();
        assert!(matches!(err, VoyageError::Cancelled));
    }

    #[test]
    fn later_extensions_carry_refill_cost() {
        let estimate = ExtendAggregator::new(config(400)).expect("valid config").run();
        assert_eq!(estimate.extends.len(), 3);
        assert_eq!(estimate.extends[0].refill_cost, 0);
        assert!(estimate.extends[1].refill_cost > 0);
        assert!(estimate.extends[2].refill_cost > estimate.extends[1].refill_cost);
        assert!(estimate.extends[1].result > estimate.extends[0].result);
    }

    #[test]
    fn non_convergent_trials_are_counted_and_excluded() {
        let estimate = ExtendAggregator::new(config(100).with_current_pool(1_000_000))
            .expect("valid config")
            .run();
        assert_eq!(estimate.trials, 100);
        assert_eq!(estimate.non_convergent, 100);
        assert!(estimate.extends.iter().all(|leg| leg.samples == 0));
    }
}
