pub mod lineup;
pub mod ranking;
pub mod rebalance;
pub mod strategy;

pub use lineup::{weighted_score, Lineup, Seat, SeatAssignment, SEAT_COUNT};
pub use ranking::{rank_lineups, LineupSummary, StrategyComparison, UnsatisfiedStrategy};
pub use rebalance::{overskill_advice, rebalance_skills, Objective, Rebalance, RebalanceOptions};
pub use strategy::{assign_seats, Strategy, FILL_ORDER};

use crate::data::{Roster, SkillCategory};
use crate::error::VoyageError;
use crate::parallel::{CancellationToken, WorkerPool};
use crate::voyage::{
    ExtendAggregator, SimulationConfig, VoyageEstimate, DEFAULT_EXTENDS, DEFAULT_SIMS,
    DEFAULT_START_POOL,
};

/// Progress batches for [optimize_scenario_with_progress].
const OPTIMIZE_PROGRESS_BATCH_COUNT: usize = 40;

#[derive(Debug, Clone)]
pub struct OptimizationScenario {
    pub primary: SkillCategory,
    pub secondary: SkillCategory,
    pub start_pool: u32,
    pub strategy: Strategy,
    pub extends: usize,
    pub sims: usize,
    pub seed: u64,
    /// Worker threads for the trials; None uses every core.
    pub workers: Option<usize>,
}

impl Default for OptimizationScenario {
    fn default() -> Self {
        Self {
            primary: SkillCategory::Command,
            secondary: SkillCategory::Science,
            start_pool: DEFAULT_START_POOL,
            strategy: Strategy::VoyTotalWeighted,
            extends: DEFAULT_EXTENDS,
            sims: DEFAULT_SIMS,
            seed: 0,
            workers: None,
        }
    }
}

impl OptimizationScenario {
    pub fn new(primary: SkillCategory, secondary: SkillCategory, start_pool: u32) -> Self {
        Self {
            primary,
            secondary,
            start_pool,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    fn worker_pool(&self) -> WorkerPool {
        self.workers
            .map_or_else(WorkerPool::default_workers, WorkerPool::with_workers)
    }

    fn simulation_config(&self, lineup: &Lineup<'_>) -> SimulationConfig {
        SimulationConfig::new(self.primary, self.secondary, lineup.skill_totals(), self.start_pool)
            .with_extends(self.extends)
            .with_sims(self.sims)
            .with_seed(self.seed)
    }
}

/// A lineup together with its simulated voyage.
#[derive(Debug, Clone)]
pub struct OptimizedLineup<'r> {
    pub strategy: Strategy,
    pub lineup: Lineup<'r>,
    pub estimate: VoyageEstimate,
}

impl OptimizedLineup<'_> {
    pub fn summary(&self, primary: SkillCategory, secondary: SkillCategory) -> LineupSummary {
        LineupSummary {
            strategy: self.strategy,
            seats: self.lineup.report(),
            skill_totals: self.lineup.skill_totals(),
            voyage_score: self.lineup.voyage_score(primary, secondary),
            estimate: self.estimate.clone(),
        }
    }
}

/// Assigns seats with the scenario's strategy and simulates the resulting lineup.
pub fn optimize_scenario<'r>(
    roster: &'r Roster,
    scenario: &OptimizationScenario,
) -> Result<OptimizedLineup<'r>, VoyageError> {
    optimize_scenario_with_progress(roster, scenario, &CancellationToken::new(), |_, _| {})
}

/// Like [optimize_scenario] but runs trials in batches, calling
/// `on_progress(done, total)` after each, and stops at the next batch
/// once `cancel` is set.
pub fn optimize_scenario_with_progress<'r, F>(
    roster: &'r Roster,
    scenario: &OptimizationScenario,
    cancel: &CancellationToken,
    on_progress: F,
) -> Result<OptimizedLineup<'r>, VoyageError>
where
    F: FnMut(usize, usize),
{
    tracing::info!(
        "optimizing {}/{}/{} voyage with {} crew using {} strategy",
        scenario.primary,
        scenario.secondary,
        scenario.start_pool,
        roster.len(),
        scenario.strategy
    );

    let lineup = assign_seats(roster, scenario.strategy, scenario.primary, scenario.secondary)?;
    let aggregator = ExtendAggregator::new(scenario.simulation_config(&lineup))?;
    let batches = OPTIMIZE_PROGRESS_BATCH_COUNT.min(scenario.sims.max(1));
    let estimate =
        aggregator.run_with_progress(&scenario.worker_pool(), cancel, batches, on_progress)?;

    tracing::info!(
        strategy = %scenario.strategy,
        median_hours = estimate.median_hours(),
        "strategy finished"
    );
    Ok(OptimizedLineup {
        strategy: scenario.strategy,
        lineup,
        estimate,
    })
}

/// Runs every strategy on the same roster and ranks the ones that could
/// seat a full lineup. Strategies short of eligible crew are reported
/// alongside instead of failing the comparison.
pub fn compare_strategies(
    roster: &Roster,
    scenario: &OptimizationScenario,
) -> Result<StrategyComparison, VoyageError> {
    let mut summaries = Vec::with_capacity(Strategy::ALL.len());
    let mut unsatisfiable = Vec::new();

    for strategy in Strategy::ALL {
        let run = scenario.clone().with_strategy(strategy);
        match optimize_scenario(roster, &run) {
            Ok(optimized) => summaries.push(optimized.summary(run.primary, run.secondary)),
            Err(err @ VoyageError::UnsatisfiableAssignment { .. }) => {
                tracing::info!(%strategy, "strategy skipped: {err}");
                unsatisfiable.push(UnsatisfiedStrategy {
                    strategy,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(StrategyComparison {
        ranked: rank_lineups(summaries),
        unsatisfiable,
    })
}
