//! Single stochastic voyage trial over 20-second ticks.
//!
//! Every tick either drains the pool by one activity, resolves a hazard
//! against one of the six lineup skills, or does nothing (reward and
//! checkpoint ticks). When the pool runs dry the failure time is recorded,
//! the pool is refilled and the voyage continues until the extension limit
//! or the long-voyage cutoff is reached.

use serde::Serialize;

use crate::data::SKILL_COUNT;
use crate::voyage::config::SimulationConfig;
use crate::voyage::rng::Rng;

pub const TICKS_PER_HOUR: u32 = 180;
pub const HOURS_PER_CHECKPOINT: u32 = 2;
pub const TICKS_PER_CHECKPOINT: u32 = HOURS_PER_CHECKPOINT * TICKS_PER_HOUR;
pub const HAZARD_TICK: u32 = 4;
pub const REWARD_TICK: u32 = 7;
pub const HAZARD_AS_REWARD_TICK: u32 = 28;
pub const HAZARD_SKILL_PER_HOUR: u32 = 1260;
pub const HAZARD_POOL_PASS: i64 = 5;
pub const HAZARD_POOL_FAIL: i64 = 30;
pub const ACTIVITY_POOL_COST: i64 = 1;
pub const SKILL_VARIANCE: f64 = 0.20;
/// Draw weights of (primary, secondary, each other skill), in percent.
pub const PRIMARY_PERCENT: u32 = 35;
pub const SECONDARY_PERCENT: u32 = 25;
pub const OTHER_PERCENT: u32 = 10;
pub const REFILL_MINUTES_PER_UNIT: u32 = 5;
pub const LONG_VOYAGE_HOURS: f64 = 20.0;
/// Safety ceiling; trials still running here are non-convergent.
pub const MAX_TICKS: u32 = 10_000;
pub const MAX_EXTENDS: usize = 100;

const HAZARD_SKILL_PER_TICK: f64 = HAZARD_SKILL_PER_HOUR as f64 / TICKS_PER_HOUR as f64;
const PRIMARY_CHANCE: f64 = PRIMARY_PERCENT as f64 / 100.0;
const SECONDARY_CHANCE: f64 = SECONDARY_PERCENT as f64 / 100.0;

/// Refill cost for a voyage that failed after `hours`.
pub fn refill_cost(hours: f64) -> u32 {
    (hours * 60.0 / f64::from(REFILL_MINUTES_PER_UNIT)).ceil() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LongVoyage {
    /// Cumulative refill cost charged by the time the voyage passed the cutoff.
    pub refill_cost: u32,
    pub refills: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoyageTrial {
    /// Hours at each pool exhaustion; index is the extension number.
    pub failures: Vec<f64>,
    /// Refill cost charged after each failure.
    pub refill_costs: Vec<u32>,
    pub long_voyage: Option<LongVoyage>,
    pub ticks: u32,
}

impl VoyageTrial {
    pub fn refill_cost_total(&self) -> u32 {
        self.refill_costs.iter().sum()
    }

    /// Refill cost paid before extension `index` started.
    pub fn cost_to_reach(&self, index: usize) -> u32 {
        self.refill_costs.iter().take(index).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    Completed(VoyageTrial),
    /// Hit [MAX_TICKS] before finishing; carries the partial trial.
    NonConvergent(VoyageTrial),
}

impl TrialOutcome {
    pub fn trial(&self) -> &VoyageTrial {
        match self {
            Self::Completed(trial) | Self::NonConvergent(trial) => trial,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoyageSimulator {
    /// (primary, secondary, other four).
    skills: [u32; SKILL_COUNT],
    start_pool: u32,
    initial_pool: u32,
    start_tick: u32,
}

impl VoyageSimulator {
    pub fn new(skills: [u32; SKILL_COUNT], start_pool: u32) -> Self {
        Self {
            skills,
            start_pool,
            initial_pool: start_pool,
            start_tick: 0,
        }
    }

    /// Expects a config that already passed [SimulationConfig::validate].
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            skills: config.ordered_skills(),
            start_pool: config.start_pool,
            initial_pool: config.current_pool.unwrap_or(config.start_pool),
            start_tick: (config.elapsed_hours * f64::from(TICKS_PER_HOUR)).floor() as u32,
        }
    }

    pub fn with_elapsed_hours(mut self, hours: f64) -> Self {
        self.start_tick = (hours.max(0.0) * f64::from(TICKS_PER_HOUR)).floor() as u32;
        self
    }

    pub fn with_current_pool(mut self, pool: u32) -> Self {
        self.initial_pool = pool;
        self
    }

    /// Runs one voyage, refilling up to `extend_limit` times.
    pub fn run_trial(&self, rng: &mut Rng, extend_limit: usize) -> TrialOutcome {
        let mut trial = VoyageTrial::default();
        let mut tick = self.start_tick;
        let mut pool = i64::from(self.initial_pool);

        loop {
            tick += 1;
            if tick >= MAX_TICKS {
                trial.ticks = tick;
                return TrialOutcome::NonConvergent(trial);
            }

            pool += self.tick_delta(tick, rng);
            if pool > 0 {
                continue;
            }

            let hours = f64::from(tick) / f64::from(TICKS_PER_HOUR);
            trial.failures.push(hours);
            trial.refill_costs.push(refill_cost(hours));

            if hours > LONG_VOYAGE_HOURS {
                trial.long_voyage = Some(LongVoyage {
                    refill_cost: trial.refill_cost_total(),
                    refills: trial.failures.len() as u32,
                });
                break;
            }
            if trial.failures.len() > extend_limit {
                break;
            }
            pool = i64::from(self.start_pool);
        }

        trial.ticks = tick;
        TrialOutcome::Completed(trial)
    }

    fn tick_delta(&self, tick: u32, rng: &mut Rng) -> i64 {
        if tick % TICKS_PER_CHECKPOINT == 0 {
            // dilemma tick
            0
        } else if tick % HAZARD_TICK == 0 && tick % HAZARD_AS_REWARD_TICK != 0 {
            self.resolve_hazard(tick, rng)
        } else if tick % REWARD_TICK != 0 && tick % HAZARD_AS_REWARD_TICK != 0 {
            -ACTIVITY_POOL_COST
        } else {
            0
        }
    }

    fn resolve_hazard(&self, tick: u32, rng: &mut Rng) -> i64 {
        let skill = f64::from(self.pick_skill(rng));
        let difficulty = f64::from(tick) * HAZARD_SKILL_PER_TICK;
        let variance = SKILL_VARIANCE * skill;
        let low = skill - variance;
        let high = skill + variance;

        let passed = if difficulty < low {
            true
        } else if difficulty >= high {
            false
        } else {
            let roll = rng.range(low as u64, high as u64);
            roll as f64 >= difficulty
        };

        if passed {
            HAZARD_POOL_PASS
        } else {
            -HAZARD_POOL_FAIL
        }
    }

    fn pick_skill(&self, rng: &mut Rng) -> u32 {
        let roll = rng.next_f64();
        if roll < PRIMARY_CHANCE {
            self.skills[0]
        } else if roll < PRIMARY_CHANCE + SECONDARY_CHANCE {
            self.skills[1]
        } else {
            self.skills[2 + rng.below(4) as usize]
        }
    }
}
