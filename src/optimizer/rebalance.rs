//! Skill distribution advice: hill-climbing over pairwise skill transfers,
//! and a check for skills too high to ever be tested before the pool runs out.

use serde::Serialize;

use crate::data::{SkillTotals, SKILL_COUNT};
use crate::error::VoyageError;
use crate::voyage::estimate::quick_estimate_unchecked;
use crate::voyage::simulator::HAZARD_SKILL_PER_HOUR;
use crate::voyage::{ExtendAggregator, SimulationConfig};

pub const DEFAULT_INCREMENT: u32 = 1000;
pub const DEFAULT_MAX_ROUNDS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Objective {
    /// Closed-form average estimate.
    Quick,
    /// Monte Carlo median of the first leg with a fixed seed, so every
    /// candidate sees the same random streams.
    Simulated { sims: usize, seed: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebalanceOptions {
    pub increment: u32,
    pub max_rounds: usize,
    pub objective: Objective,
}

impl Default for RebalanceOptions {
    fn default() -> Self {
        Self {
            increment: DEFAULT_INCREMENT,
            max_rounds: DEFAULT_MAX_ROUNDS,
            objective: Objective::Quick,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rebalance {
    pub original: SkillTotals,
    pub suggested: SkillTotals,
    pub original_hours: f64,
    pub suggested_hours: f64,
    pub transfers: usize,
}

impl Rebalance {
    /// Hours gained by the suggested distribution under the chosen objective.
    pub fn gain(&self) -> f64 {
        self.suggested_hours - self.original_hours
    }
}

/// Moves `increment` skill points between pairs of categories while the
/// objective improves. Total skill is preserved and no category drops to zero.
pub fn rebalance_skills(
    config: &SimulationConfig,
    options: &RebalanceOptions,
) -> Result<Rebalance, VoyageError> {
    config.validate()?;
    if options.increment == 0 {
        return Err(VoyageError::invalid("rebalance increment must be positive"));
    }

    let evaluate = |skills: [u32; SKILL_COUNT]| -> Result<f64, VoyageError> {
        match options.objective {
            Objective::Quick => Ok(quick_estimate_unchecked(skills, config.start_pool).result),
            Objective::Simulated { sims, seed } => {
                let candidate = SimulationConfig::from_ordered(
                    config.primary,
                    config.secondary,
                    skills,
                    config.start_pool,
                )
                .with_extends(0)
                .with_sims(sims)
                .with_seed(seed);
                Ok(ExtendAggregator::new(candidate)?.run().median_hours())
            }
        }
    };

    let original = config.ordered_skills();
    let original_hours = evaluate(original)?;
    let mut skills = original;
    let mut best = original_hours;
    let mut transfers = 0;

    for _ in 0..options.max_rounds {
        let mut improved = false;
        'pairs: for to in 0..SKILL_COUNT {
            for from in 0..SKILL_COUNT {
                if to == from || skills[from] <= options.increment {
                    continue;
                }
                let Some(raised) = skills[to].checked_add(options.increment) else {
                    continue;
                };
                let mut candidate = skills;
                candidate[from] -= options.increment;
                candidate[to] = raised;
                let hours = evaluate(candidate)?;
                if hours > best {
                    skills = candidate;
                    best = hours;
                    transfers += 1;
                    improved = true;
                    break 'pairs;
                }
            }
        }
        if !improved {
            break;
        }
    }

    tracing::debug!(transfers, original_hours, suggested_hours = best, "skill rebalance finished");

    let totals = |ordered| {
        SimulationConfig::from_ordered(config.primary, config.secondary, ordered, config.start_pool).skills
    };
    Ok(Rebalance {
        original: totals(original),
        suggested: totals(skills),
        original_hours,
        suggested_hours: best,
        transfers,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverskillAdvice {
    /// Points of the highest skill beyond what hazards reach by the median failure.
    pub excess: u32,
    /// Distribution (primary, secondary, others) matched to the median.
    pub suggested: [u32; SKILL_COUNT],
}

/// Hazard difficulty grows by [HAZARD_SKILL_PER_HOUR] each hour; skill above
/// what the voyage reaches by its median failure is never exercised.
pub fn overskill_advice(skills: [u32; SKILL_COUNT], median_hours: f64) -> Option<OverskillAdvice> {
    let max_skill = skills.iter().copied().max()?;
    let reached = (median_hours * f64::from(HAZARD_SKILL_PER_HOUR)).floor() as u32;
    if max_skill <= reached {
        return None;
    }
    let quarter = reached / 4;
    Some(OverskillAdvice {
        excess: max_skill - reached,
        suggested: [reached, reached, quarter, quarter, quarter, quarter],
    })
}
