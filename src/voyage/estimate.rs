//! Closed-form duration estimate. Cheap enough for hill-climbing over skill
//! distributions where running the Monte Carlo for each step is not.

use serde::Serialize;

use crate::data::SKILL_COUNT;
use crate::error::VoyageError;
use crate::voyage::simulator::{
    HAZARD_SKILL_PER_HOUR, OTHER_PERCENT, PRIMARY_PERCENT, SECONDARY_PERCENT, SKILL_VARIANCE,
};

/// Fraction of the proficiency band a roll lands above, for the average,
/// 90% and 99% estimates.
const AVERAGE_LUCK: f64 = 0.5;
const SAFE_LUCK: f64 = 0.1;
const SAFER_LUCK: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuickEstimate {
    pub result: f64,
    pub safe_result: f64,
    pub safer_result: f64,
}

/// `skills` ordered as (primary, secondary, other four).
pub fn quick_estimate(skills: [u32; SKILL_COUNT], start_pool: u32) -> Result<QuickEstimate, VoyageError> {
    if skills.contains(&0) || start_pool == 0 {
        return Err(VoyageError::invalid("skill totals and starting pool must be positive"));
    }
    Ok(quick_estimate_unchecked(skills, start_pool))
}

pub(crate) fn quick_estimate_unchecked(skills: [u32; SKILL_COUNT], start_pool: u32) -> QuickEstimate {
    let at_luck = |luck: f64| {
        let proficiency = 1.0 + SKILL_VARIANCE * luck;
        let skill_hours: f64 = skills
            .iter()
            .zip(chances())
            .map(|(&skill, chance)| f64::from(skill) * proficiency / f64::from(HAZARD_SKILL_PER_HOUR) * chance)
            .sum();
        skill_hours + f64::from(start_pool) / f64::from(HAZARD_SKILL_PER_HOUR)
    };
    QuickEstimate {
        result: at_luck(AVERAGE_LUCK),
        safe_result: at_luck(SAFE_LUCK),
        safer_result: at_luck(SAFER_LUCK),
    }
}

fn chances() -> [f64; SKILL_COUNT] {
    let other = f64::from(OTHER_PERCENT) / 100.0;
    [
        f64::from(PRIMARY_PERCENT) / 100.0,
        f64::from(SECONDARY_PERCENT) / 100.0,
        other,
        other,
        other,
        other,
    ]
}
