use serde::Serialize;

use crate::data::{SkillCategory, SkillTotals, SKILL_COUNT};
use crate::error::VoyageError;
use crate::voyage::simulator::{MAX_EXTENDS, MAX_TICKS, TICKS_PER_HOUR};

pub const DEFAULT_EXTENDS: usize = 2;
pub const DEFAULT_SIMS: usize = 5000;
pub const MIN_SIMS: usize = 100;
pub const DEFAULT_START_POOL: u32 = 2700;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationConfig {
    pub primary: SkillCategory,
    pub secondary: SkillCategory,
    pub skills: SkillTotals,
    /// Pool restored on every refill.
    pub start_pool: u32,
    /// Pool remaining on a voyage already under way; the first leg starts
    /// from here instead of `start_pool`.
    pub current_pool: Option<u32>,
    pub elapsed_hours: f64,
    pub extends: usize,
    pub sims: usize,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            primary: SkillCategory::Command,
            secondary: SkillCategory::Science,
            skills: SkillTotals::default(),
            start_pool: DEFAULT_START_POOL,
            current_pool: None,
            elapsed_hours: 0.0,
            extends: DEFAULT_EXTENDS,
            sims: DEFAULT_SIMS,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    pub fn new(
        primary: SkillCategory,
        secondary: SkillCategory,
        skills: SkillTotals,
        start_pool: u32,
    ) -> Self {
        Self {
            primary,
            secondary,
            skills,
            start_pool,
            ..Self::default()
        }
    }

    /// Builds a config from totals already ordered as
    /// (primary, secondary, other four in category order).
    pub fn from_ordered(
        primary: SkillCategory,
        secondary: SkillCategory,
        ordered: [u32; SKILL_COUNT],
        start_pool: u32,
    ) -> Self {
        let others = SkillCategory::ALL
            .into_iter()
            .filter(|&skill| skill != primary && skill != secondary);
        let pairs = [(primary, ordered[0]), (secondary, ordered[1])]
            .into_iter()
            .chain(others.zip(ordered[2..].iter().copied()));
        Self::new(primary, secondary, SkillTotals::from_pairs(pairs), start_pool)
    }

    pub fn with_extends(mut self, extends: usize) -> Self {
        self.extends = extends;
        self
    }

    pub fn with_sims(mut self, sims: usize) -> Self {
        self.sims = sims;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_elapsed_hours(mut self, hours: f64) -> Self {
        self.elapsed_hours = hours;
        self
    }

    pub fn with_current_pool(mut self, pool: u32) -> Self {
        self.current_pool = Some(pool);
        self
    }

    pub fn ordered_skills(&self) -> [u32; SKILL_COUNT] {
        self.skills.ordered_for(self.primary, self.secondary)
    }

    /// Rejects anything the simulator cannot run; nothing is clamped.
    pub fn validate(&self) -> Result<(), VoyageError> {
        if self.primary == self.secondary {
            return Err(VoyageError::invalid(format!(
                "primary and secondary skill are both {}",
                self.primary
            )));
        }
        if let Some((skill, _)) = self.skills.iter().find(|&(_, value)| value == 0) {
            return Err(VoyageError::invalid(format!("{skill} skill total is zero")));
        }
        if self.start_pool == 0 {
            return Err(VoyageError::invalid("starting pool must be positive"));
        }
        if self.current_pool == Some(0) {
            return Err(VoyageError::invalid("current pool must be positive when set"));
        }
        if self.sims < MIN_SIMS {
            return Err(VoyageError::invalid(format!(
                "trial count {} is below the minimum of {MIN_SIMS}",
                self.sims
            )));
        }
        if self.extends > MAX_EXTENDS {
            return Err(VoyageError::invalid(format!(
                "{} extensions exceeds the limit of {MAX_EXTENDS}",
                self.extends
            )));
        }
        if !self.elapsed_hours.is_finite() || self.elapsed_hours < 0.0 {
            return Err(VoyageError::invalid("elapsed hours must be a non-negative number"));
        }
        if self.elapsed_hours * TICKS_PER_HOUR as f64 >= MAX_TICKS as f64 {
            return Err(VoyageError::invalid(format!(
                "elapsed hours {} is past the simulation horizon",
                self.elapsed_hours
            )));
        }
        Ok(())
    }
}
