//! The six voyage skills and fixed-size per-skill totals.

use std::fmt;
use std::ops::{Index, IndexMut, SubAssign};
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub const SKILL_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Command,
    Diplomacy,
    Security,
    Engineering,
    Science,
    Medicine,
}

impl SkillCategory {
    /// Canonical order; matches [SkillTotals] indices.
    pub const ALL: [SkillCategory; SKILL_COUNT] = [
        Self::Command,
        Self::Diplomacy,
        Self::Security,
        Self::Engineering,
        Self::Science,
        Self::Medicine,
    ];

    pub const fn index(self) -> usize {
        match self {
            Self::Command => 0,
            Self::Diplomacy => 1,
            Self::Security => 2,
            Self::Engineering => 3,
            Self::Science => 4,
            Self::Medicine => 5,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Command => "cmd",
            Self::Diplomacy => "dip",
            Self::Security => "sec",
            Self::Engineering => "eng",
            Self::Science => "sci",
            Self::Medicine => "med",
        }
    }

    /// Key used for this skill in game snapshot crew records.
    pub const fn snapshot_key(self) -> &'static str {
        match self {
            Self::Command => "command_skill",
            Self::Diplomacy => "diplomacy_skill",
            Self::Security => "security_skill",
            Self::Engineering => "engineering_skill",
            Self::Science => "science_skill",
            Self::Medicine => "medicine_skill",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Command => "command",
            Self::Diplomacy => "diplomacy",
            Self::Security => "security",
            Self::Engineering => "engineering",
            Self::Science => "science",
            Self::Medicine => "medicine",
        };
        f.write_str(name)
    }
}

impl Serialize for SkillCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSkillError(pub String);

impl fmt::Display for ParseSkillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown skill '{}'", self.0)
    }
}

impl std::error::Error for ParseSkillError {}

impl FromStr for SkillCategory {
    type Err = ParseSkillError;

    /// Accepts the full name, the three-letter code or the snapshot key.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        let key = lowered.strip_suffix("_skill").unwrap_or(&lowered);
        Self::ALL
            .into_iter()
            .find(|skill| key == skill.code() || key == skill.to_string())
            .ok_or_else(|| ParseSkillError(raw.to_string()))
    }
}

/// One non-negative total per skill category. All six are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SkillTotals([u32; SKILL_COUNT]);

impl SkillTotals {
    pub const fn new(values: [u32; SKILL_COUNT]) -> Self {
        Self(values)
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (SkillCategory, u32)>) -> Self {
        let mut totals = Self::default();
        for (skill, value) in pairs {
            totals[skill] = value;
        }
        totals
    }

    pub fn get(&self, skill: SkillCategory) -> u32 {
        self.0[skill.index()]
    }

    pub fn values(&self) -> [u32; SKILL_COUNT] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillCategory, u32)> + '_ {
        SkillCategory::ALL.into_iter().map(|skill| (skill, self.get(skill)))
    }

    pub fn sum(&self) -> u64 {
        self.0.iter().map(|&value| u64::from(value)).sum()
    }

    /// Per-category sum, or `None` if any category overflows.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let mut sum = *self;
        for (mine, &theirs) in sum.0.iter_mut().zip(&other.0) {
            *mine = mine.checked_add(theirs)?;
        }
        Some(sum)
    }

    pub fn max(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Skills ordered as (primary, secondary, other four in category order),
    /// the shape the simulator consumes.
    pub fn ordered_for(
        &self,
        primary: SkillCategory,
        secondary: SkillCategory,
    ) -> [u32; SKILL_COUNT] {
        let mut ordered = [self.get(primary), self.get(secondary), 0, 0, 0, 0];
        let others = SkillCategory::ALL
            .into_iter()
            .filter(|&skill| skill != primary && skill != secondary);
        for (slot, skill) in ordered.iter_mut().skip(2).zip(others) {
            *slot = self.get(skill);
        }
        ordered
    }
}

impl Index<SkillCategory> for SkillTotals {
    type Output = u32;

    fn index(&self, skill: SkillCategory) -> &u32 {
        &self.0[skill.index()]
    }
}

impl IndexMut<SkillCategory> for SkillTotals {
    fn index_mut(&mut self, skill: SkillCategory) -> &mut u32 {
        &mut self.0[skill.index()]
    }
}

impl SubAssign for SkillTotals {
    /// Panics in debug builds if a total would go negative; callers only
    /// subtract contributions they previously added.
    fn sub_assign(&mut self, other: Self) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0) {
            *mine -= theirs;
        }
    }
}

impl Serialize for SkillTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SKILL_COUNT))?;
        for (skill, value) in self.iter() {
            map.serialize_entry(skill.code(), &value)?;
        }
        map.end()
    }
}
