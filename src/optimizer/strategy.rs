//! Seat assignment heuristics.
//!
//! Every strategy ranks the roster by a per-crew score (stable, so ties keep
//! roster order) and fills each category's two seats from the top of that
//! ranking, walking categories in [FILL_ORDER]. SkillMax ranks per category
//! and does not exclude crew already seated elsewhere; a crew member topping
//! several categories is moved by [Lineup::assign] and earlier seats can end
//! up empty. The other strategies only consider unseated crew with a positive
//! skill in the category.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::data::{CrewRecord, Roster, SkillCategory, SKILL_COUNT};
use crate::error::VoyageError;
use crate::optimizer::lineup::{weighted_score, Lineup, Seat};
use crate::voyage::simulator::{OTHER_PERCENT, PRIMARY_PERCENT, SECONDARY_PERCENT};

/// Category order in which every strategy fills seats. Earlier categories get
/// first pick of the ranking.
pub const FILL_ORDER: [SkillCategory; SKILL_COUNT] = [
    SkillCategory::Science,
    SkillCategory::Engineering,
    SkillCategory::Command,
    SkillCategory::Medicine,
    SkillCategory::Diplomacy,
    SkillCategory::Security,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Strategy {
    /// Top two crew by raw skill in each category.
    #[serde(rename = "skillmax")]
    SkillMax,
    /// Ranked by the raw sum of all six skills.
    #[serde(rename = "voytotal")]
    VoyTotal,
    /// Ranked by the sum with primary and secondary weighted by draw odds.
    #[serde(rename = "voytotal_w")]
    VoyTotalWeighted,
    /// Ranked by weighted primary plus secondary only; other seats filled first.
    #[serde(rename = "prisec")]
    PriSec,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Self::SkillMax,
        Self::VoyTotalWeighted,
        Self::VoyTotal,
        Self::PriSec,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SkillMax => "skillmax",
            Self::VoyTotal => "voytotal",
            Self::VoyTotalWeighted => "voytotal_w",
            Self::PriSec => "prisec",
        }
    }

    /// Whether a crew member may hold only one seat across categories.
    pub const fn is_exclusive(self) -> bool {
        !matches!(self, Self::SkillMax)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "skillmax" | "skill_max" => Ok(Self::SkillMax),
            "voytotal" | "voy_total" => Ok(Self::VoyTotal),
            "voytotal_w" | "voytotal_weighted" | "weighted" => Ok(Self::VoyTotalWeighted),
            "prisec" | "pri_sec" => Ok(Self::PriSec),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

/// Builds a lineup for `strategy`. Fails with `UnsatisfiableAssignment`
/// instead of leaving a category short.
pub fn assign_seats(
    roster: &Roster,
    strategy: Strategy,
    primary: SkillCategory,
    secondary: SkillCategory,
) -> Result<Lineup<'_>, VoyageError> {
    if primary == secondary {
        return Err(VoyageError::invalid(format!(
            "primary and secondary skill are both {primary}"
        )));
    }

    let mut lineup = Lineup::new(roster);
    match strategy {
        Strategy::SkillMax => {
            for skill in FILL_ORDER {
                let ranked = rank_by(roster, |crew| u64::from(crew.skills[skill]));
                seat_top_two(&mut lineup, skill, &ranked)?;
            }
        }
        Strategy::VoyTotal | Strategy::VoyTotalWeighted => {
            let ranked = if strategy == Strategy::VoyTotal {
                rank_by(roster, |crew| crew.skills.sum())
            } else {
                rank_by(roster, |crew| weighted_score(&crew.skills, primary, secondary))
            };
            for skill in FILL_ORDER {
                fill_category(&mut lineup, skill, &ranked)?;
            }
        }
        Strategy::PriSec => {
            let ranked = rank_by(roster, |crew| prisec_score(crew, primary, secondary));
            let others = FILL_ORDER
                .into_iter()
                .filter(|&skill| skill != primary && skill != secondary);
            for skill in others.chain([secondary, primary]) {
                fill_category(&mut lineup, skill, &ranked)?;
            }
        }
    }
    Ok(lineup)
}

fn prisec_score(crew: &CrewRecord, primary: SkillCategory, secondary: SkillCategory) -> u64 {
    let weighted = u64::from(crew.skills[primary]) * u64::from(PRIMARY_PERCENT)
        + u64::from(crew.skills[secondary]) * u64::from(SECONDARY_PERCENT);
    weighted / u64::from(OTHER_PERCENT)
}

/// Roster sorted by descending score; ties keep roster order.
fn rank_by<F>(roster: &Roster, score: F) -> Vec<&CrewRecord>
where
    F: Fn(&CrewRecord) -> u64,
{
    let mut ranked: Vec<&CrewRecord> = roster.iter().collect();
    ranked.sort_by_key(|crew| Reverse(score(crew)));
    ranked
}

fn seat_top_two(
    lineup: &mut Lineup<'_>,
    skill: SkillCategory,
    candidates: &[&CrewRecord],
) -> Result<(), VoyageError> {
    let [first, second, ..] = candidates else {
        return Err(VoyageError::UnsatisfiableAssignment {
            category: skill,
            eligible: candidates.len(),
        });
    };
    let [senior, junior] = Seat::for_skill(skill);
    lineup.assign(senior, first.id)?;
    lineup.assign(junior, second.id)
}

fn fill_category(
    lineup: &mut Lineup<'_>,
    skill: SkillCategory,
    ranked: &[&CrewRecord],
) -> Result<(), VoyageError> {
    let eligible: Vec<&CrewRecord> = ranked
        .iter()
        .copied()
        .filter(|crew| crew.skills[skill] > 0 && !lineup.is_assigned(crew.id))
        .collect();
    seat_top_two(lineup, skill, &eligible)
}
