use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::data::skills::{SkillCategory, SkillTotals};
use crate::error::VoyageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrewId(pub u64);

impl fmt::Display for CrewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewRecord {
    pub id: CrewId,
    pub name: String,
    pub skills: SkillTotals,
}

impl CrewRecord {
    pub fn new(id: u64, name: impl Into<String>, skills: SkillTotals) -> Self {
        Self {
            id: CrewId(id),
            name: name.into(),
            skills,
        }
    }
}

/// Core value plus proficiency range, as stored in game snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SkillRoll {
    pub core: u32,
    #[serde(default)]
    pub range_min: u32,
    #[serde(default)]
    pub range_max: u32,
}

impl SkillRoll {
    /// Expected voyage contribution: core plus the midpoint of the proficiency
    /// range, or `None` if it does not fit a skill total.
    pub fn voyage_value(self) -> Option<u32> {
        let midpoint = (u64::from(self.range_min) + u64::from(self.range_max)) / 2;
        u32::try_from(u64::from(self.core) + midpoint).ok()
    }
}

/// Ordered, read-only crew roster with an id index.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    crew: Vec<CrewRecord>,
    by_id: HashMap<CrewId, usize>,
}

impl Roster {
    /// Builds a roster, keeping the first record for any duplicated id.
    pub fn new(records: impl IntoIterator<Item = CrewRecord>) -> Self {
        let mut roster = Self::default();
        for record in records {
            if roster.by_id.contains_key(&record.id) {
                tracing::warn!(crew_id = %record.id, name = %record.name, "duplicate crew id; skipping");
                continue;
            }
            roster.by_id.insert(record.id, roster.crew.len());
            roster.crew.push(record);
        }
        roster
    }

    pub fn len(&self) -> usize {
        self.crew.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crew.is_empty()
    }

    pub fn get(&self, id: CrewId) -> Option<&CrewRecord> {
        self.by_id.get(&id).map(|&index| &self.crew[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CrewRecord> {
        self.crew.iter()
    }
}

impl FromIterator<CrewRecord> for Roster {
    fn from_iter<I: IntoIterator<Item = CrewRecord>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotCrew {
    id: u64,
    name: String,
    #[serde(default)]
    skills: HashMap<String, SkillRoll>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    crew: Vec<SnapshotCrew>,
}

/// Parses a `{"crew": [...]}` document whose entries carry snapshot-style
/// skill rolls (`command_skill: {core, range_min, range_max}`, ...).
///
/// A roll whose derived value overflows a skill total rejects the document.
pub fn parse_roster(raw: &str) -> Result<Roster, serde_json::Error> {
    let parsed: RosterFile = serde_json::from_str(raw)?;
    let mut records = Vec::with_capacity(parsed.crew.len());
    for entry in parsed.crew {
        let mut skills = SkillTotals::default();
        for (key, roll) in &entry.skills {
            let skill = match key.parse::<SkillCategory>() {
                Ok(skill) => skill,
                Err(err) => {
                    tracing::warn!(crew_id = entry.id, "{err}; ignoring");
                    continue;
                }
            };
            skills[skill] = roll.voyage_value().ok_or_else(|| {
                serde_json::Error::custom(format!(
                    "crew {} {key} is out of range ({roll:?})",
                    entry.id
                ))
            })?;
        }
        records.push(CrewRecord::new(entry.id, entry.name, skills));
    }
    Ok(Roster::new(records))
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<Roster, VoyageError> {
    let path = path.as_ref();
    let to_error = |reason: String| VoyageError::RosterLoad {
        path: path.display().to_string(),
        reason,
    };
    let raw = fs::read_to_string(path).map_err(|err| to_error(err.to_string()))?;
    parse_roster(&raw).map_err(|err| to_error(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voyage_value_adds_range_midpoint() {
        let roll = SkillRoll {
            core: 1000,
            range_min: 100,
            range_max: 301,
        };
        assert_eq!(roll.voyage_value(), Some(1200));
    }

    #[test]
    fn voyage_value_rejects_overflow() {
        let roll = SkillRoll {
            core: 300_000_000,
            range_min: 4_000_000_000,
            range_max: 4_000_000_000,
        };
        assert_eq!(roll.voyage_value(), None);
        let roll = SkillRoll {
            core: 0,
            ..roll
        };
        assert_eq!(roll.voyage_value(), Some(4_000_000_000));
    }

    #[test]
    fn roster_indexes_by_id_and_drops_duplicates() {
        let roster = Roster::new([
            CrewRecord::new(7, "Kirk", SkillTotals::new([900, 0, 0, 0, 0, 0])),
            CrewRecord::new(3, "Spock", SkillTotals::new([0, 0, 0, 0, 950, 0])),
            CrewRecord::new(7, "Imposter", SkillTotals::default()),
        ]);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(CrewId(7)).map(|c| c.name.as_str()), Some("Kirk"));
        let order: Vec<u64> = roster.iter().map(|crew| crew.id.0).collect();
        assert_eq!(order, vec![7, 3]);
        assert!(roster.get(CrewId(99)).is_none());
    }

    #[test]
    fn parse_roster_derives_skills_from_snapshot_rolls() {
        let raw = r#"{
            "crew": [
                {"id": 1, "name": "Data", "skills": {
                    "science_skill": {"core": 800, "range_min": 100, "range_max": 200},
                    "engineering_skill": {"core": 700, "range_min": 50, "range_max": 150}
                }},
                {"id": 2, "name": "Troi", "skills": {
                    "diplomacy_skill": {"core": 600}
                }}
            ]
        }"#;
        let roster = parse_roster(raw).expect("roster should parse");
        let data = roster.get(CrewId(1)).expect("data present");
        assert_eq!(data.skills[SkillCategory::Science], 950);
        assert_eq!(data.skills[SkillCategory::Engineering], 800);
        assert_eq!(data.skills[SkillCategory::Command], 0);
        let troi = roster.get(CrewId(2)).expect("troi present");
        assert_eq!(troi.skills[SkillCategory::Diplomacy], 600);
    }

    #[test]
    fn parse_roster_rejects_out_of_range_rolls() {
        let raw = r#"{"crew": [{"id": 4, "name": "Worf", "skills": {
            "security_skill": {"core": 1000000000, "range_min": 4000000000, "range_max": 4000000000}
        }}]}"#;
        let err = parse_roster(raw).unwrap_err();
        assert!(err.to_string().contains("security_skill is out of range"), "{err}");
    }

    #[test]
    fn load_roster_reports_missing_file() {
        let err = load_roster("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, VoyageError::RosterLoad { .. }));
    }
}
