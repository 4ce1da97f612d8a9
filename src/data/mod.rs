pub mod crew;
pub mod skills;
pub mod validate;

pub use crew::{load_roster, parse_roster, CrewId, CrewRecord, Roster, SkillRoll};
pub use skills::{ParseSkillError, SkillCategory, SkillTotals, SKILL_COUNT};
pub use validate::{validate_roster, ValidationDiagnostic, ValidationReport, ValidationSeverity};
