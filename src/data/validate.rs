//! Roster sanity checks run before seat assignment.

use std::fmt;

use crate::data::crew::Roster;
use crate::data::skills::SkillCategory;
use crate::optimizer::lineup::SEAT_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Checks a roster for records and coverage gaps that make seat assignment
/// fail or degrade. Only an empty roster is an error.
pub fn validate_roster(roster: &Roster) -> ValidationReport {
    let mut report = ValidationReport::default();

    if roster.is_empty() {
        report.push(ValidationSeverity::Error, "roster", "roster has no crew");
        return report;
    }

    for crew in roster.iter() {
        let context = format!("crew {}", crew.id);
        if crew.name.trim().is_empty() {
            report.push(ValidationSeverity::Warning, &context, "missing display name");
        }
        if crew.skills.sum() == 0 {
            report.push(
                ValidationSeverity::Warning,
                &context,
                "all six skills are zero; never eligible for a seat",
            );
        }
    }

    for skill in SkillCategory::ALL {
        let eligible = roster.iter().filter(|crew| crew.skills[skill] > 0).count();
        if eligible < 2 {
            report.push(
                ValidationSeverity::Warning,
                format!("skill {skill}"),
                format!("only {eligible} crew with {skill} skill; both seats cannot be filled"),
            );
        }
    }

    if roster.len() < SEAT_COUNT {
        report.push(
            ValidationSeverity::Info,
            "roster",
            format!(
                "{} crew for {SEAT_COUNT} seats; exclusive strategies will not fill every seat",
                roster.len()
            ),
        );
    }

    report
}
