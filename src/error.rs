use crate::data::{CrewId, SkillCategory};

/// Errors raised by lineup assembly and voyage simulation.
#[derive(Debug, thiserror::Error)]
pub enum VoyageError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("cannot fill {category} seats: {eligible} eligible crew, need 2")]
    UnsatisfiableAssignment {
        category: SkillCategory,
        eligible: usize,
    },

    #[error("crew {id} is not in the roster")]
    UnknownCrew { id: CrewId },

    #[error("simulation cancelled")]
    Cancelled,

    #[error("failed to load roster '{path}': {reason}")]
    RosterLoad { path: String, reason: String },
}

impl VoyageError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
