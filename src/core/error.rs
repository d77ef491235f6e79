use crate::core::aggregator::{PreferenceField, WizardStep};
use thiserror::Error;

/// Errors raised while building a journey
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JourneyError {
    /// A field value is malformed and has no sane default
    #[error("invalid value for `{field}`: {reason}")]
    Validation {
        field: PreferenceField,
        reason: String,
    },

    /// A step update carried a field outside that step's schema
    #[error("field `{field}` is not part of step `{step}`")]
    InvalidStepField {
        step: WizardStep,
        field: PreferenceField,
    },

    /// Finalize was attempted before a mandatory step was completed
    #[error("journey is incomplete: step `{step}` must be completed first")]
    IncompleteModel { step: WizardStep },

    #[error("unknown wizard step: {0}")]
    UnknownStep(String),
}

impl JourneyError {
    /// Wizard step the caller should send the traveler back to, if any
    pub fn step(&self) -> Option<WizardStep> {
        match self {
            JourneyError::Validation { field, .. } => Some(field.step()),
            JourneyError::InvalidStepField { step, .. } => Some(*step),
            JourneyError::IncompleteModel { step } => Some(*step),
            JourneyError::UnknownStep(_) => None,
        }
    }
}
