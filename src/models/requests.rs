use crate::core::PartialPreferences;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to apply one wizard step
///
/// `params` is the current journey in query-string form; the server keeps no
/// wizard state between requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StepUpdateRequest {
    #[validate(length(max = 4096))]
    #[serde(default)]
    pub params: String,
    #[serde(default)]
    pub fields: PartialPreferences,
}

/// Request to finalize a journey
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FinalizeRequest {
    #[validate(length(max = 4096))]
    #[serde(default)]
    pub params: String,
}
