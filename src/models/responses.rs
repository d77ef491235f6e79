use crate::models::domain::{CandidateOffering, OfferingCategory, PreferenceModel, PreferenceSnapshot};
use serde::{Deserialize, Serialize};

/// Offering as shown in search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedOffering {
    pub id: String,
    pub name: String,
    pub category: OfferingCategory,
    pub sustainability_score: u8,
    pub price: f64,
    pub tags: Vec<String>,
    pub matched_tags: Vec<String>,
}

impl MatchedOffering {
    pub fn new(offering: &CandidateOffering, matched_tags: Vec<String>) -> Self {
        Self {
            id: offering.id.clone(),
            name: offering.name.clone(),
            category: offering.category,
            sustainability_score: offering.sustainability_score,
            price: offering.price,
            tags: offering.tags.clone(),
            matched_tags,
        }
    }
}

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Canonical query string for the submitted search
    pub query: String,
    pub preferences: PreferenceSnapshot,
    pub results: Vec<MatchedOffering>,
    pub total_results: usize,
    pub total_candidates: usize,
}

/// In-progress journey after a step update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStateResponse {
    pub params: String,
    pub preferences: PreferenceModel,
    pub complete: bool,
}

/// Finalized journey
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub params: String,
    pub preferences: PreferenceSnapshot,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub catalog_size: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    /// Wizard step the client should return to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
            step: None,
        }
    }
}

/// Guard rejection telling the client where to send the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub error: String,
    pub redirect: String,
}

/// Profile creation response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub created: bool,
}
