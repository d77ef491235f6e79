// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    normalize_tag, saturating_i32, saturating_u32, BudgetRange, CandidateOffering, CategorySet,
    DateRange, OfferingCategory, PreferenceModel, PreferenceSnapshot, DEFAULT_MAX_BUDGET, DEFAULT_MIN_BUDGET,
    DEFAULT_SUSTAINABILITY_THRESHOLD, DEFAULT_TRAVELER_COUNT, MAX_SUSTAINABILITY,
};
pub use requests::{FinalizeRequest, StepUpdateRequest};
pub use responses::{
    ErrorResponse, FinalizeResponse, HealthResponse, JourneyStateResponse, MatchedOffering,
    ProfileResponse, RedirectResponse, SearchResponse,
};
