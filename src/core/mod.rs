// Core algorithm exports
pub mod aggregator;
pub mod codec;
pub mod error;
pub mod filters;
pub mod matcher;

pub use aggregator::{Aggregator, PartialPreferences, PreferenceField, StepDraft, WizardStep};
pub use codec::{decode, encode, from_query_string, to_query_string, QueryParams};
pub use error::JourneyError;
pub use filters::{matches_offering, rank_order, shared_tags};
pub use matcher::{MatchSet, Matcher};
