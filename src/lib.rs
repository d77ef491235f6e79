//! Journey engine - guided trip builder for the travel booking site
//!
//! Collects traveler preferences over a sequence of wizard steps, carries the
//! partial journey in URL query parameters, and matches the finished
//! preferences against the offering catalog.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Aggregator, JourneyError, MatchSet, Matcher, PartialPreferences, WizardStep};
pub use models::{CandidateOffering, PreferenceModel, PreferenceSnapshot};
