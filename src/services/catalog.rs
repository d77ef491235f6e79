use crate::models::{CandidateOffering, MAX_SUSTAINABILITY};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading the offering catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid catalog format: {0}")]
    InvalidFormat(String),
}

/// Static offering catalog backing search results
///
/// Read-only after load; insertion order is preserved because ranking ties
/// fall back to it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    offerings: Vec<CandidateOffering>,
}

impl Catalog {
    pub fn new(offerings: Vec<CandidateOffering>) -> Self {
        Self { offerings }
    }

    /// Load a catalog from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json(&raw)?;

        tracing::info!(
            "Loaded {} offerings from {}",
            catalog.len(),
            path.as_ref().display()
        );

        Ok(catalog)
    }

    /// Parse a JSON array of offerings
    ///
    /// Entries that fail to parse or carry a sustainability score above 100
    /// are skipped with a warning instead of failing the whole catalog.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let json: Value = serde_json::from_str(raw)?;

        let entries = json
            .as_array()
            .ok_or_else(|| CatalogError::InvalidFormat("expected a JSON array of offerings".into()))?;

        let offerings = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                match serde_json::from_value::<CandidateOffering>(entry.clone()) {
                    Ok(offering) if i32::from(offering.sustainability_score) <= MAX_SUSTAINABILITY => {
                        Some(offering)
                    }
                    Ok(offering) => {
                        tracing::warn!(
                            "Skipping offering {}: sustainability score {} out of range",
                            offering.id,
                            offering.sustainability_score
                        );
                        None
                    }
                    Err(e) => {
                        tracing::warn!("Skipping catalog entry {}: {}", index, e);
                        None
                    }
                }
            })
            .collect();

        Ok(Self { offerings })
    }

    pub fn offerings(&self) -> &[CandidateOffering] {
        &self.offerings
    }

    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }
}
