use crate::core::filters::{matches_offering, rank_order};
use crate::models::{CandidateOffering, PreferenceModel};
use std::cell::OnceCell;

/// Ranked offerings for one set of preferences
///
/// Filtering and ranking run on first access and are then reused, so the
/// set can be iterated any number of times with identical output. An empty
/// set is a valid result; compare against [`MatchSet::catalog_size`] to tell
/// "nothing matched" from "nothing to match".
#[derive(Debug)]
pub struct MatchSet<'a> {
    preferences: &'a PreferenceModel,
    catalog: &'a [CandidateOffering],
    limit: Option<usize>,
    ranked: OnceCell<Vec<usize>>,
}

impl<'a> MatchSet<'a> {
    fn ranked(&self) -> &[usize] {
        self.ranked.get_or_init(|| {
            let mut indices: Vec<usize> = self
                .catalog
                .iter()
                .enumerate()
                .filter(|(_, offering)| matches_offering(offering, self.preferences))
                .map(|(index, _)| index)
                .collect();

            // Stable sort: equal offerings keep their catalog order
            indices.sort_by(|&a, &b| rank_order(&self.catalog[a], &self.catalog[b]));

            if let Some(limit) = self.limit {
                indices.truncate(limit);
            }
            indices
        })
    }

    /// Iterate the matches, best first
    pub fn iter(&self) -> impl Iterator<Item = &'a CandidateOffering> + '_ {
        let catalog = self.catalog;
        self.ranked().iter().map(move |&index| &catalog[index])
    }

    pub fn len(&self) -> usize {
        self.ranked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked().is_empty()
    }

    /// Number of offerings that were considered
    pub fn catalog_size(&self) -> usize {
        self.catalog.len()
    }

    pub fn preferences(&self) -> &'a PreferenceModel {
        self.preferences
    }

    pub fn to_vec(&self) -> Vec<CandidateOffering> {
        self.iter().cloned().collect()
    }
}

/// Filter/match engine
///
/// # Pipeline Stages
/// 1. Budget filter
/// 2. Sustainability threshold
/// 3. Category preference intersection
/// 4. Ranking (sustainability desc, price asc, catalog order)
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    max_results: Option<usize>,
}

impl Matcher {
    pub fn new(max_results: Option<usize>) -> Self {
        Self { max_results }
    }

    /// Match a finalized model against a catalog
    ///
    /// Never mutates its inputs and never fails; pass a
    /// [`PreferenceSnapshot`](crate::models::PreferenceSnapshot) by reference
    /// and it derefs to the model.
    pub fn match_offerings<'a>(
        &self,
        preferences: &'a PreferenceModel,
        catalog: &'a [CandidateOffering],
    ) -> MatchSet<'a> {
        MatchSet {
            preferences,
            catalog,
            limit: self.max_results,
            ranked: OnceCell::new(),
        }
    }
}
