use crate::models::{CandidateOffering, PreferenceModel};
use std::cmp::Ordering;

/// Check if an offering's price falls inside the budget (inclusive)
#[inline]
pub fn within_budget(offering: &CandidateOffering, preferences: &PreferenceModel) -> bool {
    preferences.budget_range.contains(offering.price)
}

/// Check if an offering meets the sustainability threshold
#[inline]
pub fn meets_sustainability(offering: &CandidateOffering, preferences: &PreferenceModel) -> bool {
    i32::from(offering.sustainability_score) >= preferences.sustainability_threshold
}

/// Check the offering's tags against the preferences of its own category
///
/// An empty preference set places no constraint on that category.
#[inline]
pub fn matches_category_preferences(
    offering: &CandidateOffering,
    preferences: &PreferenceModel,
) -> bool {
    let wanted = preferences.preferences_for(offering.category);
    wanted.is_empty() || wanted.intersects(&offering.tags)
}

/// Full filtering predicate
#[inline]
pub fn matches_offering(offering: &CandidateOffering, preferences: &PreferenceModel) -> bool {
    within_budget(offering, preferences)
        && meets_sustainability(offering, preferences)
        && matches_category_preferences(offering, preferences)
}

/// Tags of the offering that the traveler asked for, in the offering's order
pub fn shared_tags(offering: &CandidateOffering, preferences: &PreferenceModel) -> Vec<String> {
    let wanted = preferences.preferences_for(offering.category);
    offering
        .tags
        .iter()
        .filter(|tag| wanted.contains(tag))
        .cloned()
        .collect()
}

/// Ranking order: greener first, then cheaper
///
/// Equal offerings compare as Equal so a stable sort keeps catalog order.
pub fn rank_order(a: &CandidateOffering, b: &CandidateOffering) -> Ordering {
    b.sustainability_score
        .cmp(&a.sustainability_score)
        .then_with(|| a.price.total_cmp(&b.price))
}
