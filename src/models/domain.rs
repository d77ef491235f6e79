use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

pub const DEFAULT_TRAVELER_COUNT: u32 = 2;
pub const DEFAULT_MIN_BUDGET: u32 = 0;
pub const DEFAULT_MAX_BUDGET: u32 = 10_000;
pub const DEFAULT_SUSTAINABILITY_THRESHOLD: i32 = 50;
pub const MAX_SUSTAINABILITY: i32 = 100;

/// Narrow a wide integer into `u32`, saturating at both ends
#[inline]
pub fn saturating_u32(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// Narrow a wide integer into `i32`, saturating at both ends
#[inline]
pub fn saturating_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Canonical form of a category tag: trimmed and lower-cased
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Unordered set of category tags with duplicates collapsed
///
/// Tags are stored in canonical form, so `"Beach "` and `"beach"` are the same tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategorySet(BTreeSet<String>);

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, returning false for blank tags and duplicates
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = normalize_tag(tag);
        if tag.is_empty() {
            return false;
        }
        self.0.insert(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(&normalize_tag(tag))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// True when at least one of `tags` is in the set
    pub fn intersects<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|tag| self.contains(tag.as_ref()))
    }
}

impl<S: AsRef<str>> FromIterator<S> for CategorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = CategorySet::new();
        for tag in iter {
            set.insert(tag.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for CategorySet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<CategorySet> for Vec<String> {
    fn from(set: CategorySet) -> Self {
        set.0.into_iter().collect()
    }
}

/// Inclusive travel date range with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateRangeParts")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct DateRangeParts {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<DateRangeParts> for DateRange {
    type Error = String;

    fn try_from(parts: DateRangeParts) -> Result<Self, Self::Error> {
        DateRange::new(parts.start, parts.end)
            .ok_or_else(|| "start date must not be after end date".to_string())
    }
}

impl DateRange {
    /// Build a range, returning None when `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Build a range from optional bounds
    ///
    /// A one-sided or reversed pair yields no range at all.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => None,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Budget bounds in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: u32,
    pub max: u32,
}

impl Default for BudgetRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_BUDGET,
            max: DEFAULT_MAX_BUDGET,
        }
    }
}

impl BudgetRange {
    /// Swap the bounds when they are reversed
    pub fn ordered(self) -> Self {
        if self.min > self.max {
            Self {
                min: self.max,
                max: self.min,
            }
        } else {
            self
        }
    }

    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min as f64 && price <= self.max as f64
    }
}

/// Bucket an offering belongs to, mirroring the preference categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferingCategory {
    Activity,
    #[serde(alias = "stay")]
    Accommodation,
    Dining,
    #[serde(alias = "flight")]
    Transportation,
}

impl OfferingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferingCategory::Activity => "activity",
            OfferingCategory::Accommodation => "accommodation",
            OfferingCategory::Dining => "dining",
            OfferingCategory::Transportation => "transportation",
        }
    }
}

impl fmt::Display for OfferingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A traveler's search and journey criteria
///
/// While a wizard is in progress the numeric fields may hold out-of-range
/// values; [`PreferenceModel::normalize`] restores the invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferenceModel {
    pub destination: String,
    pub date_range: Option<DateRange>,
    pub traveler_count: u32,
    pub budget_range: BudgetRange,
    pub sustainability_threshold: i32,
    pub activity_preferences: CategorySet,
    pub accommodation_types: CategorySet,
    pub dining_preferences: CategorySet,
    pub transportation_types: CategorySet,
}

impl Default for PreferenceModel {
    fn default() -> Self {
        Self {
            destination: String::new(),
            date_range: None,
            traveler_count: DEFAULT_TRAVELER_COUNT,
            budget_range: BudgetRange::default(),
            sustainability_threshold: DEFAULT_SUSTAINABILITY_THRESHOLD,
            activity_preferences: CategorySet::new(),
            accommodation_types: CategorySet::new(),
            dining_preferences: CategorySet::new(),
            transportation_types: CategorySet::new(),
        }
    }
}

impl PreferenceModel {
    /// Enforce the model invariants in place
    ///
    /// Reversed budgets are swapped, the threshold is clamped to [0, 100],
    /// the traveler count is floored at 1 and the destination is trimmed.
    pub fn normalize(&mut self) {
        let trimmed = self.destination.trim();
        if trimmed.len() != self.destination.len() {
            self.destination = trimmed.to_string();
        }
        self.budget_range = self.budget_range.ordered();
        self.sustainability_threshold = self.sustainability_threshold.clamp(0, MAX_SUSTAINABILITY);
        self.traveler_count = self.traveler_count.max(1);
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn is_normalized(&self) -> bool {
        self.clone().normalized() == *self
    }

    pub fn has_destination(&self) -> bool {
        !self.destination.trim().is_empty()
    }

    /// Preference set that constrains offerings of `category`
    pub fn preferences_for(&self, category: OfferingCategory) -> &CategorySet {
        match category {
            OfferingCategory::Activity => &self.activity_preferences,
            OfferingCategory::Accommodation => &self.accommodation_types,
            OfferingCategory::Dining => &self.dining_preferences,
            OfferingCategory::Transportation => &self.transportation_types,
        }
    }
}

/// Immutable, finalized preferences
///
/// Only produced by the aggregator's finalize step, so every snapshot is
/// normalized and carries a destination. Cloning shares the underlying model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSnapshot(Arc<PreferenceModel>);

impl PreferenceSnapshot {
    pub(crate) fn new(model: PreferenceModel) -> Self {
        Self(Arc::new(model))
    }

    pub fn model(&self) -> &PreferenceModel {
        &self.0
    }

    /// Editable copy, used when the traveler reopens a finished journey
    pub fn to_model(&self) -> PreferenceModel {
        self.0.as_ref().clone()
    }
}

impl Deref for PreferenceSnapshot {
    type Target = PreferenceModel;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for PreferenceSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_ref().serialize(serializer)
    }
}

/// Bookable item from the catalog (flight, stay, activity, restaurant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateOffering {
    pub id: String,
    pub name: String,
    pub category: OfferingCategory,
    pub sustainability_score: u8,
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}
