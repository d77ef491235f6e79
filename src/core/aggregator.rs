use crate::core::error::JourneyError;
use crate::models::{
    saturating_i32, saturating_u32, CategorySet, DateRange, PreferenceModel, PreferenceSnapshot,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Steps of the journey wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Destination,
    Dates,
    Travelers,
    Budget,
    Sustainability,
    Preferences,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Destination,
        WizardStep::Dates,
        WizardStep::Travelers,
        WizardStep::Budget,
        WizardStep::Sustainability,
        WizardStep::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Destination => "destination",
            WizardStep::Dates => "dates",
            WizardStep::Travelers => "travelers",
            WizardStep::Budget => "budget",
            WizardStep::Sustainability => "sustainability",
            WizardStep::Preferences => "preferences",
        }
    }

    /// Fields this step is allowed to write
    pub fn fields(&self) -> &'static [PreferenceField] {
        use PreferenceField::*;
        match self {
            WizardStep::Destination => &[Destination],
            WizardStep::Dates => &[StartDate, EndDate],
            WizardStep::Travelers => &[TravelerCount],
            WizardStep::Budget => &[MinBudget, MaxBudget],
            WizardStep::Sustainability => &[SustainabilityThreshold],
            WizardStep::Preferences => &[
                ActivityPreferences,
                AccommodationTypes,
                DiningPreferences,
                TransportationTypes,
            ],
        }
    }

    pub fn accepts(&self, field: PreferenceField) -> bool {
        self.fields().contains(&field)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStep {
    type Err = JourneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WizardStep::ALL
            .into_iter()
            .find(|step| step.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| JourneyError::UnknownStep(s.to_string()))
    }
}

/// Individually addressable fields of a step update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceField {
    Destination,
    StartDate,
    EndDate,
    TravelerCount,
    MinBudget,
    MaxBudget,
    SustainabilityThreshold,
    ActivityPreferences,
    AccommodationTypes,
    DiningPreferences,
    TransportationTypes,
}

impl PreferenceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceField::Destination => "destination",
            PreferenceField::StartDate => "startDate",
            PreferenceField::EndDate => "endDate",
            PreferenceField::TravelerCount => "travelerCount",
            PreferenceField::MinBudget => "minBudget",
            PreferenceField::MaxBudget => "maxBudget",
            PreferenceField::SustainabilityThreshold => "sustainabilityThreshold",
            PreferenceField::ActivityPreferences => "activityPreferences",
            PreferenceField::AccommodationTypes => "accommodationTypes",
            PreferenceField::DiningPreferences => "diningPreferences",
            PreferenceField::TransportationTypes => "transportationTypes",
        }
    }

    /// Step whose schema owns this field
    pub fn step(&self) -> WizardStep {
        WizardStep::ALL
            .into_iter()
            .find(|step| step.accepts(*self))
            .unwrap_or(WizardStep::Preferences)
    }
}

impl fmt::Display for PreferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial update submitted by one wizard step
///
/// Absent fields are left untouched when the update is applied. Numbers are
/// accepted wide; out-of-range values are narrowed on apply and clamped on
/// finalize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traveler_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_budget: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_budget: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability_threshold: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_preferences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dining_preferences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation_types: Option<Vec<String>>,
}

impl PartialPreferences {
    /// Fields carried by this update, in schema order
    pub fn present_fields(&self) -> Vec<PreferenceField> {
        let flags = [
            (self.destination.is_some(), PreferenceField::Destination),
            (self.start_date.is_some(), PreferenceField::StartDate),
            (self.end_date.is_some(), PreferenceField::EndDate),
            (self.traveler_count.is_some(), PreferenceField::TravelerCount),
            (self.min_budget.is_some(), PreferenceField::MinBudget),
            (self.max_budget.is_some(), PreferenceField::MaxBudget),
            (self.sustainability_threshold.is_some(), PreferenceField::SustainabilityThreshold),
            (self.activity_preferences.is_some(), PreferenceField::ActivityPreferences),
            (self.accommodation_types.is_some(), PreferenceField::AccommodationTypes),
            (self.dining_preferences.is_some(), PreferenceField::DiningPreferences),
            (self.transportation_types.is_some(), PreferenceField::TransportationTypes),
        ];

        flags
            .into_iter()
            .filter_map(|(present, field)| present.then_some(field))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }
}

/// Step-local input that has not been committed yet
///
/// A step edits its draft freely; only [`StepDraft::commit`] touches the
/// aggregator, so keystrokes never reach the shared model.
#[derive(Debug, Clone)]
pub struct StepDraft {
    step: WizardStep,
    pending: PartialPreferences,
}

impl StepDraft {
    pub fn new(step: WizardStep) -> Self {
        Self {
            step,
            pending: PartialPreferences::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn pending(&self) -> &PartialPreferences {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PartialPreferences {
        &mut self.pending
    }

    /// Apply the draft to the aggregator on advance/submit
    pub fn commit(self, aggregator: &mut Aggregator) -> Result<(), JourneyError> {
        aggregator.apply_step_update(self.step, self.pending)
    }
}

/// Merges wizard step updates into one preference model
///
/// One aggregator belongs to one wizard session. Step order is not enforced;
/// revisiting a step simply overwrites its fields.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    model: PreferenceModel,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session from an existing (typically decoded) model
    pub fn from_model(model: PreferenceModel) -> Self {
        Self { model }
    }

    /// Read-only view of the in-progress model
    pub fn model(&self) -> &PreferenceModel {
        &self.model
    }

    pub fn into_model(self) -> PreferenceModel {
        self.model
    }

    /// Editable copy of the committed values of `step`
    ///
    /// Committing an untouched draft leaves the model as it was. A dates
    /// draft is empty while no range is set.
    pub fn draft(&self, step: WizardStep) -> StepDraft {
        let model = &self.model;
        let mut draft = StepDraft::new(step);
        let pending = draft.pending_mut();

        match step {
            WizardStep::Destination => pending.destination = Some(model.destination.clone()),
            WizardStep::Dates => {
                if let Some(range) = &model.date_range {
                    pending.start_date = Some(range.start());
                    pending.end_date = Some(range.end());
                }
            }
            WizardStep::Travelers => pending.traveler_count = Some(i64::from(model.traveler_count)),
            WizardStep::Budget => {
                pending.min_budget = Some(i64::from(model.budget_range.min));
                pending.max_budget = Some(i64::from(model.budget_range.max));
            }
            WizardStep::Sustainability => {
                pending.sustainability_threshold = Some(i64::from(model.sustainability_threshold))
            }
            WizardStep::Preferences => {
                pending.activity_preferences = Some(tags_of(&model.activity_preferences));
                pending.accommodation_types = Some(tags_of(&model.accommodation_types));
                pending.dining_preferences = Some(tags_of(&model.dining_preferences));
                pending.transportation_types = Some(tags_of(&model.transportation_types));
            }
        }

        draft
    }

    /// Apply a partial update on behalf of `step`
    ///
    /// Fields outside the step's schema are rejected. The update is atomic:
    /// on error the model is left unchanged.
    pub fn apply_step_update(
        &mut self,
        step: WizardStep,
        update: PartialPreferences,
    ) -> Result<(), JourneyError> {
        let fields = update.present_fields();

        if let Some(field) = fields.iter().copied().find(|field| !step.accepts(*field)) {
            tracing::debug!("Rejected field {} for step {}", field, step);
            return Err(JourneyError::InvalidStepField { step, field });
        }

        let date_range = validate_dates(&update)?;
        let destination = update.destination.map(|d| d.trim().to_string());

        let model = &mut self.model;
        if let Some(destination) = destination {
            model.destination = destination;
        }
        if let Some(date_range) = date_range {
            model.date_range = date_range;
        }
        if let Some(count) = update.traveler_count {
            model.traveler_count = saturating_u32(count);
        }
        if let Some(min) = update.min_budget {
            model.budget_range.min = saturating_u32(min);
        }
        if let Some(max) = update.max_budget {
            model.budget_range.max = saturating_u32(max);
        }
        if let Some(threshold) = update.sustainability_threshold {
            model.sustainability_threshold = saturating_i32(threshold);
        }
        if let Some(tags) = update.activity_preferences {
            model.activity_preferences = CategorySet::from(tags);
        }
        if let Some(tags) = update.accommodation_types {
            model.accommodation_types = CategorySet::from(tags);
        }
        if let Some(tags) = update.dining_preferences {
            model.dining_preferences = CategorySet::from(tags);
        }
        if let Some(tags) = update.transportation_types {
            model.transportation_types = CategorySet::from(tags);
        }

        tracing::debug!("Applied {} field(s) for step {}", fields.len(), step);
        Ok(())
    }

    /// Clamp the model into its invariants and freeze it
    ///
    /// Budget bounds are swapped when reversed. Fails when the destination
    /// step was never completed; the aggregator stays usable either way.
    pub fn finalize(&self) -> Result<PreferenceSnapshot, JourneyError> {
        if !self.model.has_destination() {
            return Err(JourneyError::IncompleteModel {
                step: WizardStep::Destination,
            });
        }

        Ok(PreferenceSnapshot::new(self.model.clone().normalized()))
    }
}

fn tags_of(set: &CategorySet) -> Vec<String> {
    set.iter().map(str::to_string).collect()
}

/// Resolve the date fields of an update
///
/// Returns None when the update carries no date, Some(None) for a one-sided
/// pair, and an error for a reversed pair.
fn validate_dates(update: &PartialPreferences) -> Result<Option<Option<DateRange>>, JourneyError> {
    match (update.start_date, update.end_date) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => match DateRange::new(start, end) {
            Some(range) => Ok(Some(Some(range))),
            None => Err(JourneyError::Validation {
                field: PreferenceField::EndDate,
                reason: format!("end date {} is before start date {}", end, start),
            }),
        },
        _ => Ok(Some(None)),
    }
}
