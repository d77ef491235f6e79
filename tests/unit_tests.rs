// Unit tests for the journey engine

use chrono::NaiveDate;
use journey_engine::core::{
    codec::{decode, encode, from_query_string, to_query_string},
    filters::{matches_offering, rank_order},
    Aggregator, JourneyError, Matcher, PartialPreferences, PreferenceField, WizardStep,
};
use journey_engine::models::{
    BudgetRange, CandidateOffering, CategorySet, DateRange, OfferingCategory, PreferenceModel,
};
use std::cmp::Ordering;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_offering(id: &str, category: OfferingCategory, score: u8, price: f64, tags: &[&str]) -> CandidateOffering {
    CandidateOffering {
        id: id.to_string(),
        name: format!("Offering {}", id),
        category,
        sustainability_score: score,
        price,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

fn create_model() -> PreferenceModel {
    PreferenceModel {
        destination: "Bali".to_string(),
        date_range: DateRange::new(date(2026, 9, 3), date(2026, 9, 12)),
        traveler_count: 3,
        budget_range: BudgetRange { min: 200, max: 2500 },
        sustainability_threshold: 70,
        activity_preferences: CategorySet::from(vec!["surfing".to_string(), "yoga".to_string()]),
        accommodation_types: CategorySet::from(vec!["eco-lodge".to_string()]),
        dining_preferences: CategorySet::new(),
        transportation_types: CategorySet::from(vec!["train".to_string()]),
    }
}

#[test]
fn test_codec_round_trip_of_normalized_model() {
    let model = create_model();
    assert!(model.is_normalized());

    assert_eq!(decode(encode(&model)), model);
    assert_eq!(from_query_string(&to_query_string(&model)), model);
}

#[test]
fn test_default_model_encodes_to_nothing() {
    assert!(encode(&PreferenceModel::default()).is_empty());
    assert_eq!(to_query_string(&PreferenceModel::default()), "");
}

#[test]
fn test_decode_is_total() {
    let inputs = [
        "",
        "?",
        "&&&",
        "travelers=abc&minBudget=-5&sustainability=lots",
        "startDate=2026-13-45&endDate=yesterday",
        "destination",
        "%zz=%yy&=",
    ];

    for input in inputs {
        let model = from_query_string(input);
        assert!(model.is_normalized(), "decode of {:?} is not normalized", input);
    }
}

#[test]
fn test_decode_normalizes_out_of_range_values() {
    let model = from_query_string("destination=Oslo&minBudget=900&maxBudget=100&sustainability=150&travelers=0");

    assert_eq!(model.budget_range, BudgetRange { min: 100, max: 900 });
    assert_eq!(model.sustainability_threshold, 100);
    assert_eq!(model.traveler_count, 1);
}

#[test]
fn test_decode_reversed_dates_yields_no_range() {
    let model = from_query_string("destination=Oslo&startDate=2026-09-12&endDate=2026-09-03");
    assert_eq!(model.date_range, None);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let model = from_query_string("destination=Oslo&utm_source=newsletter&page=2");
    assert_eq!(model.destination, "Oslo");
    assert_eq!(encode(&model), vec![("destination".to_string(), "Oslo".to_string())]);
}

#[test]
fn test_step_updates_accumulate() {
    let mut aggregator = Aggregator::new();

    aggregator
        .apply_step_update(
            WizardStep::Destination,
            PartialPreferences {
                destination: Some("  Kyoto ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    aggregator
        .apply_step_update(
            WizardStep::Travelers,
            PartialPreferences {
                traveler_count: Some(4),
                ..Default::default()
            },
        )
        .unwrap();
    aggregator
        .apply_step_update(
            WizardStep::Preferences,
            PartialPreferences {
                dining_preferences: Some(vec!["Vegan".to_string(), "vegan ".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();

    let model = aggregator.model();
    assert_eq!(model.destination, "Kyoto");
    assert_eq!(model.traveler_count, 4);
    assert_eq!(model.dining_preferences.len(), 1);
    assert!(model.dining_preferences.contains("vegan"));
}

#[test]
fn test_rejected_update_leaves_model_unchanged() {
    let mut aggregator = Aggregator::from_model(create_model());
    let before = aggregator.model().clone();

    let err = aggregator
        .apply_step_update(
            WizardStep::Budget,
            PartialPreferences {
                min_budget: Some(50),
                destination: Some("Paris".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();

    assert_eq!(
        err,
        JourneyError::InvalidStepField {
            step: WizardStep::Budget,
            field: PreferenceField::Destination,
        }
    );
    assert_eq!(aggregator.model(), &before);
}

#[test]
fn test_reversed_dates_in_step_update_fail_validation() {
    let mut aggregator = Aggregator::from_model(create_model());
    let before = aggregator.model().clone();

    let err = aggregator
        .apply_step_update(
            WizardStep::Dates,
            PartialPreferences {
                start_date: Some(date(2026, 9, 12)),
                end_date: Some(date(2026, 9, 3)),
                ..Default::default()
            },
        )
        .unwrap_err();

    assert!(matches!(err, JourneyError::Validation { field: PreferenceField::EndDate, .. }));
    assert_eq!(err.step(), Some(WizardStep::Dates));
    assert_eq!(aggregator.model(), &before);
}

#[test]
fn test_finalize_requires_destination() {
    let aggregator = Aggregator::new();
    assert_eq!(
        aggregator.finalize().unwrap_err(),
        JourneyError::IncompleteModel {
            step: WizardStep::Destination
        }
    );
}

#[test]
fn test_finalize_swaps_reversed_budget() {
    let mut model = create_model();
    model.budget_range = BudgetRange { min: 3000, max: 500 };

    let snapshot = Aggregator::from_model(model).finalize().unwrap();
    assert_eq!(snapshot.budget_range, BudgetRange { min: 500, max: 3000 });
    assert!(snapshot.is_normalized());
}

#[test]
fn test_step_draft_only_applies_on_commit() {
    let mut aggregator = Aggregator::new();
    let mut draft = aggregator.draft(WizardStep::Sustainability);
    draft.pending_mut().sustainability_threshold = Some(85);

    assert_eq!(aggregator.model().sustainability_threshold, 50);

    draft.commit(&mut aggregator).unwrap();
    assert_eq!(aggregator.model().sustainability_threshold, 85);
}

#[test]
fn test_step_names_parse() {
    assert_eq!("dates".parse::<WizardStep>(), Ok(WizardStep::Dates));
    assert_eq!(" Budget ".parse::<WizardStep>(), Ok(WizardStep::Budget));
    assert_eq!(
        "payment".parse::<WizardStep>(),
        Err(JourneyError::UnknownStep("payment".to_string()))
    );
}

#[test]
fn test_threshold_filtering_and_ordering() {
    let mut model = PreferenceModel::default();
    model.destination = "Bali".to_string();
    model.sustainability_threshold = 50;

    let catalog = vec![
        create_offering("low", OfferingCategory::Activity, 40, 10.0, &[]),
        create_offering("mid", OfferingCategory::Activity, 60, 10.0, &[]),
        create_offering("high", OfferingCategory::Activity, 90, 10.0, &[]),
    ];

    let ids: Vec<&str> = Matcher::default()
        .match_offerings(&model, &catalog)
        .iter()
        .map(|offering| offering.id.as_str())
        .collect();

    assert_eq!(ids, vec!["high", "mid"]);
}

#[test]
fn test_every_match_satisfies_the_filters() {
    let model = create_model();
    let catalog = vec![
        create_offering("a", OfferingCategory::Activity, 80, 300.0, &["Surfing"]),
        create_offering("b", OfferingCategory::Activity, 80, 300.0, &["diving"]),
        create_offering("c", OfferingCategory::Accommodation, 95, 3000.0, &["eco-lodge"]),
        create_offering("d", OfferingCategory::Accommodation, 75, 800.0, &["eco-lodge"]),
        create_offering("e", OfferingCategory::Dining, 71, 200.0, &[]),
        create_offering("f", OfferingCategory::Transportation, 69, 400.0, &["train"]),
    ];

    let matches = Matcher::default().match_offerings(&model, &catalog);
    let ids: Vec<&str> = matches.iter().map(|offering| offering.id.as_str()).collect();

    assert_eq!(ids, vec!["a", "d", "e"]);
    assert!(matches.iter().all(|offering| matches_offering(offering, &model)));
}

#[test]
fn test_rank_order_breaks_score_ties_by_price() {
    let cheap = create_offering("cheap", OfferingCategory::Dining, 70, 20.0, &[]);
    let pricey = create_offering("pricey", OfferingCategory::Dining, 70, 90.0, &[]);

    assert_eq!(rank_order(&cheap, &pricey), Ordering::Less);
    assert_eq!(rank_order(&cheap, &cheap.clone()), Ordering::Equal);
}

#[test]
fn test_empty_catalog_gives_empty_result() {
    let model = create_model();
    let catalog: Vec<CandidateOffering> = Vec::new();

    let matches = Matcher::default().match_offerings(&model, &catalog);
    assert!(matches.is_empty());
    assert_eq!(matches.catalog_size(), 0);
}
