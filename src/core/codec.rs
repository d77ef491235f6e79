use crate::models::{
    saturating_i32, saturating_u32, BudgetRange, CategorySet, DateRange, PreferenceModel,
    DEFAULT_MAX_BUDGET, DEFAULT_MIN_BUDGET, DEFAULT_SUSTAINABILITY_THRESHOLD,
    DEFAULT_TRAVELER_COUNT,
};
use chrono::NaiveDate;
use std::num::IntErrorKind;

pub const KEY_DESTINATION: &str = "destination";
pub const KEY_START_DATE: &str = "startDate";
pub const KEY_END_DATE: &str = "endDate";
pub const KEY_TRAVELERS: &str = "travelers";
pub const KEY_MIN_BUDGET: &str = "minBudget";
pub const KEY_MAX_BUDGET: &str = "maxBudget";
pub const KEY_SUSTAINABILITY: &str = "sustainability";
pub const KEY_ACTIVITY: &str = "activity";
pub const KEY_ACCOMMODATION: &str = "accommodation";
pub const KEY_DINING: &str = "dining";
pub const KEY_TRANSPORTATION: &str = "transportation";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Flat, ordered parameter set; category keys repeat once per tag
pub type QueryParams = Vec<(String, String)>;

/// Encode a model as URL parameters
///
/// Fields equal to their default are omitted, so an untouched model encodes
/// to an empty set.
pub fn encode(model: &PreferenceModel) -> QueryParams {
    let mut params = QueryParams::new();

    if !model.destination.is_empty() {
        push(&mut params, KEY_DESTINATION, model.destination.clone());
    }
    if let Some(range) = &model.date_range {
        push(&mut params, KEY_START_DATE, range.start().format(DATE_FORMAT).to_string());
        push(&mut params, KEY_END_DATE, range.end().format(DATE_FORMAT).to_string());
    }
    if model.traveler_count != DEFAULT_TRAVELER_COUNT {
        push(&mut params, KEY_TRAVELERS, model.traveler_count.to_string());
    }
    if model.budget_range.min != DEFAULT_MIN_BUDGET {
        push(&mut params, KEY_MIN_BUDGET, model.budget_range.min.to_string());
    }
    if model.budget_range.max != DEFAULT_MAX_BUDGET {
        push(&mut params, KEY_MAX_BUDGET, model.budget_range.max.to_string());
    }
    if model.sustainability_threshold != DEFAULT_SUSTAINABILITY_THRESHOLD {
        push(
            &mut params,
            KEY_SUSTAINABILITY,
            model.sustainability_threshold.to_string(),
        );
    }

    push_tags(&mut params, KEY_ACTIVITY, &model.activity_preferences);
    push_tags(&mut params, KEY_ACCOMMODATION, &model.accommodation_types);
    push_tags(&mut params, KEY_DINING, &model.dining_preferences);
    push_tags(&mut params, KEY_TRANSPORTATION, &model.transportation_types);

    params
}

/// Decode URL parameters into a normalized model
///
/// Never fails: absent keys and non-numeric values fall back to defaults,
/// out-of-range integers are clamped into their field, one-sided or reversed
/// dates yield no date range, and for scalar keys the first occurrence wins.
/// Unknown keys are ignored.
pub fn decode<I, K, V>(params: I) -> PreferenceModel
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut destination: Option<String> = None;
    let mut start: Option<Option<NaiveDate>> = None;
    let mut end: Option<Option<NaiveDate>> = None;
    let mut travelers: Option<Option<i64>> = None;
    let mut min_budget: Option<Option<i64>> = None;
    let mut max_budget: Option<Option<i64>> = None;
    let mut sustainability: Option<Option<i64>> = None;
    let mut model = PreferenceModel::default();

    for (key, value) in params {
        let value = value.as_ref();
        match key.as_ref() {
            KEY_DESTINATION => {
                destination.get_or_insert_with(|| value.to_string());
            }
            KEY_START_DATE => {
                start.get_or_insert_with(|| parse_date(value));
            }
            KEY_END_DATE => {
                end.get_or_insert_with(|| parse_date(value));
            }
            KEY_TRAVELERS => {
                travelers.get_or_insert_with(|| parse_integer(value));
            }
            KEY_MIN_BUDGET => {
                min_budget.get_or_insert_with(|| parse_integer(value));
            }
            KEY_MAX_BUDGET => {
                max_budget.get_or_insert_with(|| parse_integer(value));
            }
            KEY_SUSTAINABILITY => {
                sustainability.get_or_insert_with(|| parse_integer(value));
            }
            KEY_ACTIVITY => {
                model.activity_preferences.insert(value);
            }
            KEY_ACCOMMODATION => {
                model.accommodation_types.insert(value);
            }
            KEY_DINING => {
                model.dining_preferences.insert(value);
            }
            KEY_TRANSPORTATION => {
                model.transportation_types.insert(value);
            }
            _ => {}
        }
    }

    model.destination = destination.unwrap_or_default();
    model.date_range = DateRange::from_bounds(start.flatten(), end.flatten());
    model.traveler_count = travelers
        .flatten()
        .map_or(DEFAULT_TRAVELER_COUNT, saturating_u32);
    model.budget_range = BudgetRange {
        min: min_budget.flatten().map_or(DEFAULT_MIN_BUDGET, saturating_u32),
        max: max_budget.flatten().map_or(DEFAULT_MAX_BUDGET, saturating_u32),
    };
    model.sustainability_threshold = sustainability
        .flatten()
        .map_or(DEFAULT_SUSTAINABILITY_THRESHOLD, saturating_i32);

    model.normalized()
}

/// Percent-encoded `key=value&...` form of [`encode`]
pub fn to_query_string(model: &PreferenceModel) -> String {
    encode(model)
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Parse a raw query string (with or without a leading `?`) and [`decode`] it
///
/// `+` is read as a space. Pairs that are not valid percent-encoded UTF-8 are skipped.
pub fn from_query_string(query: &str) -> PreferenceModel {
    decode(split_query(query))
}

/// Split a raw query string into decoded key/value pairs
pub fn split_query(query: &str) -> QueryParams {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned();
            let value = urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

/// Parse an integer, saturating values too large for `i64`
fn parse_integer(value: &str) -> Option<i64> {
    match value.trim().parse::<i64>() {
        Ok(number) => Some(number),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn push(params: &mut QueryParams, key: &str, value: String) {
    params.push((key.to_string(), value));
}

fn push_tags(params: &mut QueryParams, key: &str, tags: &CategorySet) {
    for tag in tags.iter() {
        push(params, key, tag.to_string());
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}
