use once_cell::sync::Lazy;
use regex::Regex;
use utility::geo::{meters_to_km, METERS_PER_KM};

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("leading number pattern is valid")
});

/// Values the backend and older front ends use for "no distance".
const PLACEHOLDERS: &[&str] = &["n/a", "na", "null", "undefined", "nan", "-"];

fn leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text)
        .and_then(|found| found.as_str().parse::<f64>().ok())
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Converts a leg distance as sent by the backend (`"350 m"`, `"1.2 km"`,
/// `"42"`) into meters.
///
/// Text containing "km" is read as kilometers, anything else with a leading
/// number as meters. Missing, placeholder, unparsable, negative or
/// non-finite values all become `0.0`; a single bad leg never fails the
/// whole itinerary.
pub fn parse_distance_meters(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() || PLACEHOLDERS.contains(&normalized.as_str()) {
        return 0.0;
    }

    let Some(value) = leading_number(&normalized) else {
        log::warn!("unparsable leg distance '{}', using 0 m", text);
        return 0.0;
    };
    let meters = if normalized.contains("km") {
        value * METERS_PER_KM
    } else {
        value
    };
    non_negative(meters)
}

pub fn parse_distance_km(text: Option<&str>) -> f64 {
    meters_to_km(parse_distance_meters(text))
}

/// Reads a backend day total. Unlike leg distances these have always been
/// kilometers, so a bare number is taken as km.
pub fn parse_reported_total_km(text: Option<&str>) -> Option<f64> {
    let text = text?.trim().to_lowercase();
    if text.contains('m') {
        return Some(parse_distance_km(Some(&text)));
    }
    leading_number(&text).map(non_negative)
}
