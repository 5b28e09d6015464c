//! Decode boundary between the attendance backend's JSON and [`VisitRecord`].
//!
//! The backend's documents are loosely typed: ids arrive as `_id`, `id` or
//! both, distances as text or numbers, place names as empty strings or not as
//! strings at all. Everything is accepted
//! here as optional and then checked once, so the itinerary code only ever
//! sees well-formed records.

use std::{error, fmt};

use serde::{Deserialize, Serialize};
use utility::{
    id::Id,
    serde::{date_time, lenient_text, string_or_number},
};

use crate::visit::{Coordinates, Purpose, VisitRecord};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    #[serde(alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(alias = "longitude")]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVisitRecord {
    pub id: Option<String>,
    /// Database key. Documents with virtuals carry it next to `id`.
    #[serde(rename = "_id")]
    pub document_id: Option<String>,
    pub timestamp: Option<String>,
    pub location: Option<RawLocation>,
    #[serde(default, deserialize_with = "lenient_text::deserialize_option")]
    pub location_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text::deserialize_option")]
    pub purpose: Option<String>,
    #[serde(default, deserialize_with = "lenient_text::deserialize_option")]
    pub sub_purpose: Option<String>,
    #[serde(default, deserialize_with = "lenient_text::deserialize_option")]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize_option")]
    pub distance_from_previous: Option<String>,
    /// Day-level aggregate some backend versions attach to each record.
    #[serde(default, deserialize_with = "string_or_number::deserialize_option")]
    pub total_distance: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    MissingId,
    MissingTimestamp,
    InvalidTimestamp(String),
    MissingLocation,
    Record {
        index: usize,
        reason: Box<DecodeError>,
    },
}

impl error::Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingId => write!(f, "visit record has no id"),
            DecodeError::MissingTimestamp => {
                write!(f, "visit record has no timestamp")
            }
            DecodeError::InvalidTimestamp(text) => {
                write!(f, "visit record has an invalid timestamp '{}'", text)
            }
            DecodeError::MissingLocation => {
                write!(f, "visit record has no latitude/longitude")
            }
            DecodeError::Record { index, reason } => {
                write!(f, "record #{}: {}", index, reason)
            }
        }
    }
}

/// Strings the front end used to render when a value was missing.
fn is_placeholder(text: &str) -> bool {
    let text = text.trim();
    text.is_empty()
        || text.eq_ignore_ascii_case("null")
        || text.eq_ignore_ascii_case("undefined")
        || text.eq_ignore_ascii_case("n/a")
}

fn non_placeholder(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !is_placeholder(text))
}

impl TryFrom<RawVisitRecord> for VisitRecord {
    type Error = DecodeError;

    fn try_from(raw: RawVisitRecord) -> Result<Self, Self::Error> {
        let id = non_placeholder(raw.id)
            .or_else(|| non_placeholder(raw.document_id))
            .ok_or(DecodeError::MissingId)?;
        let timestamp_text = raw.timestamp.ok_or(DecodeError::MissingTimestamp)?;
        let timestamp = date_time::parse_instant(&timestamp_text)
            .ok_or(DecodeError::InvalidTimestamp(timestamp_text))?;
        let location = raw
            .location
            .and_then(|location| location.lat.zip(location.lng))
            .map(|(lat, lng)| Coordinates::new(lat, lng))
            .ok_or(DecodeError::MissingLocation)?;

        Ok(VisitRecord {
            id: Id::new(id),
            timestamp,
            location,
            location_name: non_placeholder(raw.location_name),
            purpose: raw
                .purpose
                .map(Purpose::from)
                .unwrap_or(Purpose::Others),
            sub_purpose: non_placeholder(raw.sub_purpose),
            feedback: non_placeholder(raw.feedback),
            // kept verbatim, the distance parser owns the fallback rules
            distance_from_previous: raw.distance_from_previous,
        })
    }
}

/// Decodes a whole day's payload, failing on the first record that violates
/// the contract.
pub fn decode_all(raw: Vec<RawVisitRecord>) -> Result<Vec<VisitRecord>, DecodeError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| {
            VisitRecord::try_from(record).map_err(|reason| DecodeError::Record {
                index,
                reason: Box::new(reason),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn parse(json: &str) -> RawVisitRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_backend_document() {
        let raw = parse(
            r#"{
                "_id": "65f1",
                "timestamp": "2024-03-01T03:30:00.000Z",
                "location": { "lat": 28.61, "lng": 77.20 },
                "locationName": "",
                "purpose": "Site Visit",
                "distanceFromPrevious": "1.2 km",
                "image": "https://cdn.example/1.jpg"
            }"#,
        );
        let record = VisitRecord::try_from(raw).unwrap();
        assert_eq!(record.id.as_str(), "65f1");
        assert_eq!(
            record.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 3, 30, 0).unwrap()
        );
        assert_eq!(record.location_name, None);
        assert_eq!(record.purpose, Purpose::SiteVisit);
        assert_eq!(record.distance_from_previous.as_deref(), Some("1.2 km"));
    }

    #[test]
    fn numeric_distance_is_kept_as_text() {
        let raw = parse(
            r#"{"id": "a", "timestamp": "2024-03-01T03:30:00Z",
                "location": {"latitude": 1.0, "longitude": 2.0},
                "distanceFromPrevious": 350}"#,
        );
        let record = VisitRecord::try_from(raw).unwrap();
        assert_eq!(record.distance_from_previous.as_deref(), Some("350"));
        assert_eq!(record.purpose, Purpose::Others);
    }

    #[test]
    fn contract_violations_are_rejected() {
        let missing_timestamp =
            parse(r#"{"id": "a", "location": {"lat": 1.0, "lng": 2.0}}"#);
        assert_eq!(
            VisitRecord::try_from(missing_timestamp),
            Err(DecodeError::MissingTimestamp)
        );

        let bad_timestamp = parse(
            r#"{"id": "a", "timestamp": "soon", "location": {"lat": 1.0, "lng": 2.0}}"#,
        );
        assert_eq!(
            VisitRecord::try_from(bad_timestamp),
            Err(DecodeError::InvalidTimestamp("soon".to_owned()))
        );

        let no_location = parse(r#"{"id": "a", "timestamp": "2024-03-01T03:30:00Z"}"#);
        assert_eq!(
            VisitRecord::try_from(no_location),
            Err(DecodeError::MissingLocation)
        );
    }

    #[test]
    fn decode_all_reports_index() {
        let records = vec![
            parse(
                r#"{"id": "a", "timestamp": "2024-03-01T03:30:00Z",
                    "location": {"lat": 1.0, "lng": 2.0}}"#,
            ),
            parse(r#"{"timestamp": "2024-03-01T03:30:00Z"}"#),
        ];
        let err = decode_all(records).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Record {
                index: 1,
                reason: Box::new(DecodeError::MissingId)
            }
        );
        assert_eq!(err.to_string(), "record #1: visit record has no id");
    }

    #[test]
    fn document_with_both_ids() {
        let raw = parse(
            r#"{"_id": "65f1", "id": "65f1", "timestamp": "2024-03-01T03:30:00Z",
                "location": {"lat": 1.0, "lng": 2.0}}"#,
        );
        let record = VisitRecord::try_from(raw).unwrap();
        assert_eq!(record.id.as_str(), "65f1");

        let only_key = parse(
            r#"{"_id": "65f2", "id": "", "timestamp": "2024-03-01T03:30:00Z",
                "location": {"lat": 1.0, "lng": 2.0}}"#,
        );
        assert_eq!(VisitRecord::try_from(only_key).unwrap().id.as_str(), "65f2");
    }

    #[test]
    fn informational_fields_of_the_wrong_type_are_dropped() {
        let raw = parse(
            r#"{"id": "a", "timestamp": "2024-03-01T03:30:00Z",
                "location": {"lat": 1.0, "lng": 2.0},
                "locationName": 42, "purpose": ["Site Visit"],
                "subPurpose": true, "feedback": {"x": 1}}"#,
        );
        let record = VisitRecord::try_from(raw).unwrap();
        assert_eq!(record.location_name, None);
        assert_eq!(record.location_name_or_unknown(), "Unknown");
        assert_eq!(record.purpose, Purpose::Others);
        assert_eq!(record.sub_purpose, None);
        assert_eq!(record.feedback, None);
    }
}
