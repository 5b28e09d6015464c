use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use schemars::{gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};
use utility::{
    geo,
    id::{HasId, Id},
};

use crate::{ExampleData, UNKNOWN_LOCATION};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        geo::is_valid_coordinate(self.lat, self.lng)
    }

    /// Straight-line distance in kilometers, `None` if either side is not a
    /// usable coordinate.
    pub fn direct_distance_km(&self, other: &Coordinates) -> Option<f64> {
        if !self.is_valid() || !other.is_valid() {
            return None;
        }
        Some(geo::haversine_distance(
            (self.lat, self.lng),
            (other.lat, other.lng),
        ))
    }
}

/// Reason recorded with a visit. Labels match what the check-in form sends;
/// anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Purpose {
    CheckIn,
    CheckOut,
    SiteVisit,
    BsnlOfficeVisit,
    BtOfficeVisit,
    NewSiteSurvey,
    OfficialTour,
    NewBusinessOpportunity,
    BusinessDevelopmentFollowUp,
    ExistingClientMeeting,
    PreventiveMeasures,
    OnLeave,
    Others,
    Other(String),
}

const PURPOSE_LABELS: &[(Purpose, &str)] = &[
    (Purpose::CheckIn, "Check In"),
    (Purpose::CheckOut, "Check Out"),
    (Purpose::SiteVisit, "Site Visit"),
    (Purpose::BsnlOfficeVisit, "BSNL Office Visit"),
    (Purpose::BtOfficeVisit, "BT Office Visit"),
    (Purpose::NewSiteSurvey, "New Site Survey"),
    (Purpose::OfficialTour, "Official Tour - Out of Station"),
    (
        Purpose::NewBusinessOpportunity,
        "NEW BUSINESS OPPORTUNITY - FIRST MEETING",
    ),
    (
        Purpose::BusinessDevelopmentFollowUp,
        "BUSINESS DEVELOPMENT- FOLLOW UP MEETING",
    ),
    (Purpose::ExistingClientMeeting, "Existing Client Meeting"),
    (Purpose::PreventiveMeasures, "Preventive Measures"),
    (Purpose::OnLeave, "On Leave"),
    (Purpose::Others, "Others"),
];

impl Purpose {
    pub fn label(&self) -> &str {
        if let Purpose::Other(label) = self {
            return label;
        }
        PURPOSE_LABELS
            .iter()
            .find(|(purpose, _)| purpose == self)
            .map(|(_, label)| *label)
            .unwrap_or_default()
    }

    /// Case and surrounding whitespace are ignored when matching known labels.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        PURPOSE_LABELS
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(trimmed))
            .map(|(purpose, _)| purpose.clone())
            .unwrap_or_else(|| Purpose::Other(trimmed.to_owned()))
    }

    pub fn is_check_in(&self) -> bool {
        matches!(self, Purpose::CheckIn)
    }

    pub fn is_check_out(&self) -> bool {
        matches!(self, Purpose::CheckOut)
    }

    pub fn is_site_visit(&self) -> bool {
        matches!(self, Purpose::SiteVisit)
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Purpose {
    fn from(value: String) -> Self {
        Purpose::from_label(&value)
    }
}

impl From<Purpose> for String {
    fn from(value: Purpose) -> Self {
        value.label().to_owned()
    }
}

impl JsonSchema for Purpose {
    fn schema_name() -> String {
        "Purpose".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        gen.subschema_for::<String>()
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub id: Id<VisitRecord>,
    pub timestamp: DateTime<Utc>,
    pub location: Coordinates,
    pub location_name: Option<String>,
    pub purpose: Purpose,
    pub sub_purpose: Option<String>,
    pub feedback: Option<String>,
    pub distance_from_previous: Option<String>,
}

impl HasId for VisitRecord {
    type IdType = String;
}

impl VisitRecord {
    pub fn location_name_or_unknown(&self) -> &str {
        self.location_name.as_deref().unwrap_or(UNKNOWN_LOCATION)
    }

    pub fn local_time(&self, zone: &FixedOffset) -> DateTime<FixedOffset> {
        zone.from_utc_datetime(&self.timestamp.naive_utc())
    }

    /// Calendar day of the visit as seen in `zone`.
    pub fn local_date(&self, zone: &FixedOffset) -> NaiveDate {
        self.local_time(zone).date_naive()
    }
}

impl ExampleData for VisitRecord {
    fn example_data() -> Self {
        Self {
            id: Id::new("65f1c0a2b7e4d9a1c2f30011".to_owned()),
            timestamp: Utc
                .with_ymd_and_hms(2024, 3, 1, 4, 15, 0)
                .single()
                .unwrap_or_default(),
            location: Coordinates::new(28.6139, 77.2090),
            location_name: Some("Connaught Place, New Delhi".to_owned()),
            purpose: Purpose::SiteVisit,
            sub_purpose: Some("Router Faulty".to_owned()),
            feedback: None,
            distance_from_previous: Some("2.3 km".to_owned()),
        }
    }
}
