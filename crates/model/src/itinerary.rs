use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

/// Movement between two consecutive visits of one itinerary.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitSegment {
    pub from_index: usize,
    pub to_index: usize,
    pub distance_km: f64,
    pub duration_minutes: u64,
    pub from_label: String,
    pub to_label: String,
    /// Great-circle distance between the two check-in coordinates. Only a
    /// cross-check, never part of any total.
    pub direct_distance_km: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItinerarySummary {
    pub total_distance_km: f64,
    pub segments: Vec<TransitSegment>,
    pub labels: Vec<String>,
}

impl ItinerarySummary {
    pub fn total_duration_minutes(&self) -> u64 {
        self.segments
            .iter()
            .map(|segment| segment.duration_minutes)
            .sum()
    }
}

impl ExampleData for ItinerarySummary {
    fn example_data() -> Self {
        Self {
            total_distance_km: 2.3,
            segments: vec![TransitSegment {
                from_index: 0,
                to_index: 1,
                distance_km: 2.3,
                duration_minutes: 45,
                from_label: "A".to_owned(),
                to_label: "B".to_owned(),
                direct_distance_km: Some(1.87),
            }],
            labels: vec!["A".to_owned(), "B".to_owned()],
        }
    }
}
