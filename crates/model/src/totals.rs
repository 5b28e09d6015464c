use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::itinerary::{ItinerarySummary, TransitSegment};

/// Body of the backend's "save computed totals" call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTotalsRequest {
    pub date: NaiveDate,
    pub total_distance_km: f64,
    pub segments: Vec<TransitSegment>,
}

impl SaveTotalsRequest {
    pub fn from_summary(date: NaiveDate, summary: &ItinerarySummary) -> Self {
        Self {
            date,
            total_distance_km: summary.total_distance_km,
            segments: summary.segments.clone(),
        }
    }
}
