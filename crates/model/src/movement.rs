use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{itinerary::ItinerarySummary, visit::VisitRecord};

/// One calendar day of a user's movement timeline.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyMovement {
    pub date: NaiveDate,
    pub movements: Vec<VisitRecord>,
    /// First "Check In" of the day.
    pub check_in_time: Option<DateTime<Utc>>,
    /// Last "Check Out" of the day.
    pub check_out_time: Option<DateTime<Utc>>,
    pub site_visits: usize,
    pub summary: ItinerarySummary,
}
