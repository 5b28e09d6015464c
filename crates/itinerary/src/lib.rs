//! Distance and transit computation over one day of geotagged visits.
//!
//! Everything in here is pure: records go in, derived values come out, and
//! the same input always produces the same output.

use model::{itinerary::ItinerarySummary, visit::VisitRecord};

pub mod daily;
pub mod distance;
pub mod format;
pub mod labels;
pub mod segmenter;

pub use segmenter::compute_itinerary_summary;

/// Visits of one user on one calendar day, ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Itinerary {
    records: Vec<VisitRecord>,
}

impl Itinerary {
    /// Sorts `records` by timestamp. The sort is stable, so visits sharing a
    /// timestamp keep the order the backend sent them in.
    pub fn new(mut records: Vec<VisitRecord>) -> Self {
        records.sort_by_key(|record| record.timestamp);
        Self { records }
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<VisitRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> ItinerarySummary {
        compute_itinerary_summary(&self.records)
    }
}

impl From<Vec<VisitRecord>> for Itinerary {
    fn from(records: Vec<VisitRecord>) -> Self {
        Self::new(records)
    }
}
