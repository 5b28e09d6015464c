use chrono::{DateTime, Utc};
use itertools::Itertools;
use model::{
    itinerary::{ItinerarySummary, TransitSegment},
    visit::VisitRecord,
};

use crate::{distance::parse_distance_km, labels::waypoint_labels};

/// Whole minutes from `from` to `to`, rounded down. Out-of-order timestamps
/// give `0` rather than a negative duration.
pub fn transit_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let minutes = (to - from).num_minutes();
    if minutes < 0 {
        log::warn!(
            "visit at {} precedes previous visit at {}, clamping transit time",
            to,
            from
        );
        return 0;
    }
    minutes as u64
}

fn segment(
    from_index: usize,
    from: &VisitRecord,
    to: &VisitRecord,
    labels: &[String],
) -> TransitSegment {
    let to_index = from_index + 1;
    TransitSegment {
        from_index,
        to_index,
        distance_km: parse_distance_km(to.distance_from_previous.as_deref()),
        duration_minutes: transit_minutes(from.timestamp, to.timestamp),
        from_label: labels[from_index].clone(),
        to_label: labels[to_index].clone(),
        direct_distance_km: from.location.direct_distance_km(&to.location),
    }
}

/// Splits an ordered day of visits into transit segments and sums their
/// distances.
///
/// Each segment's distance is the `distance_from_previous` of the visit it
/// ends at. The first visit's own distance field is ignored since nothing
/// precedes it. Fewer than two visits give an empty summary.
///
/// The records are taken in the order given; use [`crate::Itinerary`] when
/// the order is not guaranteed.
pub fn compute_itinerary_summary(records: &[VisitRecord]) -> ItinerarySummary {
    let labels = waypoint_labels(records.len());

    let segments = records
        .iter()
        .enumerate()
        .tuple_windows()
        .map(|((from_index, from), (_, to))| segment(from_index, from, to, &labels))
        .collect::<Vec<_>>();

    let total_distance_km = segments
        .iter()
        .fold(0.0, |total, segment| total + segment.distance_km);

    ItinerarySummary {
        total_distance_km,
        segments,
        labels,
    }
}
