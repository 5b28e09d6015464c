use chrono::NaiveDate;
use indexmap::IndexMap;
use model::{movement::DailyMovement, visit::VisitRecord};

use crate::{format::DisplayZone, Itinerary};

impl Itinerary {
    /// Timeline entry for this itinerary, taken to be the visits of `date`.
    pub fn daily_movement(self, date: NaiveDate) -> DailyMovement {
        let summary = self.summary();
        let records = self.into_records();

        let check_in_time = records
            .iter()
            .find(|record| record.purpose.is_check_in())
            .map(|record| record.timestamp);
        let check_out_time = records
            .iter()
            .rev()
            .find(|record| record.purpose.is_check_out())
            .map(|record| record.timestamp);
        let site_visits = records
            .iter()
            .filter(|record| record.purpose.is_site_visit())
            .count();

        DailyMovement {
            date,
            movements: records,
            check_in_time,
            check_out_time,
            site_visits,
            summary,
        }
    }
}

/// Splits one user's visits into calendar days as seen in `zone`, oldest day
/// first. Each day is segmented on its own, so the first visit of a day never
/// carries transit from the previous evening.
pub fn split_by_day(records: Vec<VisitRecord>, zone: &DisplayZone) -> Vec<Itinerary> {
    group_by_day(records, zone)
        .into_values()
        .collect::<Vec<_>>()
}

fn group_by_day(
    records: Vec<VisitRecord>,
    zone: &DisplayZone,
) -> IndexMap<NaiveDate, Itinerary> {
    // sorted first, so the map's insertion order is already ascending by day
    let mut by_day: IndexMap<NaiveDate, Vec<VisitRecord>> = IndexMap::new();
    for record in Itinerary::new(records).into_records() {
        by_day
            .entry(record.local_date(zone.offset()))
            .or_default()
            .push(record);
    }
    by_day
        .into_iter()
        .map(|(date, records)| (date, Itinerary::new(records)))
        .collect()
}

/// Per-day movement timeline for one user.
pub fn daily_movements(records: Vec<VisitRecord>, zone: &DisplayZone) -> Vec<DailyMovement> {
    let days = group_by_day(records, zone);
    log::debug!("building movement timeline for {} day(s)", days.len());
    days.into_iter()
        .map(|(date, itinerary)| itinerary.daily_movement(date))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use model::{visit::Purpose, ExampleData};
    use utility::id::Id;

    use super::*;

    fn at(id: &str, timestamp: DateTime<Utc>, purpose: Purpose, distance: Option<&str>) -> VisitRecord {
        VisitRecord {
            id: Id::new(id.to_owned()),
            timestamp,
            purpose,
            distance_from_previous: distance.map(str::to_owned),
            ..VisitRecord::example_data()
        }
    }

    fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn groups_by_local_day() {
        let zone = DisplayZone::default();
        // 19:00 UTC on the 1st is 00:30 IST on the 2nd
        let records = vec![
            at("late", utc(1, 19, 0), Purpose::SiteVisit, Some("3 km")),
            at("morning", utc(1, 3, 30), Purpose::CheckIn, None),
            at("noon", utc(1, 6, 30), Purpose::SiteVisit, Some("1 km")),
        ];
        let days = split_by_day(records, &zone);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].len(), 2);
        assert_eq!(days[0].records()[0].id.as_str(), "morning");
        assert_eq!(days[1].records()[0].id.as_str(), "late");
    }

    #[test]
    fn daily_counters() {
        let zone = DisplayZone::default();
        let records = vec![
            at("in", utc(1, 3, 30), Purpose::CheckIn, None),
            at("v1", utc(1, 5, 0), Purpose::SiteVisit, Some("2 km")),
            at("v2", utc(1, 7, 0), Purpose::SiteVisit, Some("500 m")),
            at("out1", utc(1, 11, 0), Purpose::CheckOut, Some("0 m")),
            at("out2", utc(1, 12, 0), Purpose::CheckOut, Some("1 km")),
        ];
        let days = daily_movements(records, &zone);
        assert_eq!(days.len(), 1);

        let day = &days[0];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(day.check_in_time, Some(utc(1, 3, 30)));
        assert_eq!(day.check_out_time, Some(utc(1, 12, 0)));
        assert_eq!(day.site_visits, 2);
        assert_eq!(day.summary.segments.len(), 4);
        assert_eq!(day.summary.total_distance_km, 3.5);
    }

    #[test]
    fn day_boundary_resets_labels_and_transit() {
        let zone = DisplayZone::default();
        let records = vec![
            at("d1", utc(1, 4, 0), Purpose::CheckIn, None),
            at("d2", utc(2, 4, 0), Purpose::CheckIn, Some("40 km")),
        ];
        let days = daily_movements(records, &zone);
        assert_eq!(days.len(), 2);
        assert!(days.iter().all(|day| day.summary.segments.is_empty()));
        assert!(days.iter().all(|day| day.summary.labels == vec!["A"]));
    }

    #[test]
    fn no_records_no_days() {
        assert!(daily_movements(Vec::new(), &DisplayZone::default()).is_empty());
    }
}
