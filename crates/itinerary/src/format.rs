use chrono::{DateTime, FixedOffset, Offset, Utc};

/// India Standard Time, the zone the field teams report in.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Fixed zone used to turn stored instants into calendar days and clock
/// times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone(FixedOffset);

impl DisplayZone {
    /// `None` for offsets outside ±24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self)
    }

    pub fn offset(&self) -> &FixedOffset {
        &self.0
    }

    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.0)
    }

    /// Clock time such as `"09:05 AM"`.
    pub fn time_of_day(&self, instant: DateTime<Utc>) -> String {
        self.localize(instant).format("%I:%M %p").to_string()
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self(FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap_or(Utc.fix()))
    }
}

/// `"<H> hr <M> min"`, or `"<M> min"` below an hour.
pub fn format_duration(duration_minutes: u64) -> String {
    let hours = duration_minutes / 60;
    let minutes = duration_minutes % 60;
    if hours > 0 {
        format!("{} hr {} min", hours, minutes)
    } else {
        format!("{} min", minutes)
    }
}

/// Two decimals and a unit, e.g. `"4.83 km"`.
pub fn format_distance_km(distance_km: f64) -> String {
    format!("{:.2} km", distance_km)
}
