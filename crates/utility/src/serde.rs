pub mod date_time {
    use chrono::{DateTime, NaiveDateTime, Utc};

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];

    /// Parses an instant as sent by the attendance backend. Values carrying an
    /// offset (`2024-03-01T09:00:00.000Z`, `...+05:30`) are converted to UTC,
    /// values without one are taken as UTC.
    pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
        let text = text.trim();
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
            return Some(with_offset.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .map(|naive| naive.and_utc())
    }
}

/// Accepts a JSON string, number or null and keeps it as text. The backend
/// has been seen to send `distanceFromPrevious` as either `"1.2 km"` or `350`.
pub mod string_or_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(f64),
        Flag(bool),
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Loose>::deserialize(deserializer)? {
            Some(Loose::Text(text)) => Some(text),
            Some(Loose::Number(number)) => Some(number.to_string()),
            Some(Loose::Flag(_)) | None => None,
        })
    }
}

/// Keeps JSON strings and drops every other value to `None`, so a stray
/// number or object in an informational field never fails the record.
pub mod lenient_text {
    use serde::{de::IgnoredAny, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Other(IgnoredAny),
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Loose>::deserialize(deserializer)? {
            Some(Loose::Text(text)) => Some(text),
            Some(Loose::Other(_)) | None => None,
        })
    }
}
