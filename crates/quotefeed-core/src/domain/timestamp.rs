use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

/// Instant written as an RFC3339 UTC string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self::from(OffsetDateTime::now_utc())
    }

    fn format_rfc3339(self) -> String {
        // Years outside 0..=9999 are the only RFC3339 formatting failure.
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }
}

impl From<OffsetDateTime> for UtcDateTime {
    fn from(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

/// Calendar date serialized as `YYYY-MM-DD`.
pub mod iso_date {
    use super::*;

    pub fn format(date: Date) -> String {
        date.format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| date.to_string())
    }

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(*date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::{date, datetime};

    #[test]
    fn offsets_are_normalized_to_utc() {
        let stamp = UtcDateTime::from(datetime!(2024-01-01 5:30 +5:30));
        assert_eq!(
            serde_json::to_value(stamp).expect("serializes"),
            json!("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn formats_iso_calendar_date() {
        assert_eq!(iso_date::format(date!(2024 - 03 - 07)), "2024-03-07");
    }
}
