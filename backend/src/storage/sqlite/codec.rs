//! Text encodings for the values SQLite stores as TEXT.
//!
//! Timestamps are RFC 3339 in UTC with microseconds, so that string order
//! is time order. Dates are `YYYY-MM-DD`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use shared::UnknownVariant;

use crate::storage::traits::{StoreError, StoreResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("timestamp '{}': {}", value, e)))
}

pub fn encode_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn decode_date(value: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StoreError::Corrupt(format!("date '{}': {}", value, e)))
}

pub fn decode_optional_date(value: Option<String>) -> StoreResult<Option<NaiveDate>> {
    value.as_deref().map(decode_date).transpose()
}

pub fn decode_enum<T>(value: &str) -> StoreResult<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    value
        .parse()
        .map_err(|e: UnknownVariant| StoreError::Corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::HealthStatus;

    #[test]
    fn test_timestamps_sort_as_text() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let (a, b) = (encode_timestamp(&earlier), encode_timestamp(&later));
        assert_eq!(a, "2024-01-01T09:00:00.000000Z");
        assert!(a < b);
        assert_eq!(decode_timestamp(&a).unwrap(), earlier);
    }

    #[test]
    fn test_bad_values_are_corrupt() {
        assert!(matches!(decode_timestamp("yesterday"), Err(StoreError::Corrupt(_))));
        assert!(matches!(decode_date("2024-13-01"), Err(StoreError::Corrupt(_))));
        assert!(matches!(decode_enum::<HealthStatus>("Fine"), Err(StoreError::Corrupt(_))));
        assert_eq!(decode_optional_date(None).unwrap(), None);
    }
}
