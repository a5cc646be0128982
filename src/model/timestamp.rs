//! Serde encoding for Firestore-style timestamps.
//!
//! Events are stored with `{"seconds": i64, "nanoseconds": u32}` timestamps.
//! Use with `#[serde(with = "crate::model::timestamp")]` on a
//! `DateTime<Utc>` field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
struct RawTimestamp {
    seconds: i64,
    #[serde(default)]
    nanoseconds: u32,
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    RawTimestamp {
        seconds: value.timestamp(),
        nanoseconds: value.timestamp_subsec_nanos(),
    }
    .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawTimestamp::deserialize(deserializer)?;
    DateTime::from_timestamp(raw.seconds, raw.nanoseconds).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "timestamp out of range: {}s {}ns",
            raw.seconds, raw.nanoseconds
        ))
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wrapper {
        #[serde(with = "super")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_deserialize_firestore_timestamp() {
        let json = r#"{"at":{"seconds":1704067200,"nanoseconds":500}}"#;
        let wrapper: Wrapper = serde_json::from_str(json).unwrap();
        assert_eq!(wrapper.at.timestamp(), 1_704_067_200);
        assert_eq!(wrapper.at.timestamp_subsec_nanos(), 500);
    }

    #[test]
    fn test_missing_nanoseconds_defaults_to_zero() {
        let json = r#"{"at":{"seconds":0}}"#;
        let wrapper: Wrapper = serde_json::from_str(json).unwrap();
        assert_eq!(wrapper.at, Utc.timestamp_opt(0, 0).unwrap());
    }

    #[test]
    fn test_serialize_uses_seconds_and_nanoseconds() {
        let wrapper = Wrapper {
            at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let value = serde_json::to_value(&wrapper).unwrap();
        assert_eq!(value["at"]["seconds"], 1_704_067_200);
        assert_eq!(value["at"]["nanoseconds"], 0);
    }

    #[test]
    fn test_rejects_plain_string() {
        let json = r#"{"at":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Wrapper>(json).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_nanoseconds() {
        let json = r#"{"at":{"seconds":0,"nanoseconds":4000000000}}"#;
        assert!(serde_json::from_str::<Wrapper>(json).is_err());
    }
}
