//! Conversions between domain-facing values and their BSON encodings.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};

/// Identifier that is not a 24-character hex ObjectId.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier format: '{0}'")]
pub struct InvalidObjectId(pub String);

/// Parses the opaque string id used at the domain boundary.
pub fn parse_object_id(id: &str) -> Result<ObjectId, InvalidObjectId> {
    ObjectId::parse_str(id).map_err(|_| InvalidObjectId(id.to_string()))
}

pub fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

/// Millisecond precision; values outside chrono's range clamp to the epoch.
pub fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);

        for bad in ["", "123", "zzzzzzzzzzzzzzzzzzzzzzzz", "507f1f77bcf86cd79943901"] {
            assert_eq!(
                parse_object_id(bad).unwrap_err(),
                InvalidObjectId(bad.to_string())
            );
        }
    }

    #[test]
    fn test_datetime_conversion_keeps_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 2, 29, 13, 45, 10).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(from_bson_datetime(to_bson_datetime(dt)), dt);
    }
}
