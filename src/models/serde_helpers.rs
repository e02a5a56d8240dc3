//! Serde adapters for secrets and backend timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize as _, Deserializer, Serializer};

/// Naive ISO-8601 layout emitted by the backend (no UTC offset).
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Serializes a secret by exposing it. Only used for request bodies.
pub(crate) fn serialize_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Serializes an optional secret; pair with `skip_serializing_if`.
pub(crate) fn serialize_optional_secret<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match *secret {
        Some(ref value) => serializer.serialize_str(value.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Deserializes an optional string straight into a secret.
pub(crate) fn deserialize_optional_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Parses a backend timestamp, accepting RFC 3339 or naive ISO-8601
/// (interpreted as UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Deserializes a required backend timestamp.
pub(crate) fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Deserializes an optional backend timestamp.
pub(crate) fn deserialize_optional_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse_timestamp(&raw)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_naive_timestamp_as_utc() {
        let parsed = parse_timestamp("2024-05-01T10:30:00.123456").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T10:30:00.123456+00:00");
    }

    #[test]
    fn parses_naive_timestamp_without_fraction() {
        let parsed = parse_timestamp("2024-05-01T10:30:00").unwrap();
        assert_eq!(parsed.timestamp(), 1_714_559_400);
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_timestamp("2024-05-01T17:30:00+07:00").unwrap();
        assert_eq!(parsed.timestamp(), 1_714_559_400);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
