use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::error::ValidationError;

/// RFC3339 timestamp guaranteed to be UTC.
///
/// Used for `created_at` / `updated_at` / `price_updated_at` stamps on
/// repository records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let not_utc = || ValidationError::TimestampNotUtc {
            value: input.to_owned(),
        };
        let parsed = OffsetDateTime::parse(input, &Rfc3339).map_err(|_| not_utc())?;
        if parsed.offset() != UtcOffset::UTC {
            return Err(not_utc());
        }
        Ok(Self(parsed))
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .expect("UTC timestamps are always RFC3339 formattable")
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
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

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_rfc3339() {
        let ts = UtcDateTime::parse("2026-01-15T09:30:00Z").expect("valid timestamp");
        assert_eq!(ts.format_rfc3339(), "2026-01-15T09:30:00Z");
    }

    #[test]
    fn rejects_non_utc_offset() {
        let error = UtcDateTime::parse("2026-01-15T09:30:00+02:00").expect_err("offset not UTC");
        assert!(matches!(error, ValidationError::TimestampNotUtc { .. }));
    }

    #[test]
    fn serde_round_trips_as_string() {
        let ts = UtcDateTime::parse("2026-01-15T09:30:00Z").expect("valid timestamp");
        let json = serde_json::to_string(&ts).expect("serializes");
        assert_eq!(json, "\"2026-01-15T09:30:00Z\"");
        let back: UtcDateTime = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, ts);
    }
}
