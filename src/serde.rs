/// (De)serializes timestamps of waypoint records.
///
/// Accepts RFC 3339 (`2019-01-01T10:00:00Z`), `2019-01-01 10:00:00` (assumed UTC)
/// and epoch seconds, and always writes RFC 3339.
pub mod timestamp {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::macros::format_description;
    use time::{OffsetDateTime, PrimitiveDateTime};

    /// Parses a timestamp in any of the supported formats
    pub fn parse(value: &str) -> Result<OffsetDateTime, String> {
        let value = value.trim();
        if let Ok(seconds) = value.parse::<i64>() {
            return OffsetDateTime::from_unix_timestamp(seconds).map_err(|e| e.to_string());
        }
        if let Ok(seconds) = value.parse::<f64>() {
            if !seconds.is_finite() {
                return Err(format!("timestamp \"{value}\" is not a finite number of seconds"));
            }
            return OffsetDateTime::from_unix_timestamp_nanos((seconds * 1e9) as i128)
                .map_err(|e| e.to_string());
        }
        if let Ok(datetime) = OffsetDateTime::parse(value, &Rfc3339) {
            return Ok(datetime);
        }
        PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
        .or_else(|_| {
            PrimitiveDateTime::parse(
                value,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            )
        })
        .map(|datetime| datetime.assume_utc())
        .map_err(|e| format!("unsupported timestamp \"{value}\": {e}"))
    }

    pub fn serialize<S: Serializer>(
        value: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let value = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).map_err(de::Error::custom)
    }
}
