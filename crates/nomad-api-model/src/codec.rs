// Wire encodings shared by the model types

use chrono::{DateTime, Utc};

/// Base64 encoding for binary fields (`Data`, `Payload`).
/// A missing or null value decodes to an empty buffer.
pub mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt {
            None => Ok(Vec::new()),
            Some(s) if s.is_empty() => Ok(Vec::new()),
            Some(s) => BASE64.decode(s.as_bytes()).map_err(serde::de::Error::custom),
        }
    }
}

/// Same as [`base64_bytes`] for optional payloads
pub mod base64_opt_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(b) => serializer.serialize_str(&BASE64.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        opt.map(|s| BASE64.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Converts a Unix-nanosecond wire timestamp. Zero means "never set".
pub fn nanos_to_datetime(nanos: i64) -> Option<DateTime<Utc>> {
    if nanos == 0 {
        None
    } else {
        Some(DateTime::from_timestamp_nanos(nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Blob {
        #[serde(rename = "Data", default, with = "base64_bytes")]
        data: Vec<u8>,
    }

    #[test]
    fn test_base64_bytes() {
        let blob = Blob {
            data: b"hi\n".to_vec(),
        };
        let json = serde_json::to_string(&blob).unwrap();
        assert_eq!(json, r#"{"Data":"aGkK"}"#);

        let decoded: Blob = serde_json::from_str(r#"{"Data":null}"#).unwrap();
        assert!(decoded.data.is_empty());

        let decoded: Blob = serde_json::from_str("{}").unwrap();
        assert!(decoded.data.is_empty());

        assert!(serde_json::from_str::<Blob>(r#"{"Data":"***"}"#).is_err());
    }

    #[test]
    fn test_nanos_to_datetime() {
        assert!(nanos_to_datetime(0).is_none());
        let dt = nanos_to_datetime(1_500_000_000_000_000_000).unwrap();
        assert_eq!(dt.timestamp(), 1_500_000_000);
    }
}
