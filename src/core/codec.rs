//! JSON encoding and decoding for API payloads.
//!
//! One convention for the whole client: fields map by name (or explicit
//! `#[serde(rename)]`), and dates are ISO-8601 / RFC 3339 strings, which is
//! what `chrono`'s serde support reads and writes for `DateTime<Utc>`.
//!
//! Decoding goes through `serde_path_to_error` so a failure reports the
//! path of the offending field along with its classification.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::{ApiError, DecodeError, DecodeErrorKind};

/// Encode a request object as JSON bytes.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequestObject`] if the value cannot be
/// represented as JSON (e.g. a map with non-string keys).
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(value).map_err(|e| ApiError::InvalidRequestObject(e.to_string()))
}

/// Decode JSON bytes into `T`.
///
/// # Errors
///
/// Returns a classified [`DecodeError`] on malformed JSON, a missing
/// required field, a `null` where a value is required, or a type mismatch.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value: T = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        let path = e.path().to_string();
        from_json_error(path, &e.into_inner())
    })?;
    deserializer
        .end()
        .map_err(|e| from_json_error(".".to_string(), &e))?;
    Ok(value)
}

fn from_json_error(path: String, error: &serde_json::Error) -> DecodeError {
    DecodeError {
        kind: classify(error),
        path,
        message: error.to_string(),
    }
}

/// Map a `serde_json` error onto a decode failure kind.
#[must_use]
pub fn classify(error: &serde_json::Error) -> DecodeErrorKind {
    match error.classify() {
        Category::Io | Category::Syntax | Category::Eof => DecodeErrorKind::Corrupted,
        Category::Data => {
            let message = error.to_string();
            if message.starts_with("missing field") {
                DecodeErrorKind::MissingKey
            } else if message.starts_with("invalid type: null") {
                DecodeErrorKind::NullValue
            } else {
                DecodeErrorKind::TypeMismatch
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Photo {
        title: String,
        #[serde(rename = "date_taken")]
        taken: DateTime<Utc>,
        views: u32,
        inner: Inner,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Inner {
        m: String,
    }

    fn sample() -> Photo {
        Photo {
            title: "Ribeira".to_string(),
            taken: Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap(),
            views: 7,
            inner: Inner {
                m: "http://x/y.jpg".to_string(),
            },
        }
    }

    #[test]
    fn round_trip_preserves_value() {
        let bytes = encode(&sample()).unwrap();
        let back: Photo = decode(&bytes).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn dates_use_iso8601() {
        let bytes = encode(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(r#""date_taken":"2024-01-01T12:30:00Z""#), "{text}");
    }

    #[test]
    fn malformed_json_is_corrupted() {
        let err = decode::<Photo>(b"{\"title\": ").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Corrupted);

        let err = decode::<Photo>(b"not json").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Corrupted);
    }

    #[test]
    fn trailing_garbage_is_corrupted() {
        let mut bytes = encode(&sample()).unwrap();
        bytes.extend_from_slice(b" trailing");
        let err = decode::<Photo>(&bytes).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Corrupted);
    }

    #[test]
    fn missing_field_is_missing_key() {
        let json = br#"{"title":"a","date_taken":"2024-01-01T00:00:00Z","views":1}"#;
        let err = decode::<Photo>(json).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::MissingKey);
        assert!(err.message.contains("inner"), "{}", err.message);
    }

    #[test]
    fn null_field_is_null_value() {
        let json = br#"{"title":null,"date_taken":"2024-01-01T00:00:00Z","views":1,"inner":{"m":""}}"#;
        let err = decode::<Photo>(json).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::NullValue);
        assert_eq!(err.path, "title");
    }

    #[test]
    fn wrong_type_is_type_mismatch_with_nested_path() {
        let json = br#"{"title":"a","date_taken":"2024-01-01T00:00:00Z","views":1,"inner":{"m":5}}"#;
        let err = decode::<Photo>(json).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::TypeMismatch);
        assert_eq!(err.path, "inner.m");
    }

    #[test]
    fn bad_date_is_type_mismatch() {
        let json = br#"{"title":"a","date_taken":"yesterday","views":1,"inner":{"m":""}}"#;
        let err = decode::<Photo>(json).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::TypeMismatch);
        assert_eq!(err.path, "date_taken");
    }

    #[test]
    fn non_string_map_keys_fail_to_encode() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "value");
        let err = encode(&map).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequestObject(_)), "{err:?}");
    }
}
