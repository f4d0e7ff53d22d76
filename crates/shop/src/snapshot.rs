//! Versioned serialization of persisted collections.
//!
//! Every collection is written as an envelope:
//!
//! ```json
//! {"version": 1, "items": [ ... ]}
//! ```
//!
//! A bare JSON array is also accepted on read. That is the unversioned shape
//! the browser storefront wrote to `localStorage`; it decodes as version 0 and
//! is rewritten as an envelope on the next mutation.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Version reported for unversioned legacy arrays.
pub const LEGACY_VERSION: u32 = 0;

/// Errors decoding or encoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The stored text is not a valid snapshot of the expected shape.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The envelope is missing its version or items.
    #[error("snapshot envelope is missing '{0}'")]
    MissingField(&'static str),

    /// The envelope was written by an unknown schema.
    #[error("unsupported snapshot version {found} (expected {SCHEMA_VERSION})")]
    UnsupportedVersion { found: u64 },
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    items: &'a [T],
}

/// A decoded collection together with the schema version it was stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub version: u32,
    pub items: Vec<T>,
}

impl<T> Decoded<T> {
    /// Whether the data was stored in the unversioned legacy shape.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        self.version == LEGACY_VERSION
    }
}

/// Encode a collection as a current-version envelope.
///
/// # Errors
///
/// Returns `SnapshotError::Malformed` if an item fails to serialize.
pub fn encode<T: Serialize>(items: &[T]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&Envelope {
        version: SCHEMA_VERSION,
        items,
    })?)
}

/// Decode a stored collection.
///
/// # Errors
///
/// Returns an error if the text is not JSON, the version is unknown, or the
/// items do not match `T`.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<Decoded<T>, SnapshotError> {
    let value: Value = serde_json::from_str(raw)?;

    match value {
        Value::Array(_) => Ok(Decoded {
            version: LEGACY_VERSION,
            items: serde_json::from_value(value)?,
        }),
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or(SnapshotError::MissingField("version"))?;
            if version != u64::from(SCHEMA_VERSION) {
                return Err(SnapshotError::UnsupportedVersion { found: version });
            }
            let items = map
                .remove("items")
                .ok_or(SnapshotError::MissingField("items"))?;
            Ok(Decoded {
                version: SCHEMA_VERSION,
                items: serde_json::from_value(items)?,
            })
        }
        other => Err(SnapshotError::Malformed(serde::de::Error::custom(format!(
            "expected an array or an envelope object, found {other}"
        )))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_writes_envelope() {
        let encoded = encode(&["a", "b"]).unwrap();
        assert_eq!(encoded, r#"{"version":1,"items":["a","b"]}"#);
    }

    #[test]
    fn test_decode_current_envelope() {
        let decoded: Decoded<String> = decode(r#"{"version":1,"items":["x"]}"#).unwrap();
        assert_eq!(decoded.version, SCHEMA_VERSION);
        assert_eq!(decoded.items, vec!["x".to_string()]);
        assert!(!decoded.is_legacy());
    }

    #[test]
    fn test_decode_legacy_array() {
        let decoded: Decoded<u32> = decode("[1, 2, 3]").unwrap();
        assert!(decoded.is_legacy());
        assert_eq!(decoded.items, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let result: Result<Decoded<u32>, _> = decode(r#"{"version":7,"items":[]}"#);
        assert!(matches!(
            result,
            Err(SnapshotError::UnsupportedVersion { found: 7 })
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode::<u32>("{not json"),
            Err(SnapshotError::Malformed(_))
        ));
        assert!(matches!(
            decode::<u32>("\"a string\""),
            Err(SnapshotError::Malformed(_))
        ));
        assert!(matches!(
            decode::<u32>(r#"{"items":[]}"#),
            Err(SnapshotError::MissingField("version"))
        ));
        assert!(matches!(
            decode::<u32>(r#"{"version":1,"items":["nope"]}"#),
            Err(SnapshotError::Malformed(_))
        ));
    }
}
