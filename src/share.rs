//! Share batch document format and the decoded [`Share`] type.
//!
//! ## Batch document (JSON)
//!
//! ```text
//! {
//!     "keys": { "n": 4, "k": 3 },
//!     "1": { "base": "10", "value": "4" },
//!     "2": { "base": "2",  "value": "111" },
//!     "3": { "base": "10", "value": "12" },
//!     "6": { "base": "4",  "value": "213" }
//! }
//! ```
//!
//! The reserved key (here `keys`) carries the quorum `k` and an optional
//! declared share count `n`. Every other key is the decimal x-coordinate of
//! one share; its `base` is text (a bare integer is also accepted) and its
//! `value` is a digit string in that base.
//!
//! Entries keep their document order, duplicate keys included.

use crate::error::{Error, Result};
use crate::field::Modulus;
use crate::radix;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Decoded share: evaluation point `x` and field value `y`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    pub x: i64,
    pub y: u64,
}

impl Share {
    pub fn new(x: i64, y: u64) -> Self {
        Self { x, y }
    }

    /// Decode one raw record. `label` is the record's key in the batch.
    pub fn decode(label: &str, record: &serde_json::Value, modulus: Modulus) -> Result<Self> {
        let x = parse_label(label)?;
        let raw = RawShareRecord::deserialize(record)
            .map_err(|e| Error::malformed(label, e.to_string()))?;
        let base = match &raw.base {
            RawBase::Text(text) => radix::parse_base(label, text)?,
            RawBase::Number(n) => radix::check_base(*n)?,
        };
        let y = radix::decode(&raw.value, base, modulus)?;
        Ok(Self::new(x, y))
    }
}

// y is secret material; keep it out of logs.
impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("x", &self.x)
            .field("y", &"<redacted>")
            .finish()
    }
}

/// Parse a share label into its x-coordinate.
pub fn parse_label(label: &str) -> Result<i64> {
    label
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::malformed(label, "label is not an integer x-coordinate"))
}

/// External representation of a share before decoding.
#[derive(Deserialize, Debug)]
struct RawShareRecord {
    base: RawBase,
    value: String,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawBase {
    Text(String),
    Number(u64),
}

/// A batch document with its top-level entries in document order.
#[derive(Debug, Default)]
pub struct RawBatch {
    pub entries: Vec<(String, serde_json::Value)>,
}

impl RawBatch {
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// First entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<'de> Deserialize<'de> for RawBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BatchVisitor;

        impl<'de> Visitor<'de> for BatchVisitor {
            type Value = RawBatch;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object of share records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<RawBatch, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push((key, value));
                }
                Ok(RawBatch { entries })
            }
        }

        deserializer.deserialize_map(BatchVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_record() {
        let s = Share::decode("3", &json!({"base": "16", "value": "ff"}), Modulus::DEFAULT).unwrap();
        assert_eq!(s, Share::new(3, 255));
    }

    #[test]
    fn decode_numeric_base_and_negative_label() {
        let s = Share::decode("-2", &json!({"base": 2, "value": "101"}), Modulus::DEFAULT).unwrap();
        assert_eq!(s, Share::new(-2, 5));
    }

    #[test]
    fn decode_failures() {
        let p = Modulus::DEFAULT;
        assert!(matches!(
            Share::decode("x1", &json!({"base": "10", "value": "1"}), p),
            Err(Error::MalformedEntry { .. })
        ));
        assert!(matches!(
            Share::decode("1", &json!({"value": "1"}), p),
            Err(Error::MalformedEntry { .. })
        ));
        assert!(matches!(
            Share::decode("1", &json!({"base": "10", "value": 7}), p),
            Err(Error::MalformedEntry { .. })
        ));
        assert!(matches!(
            Share::decode("1", &json!("10:7"), p),
            Err(Error::MalformedEntry { .. })
        ));
        assert!(matches!(
            Share::decode("1", &json!({"base": "40", "value": "1"}), p),
            Err(Error::InvalidBase(40))
        ));
        assert!(matches!(
            Share::decode("1", &json!({"base": 1, "value": "1"}), p),
            Err(Error::InvalidBase(1))
        ));
        assert!(matches!(
            Share::decode("1", &json!({"base": 70_000_000_000u64, "value": "1"}), p),
            Err(Error::InvalidBase(70_000_000_000))
        ));
        assert!(matches!(
            Share::decode("1", &json!({"base": "8", "value": "9"}), p),
            Err(Error::InvalidDigit { digit: '9', base: 8 })
        ));
    }

    #[test]
    fn labels() {
        assert_eq!(parse_label("42").unwrap(), 42);
        assert_eq!(parse_label("007").unwrap(), 7);
        assert_eq!(parse_label("-5").unwrap(), -5);
        assert!(parse_label("").is_err());
        assert!(parse_label("1e3").is_err());
        assert!(parse_label("99999999999999999999").is_err());
    }

    #[test]
    fn debug_redacts_value() {
        let s = Share::new(1, 123456);
        let dbg = format!("{s:?}");
        assert!(dbg.contains("redacted"));
        assert!(!dbg.contains("123456"));
    }

    #[test]
    fn batch_keeps_document_order_and_duplicates() {
        let text = r#"{
            "keys": {"k": 2},
            "9": {"base": "10", "value": "1"},
            "1": {"base": "10", "value": "2"},
            "9": {"base": "10", "value": "3"}
        }"#;
        let batch = RawBatch::from_slice(text.as_bytes()).unwrap();
        let keys: Vec<&str> = batch.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["keys", "9", "1", "9"]);
        assert_eq!(batch.get("9").unwrap()["value"], "1");
    }

    #[test]
    fn batch_must_be_an_object() {
        assert!(matches!(RawBatch::from_slice(b"[1, 2]"), Err(Error::MalformedSource(_))));
        assert!(matches!(RawBatch::from_slice(b"{"), Err(Error::MalformedSource(_))));
        assert!(RawBatch::from_slice(b"{}").unwrap().entries.is_empty());
    }
}
