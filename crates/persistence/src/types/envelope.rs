//! Paged result envelope.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Number of rows matching a query.
///
/// A `LIMIT`ed query that fills its page cannot know the real total, so it
/// reports [`Found::MoreThan`] instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    /// The exact total.
    Exact(u64),
    /// At least one row more than the given number exists, serialized `">N"`.
    MoreThan(u64),
}

impl Found {
    /// Reads a count reported by the backend, either a number or `">N"`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Found::Exact),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl Default for Found {
    fn default() -> Self {
        Found::Exact(0)
    }
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Exact(n) => write!(f, "{}", n),
            Found::MoreThan(n) => write!(f, ">{}", n),
        }
    }
}

impl std::str::FromStr for Found {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('>') {
            Some(n) => n.trim().parse().map(Found::MoreThan),
            None => s.trim().parse().map(Found::Exact),
        }
    }
}

impl Serialize for Found {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Found::Exact(n) => serializer.serialize_u64(*n),
            Found::MoreThan(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Found {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FoundVisitor;

        impl Visitor<'_> for FoundVisitor {
            type Value = Found;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a row count or a \">N\" string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Found, E> {
                Ok(Found::Exact(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Found, E> {
                u64::try_from(v)
                    .map(Found::Exact)
                    .map_err(|_| E::custom("row count cannot be negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Found, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(FoundVisitor)
    }
}

/// Pagination metadata of a result envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Base URL of the API.
    pub website: String,
    /// One-based page number.
    pub page: u64,
    /// Requested page size.
    pub limit: u64,
    /// Total matching rows, exact or as a lower bound.
    pub found: Found,
}

impl Meta {
    /// Creates metadata for one page.
    pub fn new(website: impl Into<String>, page: u64, limit: u64, found: Found) -> Self {
        Self {
            website: website.into(),
            page,
            limit,
            found,
        }
    }
}

/// `{meta, results}` response body shared by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Pagination metadata.
    pub meta: Meta,
    /// One JSON object per row.
    pub results: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_found_serialization() {
        assert_eq!(serde_json::to_value(Found::Exact(12)).unwrap(), json!(12));
        assert_eq!(
            serde_json::to_value(Found::MoreThan(100)).unwrap(),
            json!(">100")
        );
    }

    #[test]
    fn test_found_deserialization() {
        let exact: Found = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(exact, Found::Exact(7));
        let more: Found = serde_json::from_value(json!(">1000")).unwrap();
        assert_eq!(more, Found::MoreThan(1000));
        assert!(serde_json::from_value::<Found>(json!(-1)).is_err());
        assert!(serde_json::from_value::<Found>(json!("lots")).is_err());
    }

    #[test]
    fn test_found_from_value() {
        assert_eq!(Found::from_value(&json!(3)), Some(Found::Exact(3)));
        assert_eq!(Found::from_value(&json!(">5")), Some(Found::MoreThan(5)));
        assert_eq!(Found::from_value(&Value::Null), None);
    }

    #[test]
    fn test_envelope_shape() {
        let envelope = ResultEnvelope {
            meta: Meta::new("/", 1, 100, Found::MoreThan(100)),
            results: vec![json!({"id": 1})],
        };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "meta": {
                    "website": "/",
                    "page": 1,
                    "limit": 100,
                    "found": ">100"
                },
                "results": [{"id": 1}]
            })
        );
    }
}
