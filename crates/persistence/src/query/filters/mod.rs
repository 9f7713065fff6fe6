//! Filter units.
//!
//! A filter unit owns one orthogonal filtering concern (a radius search, a date
//! bound, a provider list, paging) and contributes, independently of every
//! other unit:
//!
//! - an optional WHERE predicate ([`QueryFilter::where_clause`]),
//! - an optional extra SELECT projection ([`QueryFilter::fields`]),
//! - an optional LIMIT/OFFSET fragment ([`QueryFilter::pagination`]),
//! - its validated values as named parameters ([`QueryFilter::params`]).
//!
//! Units are built once per request from [`RawParams`], validate their own
//! input on construction, and are immutable afterwards. A unit whose inputs
//! are all absent contributes no SQL and declares its parameters as null.
//!
//! # Example
//!
//! ```
//! use airq_persistence::query::filters::{QueryFilter, RadiusQuery, RawParams};
//!
//! let raw = RawParams::from_pairs([("coordinates", "38.907,-77.037"), ("radius", "1000")]);
//! let radius = RadiusQuery::from_params(&raw).unwrap();
//! assert_eq!(
//!     radius.where_clause().as_deref(),
//!     Some("ST_DWithin(ST_MakePoint(:lon, :lat)::geography, geog, :radius)")
//! );
//! ```

mod flags;
mod membership;
mod paging;
mod path;
mod spatial;
mod temporal;

use std::collections::HashMap;

pub use flags::{MobileQuery, MonitorQuery};
pub use membership::{CountryIdQuery, CountryIsoQuery, OwnerQuery, ParametersQuery, ProviderQuery};
pub use paging::{MAX_LIMIT, Paging, PagingPolicy};
pub use path::{LocationPathQuery, ProviderPathQuery};
pub use spatial::{BboxQuery, RadiusQuery};
pub use temporal::{DateFromQuery, DateToQuery};

use crate::query::value::Params;

/// One independent, optional contributor to a composed query.
pub trait QueryFilter: std::fmt::Debug + Send + Sync {
    /// Short name used in logs and conflict messages.
    fn name(&self) -> &'static str;

    /// Returns true when the unit contributes anything beyond null parameters.
    fn is_active(&self) -> bool;

    /// WHERE predicate contributed by this unit.
    fn where_clause(&self) -> Option<String> {
        None
    }

    /// Extra SELECT projection contributed by this unit.
    fn fields(&self) -> Option<String> {
        None
    }

    /// LIMIT/OFFSET fragment contributed by this unit.
    fn pagination(&self) -> Option<String> {
        None
    }

    /// Whether the composed query should carry a window row count.
    fn wants_total(&self) -> bool {
        false
    }

    /// Whether this unit restricts results spatially.
    ///
    /// At most one active spatial unit may appear in a composite query.
    fn is_spatial(&self) -> bool {
        false
    }

    /// The unit's named parameters; absent values are declared as null.
    fn params(&self) -> Params;
}

/// Raw query-string parameters as they arrived on the request.
///
/// Empty values (`?radius=`) are treated the same as missing ones.
#[derive(Debug, Clone, Default)]
pub struct RawParams {
    params: HashMap<String, String>,
}

impl RawParams {
    /// Creates raw params from a map.
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Creates raw params from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the non-empty value of a parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Returns true when no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl From<HashMap<String, String>> for RawParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self::new(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_params_empty_value_is_absent() {
        let raw = RawParams::from_pairs([("radius", ""), ("bbox", "  "), ("iso", "us")]);
        assert_eq!(raw.get("radius"), None);
        assert_eq!(raw.get("bbox"), None);
        assert_eq!(raw.get("iso"), Some("us"));
        assert_eq!(raw.get("missing"), None);
    }
}
