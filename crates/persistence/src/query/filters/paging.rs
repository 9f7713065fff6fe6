//! Page-based pagination.

use crate::error::{ValidationError, ValidationResult};
use crate::query::parse::parse_number;
use crate::query::value::Params;

use super::{QueryFilter, RawParams};

/// Largest page size any [`Paging`] accepts.
pub const MAX_LIMIT: u32 = 1000;

/// Default and upper bound for the `limit` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingPolicy {
    /// Page size used when the request carries no `limit`.
    pub default_limit: u32,
    /// Largest accepted page size.
    pub max_limit: u32,
}

impl PagingPolicy {
    /// Creates a policy. `max_limit` is capped at [`MAX_LIMIT`] and a default
    /// above it is lowered to it.
    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.min(MAX_LIMIT);
        Self {
            default_limit: default_limit.min(max_limit),
            max_limit,
        }
    }
}

impl Default for PagingPolicy {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

/// `page` / `limit` pagination. Pages are 1-indexed.
///
/// ```
/// use airq_persistence::query::filters::{Paging, QueryFilter};
///
/// let paging = Paging::new(42, 1000).unwrap();
/// assert_eq!(paging.offset(), 41_000);
/// assert_eq!(paging.pagination().as_deref(), Some("LIMIT :limit OFFSET :offset"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    page: u32,
    limit: u32,
}

impl Paging {
    /// Creates paging for `page` with `limit` rows per page.
    ///
    /// `limit` must lie in `1..=MAX_LIMIT`.
    pub fn new(page: u32, limit: u32) -> ValidationResult<Self> {
        if page < 1 {
            return Err(ValidationError::invalid("page", "page must be 1 or greater"));
        }
        if limit < 1 {
            return Err(ValidationError::invalid("limit", "limit must be 1 or greater"));
        }
        if limit > MAX_LIMIT {
            return Err(ValidationError::invalid(
                "limit",
                format!("limit must not exceed {}", MAX_LIMIT),
            ));
        }
        Ok(Self { page, limit })
    }

    /// Builds paging from the `page` and `limit` request parameters.
    pub fn from_params(raw: &RawParams, policy: &PagingPolicy) -> ValidationResult<Self> {
        let page = match raw.get("page") {
            Some(v) => parse_number::<u32>("page", v)?,
            None => 1,
        };
        let limit = match raw.get("limit") {
            Some(v) => parse_number::<u32>("limit", v)?,
            None => policy.default_limit,
        };
        if limit > policy.max_limit {
            return Err(ValidationError::invalid(
                "limit",
                format!("limit must not exceed {}", policy.max_limit),
            ));
        }
        Self::new(page, limit)
    }

    /// One-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows skipped before this page.
    ///
    /// Cannot overflow: `page - 1 < 2^32` and `limit <= MAX_LIMIT`.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 1,
            limit: PagingPolicy::default().default_limit,
        }
    }
}

impl QueryFilter for Paging {
    fn name(&self) -> &'static str {
        "paging"
    }

    fn is_active(&self) -> bool {
        true
    }

    fn pagination(&self) -> Option<String> {
        Some("LIMIT :limit OFFSET :offset".to_string())
    }

    fn wants_total(&self) -> bool {
        true
    }

    fn params(&self) -> Params {
        Params::from([
            ("page".to_string(), self.page.into()),
            ("limit".to_string(), self.limit.into()),
            ("offset".to_string(), self.offset().into()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::value::SqlValue;

    #[test]
    fn test_paging_offset() {
        let paging = Paging::new(42, 1000).unwrap();
        assert_eq!(paging.offset(), 41_000);
        assert_eq!(paging.params()["offset"], SqlValue::Int(41_000));
        assert_eq!(paging.params()["limit"], SqlValue::Int(1000));
    }

    #[test]
    fn test_first_page_has_zero_offset() {
        assert_eq!(Paging::new(1, 100).unwrap().offset(), 0);
    }

    #[test]
    fn test_paging_contributes_no_where() {
        let paging = Paging::default();
        assert_eq!(paging.where_clause(), None);
        assert_eq!(paging.fields(), None);
        assert!(paging.wants_total());
    }

    #[test]
    fn test_defaults_from_policy() {
        let policy = PagingPolicy::new(25, 500);
        let paging = Paging::from_params(&RawParams::default(), &policy).unwrap();
        assert_eq!(paging.page(), 1);
        assert_eq!(paging.limit(), 25);
    }

    #[test]
    fn test_limit_above_max_rejected() {
        let raw = RawParams::from_pairs([("limit", "1001")]);
        assert!(Paging::from_params(&raw, &PagingPolicy::default()).is_err());
    }

    #[test]
    fn test_page_zero_rejected() {
        let raw = RawParams::from_pairs([("page", "0")]);
        let err = Paging::from_params(&raw, &PagingPolicy::default()).unwrap_err();
        assert!(err.to_string().contains("page"));
    }

    #[test]
    fn test_negative_page_rejected() {
        let raw = RawParams::from_pairs([("page", "-2")]);
        assert!(Paging::from_params(&raw, &PagingPolicy::default()).is_err());
    }

    #[test]
    fn test_limit_above_ceiling_rejected_by_new() {
        let err = Paging::new(1, MAX_LIMIT + 1).unwrap_err();
        assert!(err.to_string().contains("limit"));
        assert!(Paging::new(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_last_page_offset_stays_positive() {
        let paging = Paging::new(u32::MAX, MAX_LIMIT).unwrap();
        assert_eq!(paging.offset(), i64::from(u32::MAX - 1) * 1000);
        assert_eq!(
            paging.params()["offset"],
            SqlValue::Int(i64::from(u32::MAX - 1) * 1000)
        );
    }

    #[test]
    fn test_policy_max_capped_by_ceiling() {
        let policy = PagingPolicy::new(100, 50_000);
        assert_eq!(policy.max_limit, MAX_LIMIT);
    }

    #[test]
    fn test_policy_default_capped_by_max() {
        let policy = PagingPolicy::new(5000, 1000);
        assert_eq!(policy.default_limit, 1000);
    }
}
