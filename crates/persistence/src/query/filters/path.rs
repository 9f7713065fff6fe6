//! Single-resource lookups by path id.

use crate::error::{ValidationError, ValidationResult};
use crate::query::value::Params;

use super::QueryFilter;

fn check_id(parameter: &str, id: i64) -> ValidationResult<i64> {
    if id >= 1 {
        Ok(id)
    } else {
        Err(ValidationError::invalid(
            parameter,
            format!("{} must be 1 or greater", parameter),
        ))
    }
}

/// `/locations/{locations_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationPathQuery {
    locations_id: i64,
}

impl LocationPathQuery {
    /// Fails unless `locations_id` is at least 1.
    pub fn new(locations_id: i64) -> ValidationResult<Self> {
        Ok(Self {
            locations_id: check_id("locations_id", locations_id)?,
        })
    }

    /// The location id.
    pub fn locations_id(&self) -> i64 {
        self.locations_id
    }
}

impl QueryFilter for LocationPathQuery {
    fn name(&self) -> &'static str {
        "locations_id"
    }

    fn is_active(&self) -> bool {
        true
    }

    fn where_clause(&self) -> Option<String> {
        Some("id = :locations_id".to_string())
    }

    fn params(&self) -> Params {
        Params::from([("locations_id".to_string(), self.locations_id.into())])
    }
}

/// `/providers/{providers_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPathQuery {
    providers_id: i64,
}

impl ProviderPathQuery {
    /// Fails unless `providers_id` is at least 1.
    pub fn new(providers_id: i64) -> ValidationResult<Self> {
        Ok(Self {
            providers_id: check_id("providers_id", providers_id)?,
        })
    }

    /// The provider id.
    pub fn providers_id(&self) -> i64 {
        self.providers_id
    }
}

impl QueryFilter for ProviderPathQuery {
    fn name(&self) -> &'static str {
        "providers_id"
    }

    fn is_active(&self) -> bool {
        true
    }

    fn where_clause(&self) -> Option<String> {
        Some("id = :providers_id".to_string())
    }

    fn params(&self) -> Params {
        Params::from([("providers_id".to_string(), self.providers_id.into())])
    }
}
