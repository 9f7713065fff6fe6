//! Date range filters over the `datetime` column.
//!
//! Dates and timestamps without an offset are compared in the row's own
//! timezone; timestamps carrying an offset are compared in absolute time.

use crate::error::ValidationResult;
use crate::query::parse::{DateParam, parse_date_param};
use crate::query::value::{Params, SqlValue};

use super::{QueryFilter, RawParams};

const DATETIME_COLUMN: &str = "datetime";
const TIMEZONE_COLUMN: &str = "timezone";

fn bound_clause(param: &str, operator: &str, value: &DateParam) -> String {
    if value.is_local() {
        format!(
            "{} {} (:{}::timestamp AT TIME ZONE {})",
            DATETIME_COLUMN, operator, param, TIMEZONE_COLUMN
        )
    } else {
        format!("{} {} :{}", DATETIME_COLUMN, operator, param)
    }
}

fn bound_value(value: Option<&DateParam>) -> SqlValue {
    match value {
        None => SqlValue::Null,
        Some(DateParam::Date(d)) => SqlValue::Date(*d),
        Some(DateParam::Naive(ts)) => SqlValue::Timestamp(*ts),
        Some(DateParam::Aware(ts)) => SqlValue::TimestampTz(*ts),
    }
}

/// Lower, exclusive bound on `datetime`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateFromQuery {
    date_from: Option<DateParam>,
}

impl DateFromQuery {
    /// Creates the filter from an already parsed value.
    pub fn new(date_from: Option<DateParam>) -> Self {
        Self { date_from }
    }

    /// Builds the filter from the `date_from` request parameter.
    pub fn from_params(raw: &RawParams) -> ValidationResult<Self> {
        let date_from = raw
            .get("date_from")
            .map(|v| parse_date_param("date_from", v))
            .transpose()?;
        Ok(Self::new(date_from))
    }

    /// The lower bound, when set.
    pub fn date_from(&self) -> Option<&DateParam> {
        self.date_from.as_ref()
    }
}

impl QueryFilter for DateFromQuery {
    fn name(&self) -> &'static str {
        "date_from"
    }

    fn is_active(&self) -> bool {
        self.date_from.is_some()
    }

    fn where_clause(&self) -> Option<String> {
        self.date_from
            .as_ref()
            .map(|v| bound_clause("date_from", ">", v))
    }

    fn params(&self) -> Params {
        Params::from([("date_from".to_string(), bound_value(self.date_from.as_ref()))])
    }
}

/// Upper, inclusive bound on `datetime`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateToQuery {
    date_to: Option<DateParam>,
}

impl DateToQuery {
    /// Creates the filter from an already parsed value.
    pub fn new(date_to: Option<DateParam>) -> Self {
        Self { date_to }
    }

    /// Builds the filter from the `date_to` request parameter.
    pub fn from_params(raw: &RawParams) -> ValidationResult<Self> {
        let date_to = raw
            .get("date_to")
            .map(|v| parse_date_param("date_to", v))
            .transpose()?;
        Ok(Self::new(date_to))
    }

    /// The upper bound, when set.
    pub fn date_to(&self) -> Option<&DateParam> {
        self.date_to.as_ref()
    }
}

impl QueryFilter for DateToQuery {
    fn name(&self) -> &'static str {
        "date_to"
    }

    fn is_active(&self) -> bool {
        self.date_to.is_some()
    }

    fn where_clause(&self) -> Option<String> {
        self.date_to.as_ref().map(|v| bound_clause("date_to", "<=", v))
    }

    fn params(&self) -> Params {
        Params::from([("date_to".to_string(), bound_value(self.date_to.as_ref()))])
    }
}
