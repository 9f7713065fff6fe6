//! Tri-state boolean flags. An unset flag does not filter; it is not `false`.

use crate::error::ValidationResult;
use crate::query::parse::parse_bool;
use crate::query::value::Params;

use super::{QueryFilter, RawParams};

/// Restricts rows to mobile or stationary locations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileQuery {
    mobile: Option<bool>,
}

impl MobileQuery {
    /// Creates the filter; `None` leaves it inactive.
    pub fn new(mobile: Option<bool>) -> Self {
        Self { mobile }
    }

    /// Builds the filter from the `mobile` request parameter.
    pub fn from_params(raw: &RawParams) -> ValidationResult<Self> {
        let mobile = raw
            .get("mobile")
            .map(|v| parse_bool("mobile", v))
            .transpose()?;
        Ok(Self::new(mobile))
    }

    /// The requested flag value.
    pub fn mobile(&self) -> Option<bool> {
        self.mobile
    }
}

impl QueryFilter for MobileQuery {
    fn name(&self) -> &'static str {
        "mobile"
    }

    fn is_active(&self) -> bool {
        self.mobile.is_some()
    }

    fn where_clause(&self) -> Option<String> {
        self.is_active().then(|| "ismobile = :mobile".to_string())
    }

    fn params(&self) -> Params {
        Params::from([("mobile".to_string(), self.mobile.into())])
    }
}

/// Restricts rows to reference-grade monitors or to low-cost sensors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorQuery {
    monitor: Option<bool>,
}

impl MonitorQuery {
    /// Creates the filter; `None` leaves it inactive.
    pub fn new(monitor: Option<bool>) -> Self {
        Self { monitor }
    }

    /// Builds the filter from the `monitor` request parameter.
    pub fn from_params(raw: &RawParams) -> ValidationResult<Self> {
        let monitor = raw
            .get("monitor")
            .map(|v| parse_bool("monitor", v))
            .transpose()?;
        Ok(Self::new(monitor))
    }

    /// The requested flag value.
    pub fn monitor(&self) -> Option<bool> {
        self.monitor
    }
}

impl QueryFilter for MonitorQuery {
    fn name(&self) -> &'static str {
        "monitor"
    }

    fn is_active(&self) -> bool {
        self.monitor.is_some()
    }

    fn where_clause(&self) -> Option<String> {
        self.is_active().then(|| "ismonitor = :monitor".to_string())
    }

    fn params(&self) -> Params {
        Params::from([("monitor".to_string(), self.monitor.into())])
    }
}
