//! Composite queries: the full filter surface of one endpoint.
//!
//! A composite holds its filter units as plain fields and hands them to the
//! [`QueryBuilder`](super::QueryBuilder) through [`CompositeQuery::filters`]
//! in declaration order. Identical input therefore always yields identical SQL.

use crate::error::{ValidationError, ValidationResult};

use super::filters::{
    BboxQuery, CountryIdQuery, CountryIsoQuery, LocationPathQuery, MobileQuery, MonitorQuery,
    OwnerQuery, Paging, PagingPolicy, ParametersQuery, ProviderPathQuery, ProviderQuery,
    QueryFilter, RadiusQuery, RawParams,
};

/// A combination of filter units consulted together by the query builder.
pub trait CompositeQuery: Send + Sync {
    /// The constituent units, in declaration order.
    fn filters(&self) -> Vec<&dyn QueryFilter>;

    /// Checks rules spanning more than one unit.
    ///
    /// The default rejects more than one active spatial unit.
    fn validate(&self) -> ValidationResult<()> {
        check_single_spatial(&self.filters())
    }
}

/// Fails when more than one spatial unit is active.
pub fn check_single_spatial(filters: &[&dyn QueryFilter]) -> ValidationResult<()> {
    let spatial: Vec<&str> = filters
        .iter()
        .filter(|f| f.is_spatial())
        .map(|f| f.name())
        .collect();
    if spatial.len() > 1 {
        return Err(ValidationError::conflict(format!(
            "{} cannot be used together",
            spatial.join(" and ")
        )));
    }
    Ok(())
}

/// An ad hoc composite of boxed units, consulted in insertion order.
#[derive(Debug, Default)]
pub struct FilterSet {
    filters: Vec<Box<dyn QueryFilter>>,
}

impl FilterSet {
    /// Builds a validated set from `filters`.
    pub fn new(filters: Vec<Box<dyn QueryFilter>>) -> ValidationResult<Self> {
        let set = Self { filters };
        set.validate()?;
        Ok(set)
    }

    /// Appends a unit, revalidating the set.
    pub fn with(mut self, filter: impl QueryFilter + 'static) -> ValidationResult<Self> {
        self.filters.push(Box::new(filter));
        self.validate()?;
        Ok(self)
    }

    /// Number of units in the set.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true when the set holds no units.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl CompositeQuery for FilterSet {
    fn filters(&self) -> Vec<&dyn QueryFilter> {
        self.filters.iter().map(|f| f.as_ref()).collect()
    }
}

/// Filter surface of `GET /v3/locations`.
///
/// Fields are the constituent units, in the order the builder consults them.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default)]
pub struct LocationsQueries {
    pub paging: Paging,
    pub radius: RadiusQuery,
    pub bbox: BboxQuery,
    pub provider: ProviderQuery,
    pub owner: OwnerQuery,
    pub country_id: CountryIdQuery,
    pub country_iso: CountryIsoQuery,
    pub mobile: MobileQuery,
    pub monitor: MonitorQuery,
}

impl LocationsQueries {
    /// Parses and validates every unit from the raw request parameters.
    pub fn from_params(raw: &RawParams, policy: &PagingPolicy) -> ValidationResult<Self> {
        let query = Self {
            paging: Paging::from_params(raw, policy)?,
            radius: RadiusQuery::from_params(raw)?,
            bbox: BboxQuery::from_params(raw)?,
            provider: ProviderQuery::from_params(raw)?,
            owner: OwnerQuery::from_params(raw)?,
            country_id: CountryIdQuery::from_params(raw)?,
            country_iso: CountryIsoQuery::from_params(raw)?,
            mobile: MobileQuery::from_params(raw)?,
            monitor: MonitorQuery::from_params(raw)?,
        };
        query.validate()?;
        Ok(query)
    }
}

impl CompositeQuery for LocationsQueries {
    fn filters(&self) -> Vec<&dyn QueryFilter> {
        vec![
            &self.paging as &dyn QueryFilter,
            &self.radius,
            &self.bbox,
            &self.provider,
            &self.owner,
            &self.country_id,
            &self.country_iso,
            &self.mobile,
            &self.monitor,
        ]
    }
}

/// Filter surface of `GET /v3/providers`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default)]
pub struct ProvidersQueries {
    pub paging: Paging,
    pub radius: RadiusQuery,
    pub bbox: BboxQuery,
    pub country_id: CountryIdQuery,
    pub country_iso: CountryIsoQuery,
    pub monitor: MonitorQuery,
    pub parameters: ParametersQuery,
}

impl ProvidersQueries {
    /// Parses and validates every unit from the raw request parameters.
    pub fn from_params(raw: &RawParams, policy: &PagingPolicy) -> ValidationResult<Self> {
        let query = Self {
            paging: Paging::from_params(raw, policy)?,
            radius: RadiusQuery::from_params(raw)?,
            bbox: BboxQuery::from_params(raw)?,
            country_id: CountryIdQuery::from_params(raw)?,
            country_iso: CountryIsoQuery::from_params(raw)?,
            monitor: MonitorQuery::from_params(raw)?,
            parameters: ParametersQuery::from_params(raw)?,
        };
        query.validate()?;
        Ok(query)
    }
}

impl CompositeQuery for ProvidersQueries {
    fn filters(&self) -> Vec<&dyn QueryFilter> {
        vec![
            &self.paging as &dyn QueryFilter,
            &self.radius,
            &self.bbox,
            &self.country_id,
            &self.country_iso,
            &self.monitor,
            &self.parameters,
        ]
    }
}

impl CompositeQuery for LocationPathQuery {
    fn filters(&self) -> Vec<&dyn QueryFilter> {
        vec![self as &dyn QueryFilter]
    }
}

impl CompositeQuery for ProviderPathQuery {
    fn filters(&self) -> Vec<&dyn QueryFilter> {
        vec![self as &dyn QueryFilter]
    }
}
