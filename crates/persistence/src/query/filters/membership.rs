//! Membership filters over nested JSON attributes of a row.

use crate::error::ValidationResult;
use crate::query::parse::parse_comma_separated;
use crate::query::value::{Params, SqlValue};

use super::{QueryFilter, RawParams};

/// Generates a filter matching a JSON id attribute against a list of ids.
macro_rules! id_list_filter {
    ($(#[$meta:meta])* $name:ident, $filter:literal, $param:literal, $predicate:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            ids: Option<Vec<i64>>,
        }

        impl $name {
            /// Creates the filter from already parsed ids.
            pub fn new(ids: Option<Vec<i64>>) -> Self {
                Self { ids }
            }

            #[doc = concat!("Builds the filter from the `", $param, "` request parameter.")]
            pub fn from_params(raw: &RawParams) -> ValidationResult<Self> {
                let ids = raw
                    .get($param)
                    .map(|v| parse_comma_separated::<i64>($param, v))
                    .transpose()?;
                Ok(Self::new(ids))
            }

            /// The ids matched against.
            pub fn ids(&self) -> Option<&[i64]> {
                self.ids.as_deref()
            }
        }

        impl QueryFilter for $name {
            fn name(&self) -> &'static str {
                $filter
            }

            fn is_active(&self) -> bool {
                self.ids.is_some()
            }

            fn where_clause(&self) -> Option<String> {
                self.is_active().then(|| $predicate.to_string())
            }

            fn params(&self) -> Params {
                Params::from([($param.to_string(), self.ids.clone().into())])
            }
        }
    };
}

id_list_filter!(
    /// Restricts rows to the given country ids.
    CountryIdQuery,
    "countries_id",
    "countries_id",
    "(country->'id')::int = ANY (:countries_id)"
);

id_list_filter!(
    /// Restricts rows to the given provider ids.
    ProviderQuery,
    "providers_id",
    "providers_id",
    "(provider->'id')::int = ANY (:providers_id)"
);

id_list_filter!(
    /// Restricts rows to the given owner contact ids.
    OwnerQuery,
    "owner_contacts_id",
    "owner_contacts_id",
    "(owner->'id')::int = ANY (:owner_contacts_id)"
);

id_list_filter!(
    /// Restricts rows to those measuring any of the given parameter ids.
    ParametersQuery,
    "parameters_id",
    "parameters_id",
    "parameters_id = ANY (:parameters_id)"
);

/// Restricts rows to one country by its ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryIsoQuery {
    iso: Option<String>,
}

impl CountryIsoQuery {
    /// Creates the filter from a country code.
    pub fn new(iso: Option<&str>) -> Self {
        Self {
            iso: iso.map(str::to_string),
        }
    }

    /// Builds the filter from the `iso` request parameter.
    pub fn from_params(raw: &RawParams) -> ValidationResult<Self> {
        Ok(Self::new(raw.get("iso")))
    }

    /// The country code matched against.
    pub fn iso(&self) -> Option<&str> {
        self.iso.as_deref()
    }
}

impl QueryFilter for CountryIsoQuery {
    fn name(&self) -> &'static str {
        "iso"
    }

    fn is_active(&self) -> bool {
        self.iso.is_some()
    }

    fn where_clause(&self) -> Option<String> {
        self.is_active()
            .then(|| "country->>'code' = :iso".to_string())
    }

    fn params(&self) -> Params {
        let iso = self.iso.clone().map(SqlValue::Text).unwrap_or(SqlValue::Null);
        Params::from([("iso".to_string(), iso)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_id_single() {
        let raw = RawParams::from_pairs([("countries_id", "13")]);
        let query = CountryIdQuery::from_params(&raw).unwrap();
        assert_eq!(query.ids(), Some(&[13][..]));
        assert_eq!(
            query.where_clause().as_deref(),
            Some("(country->'id')::int = ANY (:countries_id)")
        );
        assert_eq!(query.params()["countries_id"], SqlValue::IntList(vec![13]));
    }

    #[test]
    fn test_country_id_list() {
        let raw = RawParams::from_pairs([("countries_id", "1,2,3")]);
        let query = CountryIdQuery::from_params(&raw).unwrap();
        assert_eq!(query.ids(), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn test_country_id_non_int() {
        let raw = RawParams::from_pairs([("countries_id", "1,us")]);
        assert!(CountryIdQuery::from_params(&raw).is_err());
    }

    #[test]
    fn test_provider_where() {
        let query = ProviderQuery::new(Some(vec![1, 2]));
        assert_eq!(
            query.where_clause().as_deref(),
            Some("(provider->'id')::int = ANY (:providers_id)")
        );
    }

    #[test]
    fn test_owner_where() {
        let query = OwnerQuery::new(Some(vec![4]));
        assert_eq!(
            query.where_clause().as_deref(),
            Some("(owner->'id')::int = ANY (:owner_contacts_id)")
        );
    }

    #[test]
    fn test_parameters_where() {
        let raw = RawParams::from_pairs([("parameters_id", "2,5")]);
        let query = ParametersQuery::from_params(&raw).unwrap();
        assert_eq!(
            query.where_clause().as_deref(),
            Some("parameters_id = ANY (:parameters_id)")
        );
        assert_eq!(query.params()["parameters_id"], SqlValue::IntList(vec![2, 5]));
    }

    #[test]
    fn test_country_iso() {
        let query = CountryIsoQuery::new(Some("US"));
        assert_eq!(
            query.where_clause().as_deref(),
            Some("country->>'code' = :iso")
        );
        assert_eq!(query.params()["iso"], SqlValue::Text("US".to_string()));
    }

    #[test]
    fn test_absent_membership_filters_contribute_nothing() {
        let raw = RawParams::default();
        let filters: Vec<Box<dyn QueryFilter>> = vec![
            Box::new(CountryIdQuery::from_params(&raw).unwrap()),
            Box::new(CountryIsoQuery::from_params(&raw).unwrap()),
            Box::new(ProviderQuery::from_params(&raw).unwrap()),
            Box::new(OwnerQuery::from_params(&raw).unwrap()),
            Box::new(ParametersQuery::from_params(&raw).unwrap()),
        ];
        for filter in filters {
            assert!(!filter.is_active(), "{} should be inactive", filter.name());
            assert_eq!(filter.where_clause(), None);
            assert_eq!(filter.fields(), None);
            assert!(filter.params().values().all(SqlValue::is_null));
        }
    }
}
