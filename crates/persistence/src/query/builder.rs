//! Assembles SQL fragments and parameters from a composite query.

use tracing::warn;

use super::composite::CompositeQuery;
use super::filters::QueryFilter;
use super::value::Params;

/// Window count projected when paging is requested.
pub const TOTAL_CLAUSE: &str = ", COUNT(1) OVER() as found";

/// Derives the SQL fragments of one request from its composite query.
///
/// Every fragment is empty when no unit contributes to it, so fragments can
/// be interpolated into a statement template unconditionally:
///
/// ```
/// use airq_persistence::query::filters::{CountryIsoQuery, MonitorQuery};
/// use airq_persistence::query::{FilterSet, QueryBuilder};
///
/// let query = FilterSet::default()
///     .with(CountryIsoQuery::new(Some("us"))).unwrap()
///     .with(MonitorQuery::new(Some(true))).unwrap();
/// let builder = QueryBuilder::new(&query);
/// assert_eq!(
///     builder.where_clause(),
///     "WHERE country->>'code' = :iso\nAND ismonitor = :monitor"
/// );
/// assert_eq!(builder.pagination(), "");
/// ```
pub struct QueryBuilder<'a, Q: CompositeQuery + ?Sized> {
    query: &'a Q,
}

impl<'a, Q: CompositeQuery + ?Sized> QueryBuilder<'a, Q> {
    /// Creates a builder over `query`.
    pub fn new(query: &'a Q) -> Self {
        Self { query }
    }

    fn filters(&self) -> Vec<&'a dyn QueryFilter> {
        self.query.filters()
    }

    /// Union of every unit's named parameters.
    pub fn params(&self) -> Params {
        let mut params = Params::new();
        for filter in self.filters() {
            for (name, value) in filter.params() {
                if params.contains_key(&name) {
                    warn!(
                        filter = filter.name(),
                        parameter = %name,
                        "Parameter declared by more than one filter, keeping the first"
                    );
                    continue;
                }
                params.insert(name, value);
            }
        }
        params
    }

    /// Extra projections, each on its own line behind a leading comma.
    pub fn fields(&self) -> String {
        self.filters()
            .iter()
            .filter_map(|f| f.fields())
            .map(|field| format!("\n,{}", field))
            .collect()
    }

    /// `WHERE` with every contributed predicate joined by `AND`.
    pub fn where_clause(&self) -> String {
        let predicates: Vec<String> = self
            .filters()
            .iter()
            .filter_map(|f| f.where_clause())
            .collect();
        if predicates.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", predicates.join("\nAND "))
        }
    }

    /// Window row count, present only when a unit asks for one.
    pub fn total(&self) -> String {
        if self.filters().iter().any(|f| f.wants_total()) {
            TOTAL_CLAUSE.to_string()
        } else {
            String::new()
        }
    }

    /// `LIMIT`/`OFFSET` of the first unit that paginates.
    pub fn pagination(&self) -> String {
        self.filters()
            .iter()
            .find_map(|f| f.pagination())
            .map(|p| format!("\n{}", p))
            .unwrap_or_default()
    }
}
