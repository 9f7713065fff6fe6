//! Query composition.
//!
//! Requests are turned into SQL in three steps:
//!
//! 1. [`filters`]: each filter unit parses and validates its own slice of the
//!    raw request parameters.
//! 2. [`composite`]: the units of one endpoint are held together and checked
//!    for rules spanning several units.
//! 3. [`builder`]: the units are consulted in declaration order and their
//!    fragments assembled into `fields`, `total`, `WHERE` and `LIMIT` clauses
//!    plus one named parameter map.
//!
//! All of this is synchronous and side-effect free; SQL with `:name`
//! placeholders is handed to [`crate::db`] for rendering and execution.

pub mod builder;
pub mod composite;
pub mod filters;
pub mod parse;
pub mod value;

pub use builder::QueryBuilder;
pub use composite::{CompositeQuery, FilterSet, LocationsQueries, ProvidersQueries};
pub use filters::{QueryFilter, RawParams};
pub use value::{Params, SqlValue};
