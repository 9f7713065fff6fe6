//! Response types shared by the execution layer and the HTTP layer.
//!
//! - [`ResultEnvelope`] - `{meta, results}` body of every list endpoint
//! - [`Meta`] - pagination metadata
//! - [`Found`] - exact or lower-bound row count
//!
//! # Examples
//!
//! ```
//! use airq_persistence::types::{Found, Meta, ResultEnvelope};
//! use serde_json::json;
//!
//! let envelope = ResultEnvelope {
//!     meta: Meta::new("/", 1, 2, Found::MoreThan(2)),
//!     results: vec![json!({"id": 1}), json!({"id": 2})],
//! };
//!
//! let body = serde_json::to_value(&envelope).unwrap();
//! assert_eq!(body["meta"]["found"], json!(">2"));
//! ```

mod envelope;

pub use envelope::{Found, Meta, ResultEnvelope};
