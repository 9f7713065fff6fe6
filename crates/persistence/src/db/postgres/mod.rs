//! PostgreSQL executor.

mod backend;
mod bind;
mod classify;
mod decode;

pub use backend::{PostgresBackend, PostgresConfig, PostgresSslMode};
pub use classify::{classify, classify_error};
pub use decode::decode_rows;
