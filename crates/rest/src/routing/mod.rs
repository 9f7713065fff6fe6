//! Route configuration for the Airq API.

pub mod v3_routes;

pub use v3_routes::create_routes;
