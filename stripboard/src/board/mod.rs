//! Board specification: the validated data model and its YAML loader.

pub mod config;
pub mod schema;

pub use config::ConfigError;
pub use schema::*;
