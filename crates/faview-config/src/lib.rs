//! # Faview Config
//!
//! TOML configuration for faview: loading with `${VAR}` substitution,
//! the schema with defaults for every field, and validation.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
