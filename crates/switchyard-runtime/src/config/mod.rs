//! Configuration module for the Switchyard runtime.
//!
//! Layered loading (defaults, files, environment, overrides) through
//! figment, plus validation of the merged result.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, RegistryConfig, ServerConfig,
    SpanEventConfig, SwitchyardConfig,
};
pub use validation::validate_config;
