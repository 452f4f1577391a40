//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogFormat, LogOutput, LoggingConfig, RegistryConfig, ServerConfig, SwitchyardConfig};

/// Validates the entire configuration.
///
/// `known_processors` is the set of names the runtime is able to register;
/// every entry of `registry.disabled` must be one of them.
pub fn validate_config(config: &SwitchyardConfig, known_processors: &[&str]) -> ConfigResult<()> {
    validate_server_config(&config.server)?;
    validate_registry_config(&config.registry, known_processors)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates HTTP listener settings.
fn validate_server_config(server: &ServerConfig) -> ConfigResult<()> {
    if server.host.trim().is_empty() {
        return Err(ConfigError::missing_field("server.host"));
    }

    validate_port(server.port)?;
    validate_route_prefix(&server.route_prefix)?;

    if server.max_body_bytes == 0 {
        return Err(ConfigError::validation(
            "server.max_body_bytes must be greater than 0",
        ));
    }

    Ok(())
}

/// Validates processor registration settings.
fn validate_registry_config(registry: &RegistryConfig, known: &[&str]) -> ConfigResult<()> {
    let mut seen = HashSet::new();

    for name in &registry.disabled {
        if !known.contains(&name.as_str()) {
            return Err(ConfigError::UnknownProcessor(name.clone()));
        }
        if !seen.insert(name) {
            return Err(ConfigError::validation(format!(
                "Processor '{name}' is listed twice in registry.disabled"
            )));
        }
    }

    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.file_name().is_none() {
        return Err(ConfigError::validation(format!(
            "logging.file_path must name a file, got '{}'",
            logging.file_path.display()
        )));
    }

    if logging.format == LogFormat::Json && !cfg!(feature = "json-log") {
        return Err(ConfigError::validation(
            "logging.format = \"json\" requires the json-log feature",
        ));
    }

    for module in logging.filters.keys() {
        if module.is_empty() || module.contains(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid logging filter target: '{module}'"
            )));
        }
    }

    Ok(())
}

/// Validates a port number.
fn validate_port(port: u16) -> ConfigResult<()> {
    if port == 0 {
        return Err(ConfigError::InvalidPort(port));
    }
    Ok(())
}

/// Validates the route prefix.
fn validate_route_prefix(prefix: &str) -> ConfigResult<()> {
    if !prefix.is_empty() && !prefix.starts_with('/') {
        return Err(ConfigError::validation("server.route_prefix must start with '/'"));
    }
    if prefix.contains(char::is_whitespace) {
        return Err(ConfigError::validation(
            "server.route_prefix cannot contain whitespace",
        ));
    }
    Ok(())
}
