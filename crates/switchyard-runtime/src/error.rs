//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while starting or running the service.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A processor could not be registered.
    #[error("Registry error: {0}")]
    Registry(#[from] switchyard_core::RegistryError),

    /// The HTTP listener failed to bind or serve.
    #[error("Transport error: {0}")]
    Transport(#[from] switchyard_transport::TransportError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
