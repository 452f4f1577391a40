//! Transport error types.

use thiserror::Error;

/// Errors that can occur while binding or running the HTTP server.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested bind address.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The server loop failed.
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
