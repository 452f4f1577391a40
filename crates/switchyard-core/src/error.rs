//! Unified error types for the Switchyard core.
//!
//! Registration, processing and dispatch each get their own enum so that the
//! layer which handles an error can match on exactly the cases it owns.

use thiserror::Error;

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors that can occur while populating a [`ProcessorRegistry`](crate::ProcessorRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Processor names must be non-empty.
    #[error("processor name must not be empty")]
    EmptyName,

    /// The registered value does not implement [`Processor`](crate::Processor).
    #[error("the object registered under '{name}' must be a processor, got '{got}'")]
    TypeKind {
        /// Name the value was registered under.
        name: String,
        /// Concrete type name of the rejected value.
        got: &'static str,
    },

    /// A processor is already registered under this name and the registry
    /// rejects duplicates.
    #[error("a processor is already registered under '{name}'")]
    DuplicateName {
        /// The duplicate name.
        name: String,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

// =============================================================================
// Processing Errors
// =============================================================================

/// A whole-call processing failure reported by a processor.
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// An input field is present but has the wrong JSON type.
    #[error("field '{field}' has an unexpected type: expected {expected}")]
    InvalidField {
        /// The offending field.
        field: String,
        /// Human-readable description of the expected type.
        expected: &'static str,
    },

    /// Custom processing error.
    #[error("{0}")]
    Custom(String),
}

impl ProcessError {
    /// Creates a custom processing error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidField {
            field: field.into(),
            expected,
        }
    }
}

/// Result type for processor calls.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// A failure scoped to a single record of a batch.
///
/// Processors log these and leave the record out of their output; they never
/// abort the call.
#[derive(Debug, Clone, Error)]
pub enum ItemError {
    /// The record is not a JSON object.
    #[error("item #{index} is not an object (got {got})")]
    NotAnObject {
        /// Position of the record in the input sequence.
        index: usize,
        /// JSON type of the record.
        got: &'static str,
    },
}

// =============================================================================
// Dispatch Errors
// =============================================================================

/// Outcome classes of a failed dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request body is not valid JSON.
    #[error("invalid JSON in request body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The routing key is absent, empty or not a string.
    #[error("missing or empty routing key")]
    MissingRoutingKey,

    /// No processor is registered under the routing key.
    #[error("no processor registered for '{name}'")]
    UnknownProcessor {
        /// The requested routing key.
        name: String,
        /// Names registered at the time of the request.
        available: Vec<String>,
    },

    /// Anything else. The detail is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidJson(_) | Self::MissingRoutingKey => 400,
            Self::UnknownProcessor { .. } => 404,
            Self::Internal(_) => 500,
        }
    }

    /// The message shown to the caller.
    ///
    /// Internal errors are reduced to a generic message.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidJson(_) => "Error 400: Invalid JSON format in the request body.".into(),
            Self::MissingRoutingKey => format!(
                "Error 400: Please provide a '{}' identifier in the request body.",
                crate::ROUTING_KEY
            ),
            Self::UnknownProcessor { name, available } => format!(
                "Error 404: No processor registered for '{name}'. Available apps: {}",
                available.join(", ")
            ),
            Self::Internal(_) => "Error 500: An internal server error occurred.".into(),
        }
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
