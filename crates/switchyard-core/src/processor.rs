//! The processor capability contract.
//!
//! A processor turns one structured input object into one structured output
//! object. Any `Send + Sync` type implementing [`Processor`] can be placed in
//! the [`ProcessorRegistry`](crate::ProcessorRegistry); no base type is
//! involved.
//!
//! ```rust,ignore
//! use switchyard_core::{Payload, ProcessResult, Processor};
//!
//! struct Echo;
//!
//! #[async_trait::async_trait]
//! impl Processor for Echo {
//!     async fn process(&self, input: &Payload) -> ProcessResult<Payload> {
//!         Ok(input.clone())
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::ProcessResult;

/// An untyped JSON object, used for both request and response payloads.
pub type Payload = Map<String, Value>;

/// Transforms a request payload into a response payload for one downstream
/// application.
///
/// The input is borrowed immutably; processors build a fresh output object.
/// Problems with individual records should be logged and skipped inside the
/// processor. Returning `Err` fails the whole call.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Processes `input` and returns the transformed object.
    async fn process(&self, input: &Payload) -> ProcessResult<Payload>;
}

/// A processor shared between the registry and in-flight requests.
pub type SharedProcessor = Arc<dyn Processor>;

/// Returns the JSON type name of a value, for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
