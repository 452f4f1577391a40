//! Request dispatcher.
//!
//! The [`Dispatcher`] is the single entry point for a request body:
//!
//! 1. Parse the body as JSON
//! 2. Read the routing key (`downstream_app`)
//! 3. Look the processor up in the registry
//! 4. Run the processor
//!
//! Every failure is classified as a [`DispatchError`]; the transport layer
//! turns that into an HTTP status. Processor errors and panics are caught
//! here exactly once and reported as [`DispatchError::Internal`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{Instrument, Level, debug, error, span, warn};

use crate::error::{DispatchError, DispatchResult};
use crate::processor::Payload;
use crate::registry::ProcessorRegistry;

/// Name of the request field that selects a processor.
pub const ROUTING_KEY: &str = "downstream_app";

/// Routes request bodies to registered processors.
///
/// Cloning is cheap; all clones share the same frozen registry.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    registry: Arc<ProcessorRegistry>,
}

impl Dispatcher {
    /// Creates a dispatcher over a fully populated registry.
    pub fn new(registry: ProcessorRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Creates a dispatcher over an already shared registry.
    pub fn from_shared(registry: Arc<ProcessorRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry this dispatcher routes to.
    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    /// Dispatches a raw request body.
    pub async fn dispatch(&self, body: &[u8]) -> DispatchResult<Payload> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            error!(error = %e, "Invalid JSON format in the request body");
            DispatchError::InvalidJson(e)
        })?;

        self.dispatch_value(value).await
    }

    /// Dispatches an already parsed request body.
    pub async fn dispatch_value(&self, value: Value) -> DispatchResult<Payload> {
        let payload = match value {
            Value::Object(map) => map,
            other => {
                warn!(
                    got = crate::processor::json_type_name(&other),
                    "Request body is not a JSON object"
                );
                return Err(DispatchError::MissingRoutingKey);
            }
        };

        let name = routing_key(&payload).ok_or(DispatchError::MissingRoutingKey)?;
        let span = span!(Level::DEBUG, "dispatch", processor = %name);
        self.invoke(name, &payload).instrument(span).await
    }

    async fn invoke(&self, name: &str, payload: &Payload) -> DispatchResult<Payload> {
        let Some(processor) = self.registry.get(name) else {
            warn!(processor = %name, "No processor found for app");
            return Err(DispatchError::UnknownProcessor {
                name: name.to_string(),
                available: self.registry.names(),
            });
        };

        debug!("Invoking processor");
        match AssertUnwindSafe(processor.process(payload))
            .catch_unwind()
            .await
        {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => {
                error!(error = %e, error_detail = ?e, "Unhandled system error during execution");
                Err(DispatchError::Internal(e.to_string()))
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!(panic = %reason, "Processor panicked during execution");
                Err(DispatchError::Internal(format!("processor panicked: {reason}")))
            }
        }
    }
}

/// Extracts a non-empty string routing key.
fn routing_key(payload: &Payload) -> Option<&str> {
    payload
        .get(ROUTING_KEY)
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
