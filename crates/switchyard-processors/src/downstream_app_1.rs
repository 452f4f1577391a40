//! Processor for the first downstream application.
//!
//! Keeps only records whose `status` is `"active"`, renames their fields for
//! the downstream consumer and stamps each with the time it was processed.
//!
//! ```json
//! // input
//! { "source_id": "S1",
//!   "items": [ { "status": "active", "user_id": "u1", "product_name": "Widget", "quantity": 3 } ] }
//!
//! // output
//! { "source_data_key": "S1",
//!   "processed_items": [ { "userId": "u1", "productName": "Widget", "quantity": 3,
//!                          "processed_timestamp": 1760745600.123 } ],
//!   "summary": { "total_items_received": 1, "total_items_processed": 1 } }
//! ```
//!
//! `items` must be an array when present. Any other JSON type fails the
//! whole call (reported as a 500) instead of being iterated; non-object
//! entries inside the array are logged and skipped.

use async_trait::async_trait;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing::{error, info};

use switchyard_core::{ItemError, Payload, ProcessError, ProcessResult, Processor, json_type_name};

/// Routing key for this processor.
pub const PROCESSOR_NAME: &str = "downstream_app_1";

const ACTIVE_STATUS: &str = "active";
const DEFAULT_SOURCE_KEY: &str = "unknown";
const DEFAULT_PRODUCT_NAME: &str = "N/A";

/// Source of processing timestamps, in seconds since the Unix epoch.
pub type Clock = fn() -> f64;

/// Current wall-clock time in fractional seconds since the Unix epoch.
pub fn unix_now() -> f64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as f64 / 1_000_000_000.0
}

/// Filters active records and renames their fields.
#[derive(Debug, Clone, Copy)]
pub struct DownstreamApp1Processor {
    clock: Clock,
}

impl DownstreamApp1Processor {
    /// Creates a processor stamping records with the wall clock.
    pub fn new() -> Self {
        Self { clock: unix_now }
    }

    /// Replaces the timestamp source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Transforms one raw record.
    ///
    /// Returns `Ok(None)` for records that are filtered out.
    fn transform_item(&self, index: usize, item: &Value) -> Result<Option<Value>, ItemError> {
        let Value::Object(record) = item else {
            return Err(ItemError::NotAnObject {
                index,
                got: json_type_name(item),
            });
        };

        if record.get("status").and_then(Value::as_str) != Some(ACTIVE_STATUS) {
            return Ok(None);
        }

        Ok(Some(json!({
            "userId": record.get("user_id").cloned().unwrap_or(Value::Null),
            "productName": record
                .get("product_name")
                .cloned()
                .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.into()),
            "quantity": record.get("quantity").cloned().unwrap_or_else(|| 0.into()),
            "processed_timestamp": (self.clock)(),
        })))
    }
}

impl Default for DownstreamApp1Processor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Processor for DownstreamApp1Processor {
    async fn process(&self, input: &Payload) -> ProcessResult<Payload> {
        info!("[{PROCESSOR_NAME}] Starting data processing");

        let raw_items: &[Value] = match input.get("items") {
            None => &[],
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => return Err(ProcessError::invalid_field("items", "an array of objects")),
        };

        let mut processed_items = Vec::with_capacity(raw_items.len());
        for (index, item) in raw_items.iter().enumerate() {
            match self.transform_item(index, item) {
                Ok(Some(record)) => processed_items.push(record),
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, item = %item, "[{PROCESSOR_NAME}] Failed to process item");
                }
            }
        }

        let processed_count = processed_items.len();
        let mut output = Payload::new();
        output.insert(
            "source_data_key".into(),
            input
                .get("source_id")
                .cloned()
                .unwrap_or_else(|| DEFAULT_SOURCE_KEY.into()),
        );
        output.insert("processed_items".into(), Value::Array(processed_items));
        output.insert(
            "summary".into(),
            json!({
                "total_items_received": raw_items.len(),
                "total_items_processed": processed_count,
            }),
        );

        info!(
            "[{PROCESSOR_NAME}] Data processing completed. {processed_count} items finalized."
        );
        Ok(output)
    }
}
