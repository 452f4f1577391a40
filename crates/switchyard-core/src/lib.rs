//! # Switchyard Core
//!
//! The routing contract of Switchyard: a name-to-processor registry, the
//! processor trait, and the dispatcher that ties them together.
//!
//! ```text
//! ┌──────────────┐     ┌────────────┐     ┌──────────────────────┐
//! │ request body │────▶│ Dispatcher │────▶│ ProcessorRegistry    │
//! └──────────────┘     └────────────┘     │  "downstream_app_1" ─┼──▶ Processor
//!                                         │  "..."              ─┼──▶ Processor
//!                                         └──────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use switchyard_core::{Dispatcher, ProcessorRegistry};
//!
//! let mut registry = ProcessorRegistry::new();
//! registry.register("echo", Echo)?;
//!
//! let dispatcher = Dispatcher::new(registry);
//! let output = dispatcher.dispatch(br#"{"downstream_app":"echo"}"#).await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod processor;
pub mod registry;

pub use dispatcher::{Dispatcher, ROUTING_KEY};
pub use error::{
    DispatchError, DispatchResult, ItemError, ProcessError, ProcessResult, RegistryError,
    RegistryResult,
};
pub use processor::{Payload, Processor, SharedProcessor, json_type_name};
pub use registry::{DuplicatePolicy, ProcessorRegistry};
