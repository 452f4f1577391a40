//! # Switchyard Processors
//!
//! Built-in processors, one module per downstream application.
//!
//! Registration is explicit: the runtime calls [`builtin`] once at start-up
//! and registers each entry. To add a downstream application, add a module
//! and list it in [`builtin`].

pub mod downstream_app_1;

use std::sync::Arc;

use switchyard_core::SharedProcessor;

pub use downstream_app_1::DownstreamApp1Processor;

/// Returns every built-in processor together with its routing key.
pub fn builtin() -> Vec<(&'static str, SharedProcessor)> {
    vec![(
        downstream_app_1::PROCESSOR_NAME,
        Arc::new(DownstreamApp1Processor::new()),
    )]
}
