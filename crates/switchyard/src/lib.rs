//! # Switchyard
//!
//! Routes JSON requests to named downstream application processors.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐  POST /api/process_data  ┌────────────┐     ┌──────────────────────┐
//! │  caller   │─────────────────────────▶│ Dispatcher │────▶│ "downstream_app_1"   │
//! └───────────┘  {"downstream_app": ..}  └────────────┘     │ "..."                │
//!                                                           └──────────────────────┘
//! ```
//!
//! - **Runtime**: loads configuration, sets up logging, owns the server lifecycle
//! - **Transport**: axum routes and HTTP status mapping
//! - **Dispatcher**: parses the body, selects a processor by routing key
//! - **Processors**: one transformation per downstream application
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use switchyard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = SwitchyardRuntime::builder()
//!         .processor("echo", Echo)
//!         .build()?;
//!
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use switchyard_core as core;
pub use switchyard_processors as processors;
pub use switchyard_runtime as runtime;
pub use switchyard_transport as transport;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use switchyard_runtime::{
        ConfigLoader, RuntimeBuilder, RuntimeError, RuntimeResult, SwitchyardConfig,
        SwitchyardRuntime,
    };

    // Processor contract
    pub use switchyard_core::{
        Dispatcher, Payload, ProcessError, ProcessResult, Processor, ProcessorRegistry,
    };

    // Built-in processors
    pub use switchyard_processors::DownstreamApp1Processor;

    // Logging macros
    pub use switchyard_runtime::prelude::*;
}
