//! Switchyard Runtime - configuration, logging and lifecycle for the
//! Switchyard service.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`) and validation
//! - Logging setup (`LoggingBuilder`, `init_from_config`)
//! - Registry bootstrap from the built-in processors
//! - Server lifecycle with graceful shutdown (`SwitchyardRuntime`)
//!
//! ```ignore
//! use switchyard_runtime::SwitchyardRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = SwitchyardRuntime::new()?;
//!
//!     // Serve until Ctrl+C or SIGTERM
//!     runtime.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, Profile, SwitchyardConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{FileTarget, LoggingBuilder, SpanEvents};
pub use runtime::{RuntimeBuilder, SwitchyardRuntime, build_registry, wait_for_shutdown};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// Provides the commonly used logging macros together with `Level`.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
