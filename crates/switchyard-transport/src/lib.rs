//! # Switchyard Transport
//!
//! HTTP binding for the Switchyard dispatcher, built on axum.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  switchyard-runtime │  (config, lifecycle)
//! ├─────────────────────┤
//! │  switchyard-transport│ <- This crate (routes, status mapping)
//! ├─────────────────────┤
//! │  switchyard-core    │  (dispatcher, registry)
//! └─────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use switchyard_transport::{HttpServer, HttpServerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let server = HttpServer::bind(&HttpServerConfig::default(), dispatcher).await?;
//! server.serve(CancellationToken::new()).await?;
//! ```

pub mod config;
pub mod error;
pub mod server;

pub use config::HttpServerConfig;
pub use error::{TransportError, TransportResult};
pub use server::{HEALTHY, HttpServer, build_router};
