//! Service bootstrap and lifecycle.
//!
//! Start-up happens in a fixed order: load and validate configuration,
//! initialize logging, build and freeze the processor registry, then bind
//! the listener. Nothing is mutated once requests are being served.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use switchyard_runtime::SwitchyardRuntime;
//!
//! // Auto-loads switchyard.toml from the current directory
//! let runtime = SwitchyardRuntime::new()?;
//! runtime.run().await?;
//!
//! // Custom configuration and an extra processor
//! let runtime = SwitchyardRuntime::builder()
//!     .config_file("config/switchyard.toml")
//!     .profile("production")
//!     .processor("echo", Echo)
//!     .build()?;
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use switchyard_core::{Dispatcher, Processor, ProcessorRegistry, SharedProcessor};
use switchyard_transport::HttpServer;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::{ConfigLoader, RegistryConfig, SwitchyardConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// A fully wired Switchyard service.
///
/// ```rust,ignore
/// let runtime = SwitchyardRuntime::builder()
///     .set("server.port", 8080)
///     .build()?;
///
/// runtime.run().await?;
/// ```
pub struct SwitchyardRuntime {
    /// The configuration.
    config: SwitchyardConfig,
    /// Dispatcher over the frozen registry.
    dispatcher: Dispatcher,
    /// Cancelled to stop serving.
    shutdown: CancellationToken,
}

impl SwitchyardRuntime {
    /// Creates a runtime from the default configuration sources.
    pub fn new() -> RuntimeResult<Self> {
        Self::builder().build()
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// The configuration is used as is; call
    /// [`validate_config`](crate::config::validate_config) first if it did
    /// not come from a [`RuntimeBuilder`].
    pub fn from_config(config: &SwitchyardConfig) -> RuntimeResult<Self> {
        Self::assemble(config, Vec::new())
    }

    fn assemble(
        config: &SwitchyardConfig,
        extra: Vec<(String, SharedProcessor)>,
    ) -> RuntimeResult<Self> {
        logging::init_from_config(&config.logging);

        let registry = build_registry(&config.registry, extra)?;

        info!(
            processors = ?registry.names(),
            policy = ?registry.policy(),
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Ok(Self {
            config: config.clone(),
            dispatcher: Dispatcher::new(registry),
            shutdown: CancellationToken::new(),
        })
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &SwitchyardConfig {
        &self.config
    }

    /// Returns the dispatcher serving requests.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns a token that stops the server when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Requests a graceful shutdown.
    pub fn stop(&self) {
        info!("Stopping Switchyard");
        self.shutdown.cancel();
    }

    /// Binds the HTTP listener without serving yet.
    pub async fn bind(&self) -> RuntimeResult<HttpServer> {
        let server_config = self.config.server.to_transport_config();
        Ok(HttpServer::bind(&server_config, self.dispatcher.clone()).await?)
    }

    /// Runs the service until Ctrl+C or SIGTERM.
    pub async fn run(&self) -> RuntimeResult<()> {
        info!("Switchyard is now running. Press Ctrl+C to stop.");
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs the service until `shutdown` completes or [`stop`](Self::stop)
    /// is called, then drains in-flight requests.
    pub async fn run_until<F>(&self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let server = self.bind().await?;
        self.serve(server, shutdown).await
    }

    /// Serves an already bound listener until `shutdown` completes.
    pub async fn serve<F>(&self, server: HttpServer, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.clone();
        let trigger = token.clone();
        let watcher = tokio::spawn(async move {
            tokio::select! {
                () = shutdown => trigger.cancel(),
                () = trigger.cancelled() => {}
            }
        });

        let result = server.serve(token).await;
        watcher.abort();

        info!("Runtime stopped");
        Ok(result?)
    }
}

/// Builds the registry from the built-in processors plus `extra`.
///
/// Names listed in `config.disabled` are skipped.
pub fn build_registry(
    config: &RegistryConfig,
    extra: Vec<(String, SharedProcessor)>,
) -> RuntimeResult<ProcessorRegistry> {
    let mut registry = ProcessorRegistry::with_policy(config.duplicate_policy);

    let builtin = switchyard_processors::builtin()
        .into_iter()
        .map(|(name, processor)| (name.to_string(), processor));

    for (name, processor) in builtin.chain(extra) {
        if config.disabled.contains(&name) {
            debug!(processor = %name, "Processor disabled by configuration");
            continue;
        }
        registry.register_shared(name, processor)?;
    }

    Ok(registry)
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => {
                        info!("Received Ctrl+C, shutting down");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down");
                    }
                }
                return;
            }
            Err(e) => {
                error!(error = %e, "Failed to register SIGTERM handler, waiting for Ctrl+C only");
            }
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a `SwitchyardRuntime` with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// let runtime = SwitchyardRuntime::builder()
///     .config_file("config/production.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    processors: Vec<(String, SharedProcessor)>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
            processors: Vec::new(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Overrides a single dotted configuration key.
    pub fn set<V: Serialize>(mut self, key: &str, value: V) -> Self {
        self.config_loader = self.config_loader.set(key, value);
        self
    }

    /// Registers an additional processor after the built-in ones.
    pub fn processor<P>(mut self, name: impl Into<String>, processor: P) -> Self
    where
        P: Processor + 'static,
    {
        self.processors.push((name.into(), Arc::new(processor)));
        self
    }

    /// Loads and validates the configuration, then builds the runtime.
    pub fn build(self) -> RuntimeResult<SwitchyardRuntime> {
        let config = self.config_loader.load()?;

        let known: Vec<&str> = switchyard_processors::builtin()
            .into_iter()
            .map(|(name, _)| name)
            .chain(self.processors.iter().map(|(name, _)| name.as_str()))
            .collect();
        validate_config(&config, &known)?;

        SwitchyardRuntime::assemble(&config, self.processors)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
