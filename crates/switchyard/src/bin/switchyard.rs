//! Switchyard server.
//!
//! # Usage
//!
//! ```bash
//! switchyard --config switchyard.toml --port 8080
//! SWITCHYARD_LOGGING__LEVEL=debug switchyard
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use switchyard::runtime::SwitchyardRuntime;
use tracing::info;

/// Command-line flags. Each one overrides the matching configuration key.
#[derive(Debug, Parser)]
#[command(name = "switchyard", version, about)]
struct Args {
    /// Configuration file to load instead of searching the default locations.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Configuration profile (development, production, or a custom name).
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,

    /// Host address to bind to.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = SwitchyardRuntime::builder();
    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &args.profile {
        builder = builder.profile(profile);
    }
    if let Some(host) = args.host {
        builder = builder.set("server.host", host);
    }
    if let Some(port) = args.port {
        builder = builder.set("server.port", port);
    }
    if let Some(level) = args.log_level {
        builder = builder.set("logging.level", level.to_lowercase());
    }

    let runtime = builder.build().context("Failed to start Switchyard")?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        processors = ?runtime.dispatcher().registry().names(),
        "Switchyard starting"
    );

    runtime.run().await?;
    Ok(())
}
