//! Logging setup for Switchyard.
//!
//! Built on `tracing` and `tracing-subscriber`. `RUST_LOG` takes precedence
//! over the configured level when set.
//!
//! # Configuration-Based Initialization
//!
//! ```rust,ignore
//! use switchyard_runtime::{ConfigLoader, logging};
//!
//! let config = ConfigLoader::new().load()?;
//! logging::init_from_config(&config.logging);
//! ```
//!
//! File output goes through `tracing-appender`; see [`FileTarget`] for how
//! `logging.file_path` and `logging.rotation` are resolved.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LogOutput, LogRotation, LoggingConfig, SpanEventConfig};

const DEFAULT_LOG_FILE: &str = "switchyard.log";

/// Span event configuration for logging.
///
/// With [`SpanEvents::LIFECYCLE`] every request span is logged when it opens
/// and when it closes, which shows per-request latency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanEvents {
    /// Log when a span is created.
    pub new: bool,
    /// Log when a span is entered.
    pub enter: bool,
    /// Log when a span is exited.
    pub exit: bool,
    /// Log when a span is closed.
    pub close: bool,
}

impl SpanEvents {
    /// No span events will be logged.
    pub const NONE: Self = Self {
        new: false,
        enter: false,
        exit: false,
        close: false,
    };

    /// Log span creation and close events.
    pub const LIFECYCLE: Self = Self {
        new: true,
        enter: false,
        exit: false,
        close: true,
    };

    /// Log all span events.
    pub const FULL: Self = Self {
        new: true,
        enter: true,
        exit: true,
        close: true,
    };

    /// Convert to `tracing_subscriber::fmt::format::FmtSpan` flags.
    fn to_fmt_span(self) -> fmt::format::FmtSpan {
        let mut span = fmt::format::FmtSpan::NONE;
        if self.new {
            span |= fmt::format::FmtSpan::NEW;
        }
        if self.enter {
            span |= fmt::format::FmtSpan::ENTER;
        }
        if self.exit {
            span |= fmt::format::FmtSpan::EXIT;
        }
        if self.close {
            span |= fmt::format::FmtSpan::CLOSE;
        }
        span
    }
}

impl From<&SpanEventConfig> for SpanEvents {
    fn from(config: &SpanEventConfig) -> Self {
        Self {
            new: config.new,
            enter: config.enter,
            exit: config.exit,
            close: config.close,
        }
    }
}

// =============================================================================
// File Output
// =============================================================================

/// Resolved destination of file output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    /// Directory holding the log files.
    pub directory: PathBuf,
    /// File name, used as the prefix of rotated files.
    pub file_name: String,
    /// Rotation schedule.
    pub rotation: Rotation,
}

impl FileTarget {
    /// Splits `path` into directory and file name.
    ///
    /// A bare file name lives in `.`; a path without a file name falls back
    /// to `switchyard.log`.
    pub fn resolve(path: &Path, rotation: LogRotation) -> Self {
        let directory = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
        let rotation = match rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
        };

        Self {
            directory,
            file_name,
            rotation,
        }
    }

    /// Opens the rolling appender, creating the directory if needed.
    pub fn appender(&self) -> Result<RollingFileAppender, InitError> {
        RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(self.file_name.clone())
            .build(&self.directory)
    }
}

// =============================================================================
// Configuration-Based Initialization
// =============================================================================

/// Initialize logging from a `LoggingConfig`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = LoggingBuilder::from_config(config).try_init();
}

// =============================================================================
// LoggingBuilder
// =============================================================================

/// A builder for configuring logging.
#[derive(Debug)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: tracing::Level,
    span_events: SpanEvents,
    format: LogFormat,
    output: LogOutput,
    rotation: LogRotation,
    with_thread_ids: bool,
    with_file: bool,
    with_line_number: bool,
    file_path: PathBuf,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Create a new logging builder.
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
            level: tracing::Level::INFO,
            span_events: SpanEvents::NONE,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            rotation: LogRotation::Never,
            with_thread_ids: false,
            with_file: false,
            with_line_number: false,
            file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }

    /// Create a LoggingBuilder from a LoggingConfig.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut builder = Self::new()
            .with_level(config.level.to_tracing_level())
            .format(config.format)
            .output(config.output)
            .rotation(config.rotation)
            .span_events(SpanEvents::from(&config.span_events))
            .with_thread_ids(config.thread_ids)
            .with_file(config.file_location)
            .with_line_number(config.file_location)
            .file_path(&config.file_path);

        let mut filters: Vec<_> = config.filters.iter().collect();
        filters.sort_by(|a, b| a.0.cmp(b.0));
        for (module, level) in filters {
            builder
                .directives
                .push(format!("{}={}", module, level.as_str()));
        }

        builder
    }

    /// Set the global log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    /// Configure span lifecycle events.
    pub fn span_events(mut self, events: SpanEvents) -> Self {
        self.span_events = events;
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output destination.
    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Set the rotation schedule for file output.
    pub fn rotation(mut self, rotation: LogRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Include thread IDs in log output.
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.with_thread_ids = enabled;
        self
    }

    /// Include file names in log output.
    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    /// Include line numbers in log output.
    pub fn with_line_number(mut self, enabled: bool) -> Self {
        self.with_line_number = enabled;
        self
    }

    /// Set the log file path.
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    /// Build the filter from directives.
    fn build_filter(&self) -> EnvFilter {
        let base_filter = self.level.to_string().to_lowercase();

        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base_filter));

        for directive in &self.directives {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(e) => eprintln!("Ignoring invalid log directive '{directive}': {e}"),
            }
        }

        filter
    }

    /// Resolves where file output would be written.
    pub fn file_target(&self) -> FileTarget {
        FileTarget::resolve(&self.file_path, self.rotation)
    }

    /// Try to initialize the logging system, returning an error on failure.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();
        let span_events = self.span_events.to_fmt_span();

        macro_rules! configure_layer {
            ($layer:expr) => {
                $layer
                    .with_span_events(span_events)
                    .with_target(true)
                    .with_thread_ids(self.with_thread_ids)
                    .with_file(self.with_file)
                    .with_line_number(self.with_line_number)
            };
        }

        macro_rules! init_with_writer {
            ($writer:expr) => {
                match &self.format {
                    #[cfg(feature = "json-log")]
                    LogFormat::Json => {
                        let layer = fmt::layer()
                            .json()
                            .with_span_events(span_events)
                            .with_current_span(true)
                            .with_writer($writer);
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    #[cfg(not(feature = "json-log"))]
                    LogFormat::Json => {
                        eprintln!("JSON logging requires the json-log feature, using compact");
                        let layer = configure_layer!(fmt::layer().compact().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Compact => {
                        let layer = configure_layer!(fmt::layer().compact().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Full => {
                        let layer = configure_layer!(fmt::layer().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Pretty => {
                        let layer = configure_layer!(fmt::layer().pretty().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                }
            };
        }

        match &self.output {
            LogOutput::Stdout => init_with_writer!(std::io::stdout),
            LogOutput::Stderr => init_with_writer!(std::io::stderr),
            LogOutput::File => {
                let target = self.file_target();
                match target.appender() {
                    Ok(appender) => init_with_writer!(appender),
                    Err(e) => {
                        eprintln!(
                            "Failed to open log file in {}: {e}, falling back to stdout",
                            target.directory.display()
                        );
                        init_with_writer!(std::io::stdout)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_from_config() {
        let mut config = LoggingConfig {
            level: LogLevel::Debug,
            thread_ids: true,
            file_location: true,
            span_events: SpanEventConfig {
                new: true,
                close: true,
                ..Default::default()
            },
            ..Default::default()
        };
        config.filters.insert("switchyard_transport".into(), LogLevel::Trace);
        config.filters.insert("hyper".into(), LogLevel::Warn);

        let builder = LoggingBuilder::from_config(&config);
        assert_eq!(builder.level, tracing::Level::DEBUG);
        assert!(builder.with_thread_ids);
        assert!(builder.with_file && builder.with_line_number);
        assert_eq!(builder.span_events, SpanEvents::LIFECYCLE);
        assert_eq!(
            builder.directives,
            vec!["hyper=warn", "switchyard_transport=trace"]
        );
    }

    #[test]
    fn test_file_target_from_config() {
        let dir = std::env::temp_dir().join("switchyard-logs");
        let config = LoggingConfig {
            output: LogOutput::File,
            file_path: dir.join("x.log"),
            rotation: LogRotation::Daily,
            ..Default::default()
        };

        let target = LoggingBuilder::from_config(&config).file_target();
        assert_eq!(target.directory, dir);
        assert_eq!(target.file_name, "x.log");
        assert_eq!(target.rotation, Rotation::DAILY);
    }

    #[test]
    fn test_file_target_rotation_choice() {
        for (rotation, expected) in [
            (LogRotation::Never, Rotation::NEVER),
            (LogRotation::Hourly, Rotation::HOURLY),
            (LogRotation::Daily, Rotation::DAILY),
        ] {
            let target = FileTarget::resolve(Path::new("logs/app.log"), rotation);
            assert_eq!(target.rotation, expected);
        }
    }

    #[test]
    fn test_file_target_fallbacks() {
        let bare = FileTarget::resolve(Path::new("app.log"), LogRotation::Never);
        assert_eq!(bare.directory, PathBuf::from("."));
        assert_eq!(bare.file_name, "app.log");

        let root = FileTarget::resolve(Path::new("/"), LogRotation::Never);
        assert_eq!(root.file_name, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_file_target_opens_appender() {
        figment::Jail::expect_with(|jail| {
            let target =
                FileTarget::resolve(&jail.directory().join("x.log"), LogRotation::Never);
            target.appender().map_err(|e| e.to_string())?;
            assert!(jail.directory().join("x.log").exists());
            Ok(())
        });
    }

    #[test]
    fn test_span_events_flags() {
        assert_eq!(SpanEvents::NONE.to_fmt_span(), fmt::format::FmtSpan::NONE);
        assert_eq!(
            SpanEvents::LIFECYCLE.to_fmt_span(),
            fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE
        );
        assert_eq!(SpanEvents::FULL.to_fmt_span(), fmt::format::FmtSpan::FULL);
    }
}
