//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables TOML configuration files (`switchyard.toml`, `config.toml`)
//! - `yaml-config`: enables YAML configuration files (`switchyard.yaml`, `switchyard.yml`, etc.)
//!
//! Both features can be enabled simultaneously; if so, both file formats are searched and loaded.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Profile-specific config file (`switchyard.{profile}.toml` / `switchyard.{profile}.yaml`)
//! 3. Main config file (`switchyard.toml` / `switchyard.yaml`)
//! 4. Environment variables (`SWITCHYARD_*`)
//! 5. Programmatic overrides ([`ConfigLoader::set`])
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `SWITCHYARD_` prefix with `__` as separator:
//!
//! - `SWITCHYARD_SERVER__PORT=8080` → `server.port = 8080`
//! - `SWITCHYARD_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `SWITCHYARD_REGISTRY__DUPLICATE_POLICY=reject` → `registry.duplicate_policy = "reject"`
//!
//! # Example
//!
//! ```rust,ignore
//! use switchyard_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .set("server.port", 8080)
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::SwitchyardConfig;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SWITCHYARD_";

/// Environment variable selecting the profile.
pub const PROFILE_ENV: &str = "SWITCHYARD_PROFILE";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Parses a profile name, accepting `dev` and `prod` shorthands.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Reads the profile from `SWITCHYARD_PROFILE`, defaulting to Development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Base names searched in each directory, most specific first.
const BASE_NAMES: &[&str] = &["switchyard", "config"];

/// Extensions searched, grouped by format, in merge order.
const FORMATS: &[&[&str]] = &[
    #[cfg(feature = "toml-config")]
    &["toml"],
    #[cfg(feature = "yaml-config")]
    &["yaml", "yml"],
];

/// Layered configuration loader.
///
/// Sources are merged in priority order: built-in defaults, the profile
/// file, the main file, `SWITCHYARD_*` variables, then [`set`](Self::set)
/// overrides.
pub struct ConfigLoader {
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
    overrides: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader using `SWITCHYARD_PROFILE` and the default search paths.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
            overrides: Figment::new(),
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a directory to search instead of the defaults.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads exactly this file and skips the search.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Ignores `SWITCHYARD_*` variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Overrides a single dotted key with the highest priority.
    ///
    /// ```rust,ignore
    /// let config = ConfigLoader::new().set("server.port", 8080).load()?;
    /// ```
    pub fn set<V: Serialize>(mut self, key: &str, value: V) -> Self {
        let overrides = std::mem::take(&mut self.overrides);
        self.overrides = overrides.merge(Serialized::default(key, value));
        self
    }

    /// Merges every source and extracts the configuration.
    pub fn load(self) -> ConfigResult<SwitchyardConfig> {
        let files = match &self.config_file {
            Some(path) if path.exists() => vec![path.clone()],
            Some(path) => return Err(ConfigError::FileNotFound(path.clone())),
            None => self.discover(),
        };
        if files.is_empty() {
            warn!("No configuration file found, using defaults");
        }

        let mut figment = Figment::from(Serialized::defaults(SwitchyardConfig::default()));
        for path in &files {
            info!(path = %path.display(), "Loading configuration file");
            figment = merge_file(figment, path)?;
        }
        if self.load_env {
            trace!("Loading environment variables with {ENV_PREFIX} prefix");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        figment = figment.merge(self.overrides);

        let config: SwitchyardConfig = figment.extract().map_err(|e| {
            ConfigError::ParseError(format!("Failed to extract configuration: {e}"))
        })?;

        debug!(
            profile = %self.profile,
            port = config.server.port,
            logging_level = %config.logging.level,
            "Configuration loaded successfully"
        );
        Ok(config)
    }

    /// Lists the files to merge, lowest priority first.
    ///
    /// For each enabled format the first directory holding a main file wins;
    /// its profile file, if any, is merged just before it.
    fn discover(&self) -> Vec<PathBuf> {
        let dirs = if self.search_paths.is_empty() {
            default_search_paths()
        } else {
            self.search_paths.clone()
        };

        let mut files = Vec::new();
        for extensions in FORMATS {
            'format: for dir in &dirs {
                for base in BASE_NAMES {
                    for ext in *extensions {
                        let main = dir.join(format!("{base}.{ext}"));
                        if !main.exists() {
                            continue;
                        }
                        let profiled = dir.join(format!("{base}.{}.{ext}", self.profile));
                        if profiled.exists() {
                            files.push(profiled);
                        }
                        files.push(main);
                        break 'format;
                    }
                }
            }
        }
        files
    }
}

/// The working directory, then `<config dir>/switchyard`.
fn default_search_paths() -> Vec<PathBuf> {
    std::env::current_dir()
        .ok()
        .into_iter()
        .chain(dirs::config_dir().map(|dir| dir.join("switchyard")))
        .collect()
}

/// Merges one file, choosing the provider from its extension.
fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        ext => Err(ConfigError::ParseError(format!(
            "Unsupported or disabled configuration file format: .{ext}"
        ))),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use figment::Jail;
    use switchyard_core::DuplicatePolicy;

    fn load(loader: ConfigLoader) -> figment::error::Result<SwitchyardConfig> {
        loader.load().map_err(|e| e.to_string().into())
    }

    #[test]
    fn test_default_config() {
        Jail::expect_with(|jail| {
            let config = load(ConfigLoader::new().search_path(jail.directory()))?;
            assert_eq!(config, SwitchyardConfig::default());
            assert_eq!(config.logging.level.as_str(), "info");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("SWITCHYARD_SERVER__PORT", 8080);
            jail.set_env("SWITCHYARD_LOGGING__LEVEL", "debug");
            jail.set_env("SWITCHYARD_REGISTRY__DUPLICATE_POLICY", "reject");

            let config = load(ConfigLoader::new().search_path(jail.directory()))?;
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.registry.duplicate_policy, DuplicatePolicy::Reject);
            Ok(())
        });
    }

    #[test]
    fn test_without_env_ignores_environment() {
        Jail::expect_with(|jail| {
            jail.set_env("SWITCHYARD_SERVER__PORT", 8080);
            let config = load(
                ConfigLoader::new()
                    .search_path(jail.directory())
                    .without_env(),
            )?;
            assert_eq!(config.server.port, 7071);
            Ok(())
        });
    }

    #[test]
    fn test_set_beats_env() {
        Jail::expect_with(|jail| {
            jail.set_env("SWITCHYARD_SERVER__PORT", 8080);
            let config = load(
                ConfigLoader::new()
                    .search_path(jail.directory())
                    .set("server.port", 9090)
                    .set("server.host", "127.0.0.1"),
            )?;
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.server.host, "127.0.0.1");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_parse_error() {
        Jail::expect_with(|jail| {
            jail.set_env("SWITCHYARD_LOGGING__LEVEL", "loud");
            let result = ConfigLoader::new().search_path(jail.directory()).load();
            assert!(matches!(result, Err(ConfigError::ParseError(_))));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::new()
            .file("/definitely/not/here/switchyard.toml")
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_file_and_profile() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "switchyard.toml",
                r#"
                [server]
                port = 8000

                [registry]
                disabled = ["downstream_app_1"]
                "#,
            )?;
            jail.create_file(
                "switchyard.production.toml",
                r#"
                [server]
                port = 9000
                route_prefix = "/prod"
                "#,
            )?;

            let config = load(
                ConfigLoader::new()
                    .profile("prod")
                    .search_path(jail.directory())
                    .without_env(),
            )?;
            // Main file wins over the profile file.
            assert_eq!(config.server.port, 8000);
            assert_eq!(config.server.route_prefix, "/prod");
            assert_eq!(config.registry.disabled, vec!["downstream_app_1"]);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_discover_profile_before_main() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "")?;
            jail.create_file("config.staging.toml", "")?;
            jail.create_file("switchyard.production.toml", "")?;

            let files = ConfigLoader::new()
                .profile("staging")
                .search_path(jail.directory())
                .discover();
            let names: Vec<_> = files
                .iter()
                .filter_map(|p| p.file_name()?.to_str())
                .collect();
            assert_eq!(names, vec!["config.staging.toml", "config.toml"]);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[logging]\nlevel = \"warn\"\n")?;
            let path = jail.directory().join("custom.toml");
            let config = load(ConfigLoader::new().file(&path).without_env())?;
            assert_eq!(config.logging.level, LogLevel::Warn);
            Ok(())
        });
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("prod"), Profile::Production);
        assert_eq!(Profile::parse("Development"), Profile::Development);
        assert_eq!(Profile::parse("staging"), Profile::Custom("staging".into()));
    }

    #[test]
    fn test_profile_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env(PROFILE_ENV, "production");
            assert_eq!(Profile::from_env(), Profile::Production);
            Ok(())
        });
    }
}
