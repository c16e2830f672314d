use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration for the assembler and its command-line wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssemblyConfiguration {
    /// Assembly settings
    pub assembly: AssemblySettings,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    /// Smallest accepted k-mer length
    pub min_k: usize,
    /// Permitted k-mer symbols; any symbol is accepted when unset
    pub alphabet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (error, warn, info, debug, trace)
    pub level: String,
    /// Log output format (json, pretty, compact)
    pub format: String,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            min_k: 2,
            alphabet: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Input/Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {field} is invalid: {reason}")]
    Validation { field: String, reason: String },

    #[error("Logging error: {0}")]
    Logging(String),
}

/// Configuration manager with validation and environment integration
#[derive(Debug, Clone)]
pub struct ConfigurationManager {
    config: AssemblyConfiguration,
    config_path: Option<PathBuf>,
}

impl ConfigurationManager {
    /// Prefix of environment overrides, e.g. `DBG_EULER_ASSEMBLY__MIN_K=4`
    pub const ENV_PREFIX: &'static str = "DBG_EULER";

    /// Built-in defaults with environment overrides applied
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None, Self::ENV_PREFIX)
    }

    /// Built-in defaults only, no file or environment lookups
    pub fn new_with_defaults() -> Result<Self, ConfigError> {
        Self::from_config(AssemblyConfiguration::default())
    }

    /// Load a TOML file, then apply environment overrides
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        Self::load(Some(config_path.as_ref()), Self::ENV_PREFIX)
    }

    /// Wrap an already built configuration after validating it
    pub fn from_config(config: AssemblyConfiguration) -> Result<Self, ConfigError> {
        let manager = Self {
            config,
            config_path: None,
        };
        manager.validate_configuration()?;
        Ok(manager)
    }

    fn load(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let defaults = toml::to_string(&AssemblyConfiguration::default())?;
        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AssemblyConfiguration = builder.build()?.try_deserialize()?;
        let manager = Self {
            config,
            config_path: path.map(Path::to_path_buf),
        };

        manager.validate_configuration()?;
        Ok(manager)
    }

    /// Validate configuration parameters
    fn validate_configuration(&self) -> Result<(), ConfigError> {
        debug!("Validating configuration...");

        if self.config.assembly.min_k < 2 {
            return Err(ConfigError::Validation {
                field: "assembly.min_k".to_string(),
                reason: "must be at least 2".to_string(),
            });
        }

        if let Some(alphabet) = &self.config.assembly.alphabet {
            if alphabet.is_empty() {
                return Err(ConfigError::Validation {
                    field: "assembly.alphabet".to_string(),
                    reason: "must contain at least one symbol when set".to_string(),
                });
            }
        }

        if !LOG_FORMATS.contains(&self.config.logging.format.as_str()) {
            return Err(ConfigError::Validation {
                field: "logging.format".to_string(),
                reason: format!("must be one of {:?}", LOG_FORMATS),
            });
        }

        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.config.logging.level) {
            return Err(ConfigError::Validation {
                field: "logging.level".to_string(),
                reason: e.to_string(),
            });
        }

        Ok(())
    }

    /// Install the global `tracing` subscriber. A subscriber that is already
    /// installed is left in place.
    pub fn setup_logging(&self) -> Result<(), ConfigError> {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if tracing::dispatcher::has_been_set() {
            debug!("Logging already initialized, skipping setup");
            return Ok(());
        }

        let level = &self.config.logging.level;
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        let registry = tracing_subscriber::registry().with(env_filter);

        // Logs go to stderr; stdout carries the assembled sequence
        let installed = match self.config.logging.format.as_str() {
            "json" => tracing::subscriber::set_global_default(
                registry.with(fmt::layer().json().with_writer(std::io::stderr)),
            ),
            "compact" => tracing::subscriber::set_global_default(
                registry.with(fmt::layer().compact().with_writer(std::io::stderr)),
            ),
            _ => tracing::subscriber::set_global_default(
                registry.with(
                    fmt::layer()
                        .without_time()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                ),
            ),
        };
        installed.map_err(|e| ConfigError::Logging(e.to_string()))?;

        debug!(
            "Logging initialized with level: {}, format: {}",
            level, self.config.logging.format
        );
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &AssemblyConfiguration {
        &self.config
    }

    /// Get mutable configuration reference
    pub fn config_mut(&mut self) -> &mut AssemblyConfiguration {
        &mut self.config
    }

    /// File the configuration was loaded from, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Save current configuration to file
    pub fn save_config<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(&self.config)?;
        std::fs::write(path.as_ref(), toml_string)?;

        info!("💾 Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
