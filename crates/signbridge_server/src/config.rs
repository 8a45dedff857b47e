//! Layered gateway configuration.

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use signbridge_error::ConfigError;
use signbridge_rate_limit::RetryPolicy;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../signbridge.toml");

/// HTTP listener and model artifact settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind
    host: String,
    /// Port to bind
    port: u16,
    /// Path of the classifier artifact
    model_path: PathBuf,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    cors_origins: Vec<String>,
}

impl ServerSettings {
    /// Override the bind interface.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Override the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the classifier artifact path.
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream generation API settings. The API key is not part of these.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// Model name
    model: String,
    /// API root URL
    base_url: String,
    /// Round trip timeout in seconds
    timeout_secs: u64,
}

impl UpstreamSettings {
    /// Round trip timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete gateway configuration.
///
/// Sources, lowest precedence first:
///
/// 1. bundled `signbridge.toml`
/// 2. `~/.config/signbridge/signbridge.toml`
/// 3. `./signbridge.toml`
/// 4. `SIGNBRIDGE__<SECTION>__<KEY>` environment variables
///
/// # Example
///
/// ```no_run
/// use signbridge_server::GatewayConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GatewayConfig::load()?;
/// println!("listening on {}", config.server().bind_address());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Listener settings
    server: ServerSettings,
    /// Retry budget for rate-limited upstream calls
    retry: RetryPolicy,
    /// Upstream API settings
    upstream: UpstreamSettings,
}

impl GatewayConfig {
    /// Load configuration from all default sources.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a source cannot be parsed or a value is
    /// invalid (including a retry policy with `max_retries = 0`).
    #[instrument]
    pub fn load() -> Result<Self, ConfigError> {
        debug!("Loading configuration: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/signbridge/signbridge.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("signbridge").required(false))
            .add_source(environment());

        Self::finish(builder)
    }

    /// Load configuration from an explicit file over the bundled defaults.
    ///
    /// Environment variables still take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file is missing, cannot be parsed, or
    /// holds an invalid value.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::new(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.to_path_buf()))
            .add_source(environment());

        Self::finish(builder)
    }

    /// Replace the listener settings.
    pub fn with_server(mut self, server: ServerSettings) -> Self {
        self.server = server;
        self
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        if config.upstream.timeout_secs == 0 {
            return Err(ConfigError::for_key(
                "upstream.timeout_secs",
                "must be at least 1",
            ));
        }

        debug!(
            bind = %config.server.bind_address(),
            model = %config.upstream.model,
            max_retries = *config.retry.max_retries(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SIGNBRIDGE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("server.cors_origins")
}
