use crate::{Error, Result};
use config::builder::{ConfigBuilder, DefaultState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Prefix for environment overrides, e.g. `NASA_GUIDE_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "NASA_GUIDE";

/// NASA CMR collection search endpoint
pub const DEFAULT_CMR_ENDPOINT: &str = "https://cmr.earthdata.nasa.gov/search/collections.json";
/// Gemini REST API root
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

/// CMR rejects page sizes above this
const MAX_PAGE_SIZE: u32 = 2000;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset_search: DatasetSearchConfig,
    pub explanation: ExplanationConfig,
    pub logging: LoggingConfig,
}

/// Inbound HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub graceful_shutdown_timeout_secs: u64,
    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            graceful_shutdown_timeout_secs: 5,
            allowed_origins: Vec::new(),
        }
    }
}

/// Settings for the NASA CMR dataset search
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSearchConfig {
    pub endpoint: String,
    pub page_size: u32,
    pub sort_key: String,
    pub timeout_secs: u64,
    /// `NASA_API_KEY`; collection search is public so no request carries it
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for DatasetSearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CMR_ENDPOINT.to_string(),
            page_size: 5,
            sort_key: "-score".to_string(),
            timeout_secs: 30,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for DatasetSearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetSearchConfig")
            .field("endpoint", &self.endpoint)
            .field("page_size", &self.page_size)
            .field("sort_key", &self.sort_key)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &redact(self.api_key.as_deref()))
            .finish()
    }
}

/// Settings for the Gemini explanation service
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// `GEMINI_API_KEY`, sent as the `key` query parameter
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_secs: 20,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for ExplanationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplanationConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &redact(self.api_key.as_deref()))
            .finish()
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Command-line overrides, applied after every other source
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Credentials read straight from the process environment
#[derive(Debug, Default, Deserialize)]
struct Credentials {
    nasa_api_key: Option<String>,
    gemini_api_key: Option<String>,
}

impl Config {
    /// Load configuration from defaults, an optional TOML file, `NASA_GUIDE_*`
    /// environment variables and finally the API credentials.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = Self::file_layers(path)?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        config.apply_credentials(envy::from_env::<Credentials>()?);
        Ok(config)
    }

    /// Defaults overlaid with the TOML file at `path`, if any
    fn file_layers(path: Option<&Path>) -> Result<ConfigBuilder<DefaultState>> {
        let builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        Ok(match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder,
        })
    }

    fn apply_credentials(&mut self, credentials: Credentials) {
        if let Some(key) = non_blank(credentials.nasa_api_key) {
            self.dataset_search.api_key = Some(key);
        }
        if let Some(key) = non_blank(credentials.gemini_api_key) {
            self.explanation.api_key = Some(key);
        }
        self.dataset_search.api_key = non_blank(self.dataset_search.api_key.take());
        self.explanation.api_key = non_blank(self.explanation.api_key.take());
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(host) = &overrides.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level.clone_from(level);
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(invalid("server.host", "host cannot be empty"));
        }

        validate_url("dataset_search.endpoint", &self.dataset_search.endpoint)?;
        if self.dataset_search.page_size == 0 || self.dataset_search.page_size > MAX_PAGE_SIZE {
            return Err(invalid(
                "dataset_search.page_size",
                &format!("page size must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        if self.dataset_search.sort_key.trim().is_empty() {
            return Err(invalid("dataset_search.sort_key", "sort key cannot be empty"));
        }
        if self.dataset_search.timeout_secs == 0 {
            return Err(invalid("dataset_search.timeout_secs", "timeout must be positive"));
        }

        validate_url("explanation.base_url", &self.explanation.base_url)?;
        if self.explanation.model.trim().is_empty() {
            return Err(invalid("explanation.model", "model cannot be empty"));
        }
        if self.explanation.timeout_secs == 0 {
            return Err(invalid("explanation.timeout_secs", "timeout must be positive"));
        }

        for origin in &self.server.allowed_origins {
            validate_url("server.allowed_origins", origin)?;
        }

        Ok(())
    }

    /// Log the effective configuration without exposing credentials
    pub fn log_summary(&self, source: Option<&Path>) {
        match source {
            Some(path) => info!("Configuration file: {}", path.display()),
            None => debug!("No configuration file given, using defaults and environment"),
        }
        info!(
            host = %self.server.host,
            port = self.server.port,
            cmr_endpoint = %self.dataset_search.endpoint,
            gemini_model = %self.explanation.model,
            nasa_api_key = redact(self.dataset_search.api_key.as_deref()),
            gemini_api_key = redact(self.explanation.api_key.as_deref()),
            "Configuration loaded"
        );
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

const fn redact(value: Option<&str>) -> &'static str {
    match value {
        Some(_) => "<set>",
        None => "<not set>",
    }
}

fn invalid(field: &str, reason: &str) -> Error {
    Error::InvalidInput {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| invalid(field, &format!("invalid URL '{value}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(field, &format!("unsupported URL scheme '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.dataset_search.page_size, 5);
        assert_eq!(config.dataset_search.sort_key, "-score");
        assert_eq!(config.explanation.timeout_secs, 20);
        assert!(config.explanation.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.dataset_search.page_size = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));

        let mut config = Config::default();
        config.explanation.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));

        let mut config = Config::default();
        config.dataset_search.endpoint = "ftp://cmr.example.com".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));

        let mut config = Config::default();
        config.explanation.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(&ConfigOverrides {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            log_level: Some("debug".to_string()),
            log_format: Some(LogFormat::Json),
        });
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_blank_credentials_are_ignored() {
        let mut config = Config::default();
        config.explanation.api_key = Some("   ".to_string());
        config.apply_credentials(Credentials {
            nasa_api_key: Some(String::new()),
            gemini_api_key: None,
        });
        assert!(config.dataset_search.api_key.is_none());
        assert!(config.explanation.api_key.is_none());

        config.apply_credentials(Credentials {
            nasa_api_key: None,
            gemini_api_key: Some("secret".to_string()),
        });
        assert_eq!(config.explanation.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let mut config = Config::default();
        config.explanation.api_key = Some("super-secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<set>"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8123

[dataset_search]
page_size = 10

[explanation]
model = "gemini-test"
"#
        )
        .unwrap();

        // Environment layers are left out so NASA_GUIDE_* in the shell cannot interfere
        let config: Config = Config::file_layers(Some(file.path()))
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.dataset_search.page_size, 10);
        assert_eq!(config.explanation.model, "gemini-test");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_summary_reports_source_without_secrets() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut config = Config::default();
        config.explanation.api_key = Some("super-secret".to_string());
        tracing::subscriber::with_default(subscriber, || {
            config.log_summary(Some(Path::new("/etc/nasa-guide.toml")));
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Configuration file: /etc/nasa-guide.toml"));
        assert!(output.contains("Configuration loaded"));
        assert!(!output.contains("super-secret"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Config::load(Some(Path::new("/nonexistent/nasa-guide.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
