use secrecy::SecretString;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_FILE: &str = "settings.toml";
pub const DEFAULT_MKHOMEDIR_HELPER: &str = "/usr/sbin/mkhomedir_helper";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Process-level knobs read from the environment (and an optional `.env`).
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub settings_file: PathBuf,
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let settings_file = env::var("HOMEDIR_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE));
        let log_level = env::var("HOMEDIR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            settings_file,
            telemetry: TelemetryConfig { log_level },
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Endpoints of the accounts portal consumed by the cleanup commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataEndpoints {
    pub users: String,
}

/// Validated contents of the settings TOML file.
#[derive(Debug)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: SecretString,
    pub scopes: Vec<String>,
    pub token_endpoint: String,
    pub home_dir_folder: PathBuf,
    pub data_endpoints: DataEndpoints,
    pub mkhomedir_helper: PathBuf,
    pub request_timeout_secs: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
    token_endpoint: String,
    home_dir_folder: PathBuf,
    data_endpoints: DataEndpoints,
    #[serde(default)]
    mkhomedir_helper: Option<PathBuf>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = toml::from_str(content)?;
        Self::validate(raw)
    }

    /// Space-separated scope string sent with the token request.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    fn validate(raw: RawSettings) -> Result<Self, ConfigError> {
        if raw.client_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "client_id must not be empty".to_string(),
            ));
        }
        if raw.scopes.is_empty() {
            return Err(ConfigError::Validation(
                "scopes must list at least one scope".to_string(),
            ));
        }
        if !raw.home_dir_folder.is_absolute() {
            return Err(ConfigError::Validation(format!(
                "home_dir_folder must be an absolute path, got {}",
                raw.home_dir_folder.display()
            )));
        }

        let request_timeout_secs = raw
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            client_id: raw.client_id,
            client_secret: SecretString::from(raw.client_secret),
            scopes: raw.scopes,
            token_endpoint: raw.token_endpoint,
            home_dir_folder: raw.home_dir_folder,
            data_endpoints: raw.data_endpoints,
            mkhomedir_helper: raw
                .mkhomedir_helper
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MKHOMEDIR_HELPER)),
            request_timeout_secs,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("settings validation failed: {0}")]
    Validation(String),
}
