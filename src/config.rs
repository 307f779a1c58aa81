//! Runtime configuration.
//!
//! Precedence, lowest first: built-in defaults, the JSON config file
//! (`$GEOLOC_CONFIG` or `~/.geoloc/config.json`), then environment variables.

use serde::Deserialize;
use std::env::VarError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";
pub const US_COUNTRY_CODE: &str = "US";

const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 2_000;
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no API key configured; set GEOLOC_API_KEY or OPENWEATHER_API_KEY, \
         or add \"api_key\" to the config file"
    )]
    MissingApiKey,

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("cannot read config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config file {}: {source}", .path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the resolver and lookup client need, passed in explicitly.
#[derive(Clone, PartialEq)]
pub struct GeolocConfig {
    pub api_key: String,
    pub base_url: String,
    /// Always "US"; lookups are never made for other countries.
    pub country_code: String,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub log_level: String,
}

impl GeolocConfig {
    /// Defaults plus the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            country_code: US_COUNTRY_CODE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl fmt::Debug for GeolocConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeolocConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("country_code", &self.country_code)
            .field("request_timeout", &self.request_timeout)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// On-disk config. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub log_level: Option<String>,
}

/// Load configuration from the config file and the process environment.
///
/// Does not read `.env`; `main` does that first via `dotenvy`.
pub fn load_config() -> Result<GeolocConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".geoloc").join("config.json"))
}

/// Read a JSON config file.
///
/// A missing file yields an empty [`FileConfig`] unless `required` is set.
pub fn read_config_file(path: &Path, required: bool) -> Result<FileConfig, ConfigError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&data).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

fn build_config<F>(lookup: F) -> Result<GeolocConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let file = match lookup("GEOLOC_CONFIG") {
        Ok(path) => read_config_file(Path::new(&path), true)?,
        Err(_) => match default_config_path() {
            Some(path) => read_config_file(&path, false)?,
            None => FileConfig::default(),
        },
    };
    merge(file, lookup)
}

/// Layer environment overrides on top of a file config and validate.
fn merge<F>(file: FileConfig, lookup: F) -> Result<GeolocConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let parse_u64 = |var: &str| -> Result<Option<u64>, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(None),
        }
    };

    // A blank value at one layer falls through to the next.
    let env_key = |var: &str| lookup(var).ok().and_then(non_blank);
    let api_key = env_key("GEOLOC_API_KEY")
        .or_else(|| env_key("OPENWEATHER_API_KEY"))
        .or_else(|| file.api_key.and_then(non_blank))
        .ok_or(ConfigError::MissingApiKey)?;

    let base_url = lookup("GEOLOC_BASE_URL")
        .ok()
        .or(file.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = base_url.trim().trim_end_matches('/').to_string();
    if base_url.is_empty() {
        return Err(ConfigError::Invalid {
            field: "base_url",
            reason: "must not be empty".into(),
        });
    }

    let timeout_secs = parse_u64("GEOLOC_TIMEOUT_SECS")?
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            field: "timeout_secs",
            reason: "must be greater than zero".into(),
        });
    }

    let max_attempts = match parse_u64("GEOLOC_MAX_ATTEMPTS")? {
        Some(n) => u32::try_from(n).map_err(|e| ConfigError::InvalidEnvVar {
            var: "GEOLOC_MAX_ATTEMPTS".into(),
            reason: e.to_string(),
        })?,
        None => file.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
    };
    if max_attempts == 0 {
        return Err(ConfigError::Invalid {
            field: "max_attempts",
            reason: "must be at least 1".into(),
        });
    }

    let retry_delay_ms = parse_u64("GEOLOC_RETRY_DELAY_MS")?
        .or(file.retry_delay_ms)
        .unwrap_or(DEFAULT_RETRY_DELAY_MS);

    let log_level = lookup("GEOLOC_LOG_LEVEL")
        .ok()
        .and_then(non_blank)
        .or_else(|| file.log_level.and_then(non_blank))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let log_level = parse_log_level(&log_level)?;

    Ok(GeolocConfig {
        api_key,
        base_url,
        country_code: US_COUNTRY_CODE.to_string(),
        request_timeout: Duration::from_secs(timeout_secs),
        max_attempts,
        retry_delay: Duration::from_millis(retry_delay_ms),
        log_level,
    })
}

fn non_blank(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Accept one of `off`, `error`, `warn`, `info`, `debug`, `trace` in any case.
fn parse_log_level(raw: &str) -> Result<String, ConfigError> {
    raw.parse::<LevelFilter>()
        .map(|level| level.to_string())
        .map_err(|e| ConfigError::Invalid {
            field: "log_level",
            reason: format!("{:?}: {}", raw, e),
        })
}
