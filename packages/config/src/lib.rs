#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Run configuration for the dispatch connector.
//!
//! Configuration is read from a TOML file whose keys match the hosting
//! runtime's stored configuration (`API_URL`, `API_Token`, `DataType`,
//! `Agencies`, `DEBUG`), then overridden by `DISPATCH_MAP_*` environment
//! variables. [`resolve`] validates the merged result into a
//! [`DispatchConfig`]; nothing touches the network until that succeeds.

pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use dispatch_map_dispatch_models::{AgencyRef, DataType, FetchMode};
use serde::{Deserialize, Serialize};

/// Config file used when neither `--config` nor `DISPATCH_MAP_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "dispatch_map.toml";

/// Interval between scheduled runs when `PollIntervalSecs` is not set.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Environment variable that turns on debug logging.
pub const DEBUG_ENV: &str = "DISPATCH_MAP_DEBUG";

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal: a run never starts with an invalid config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has the wrong shape.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required field is absent or blank.
    #[error("Missing required config field: {field}")]
    Missing {
        /// Name of the field, as written in the config file.
        field: &'static str,
    },

    /// `DataType` is not one of the supported values.
    #[error("Unsupported DataType: {value} (expected one of: incidents, units)")]
    UnsupportedDataType {
        /// The rejected value.
        value: String,
    },

    /// Any other invalid value.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Where the finished feature collection is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Print the collection to stdout.
    #[default]
    Stdout,
    /// Write the collection to a file, replacing it atomically.
    File {
        /// Destination path.
        path: PathBuf,
    },
    /// POST the collection to an HTTP endpoint.
    Http {
        /// Destination URL.
        url: String,
    },
}

/// Configuration exactly as stored, before validation.
///
/// Every field is optional here so that missing values can be filled from
/// the environment and then reported precisely by [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(rename = "API_URL", default)]
    pub api_url: Option<String>,
    #[serde(rename = "API_Token", default)]
    pub api_token: Option<String>,
    /// Kept as a string so that an unknown value surfaces as
    /// [`ConfigError::UnsupportedDataType`] rather than a parse error.
    #[serde(rename = "DataType", default)]
    pub data_type: Option<String>,
    #[serde(rename = "Agencies", default)]
    pub agencies: Vec<AgencyRef>,
    #[serde(rename = "DEBUG", default)]
    pub debug: Option<bool>,
    #[serde(rename = "FetchMode", default)]
    pub fetch_mode: Option<FetchMode>,
    #[serde(rename = "Concurrency", default)]
    pub concurrency: Option<usize>,
    #[serde(rename = "TimeoutSecs", default)]
    pub timeout_secs: Option<u64>,
    #[serde(rename = "PollIntervalSecs", default)]
    pub poll_interval_secs: Option<u64>,
    #[serde(rename = "Sink", default)]
    pub sink: Option<SinkConfig>,
}

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// API base URL without a trailing slash.
    pub api_url: String,
    /// Value sent in the `x-api-key` header.
    pub api_token: String,
    pub data_type: DataType,
    /// Agencies to query, in configured order. Never contains a blank id.
    pub agencies: Vec<AgencyRef>,
    /// Enables verbose logging of responses and validation failures.
    pub debug: bool,
    pub fetch_mode: FetchMode,
    /// Maximum number of agency requests in flight. Always at least 1.
    pub concurrency: usize,
    /// Per-request timeout. `None` uses the HTTP client's default.
    pub timeout: Option<Duration>,
    pub poll_interval: Duration,
    pub sink: SinkConfig,
}

/// Parses a TOML config document.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] if the document is malformed.
pub fn parse_config_toml(toml_str: &str) -> Result<RawConfig, ConfigError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Loads configuration from `path` (or `DISPATCH_MAP_CONFIG`, or
/// [`DEFAULT_CONFIG_PATH`]), applies environment overrides, and validates.
///
/// When no path is given and the default file does not exist, the
/// configuration is built from environment variables alone.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed, or if the
/// merged configuration is invalid.
pub fn load(path: Option<&Path>) -> Result<DispatchConfig, ConfigError> {
    let explicit = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("DISPATCH_MAP_CONFIG").ok().map(PathBuf::from));

    let mut raw = match explicit {
        Some(path) => read_config_file(&path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                read_config_file(default_path)?
            } else {
                log::debug!("No {DEFAULT_CONFIG_PATH} found, using environment only");
                RawConfig::default()
            }
        }
    };

    apply_env_overrides(&mut raw, |key| std::env::var(key).ok())?;
    resolve(raw)
}

fn read_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    log::debug!("Reading config from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_toml(&contents)
}

/// Overlays `DISPATCH_MAP_*` variables onto `raw`.
///
/// `lookup` is normally `std::env::var`; it is injected so overrides can
/// be exercised without touching the process environment.
///
/// `DISPATCH_MAP_AGENCIES` is a comma-separated list of `id` or
/// `id=name` entries and replaces the configured agency list.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if a boolean or numeric override does
/// not parse.
pub fn apply_env_overrides<F>(raw: &mut RawConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DISPATCH_MAP_API_URL") {
        raw.api_url = Some(url);
    }
    if let Some(token) = lookup("DISPATCH_MAP_API_TOKEN") {
        raw.api_token = Some(token);
    }
    if let Some(data_type) = lookup("DISPATCH_MAP_DATA_TYPE") {
        raw.data_type = Some(data_type);
    }
    if let Some(debug) = lookup(DEBUG_ENV) {
        raw.debug = Some(parse_bool(DEBUG_ENV, &debug)?);
    }
    if let Some(concurrency) = lookup("DISPATCH_MAP_CONCURRENCY") {
        let parsed = concurrency
            .trim()
            .parse::<usize>()
            .map_err(|e| ConfigError::Invalid {
                message: format!("DISPATCH_MAP_CONCURRENCY={concurrency}: {e}"),
            })?;
        raw.concurrency = Some(parsed);
    }
    if let Some(agencies) = lookup("DISPATCH_MAP_AGENCIES") {
        raw.agencies = parse_agency_list(&agencies);
    }
    Ok(())
}

/// Reads [`DEBUG_ENV`] through `lookup`. Unset means `false`.
///
/// Used by the config overrides, the webhook server and the CLI alike.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the value is not a boolean.
pub fn debug_from_env<F>(lookup: F) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(DEBUG_ENV).map_or(Ok(false), |value| parse_bool(DEBUG_ENV, &value))
}

/// Parses `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off` (any case, empty
/// meaning `false`) for the variable `key`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for any other value.
pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::Invalid {
            message: format!("{key}={other} is not a boolean"),
        }),
    }
}

fn parse_agency_list(list: &str) -> Vec<AgencyRef> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((id, name)) => AgencyRef::new(id.trim(), name.trim()),
            None => AgencyRef::new(entry, entry),
        })
        .collect()
}

/// Validates a raw configuration.
///
/// Agencies with a blank id are dropped with a warning; an empty agency
/// list is valid and yields an empty collection.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] for an absent `API_URL` or
/// `API_Token`, [`ConfigError::UnsupportedDataType`] for an unknown
/// `DataType`, and [`ConfigError::Invalid`] for a zero `Concurrency`.
pub fn resolve(raw: RawConfig) -> Result<DispatchConfig, ConfigError> {
    let api_url = required(raw.api_url, "API_URL")?
        .trim_end_matches('/')
        .to_string();
    let api_token = required(raw.api_token, "API_Token")?;

    let data_type = match raw.data_type.as_deref().map(str::trim) {
        None | Some("") => DataType::default(),
        Some(value) => value
            .parse::<DataType>()
            .map_err(|_| ConfigError::UnsupportedDataType {
                value: value.to_string(),
            })?,
    };

    let concurrency = raw.concurrency.unwrap_or(1);
    if concurrency == 0 {
        return Err(ConfigError::Invalid {
            message: "Concurrency must be at least 1".to_string(),
        });
    }

    let agencies: Vec<AgencyRef> = raw
        .agencies
        .into_iter()
        .filter(|agency| {
            let keep = !agency.id.trim().is_empty();
            if !keep {
                log::warn!("Skipping agency {:?} with an empty id", agency.name);
            }
            keep
        })
        .collect();

    Ok(DispatchConfig {
        api_url,
        api_token,
        data_type,
        agencies,
        debug: raw.debug.unwrap_or(false),
        fetch_mode: raw.fetch_mode.unwrap_or_default(),
        concurrency,
        timeout: raw.timeout_secs.map(Duration::from_secs),
        poll_interval: Duration::from_secs(
            raw.poll_interval_secs
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
                .max(1),
        ),
        sink: raw.sink.unwrap_or_default(),
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing { field })
}
