use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use url::Url;

use crate::form::FormState;
use crate::types::{Config, ConfigSource, DEFAULT_WEBHOOK_URL};

/// Errors while resolving the startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid webhook URL '{url}' (from {origin}): {source}")]
    InvalidUrl {
        url: String,
        origin: ConfigSource,
        source: url::ParseError,
    },
}

/// The webhook endpoint chosen at startup, plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub webhook_url: Url,
    pub source: ConfigSource,
}

/// Application state shared by the form surfaces
pub struct AppState {
    pub config: ResolvedConfig,
    pub form: Mutex<FormState>,
}

impl AppState {
    pub fn new(config: ResolvedConfig) -> Self {
        Self::with_date(config, Local::now().date_naive())
    }

    /// State whose form starts on `today` instead of the local date.
    pub fn with_date(config: ResolvedConfig, today: NaiveDate) -> Self {
        Self {
            config,
            form: Mutex::new(FormState::new(today)),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(today: NaiveDate) -> Self {
        let config = resolve_config(None, None).expect("default webhook URL parses");
        Self::with_date(config, today)
    }
}

/// Get the canonical config file path (~/.worklog/config.json)
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".worklog").join("config.json"))
}

/// Read a config file. A missing file is not an error.
pub fn read_config_file(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(config))
}

/// Pick the webhook URL: explicit override, then config file, then the
/// built-in development fallback. Whichever wins must be an absolute URL.
pub fn resolve_config(
    override_url: Option<&str>,
    file: Option<Config>,
) -> Result<ResolvedConfig, ConfigError> {
    let (raw, source) = match (override_url, file) {
        (Some(url), _) if !url.trim().is_empty() => (url.trim().to_string(), ConfigSource::Override),
        (_, Some(config)) => (config.webhook_url, ConfigSource::File),
        _ => (DEFAULT_WEBHOOK_URL.to_string(), ConfigSource::Default),
    };

    let webhook_url = Url::parse(&raw).map_err(|source_err| ConfigError::InvalidUrl {
        url: raw.clone(),
        origin: source,
        source: source_err,
    })?;

    Ok(ResolvedConfig {
        webhook_url,
        source,
    })
}

/// Load configuration once at startup.
///
/// When an override is given the config file is not read at all.
pub fn load_config(override_url: Option<&str>) -> Result<ResolvedConfig, ConfigError> {
    if override_url.is_some_and(|url| !url.trim().is_empty()) {
        return resolve_config(override_url, None);
    }

    let path = config_path()?;
    let file = read_config_file(&path)?;
    if file.is_none() {
        log::debug!("No config at {}; using built-in webhook URL", path.display());
    }
    resolve_config(None, file)
}
