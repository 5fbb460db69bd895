// banwatch - platform/config.rs
//
// Config directory resolution and config.toml loading with startup
// validation. CLI flags are layered on top of file values before
// validation, so every value is checked once against the same limits.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of `config.toml` for this platform.
///
/// Falls back to the current directory if platform dirs cannot be determined.
pub fn default_config_path() -> PathBuf {
    match ProjectDirs::from("", "", constants::APP_ID) {
        Some(dirs) => dirs.config_dir().join(constants::CONFIG_FILE_NAME),
        None => {
            tracing::warn!("Could not determine platform directories, using current directory");
            PathBuf::from(".").join(constants::CONFIG_FILE_NAME)
        }
    }
}

// =============================================================================
// config.toml shape
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[fail2ban]` section.
    pub fail2ban: Fail2banSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[fail2ban]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Fail2banSection {
    /// Jails to watch, one sensor each.
    pub jails: Option<Vec<String>>,
    /// Path of the fail2ban log.
    pub file_path: Option<String>,
    /// Display name prefixed to each sensor name.
    pub name: Option<String>,
    /// Seconds between log re-reads.
    pub scan_interval_secs: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Diagnostics output file (empty = stderr only).
    pub file: Option<String>,
}

/// Values given on the command line. `None` / empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub jails: Vec<String>,
    pub log_file: Option<PathBuf>,
    pub name: Option<String>,
    pub scan_interval_secs: Option<u64>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Jails to watch, trimmed and de-duplicated, never empty.
    pub jails: Vec<String>,
    /// fail2ban log path.
    pub log_file: PathBuf,
    /// Sensor display name.
    pub name: String,
    /// Minimum time between log re-reads.
    pub scan_interval: Duration,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Diagnostics output file.
    pub log_output: Option<PathBuf>,
}

// =============================================================================
// Loading
// =============================================================================

/// Read and parse `path`.
///
/// A missing file yields `Ok(None)` unless `required` is set, in which case
/// it is an error like any other read or parse failure.
pub fn read_raw_config(path: &Path, required: bool) -> Result<Option<RawConfig>, ConfigError> {
    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), "Loaded config.toml");
    Ok(Some(raw))
}

/// Merge CLI overrides over file values and validate the result.
///
/// Returns the validated config and a list of non-fatal warnings; invalid
/// optional values fall back to defaults. Having no jail at all is fatal.
pub fn resolve_config(
    raw: RawConfig,
    overrides: ConfigOverrides,
) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    // -- Jails: CLI list replaces the file list --
    let requested = if overrides.jails.is_empty() {
        raw.fail2ban.jails.unwrap_or_default()
    } else {
        overrides.jails
    };
    let mut jails: Vec<String> = Vec::with_capacity(requested.len());
    for jail in requested {
        let jail = jail.trim().to_string();
        if jail.is_empty() {
            warnings.push("Ignoring empty jail name.".to_string());
        } else if jails.contains(&jail) {
            warnings.push(format!("Jail '{jail}' listed more than once; watching it once."));
        } else {
            jails.push(jail);
        }
    }
    if jails.is_empty() {
        return Err(ConfigError::NoJails);
    }

    // -- Log file --
    let log_file = overrides
        .log_file
        .or_else(|| raw.fail2ban.file_path.filter(|p| !p.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_LOG_FILE));
    if !log_file.is_file() {
        warnings.push(format!(
            "Log file '{}' is not a readable file yet; jails report \"{}\" until it appears.",
            log_file.display(),
            constants::NO_BAN_STATE,
        ));
    }

    // -- Name --
    let name = overrides
        .name
        .or(raw.fail2ban.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| constants::DEFAULT_SENSOR_NAME.to_string());

    // -- Scan interval --
    let mut scan_interval_secs = constants::DEFAULT_SCAN_INTERVAL_SECS;
    if let Some(secs) = overrides.scan_interval_secs.or(raw.fail2ban.scan_interval_secs) {
        if (constants::MIN_SCAN_INTERVAL_SECS..=constants::MAX_SCAN_INTERVAL_SECS).contains(&secs) {
            scan_interval_secs = secs;
        } else {
            warnings.push(format!(
                "scan_interval_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_SCAN_INTERVAL_SECS,
                constants::MAX_SCAN_INTERVAL_SECS,
                constants::DEFAULT_SCAN_INTERVAL_SECS,
            ));
        }
    }

    // -- Logging: level --
    let mut log_level = None;
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            log_level = Some(level);
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    let log_output = raw.logging.file.filter(|f| !f.is_empty()).map(PathBuf::from);

    let config = AppConfig {
        jails,
        log_file,
        name,
        scan_interval: Duration::from_secs(scan_interval_secs),
        log_level,
        log_output,
    };
    Ok((config, warnings))
}
