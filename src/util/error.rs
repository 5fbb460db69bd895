// banwatch - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Read failures on the watched log never surface through these types to a
// poll caller; they are logged and degrade to "no events this cycle".

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for banwatch setup operations.
#[derive(Debug)]
pub enum BanWatchError {
    /// Jail matcher compilation failed.
    Matcher(MatcherError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Report serialisation failed.
    Report(serde_json::Error),
}

impl fmt::Display for BanWatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matcher(e) => write!(f, "Matcher error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Report(e) => write!(f, "Report error: {e}"),
        }
    }
}

impl std::error::Error for BanWatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Matcher(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Report(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for BanWatchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Report(e)
    }
}

// ---------------------------------------------------------------------------
// Matcher errors
// ---------------------------------------------------------------------------

/// Errors raised while registering a jail.
#[derive(Debug)]
pub enum MatcherError {
    /// The jail name is empty or whitespace only.
    EmptyJailName,

    /// The jail name exceeds the maximum accepted length.
    JailNameTooLong { length: usize, max_length: usize },

    /// The generated pattern failed to compile.
    InvalidRegex {
        jail: String,
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for MatcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyJailName => write!(f, "Jail name must not be empty"),
            Self::JailNameTooLong { length, max_length } => write!(
                f,
                "Jail name is {length} chars, exceeds maximum of {max_length}"
            ),
            Self::InvalidRegex {
                jail,
                pattern,
                source,
            } => write!(
                f,
                "Jail '{jail}': invalid ban pattern ('{pattern}'): {source}"
            ),
        }
    }
}

impl std::error::Error for MatcherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<MatcherError> for BanWatchError {
    fn from(e: MatcherError) -> Self {
        Self::Matcher(e)
    }
}

// ---------------------------------------------------------------------------
// Log read errors
// ---------------------------------------------------------------------------

/// Reasons the watched log could not be read in a cycle.
///
/// These are reported as warnings and never propagated to poll callers.
#[derive(Debug)]
pub enum LogReadError {
    /// The log path does not exist.
    NotFound { path: PathBuf },

    /// The log path points at a directory.
    IsDirectory { path: PathBuf },

    /// Any other I/O failure while reading.
    Io { path: PathBuf, source: io::Error },
}

impl LogReadError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else if path.is_dir() {
            Self::IsDirectory { path }
        } else {
            Self::Io { path, source }
        }
    }
}

impl fmt::Display for LogReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Log file '{}' not present", path.display())
            }
            Self::IsDirectory { path } => {
                write!(f, "Log path '{}' is a directory", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "I/O error reading '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LogReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// No jail was configured from any source.
    NoJails,

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::NoJails => write!(
                f,
                "At least one jail is required. Pass --jail <NAME> or set \
                 [fail2ban] jails in config.toml."
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::NoJails => None,
        }
    }
}

impl From<ConfigError> for BanWatchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for banwatch results.
pub type Result<T> = std::result::Result<T, BanWatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_missing_file_classified_as_not_found() {
        let err = LogReadError::from_io(
            PathBuf::from("/nonexistent/fail2ban.log"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(err, LogReadError::NotFound { .. }));
        assert!(err.to_string().contains("not present"));
    }

    #[test]
    fn test_directory_classified_as_is_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = LogReadError::from_io(
            dir.path().to_path_buf(),
            io::Error::new(io::ErrorKind::Other, "is a directory"),
        );
        assert!(matches!(err, LogReadError::IsDirectory { .. }));
    }

    #[test]
    fn test_config_error_chain_preserved() {
        let err: BanWatchError = ConfigError::Io {
            path: PathBuf::from("config.toml"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        }
        .into();
        assert!(err.to_string().starts_with("Configuration error"));
        assert!(err.source().is_some());
    }
}
