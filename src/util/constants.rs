// banwatch - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "banwatch";

/// Application identifier used for the config directory.
pub const APP_ID: &str = "banwatch";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Sensor defaults
// =============================================================================

/// Display name prefixed to every jail sensor name.
pub const DEFAULT_SENSOR_NAME: &str = "fail2ban";

/// Log file read when no path is configured.
pub const DEFAULT_LOG_FILE: &str = "/var/log/fail2ban.log";

/// Seconds between log re-reads (and between scheduler ticks in the CLI).
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 120;

/// Minimum user-configurable scan interval (seconds).
pub const MIN_SCAN_INTERVAL_SECS: u64 = 1;

/// Maximum user-configurable scan interval (seconds).
pub const MAX_SCAN_INTERVAL_SECS: u64 = 86_400; // 1 day

/// Reported primary value when a jail has no current bans.
pub const NO_BAN_STATE: &str = "none";

// =============================================================================
// Ban bookkeeping limits
// =============================================================================

/// Maximum number of distinct addresses kept in a jail's ban history.
/// The oldest address is evicted first once the bound is exceeded.
pub const MAX_BAN_HISTORY: usize = 10;

/// Minimum length of an address token matched in a ban line.
pub const MIN_ADDRESS_LEN: usize = 3;

/// Maximum length of a jail name accepted at registration.
pub const MAX_JAIL_NAME_LEN: usize = 256;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
