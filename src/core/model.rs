// banwatch - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies. These types are the shared vocabulary across
// all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Ban events
// =============================================================================

/// What fail2ban did to an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BanAction {
    Ban,
    Unban,
}

impl BanAction {
    /// Map the action word captured from a log line. Case-sensitive, as
    /// fail2ban always writes `Ban` / `Unban`.
    pub fn from_log_word(word: &str) -> Option<Self> {
        match word {
            "Ban" => Some(Self::Ban),
            "Unban" => Some(Self::Unban),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ban => "Ban",
            Self::Unban => "Unban",
        }
    }
}

impl fmt::Display for BanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single ban or unban extracted from the log, scoped to one jail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanEvent {
    pub action: BanAction,
    /// Address token as written in the log. Not validated as an IP.
    pub address: String,
}

impl BanEvent {
    pub fn ban(address: impl Into<String>) -> Self {
        Self {
            action: BanAction::Ban,
            address: address.into(),
        }
    }

    pub fn unban(address: impl Into<String>) -> Self {
        Self {
            action: BanAction::Unban,
            address: address.into(),
        }
    }
}

// =============================================================================
// Reported state
// =============================================================================

/// Snapshot of one jail sensor as handed to the presentation layer.
///
/// `state` is the primary value; `current_bans` and `total_bans` are the
/// attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JailState {
    /// Sensor name, `"<display name> <jail>"`.
    pub name: String,

    /// Jail the sensor watches.
    pub jail: String,

    /// Most recently banned address still banned, or `"none"`.
    pub state: String,

    /// Addresses currently banned, in ban order.
    pub current_bans: Vec<String>,

    /// Bounded history of distinct banned addresses, oldest first.
    pub total_bans: Vec<String>,

    /// When the last successful read behind this state happened. Failed
    /// reads leave it unchanged; `None` until a read succeeds.
    pub last_read_at: Option<DateTime<Utc>>,
}

impl JailState {
    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} (current: [{}], total: [{}])",
            self.name,
            self.state,
            self.current_bans.join(", "),
            self.total_bans.join(", ")
        )
    }
}
