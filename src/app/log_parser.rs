// banwatch - app/log_parser.rs
//
// Timer-gated reader for the fail2ban log, shared by every jail tracker.
//
// Architecture:
//   - One `LogParser` per monitor. It owns the re-read interval, the log
//     path, and a cache of the most recent read tagged with a generation
//     number.
//   - Trackers hold their own `JailMatcher` (returned by `register_jail`)
//     and ask the parser for content newer than the generation they last
//     consumed. A refresh tripped by one jail's poll is therefore seen by
//     every jail.
//   - The timer check-and-reset happens behind `&mut self`, so a tick that
//     polls several jails performs at most one read.
//   - The timer starts at construction: the first timed refresh is due only
//     once a full interval has passed. `read` and `read_now` bypass it.
//
// The whole file is re-read on each refresh. Read failures are logged as
// warnings and cached as empty content; they never reach the caller.

use crate::core::matcher::JailMatcher;
use crate::core::model::BanEvent;
use crate::platform::fs;
use crate::util::error::MatcherError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Content of one read of the log, shared cheaply with trackers.
#[derive(Debug, Clone)]
pub struct LogSnapshot {
    /// Monotonic read counter; 0 means "never read".
    pub generation: u64,
    /// Wall-clock time of the read.
    pub read_at: DateTime<Utc>,
    /// False if the log could not be read.
    pub read_ok: bool,
    /// Full file content, empty if the read failed.
    pub content: Arc<str>,
}

/// Reads the fail2ban log at most once per interval.
#[derive(Debug)]
pub struct LogParser {
    interval: Duration,
    log_file: PathBuf,
    /// Construction time until the first timed refresh.
    last_read_at: Instant,
    snapshot: Option<LogSnapshot>,
}

impl LogParser {
    pub fn new(interval: Duration, log_file: impl Into<PathBuf>) -> Self {
        Self::new_at(interval, log_file, Instant::now())
    }

    /// Create a parser whose timer starts at `now`.
    pub fn new_at(interval: Duration, log_file: impl Into<PathBuf>, now: Instant) -> Self {
        let log_file = log_file.into();
        tracing::debug!(
            file = %log_file.display(),
            interval_secs = interval.as_secs(),
            "Log parser created"
        );
        Self {
            interval,
            log_file,
            last_read_at: now,
            snapshot: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Compile the ban matcher for `jail_name`.
    ///
    /// The returned handle is owned by the caller; the parser keeps no
    /// per-jail state.
    pub fn register_jail(&self, jail_name: &str) -> Result<JailMatcher, MatcherError> {
        let matcher = JailMatcher::new(jail_name)?;
        tracing::debug!(jail = jail_name, "Setting up jail");
        Ok(matcher)
    }

    /// Whether a re-read is due now. Resets the timer when it returns true.
    pub fn should_refresh(&mut self) -> bool {
        self.should_refresh_at(Instant::now())
    }

    /// Whether more than `interval` has passed between the last read and
    /// `now`. Resets the timer to `now` when it returns true.
    pub fn should_refresh_at(&mut self, now: Instant) -> bool {
        let due = now.saturating_duration_since(self.last_read_at) > self.interval;
        if due {
            self.last_read_at = now;
        }
        due
    }

    /// Re-read the log immediately and return the events for `matcher`.
    ///
    /// Ignores the timer. Returns an empty sequence if the log cannot be
    /// read.
    pub fn read(&mut self, matcher: &JailMatcher) -> Vec<BanEvent> {
        let snapshot = self.read_now();
        let events = matcher.find_events(&snapshot.content);
        tracing::debug!(jail = matcher.jail(), events = events.len(), "Read ban events");
        events
    }

    /// Re-read the log if the interval has elapsed by `now`.
    ///
    /// Returns true if a read happened (successful or not).
    pub fn refresh_at(&mut self, now: Instant) -> bool {
        if self.should_refresh_at(now) {
            self.read_now();
            true
        } else {
            false
        }
    }

    /// The cached content if it is newer than `generation`.
    pub fn snapshot_since(&self, generation: u64) -> Option<LogSnapshot> {
        self.snapshot
            .as_ref()
            .filter(|s| s.generation > generation)
            .cloned()
    }

    /// Read the whole file into the cache under a new generation, ignoring
    /// and leaving untouched the refresh timer.
    pub fn read_now(&mut self) -> LogSnapshot {
        let (read_ok, content): (bool, Arc<str>) = match fs::read_log_lossy(&self.log_file) {
            Ok(text) => {
                tracing::debug!(
                    file = %self.log_file.display(),
                    bytes = text.len(),
                    "Log re-read"
                );
                (true, Arc::from(text))
            }
            Err(e) => {
                tracing::warn!(file = %self.log_file.display(), error = %e, "Log read failed");
                (false, Arc::from(""))
            }
        };

        let generation = self.snapshot.as_ref().map_or(0, |s| s.generation) + 1;
        let snapshot = LogSnapshot {
            generation,
            read_at: Utc::now(),
            read_ok,
            content,
        };
        self.snapshot = Some(snapshot.clone());
        snapshot
    }
}
