// banwatch - app/monitor.rs
//
// Platform setup: one shared `LogParser` and one `JailTracker` per
// configured jail. Trackers are polled sequentially, each borrowing the
// parser mutably in turn.

use crate::app::log_parser::LogParser;
use crate::app::tracker::JailTracker;
use crate::core::model::JailState;
use crate::platform::config::AppConfig;
use crate::util::error::MatcherError;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct BanMonitor {
    parser: LogParser,
    trackers: Vec<JailTracker>,
}

impl BanMonitor {
    /// Build a monitor for `jails`. Fails on the first jail whose matcher
    /// cannot be registered.
    pub fn new<S: AsRef<str>>(
        display_name: &str,
        jails: &[S],
        log_file: impl Into<PathBuf>,
        interval: Duration,
    ) -> Result<Self, MatcherError> {
        let parser = LogParser::new(interval, log_file);
        let trackers = jails
            .iter()
            .map(|jail| JailTracker::new(display_name, jail.as_ref(), &parser))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            jails = trackers.len(),
            file = %parser.log_file().display(),
            "Monitor ready"
        );
        Ok(Self { parser, trackers })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, MatcherError> {
        Self::new(
            &config.name,
            &config.jails,
            config.log_file.clone(),
            config.scan_interval,
        )
    }

    pub fn interval(&self) -> Duration {
        self.parser.interval()
    }

    pub fn trackers(&self) -> &[JailTracker] {
        &self.trackers
    }

    /// Poll every jail once and return their states in configuration order.
    pub fn poll_all(&mut self) -> Vec<JailState> {
        self.poll_all_at(Instant::now())
    }

    /// Read the log now, bypassing the refresh timer, and fold the content
    /// into every jail. The timer keeps its schedule.
    pub fn read_now(&mut self) -> Vec<JailState> {
        self.parser.read_now();
        self.poll_all_at(Instant::now())
    }

    pub fn poll_all_at(&mut self, now: Instant) -> Vec<JailState> {
        for tracker in &mut self.trackers {
            tracker.poll_at(&mut self.parser, now);
        }
        self.states()
    }

    pub fn states(&self) -> Vec<JailState> {
        self.trackers.iter().map(JailTracker::state).collect()
    }
}
