// banwatch - app/tracker.rs
//
// One sensor per jail. Each poll asks the shared parser for fresh content,
// replaces the working event list when new content exists, and re-folds the
// whole list into the ban ledger.
//
// The fold covers every event currently held, not only events new since
// the last poll. A fresh read replaces the list; it does not append to it.
// Long-term history survives only in the ledger's bounded ban history.

use crate::app::log_parser::LogParser;
use crate::core::ledger::BanLedger;
use crate::core::matcher::JailMatcher;
use crate::core::model::{BanEvent, JailState};
use crate::util::error::MatcherError;
use chrono::{DateTime, Utc};
use std::time::Instant;

#[derive(Debug)]
pub struct JailTracker {
    name: String,
    matcher: JailMatcher,
    ledger: BanLedger,
    /// Matches from the most recent content this tracker consumed.
    events: Vec<BanEvent>,
    /// Generation of that content; 0 before the first read.
    seen_generation: u64,
    /// Time of the last successful read consumed.
    last_read_at: Option<DateTime<Utc>>,
}

impl JailTracker {
    /// Register `jail` with `parser` and create its tracker.
    ///
    /// The sensor is named `"<display_name> <jail>"`.
    pub fn new(display_name: &str, jail: &str, parser: &LogParser) -> Result<Self, MatcherError> {
        let matcher = parser.register_jail(jail)?;
        Ok(Self {
            name: format!("{display_name} {jail}"),
            matcher,
            ledger: BanLedger::new(),
            events: Vec::new(),
            seen_generation: 0,
            last_read_at: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn jail_name(&self) -> &str {
        self.matcher.jail()
    }

    /// Poll using the current time.
    pub fn poll(&mut self, parser: &mut LogParser) {
        self.poll_at(parser, Instant::now());
    }

    /// Poll as if the current time were `now`.
    pub fn poll_at(&mut self, parser: &mut LogParser, now: Instant) {
        parser.refresh_at(now);

        if let Some(snapshot) = parser.snapshot_since(self.seen_generation) {
            self.events = self.matcher.find_events(&snapshot.content);
            self.seen_generation = snapshot.generation;
            if snapshot.read_ok {
                self.last_read_at = Some(snapshot.read_at);
            }
            tracing::debug!(
                jail = self.jail_name(),
                generation = snapshot.generation,
                events = self.events.len(),
                "Jail picked up new log content"
            );
        }

        for event in &self.events {
            tracing::trace!(
                jail = self.jail_name(),
                action = %event.action,
                address = %event.address,
                "Folding ban event"
            );
        }
        self.ledger.fold(&self.events);
    }

    pub fn current_bans(&self) -> &[String] {
        self.ledger.current_bans()
    }

    pub fn all_bans(&self) -> Vec<String> {
        self.ledger.all_bans()
    }

    /// Primary value: the most recent current ban, or `"none"`.
    pub fn most_recent_ban(&self) -> String {
        self.ledger.state_value()
    }

    /// Snapshot for the presentation layer.
    pub fn state(&self) -> JailState {
        JailState {
            name: self.name.clone(),
            jail: self.jail_name().to_string(),
            state: self.ledger.state_value(),
            current_bans: self.ledger.current_bans().to_vec(),
            total_bans: self.ledger.all_bans(),
            last_read_at: self.last_read_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const INTERVAL: Duration = Duration::from_secs(120);

    fn after_interval(t: Instant) -> Instant {
        t + INTERVAL + Duration::from_secs(1)
    }

    fn write_log(path: &std::path::Path, content: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_name_combines_display_name_and_jail() {
        let parser = LogParser::new(INTERVAL, "/nonexistent.log");
        let tracker = JailTracker::new("fail2ban", "sshd", &parser).unwrap();
        assert_eq!(tracker.name(), "fail2ban sshd");
        assert_eq!(tracker.jail_name(), "sshd");
    }

    #[test]
    fn test_state_before_any_read() {
        let parser = LogParser::new(INTERVAL, "/nonexistent.log");
        let tracker = JailTracker::new("fail2ban", "sshd", &parser).unwrap();
        let state = tracker.state();
        assert_eq!(state.state, "none");
        assert!(state.current_bans.is_empty());
        assert!(state.total_bans.is_empty());
        assert!(state.last_read_at.is_none());
    }

    #[test]
    fn test_ban_then_unban_across_reads() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("fail2ban.log");
        write_log(&log, "[sshd] Ban 1.2.3.4\n[sshd] Ban 5.6.7.8\n");

        let start = Instant::now();
        let mut parser = LogParser::new_at(INTERVAL, &log, start);
        let mut tracker = JailTracker::new("fail2ban", "sshd", &parser).unwrap();
        let t0 = after_interval(start);

        tracker.poll_at(&mut parser, t0);
        assert_eq!(tracker.current_bans(), ["1.2.3.4", "5.6.7.8"]);
        assert_eq!(tracker.most_recent_ban(), "5.6.7.8");

        write_log(&log, "[sshd] Unban 1.2.3.4\n");
        tracker.poll_at(&mut parser, after_interval(t0));
        assert_eq!(tracker.current_bans(), ["5.6.7.8"]);
        assert_eq!(tracker.all_bans(), vec!["1.2.3.4", "5.6.7.8"]);
        assert_eq!(tracker.most_recent_ban(), "5.6.7.8");
    }

    #[test]
    fn test_poll_within_interval_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("fail2ban.log");
        write_log(&log, "[sshd] Ban 1.2.3.4\n");

        let start = Instant::now();
        let mut parser = LogParser::new_at(INTERVAL, &log, start);
        let mut tracker = JailTracker::new("fail2ban", "sshd", &parser).unwrap();
        let t0 = after_interval(start);
        tracker.poll_at(&mut parser, t0);
        let before = tracker.state();

        // New content on disk is not seen until the interval passes.
        write_log(&log, "[sshd] Unban 1.2.3.4\n");
        tracker.poll_at(&mut parser, t0 + Duration::from_secs(30));
        assert_eq!(tracker.state(), before);
    }

    #[test]
    fn test_missing_log_keeps_prior_state() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("fail2ban.log");
        write_log(&log, "[sshd] Ban 1.2.3.4\n");

        let start = Instant::now();
        let mut parser = LogParser::new_at(INTERVAL, &log, start);
        let mut tracker = JailTracker::new("fail2ban", "sshd", &parser).unwrap();
        let t0 = after_interval(start);
        tracker.poll_at(&mut parser, t0);
        let read_at = tracker.state().last_read_at;
        assert!(read_at.is_some());

        std::fs::remove_file(&log).unwrap();
        tracker.poll_at(&mut parser, after_interval(t0));
        // The failed read does not count as the source of the reported state.
        assert_eq!(tracker.state().last_read_at, read_at);
        assert_eq!(tracker.current_bans(), ["1.2.3.4"]);
        assert_eq!(tracker.all_bans(), vec!["1.2.3.4"]);
        assert_eq!(tracker.most_recent_ban(), "1.2.3.4");
    }

    #[test]
    fn test_every_jail_sees_a_shared_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("fail2ban.log");
        write_log(&log, "[sshd] Ban 1.2.3.4\n[nginx] Ban 9.8.7.6\n");

        let start = Instant::now();
        let mut parser = LogParser::new_at(INTERVAL, &log, start);
        let mut sshd = JailTracker::new("fail2ban", "sshd", &parser).unwrap();
        let mut nginx = JailTracker::new("fail2ban", "nginx", &parser).unwrap();
        let t0 = after_interval(start);

        sshd.poll_at(&mut parser, t0);
        nginx.poll_at(&mut parser, t0);
        assert_eq!(sshd.current_bans(), ["1.2.3.4"]);
        assert_eq!(nginx.current_bans(), ["9.8.7.6"]);
    }

    #[test]
    fn test_first_poll_reports_none_until_interval_passes() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("fail2ban.log");
        write_log(&log, "[sshd] Ban 1.2.3.4\n");

        let start = Instant::now();
        let mut parser = LogParser::new_at(INTERVAL, &log, start);
        let mut tracker = JailTracker::new("fail2ban", "sshd", &parser).unwrap();

        tracker.poll_at(&mut parser, start);
        assert_eq!(tracker.most_recent_ban(), "none");
        tracker.poll_at(&mut parser, start + INTERVAL);
        assert_eq!(tracker.most_recent_ban(), "none");
        assert!(tracker.state().last_read_at.is_none());

        tracker.poll_at(&mut parser, after_interval(start));
        assert_eq!(tracker.most_recent_ban(), "1.2.3.4");
    }

    #[test]
    fn test_forced_read_served_without_timer() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("fail2ban.log");
        write_log(&log, "[sshd] Ban 1.2.3.4\n");

        let start = Instant::now();
        let mut parser = LogParser::new_at(INTERVAL, &log, start);
        let mut tracker = JailTracker::new("fail2ban", "sshd", &parser).unwrap();

        parser.read_now();
        tracker.poll_at(&mut parser, start);
        assert_eq!(tracker.most_recent_ban(), "1.2.3.4");
        // The forced read left the timer alone.
        assert!(!parser.should_refresh_at(start + INTERVAL));
    }
}
