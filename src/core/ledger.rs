// banwatch - core/ledger.rs
//
// Ban bookkeeping for one jail: the current-ban set and the bounded
// history of distinct banned addresses. Pure logic, no I/O.

use crate::core::model::{BanAction, BanEvent};
use crate::util::constants::{MAX_BAN_HISTORY, NO_BAN_STATE};
use std::collections::VecDeque;

/// Current and historical bans for one jail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BanLedger {
    /// Addresses with a Ban not yet followed by an Unban, in ban order.
    current: Vec<String>,
    /// Distinct banned addresses, oldest first, at most `MAX_BAN_HISTORY`.
    history: VecDeque<String>,
}

impl BanLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `events` in order.
    ///
    /// A Ban for an address already current is a no-op, as is an Unban for
    /// an address that is not current. Unbans never touch the history.
    pub fn fold(&mut self, events: &[BanEvent]) {
        for event in events {
            match event.action {
                BanAction::Ban => self.record_ban(&event.address),
                BanAction::Unban => self.record_unban(&event.address),
            }
        }
    }

    fn record_ban(&mut self, address: &str) {
        if !self.current.iter().any(|a| a == address) {
            self.current.push(address.to_string());
        }
        if !self.history.iter().any(|a| a == address) {
            self.history.push_back(address.to_string());
        }
        while self.history.len() > MAX_BAN_HISTORY {
            if let Some(evicted) = self.history.pop_front() {
                tracing::trace!(address = %evicted, "Ban history full; evicted oldest");
            }
        }
    }

    fn record_unban(&mut self, address: &str) {
        self.current.retain(|a| a != address);
    }

    pub fn current_bans(&self) -> &[String] {
        &self.current
    }

    pub fn all_bans(&self) -> Vec<String> {
        self.history.iter().cloned().collect()
    }

    /// The last address still banned, if any.
    pub fn most_recent_ban(&self) -> Option<&str> {
        self.current.last().map(String::as_str)
    }

    /// Primary reported value: the most recent ban or `"none"`.
    pub fn state_value(&self) -> String {
        self.most_recent_ban().unwrap_or(NO_BAN_STATE).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_bans() {
        let mut ledger = BanLedger::new();
        ledger.fold(&[BanEvent::ban("1.2.3.4"), BanEvent::ban("5.6.7.8")]);
        assert_eq!(ledger.current_bans(), ["1.2.3.4", "5.6.7.8"]);
        assert_eq!(ledger.most_recent_ban(), Some("5.6.7.8"));
        assert_eq!(ledger.state_value(), "5.6.7.8");
    }

    #[test]
    fn test_unban_keeps_history() {
        let mut ledger = BanLedger::new();
        ledger.fold(&[BanEvent::ban("1.2.3.4"), BanEvent::ban("5.6.7.8")]);
        ledger.fold(&[BanEvent::unban("1.2.3.4")]);
        assert_eq!(ledger.current_bans(), ["5.6.7.8"]);
        assert_eq!(ledger.all_bans(), vec!["1.2.3.4", "5.6.7.8"]);
    }

    #[test]
    fn test_empty_ledger_reports_none() {
        let ledger = BanLedger::new();
        assert_eq!(ledger.most_recent_ban(), None);
        assert_eq!(ledger.state_value(), "none");
    }

    #[test]
    fn test_duplicate_ban_is_noop() {
        let mut ledger = BanLedger::new();
        ledger.fold(&[
            BanEvent::ban("1.2.3.4"),
            BanEvent::ban("5.6.7.8"),
            BanEvent::ban("1.2.3.4"),
        ]);
        assert_eq!(ledger.current_bans(), ["1.2.3.4", "5.6.7.8"]);
        assert_eq!(ledger.all_bans().len(), 2);
    }

    #[test]
    fn test_unban_untracked_is_noop() {
        let mut ledger = BanLedger::new();
        ledger.fold(&[BanEvent::ban("1.2.3.4")]);
        let before = ledger.clone();
        ledger.fold(&[BanEvent::unban("9.9.9.9")]);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_reban_moves_to_most_recent() {
        let mut ledger = BanLedger::new();
        ledger.fold(&[
            BanEvent::ban("1.2.3.4"),
            BanEvent::ban("5.6.7.8"),
            BanEvent::unban("1.2.3.4"),
            BanEvent::ban("1.2.3.4"),
        ]);
        assert_eq!(ledger.current_bans(), ["5.6.7.8", "1.2.3.4"]);
        assert_eq!(ledger.state_value(), "1.2.3.4");
        assert_eq!(ledger.all_bans(), vec!["1.2.3.4", "5.6.7.8"]);
    }

    #[test]
    fn test_history_evicts_oldest_first() {
        let mut ledger = BanLedger::new();
        let events: Vec<BanEvent> = (1..=11)
            .map(|i| BanEvent::ban(format!("10.0.0.{i}")))
            .collect();
        ledger.fold(&events);

        let history = ledger.all_bans();
        assert_eq!(history.len(), MAX_BAN_HISTORY);
        assert_eq!(history.first().map(String::as_str), Some("10.0.0.2"));
        assert_eq!(history.last().map(String::as_str), Some("10.0.0.11"));
        // Current bans are not bounded.
        assert_eq!(ledger.current_bans().len(), 11);
    }

    #[test]
    fn test_refold_same_events_is_stable() {
        let events: Vec<BanEvent> = (1..=12)
            .map(|i| BanEvent::ban(format!("10.0.0.{i}")))
            .chain([BanEvent::unban("10.0.0.3")])
            .collect();
        let mut ledger = BanLedger::new();
        ledger.fold(&events);
        let once = ledger.clone();
        ledger.fold(&events);
        assert_eq!(ledger, once);
    }

    #[test]
    fn test_current_matches_net_unmatched_bans() {
        let events = vec![
            BanEvent::ban("a.a.a"),
            BanEvent::ban("b.b.b"),
            BanEvent::unban("a.a.a"),
            BanEvent::ban("c.c.c"),
            BanEvent::unban("c.c.c"),
            BanEvent::unban("d.d.d"),
            BanEvent::ban("a.a.a"),
        ];
        let mut ledger = BanLedger::new();
        ledger.fold(&events);
        assert_eq!(ledger.current_bans(), ["b.b.b", "a.a.a"]);
    }
}
