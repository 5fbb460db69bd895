// banwatch - core/matcher.rs
//
// Per-jail ban line matcher. Core layer: works on text already read by the
// app layer, never touches the filesystem.

use crate::core::model::{BanAction, BanEvent};
use crate::util::constants::{MAX_JAIL_NAME_LEN, MIN_ADDRESS_LEN};
use crate::util::error::MatcherError;
use regex::Regex;

/// Compiled pattern recognising `[<jail>] Ban <address>` and
/// `[<jail>] Unban <address>` lines for one jail.
///
/// The jail name is matched literally. Any single character may separate
/// the closing bracket from the action word; the address is a token of at
/// least `MIN_ADDRESS_LEN` word characters, dots, or plus signs.
#[derive(Debug, Clone)]
pub struct JailMatcher {
    jail: String,
    pattern: Regex,
}

impl JailMatcher {
    pub fn new(jail: &str) -> Result<Self, MatcherError> {
        if jail.trim().is_empty() {
            return Err(MatcherError::EmptyJailName);
        }
        if jail.len() > MAX_JAIL_NAME_LEN {
            return Err(MatcherError::JailNameTooLong {
                length: jail.len(),
                max_length: MAX_JAIL_NAME_LEN,
            });
        }

        let source = format!(
            r"\[{}\].(Ban|Unban) ([\w+.]{{{},}})",
            regex::escape(jail),
            MIN_ADDRESS_LEN
        );
        let pattern = Regex::new(&source).map_err(|e| MatcherError::InvalidRegex {
            jail: jail.to_string(),
            pattern: source.clone(),
            source: e,
        })?;

        Ok(Self {
            jail: jail.to_string(),
            pattern,
        })
    }

    pub fn jail(&self) -> &str {
        &self.jail
    }

    /// All ban/unban events for this jail in `content`, in file order.
    pub fn find_events(&self, content: &str) -> Vec<BanEvent> {
        self.pattern
            .captures_iter(content)
            .filter_map(|caps| {
                let action = BanAction::from_log_word(caps.get(1)?.as_str())?;
                let address = caps.get(2)?.as_str().to_string();
                Some(BanEvent { action, address })
            })
            .collect()
    }
}
