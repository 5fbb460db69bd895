// banwatch - app/mod.rs
//
// Application layer: log scheduling, per-jail trackers, monitor setup.
// Dependencies: core, platform.

pub mod log_parser;
pub mod monitor;
pub mod tracker;
