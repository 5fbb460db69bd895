// banwatch - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, regex, serde, chrono.
// Must NOT depend on: platform, app, or read files directly.

pub mod ledger;
pub mod matcher;
pub mod model;
