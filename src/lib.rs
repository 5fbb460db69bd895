// banwatch - lib.rs
//
// Library entry point. The `banwatch` binary is a thin scheduler and
// printer over this API.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
