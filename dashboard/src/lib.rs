//! Silicon commodity dashboard: app state, background generation, and the
//! egui / terminal front ends built on `silicon_synth`.

pub mod app;
pub mod config;
pub mod debug_hooks;
pub mod tui;
pub mod worker;
