use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;

use silicon_dashboard::app::{AppRuntime, AppState};
use silicon_dashboard::config;
use silicon_dashboard::debug_hooks::{self, LogTarget};
use silicon_dashboard::tui;
use silicon_dashboard::worker::Worker;
use silicon_synth::GeneratorConfig;

/// stderr belongs to the terminal UI, so logs go to a file.
fn log_path() -> PathBuf {
    ProjectDirs::from("com", "silicon", "silicon_dashboard")
        .map(|p| p.cache_dir().join("dashboard_tui.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("dashboard_tui.log"))
}

fn main() -> Result<()> {
    let loaded = config::load();
    let cfg = loaded.config;
    debug_hooks::init_tracing(&cfg.log_filter, LogTarget::File(&log_path()));
    debug_hooks::log_config(&loaded.source);

    // The draw loop polls every 50 ms, so no wake-up is needed.
    let worker = Worker::spawn(GeneratorConfig::default(), Box::new(|| {}))?;
    let mut runtime = AppRuntime::new(AppState::from_config(&cfg), worker);

    tui::run(&mut runtime)
}
