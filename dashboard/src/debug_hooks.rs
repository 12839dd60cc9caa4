use std::fs::OpenOptions;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ConfigSource;

pub enum LogTarget<'a> {
    Stderr,
    /// Append to a file; used when the terminal itself is the UI.
    File(&'a Path),
}

fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
/// Records from the `log` crate (the synth library) are forwarded too.
pub fn init_tracing(default_filter: &str, target: LogTarget<'_>) {
    let filter = build_filter(default_filter);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let res = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(dir) = path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => builder
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init(),
                Err(e) => {
                    eprintln!("[debug_hooks] cannot open log file {}: {e}", path.display());
                    builder.with_writer(std::io::sink).try_init()
                }
            }
        }
    };

    if let Err(e) = res {
        eprintln!("[debug_hooks] tracing already initialised: {e}");
    }
}

/// Allows the first `burst` calls through, then one in every `every`.
fn sampled(counter: &AtomicU64, burst: u64, every: u64) -> Option<u64> {
    let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
    (n <= burst || n % every == 0).then_some(n)
}

pub fn log_config(source: &ConfigSource) {
    match source {
        ConfigSource::Defaults => info!(target: "config.load", "no config file; using defaults"),
        ConfigSource::File(path) => info!(target: "config.load", path = %path.display(), "config loaded"),
        ConfigSource::Archived {
            path,
            archived_to,
            error,
        } => warn!(
            target: "config.load",
            path = %path.display(),
            archived_to = ?archived_to,
            %error,
            "config corrupt; archived and using defaults"
        ),
        ConfigSource::NoConfigDir(reason) => {
            warn!(target: "config.load", %reason, "no config directory; using defaults")
        }
    }
}

pub fn log_generation_start(command: &str, seed: u64, days: usize) {
    info!(target: "generation.start", command, seed, days, "building dataset");
}

pub fn log_generation_done(generation: u64, rows: usize, elapsed_ms: u64) {
    info!(target: "generation.done", generation, rows, elapsed_ms, "dataset ready");
}

pub fn log_generation_failed(err: &dyn std::fmt::Display) {
    error!(target: "generation.failed", error = %err, "generation failed");
}

pub fn log_dataset_applied(generation: u64, rows: usize) {
    debug!(target: "generation.apply", generation, rows, "dataset swapped into app state");
}

/// Views are drawn every frame, so a persistent error would flood the log.
pub fn log_view_error(view: &str, err: &dyn std::fmt::Display) {
    static COUNT: AtomicU64 = AtomicU64::new(0);
    if let Some(n) = sampled(&COUNT, 5, 600) {
        warn!(target: "view.error", view, error = %err, n, "view unavailable");
    }
}

pub fn log_frame(frame: u64, tab: &str) {
    static COUNT: AtomicU64 = AtomicU64::new(0);
    if sampled(&COUNT, 1, 1800).is_some() {
        debug!(target: "ui.frame", frame, tab, "rendering");
    }
}
