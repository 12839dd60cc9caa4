// silicon_dashboard/src/config.rs

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::app::Tab;

/// Bump when you change config schema.
const CONFIG_VERSION: u32 = 1;

/// Presentation settings. Data parameters (seed, date range) are fixed and not
/// part of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub version: u32,

    // window geometry
    pub window_width_px: f32,
    pub window_height_px: f32,

    pub initial_tab: Tab,
    /// Trailing days of candles to draw; 0 draws everything.
    pub candle_days: usize,

    /// tracing filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,

            window_width_px: 1200.0,
            window_height_px: 800.0,

            initial_tab: Tab::Overview,
            candle_days: 0,

            log_filter: "info".to_string(),
        }
    }
}

/// Where the effective config came from. Reported once logging is up.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
    Archived {
        path: PathBuf,
        archived_to: Option<PathBuf>,
        error: String,
    },
    NoConfigDir(String),
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DashboardConfig,
    pub source: ConfigSource,
}

/// Loads from the platform config dir.
pub fn load() -> LoadedConfig {
    match default_config_path() {
        Ok(path) => load_from(&path),
        Err(err) => LoadedConfig {
            config: DashboardConfig::default(),
            source: ConfigSource::NoConfigDir(format!("{err:#}")),
        },
    }
}

/// A missing file gives defaults; an unreadable one is archived and replaced
/// by defaults.
pub fn load_from(path: &Path) -> LoadedConfig {
    if !path.exists() {
        return LoadedConfig {
            config: DashboardConfig::default(),
            source: ConfigSource::Defaults,
        };
    }

    match read_json::<DashboardConfig>(path) {
        Ok(mut cfg) => {
            // simple migration hook
            if cfg.version == 0 {
                cfg.version = CONFIG_VERSION;
            }
            LoadedConfig {
                config: cfg,
                source: ConfigSource::File(path.to_path_buf()),
            }
        }
        Err(err) => {
            let archived_to = archive_corrupt(path);
            LoadedConfig {
                config: DashboardConfig::default(),
                source: ConfigSource::Archived {
                    path: path.to_path_buf(),
                    archived_to,
                    error: format!("{err:#}"),
                },
            }
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "silicon", "silicon_dashboard")
        .context("ProjectDirs::from returned None")?;
    Ok(proj.config_dir().join("config.json"))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("read {:?}", path))?;
    let value = serde_json::from_slice::<T>(&bytes).with_context(|| "parse json")?;
    Ok(value)
}

fn archive_corrupt(path: &Path) -> Option<PathBuf> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let archived = path.with_extension(format!("corrupt.{ts}.json"));
    fs::rename(path, &archived).ok().map(|_| archived)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_from(&dir.path().join("config.json"));
        assert_eq!(loaded.config, DashboardConfig::default());
        assert_eq!(loaded.source, ConfigSource::Defaults);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "initial_tab": "macro_correlation", "candle_days": 365, "version": 0 }"#,
        )
        .unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.source, ConfigSource::File(path.clone()));
        assert_eq!(loaded.config.initial_tab, Tab::MacroCorrelation);
        assert_eq!(loaded.config.candle_days, 365);
        assert_eq!(loaded.config.version, CONFIG_VERSION);
        assert_eq!(loaded.config.log_filter, "info");
        assert_eq!(loaded.config.window_width_px, 1200.0);
    }

    #[test]
    fn corrupt_file_is_archived() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = load_from(&path);
        assert_eq!(loaded.config, DashboardConfig::default());
        match loaded.source {
            ConfigSource::Archived { archived_to, .. } => {
                let archived = archived_to.expect("archived path");
                assert!(archived.exists());
                assert!(!path.exists());
            }
            other => panic!("expected Archived, got {other:?}"),
        }
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = DashboardConfig {
            initial_tab: Tab::PriceAction,
            log_filter: "silicon_synth=debug".into(),
            ..DashboardConfig::default()
        };
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        assert!(json.contains("\"price_action\""));
        let back: DashboardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
