//! Plugin configuration
//!
//! Parsed from TOML; every field falls back to a sensible default so a
//! missing or partial file still yields a working setup.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct PluginsConfig {
    #[serde(default)]
    pub navigator: NavigatorConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Tag navigator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigatorConfig {
    /// Path or name of the ctags executable.
    #[serde(default = "default_ctags_path")]
    pub ctags_path: String,
    /// Debounce window after the last edit before re-running ctags.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    /// Tag kinds hidden from the tree.
    #[serde(default = "default_ignored_kinds")]
    pub ignored_kinds: Vec<String>,
}

/// Preview synchronization settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Debounce window after the last cursor movement before syncing.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Padding kept around the preview cursor; doubles as the minimum
    /// scroll delta worth applying.
    #[serde(default = "default_scroll_tolerance")]
    pub scroll_tolerance_px: f32,
}

fn default_ctags_path() -> String {
    crate::ctags::DEFAULT_CTAGS_PATH.to_string()
}

fn default_update_interval_ms() -> u64 {
    1000
}

fn default_ignored_kinds() -> Vec<String> {
    vec!["variable".to_string()]
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_scroll_tolerance() -> f32 {
    50.0
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            ctags_path: default_ctags_path(),
            update_interval_ms: default_update_interval_ms(),
            ignored_kinds: default_ignored_kinds(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            scroll_tolerance_px: default_scroll_tolerance(),
        }
    }
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            navigator: NavigatorConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl PluginsConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Load from a file, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match Self::from_toml_str(&raw) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("CONFIG: failed to parse {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
