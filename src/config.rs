use std::time::Duration;

use serde::Deserialize;

/// Plugin configuration, read from `plugins > file-sharer` in `tauri.conf.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Delay between consecutive downloads of a multi-file share.
    pub download_stagger_ms: u64,
    /// Name of the directory, inside the app cache dir, holding decoded files.
    pub cache_dir_name: String,
    /// Share sheet title used when a request does not set one.
    pub default_dialog_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_stagger_ms: 100,
            cache_dir_name: "file-sharer".to_string(),
            default_dialog_title: "Share".to_string(),
        }
    }
}

impl Config {
    pub fn download_stagger(&self) -> Duration {
        Duration::from_millis(self.download_stagger_ms)
    }
}
