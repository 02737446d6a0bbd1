use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::{ScratchCache, DEFAULT_FILE_NAME};
use crate::channel::DEFAULT_CHANNEL_NAME;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareSettings {
    pub channel_name: String,
    pub cache_dir: PathBuf,
    pub fallback_file_name: String,
    pub log_filter: String,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            cache_dir: default_cache_dir(),
            fallback_file_name: DEFAULT_FILE_NAME.to_string(),
            log_filter: "sharebridge=debug".to_string(),
        }
    }
}

impl ShareSettings {
    /// Open the scratch cache these settings describe.
    pub fn open_cache(&self) -> Result<ScratchCache> {
        ScratchCache::new(&self.cache_dir)?.with_fallback_file_name(self.fallback_file_name.as_str())
    }
}

pub fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("sharebridge")
}

pub fn load_settings(path: &Path) -> Result<ShareSettings> {
    if !path.exists() {
        return Ok(ShareSettings::default());
    }

    let content = std::fs::read_to_string(path)?;
    let settings: ShareSettings = serde_json::from_str(&content)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &ShareSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}
