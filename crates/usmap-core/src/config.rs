use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Metadata service queried for the current mapping version.
pub const DEFAULT_ENDPOINT: &str = "https://uedb.dev/svc/api/v1/fortnite/mappings";

/// Key inside the `mappings` object whose URL gets downloaded.
pub const DEFAULT_COMPRESSION: &str = "ZStandard";

/// Global configuration loaded from `~/.config/usmap/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsmapConfig {
    /// Metadata endpoint returning `{ "version": .., "mappings": { .. } }`.
    pub endpoint: String,
    /// Which entry of `mappings` to download.
    pub compression: String,
    /// Timeout for the metadata request in milliseconds.
    pub metadata_timeout_ms: u64,
    /// Timeout for the mapping download in seconds.
    pub download_timeout_secs: u64,
    /// Override for the mappings cache directory (None = XDG cache dir).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for UsmapConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            compression: DEFAULT_COMPRESSION.to_string(),
            metadata_timeout_ms: 3000,
            download_timeout_secs: 60,
            cache_dir: None,
        }
    }
}

impl UsmapConfig {
    /// Cache directory from config, or `~/.cache/usmap/mappings`.
    pub fn resolved_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_cache_dir(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("usmap")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

pub fn default_cache_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("usmap")?;
    Ok(xdg_dirs.get_cache_home().join("usmap").join("mappings"))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UsmapConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UsmapConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: UsmapConfig = toml::from_str(&data)?;
    Ok(cfg)
}
