use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default workbook read when neither config nor CLI names one.
pub const DEFAULT_INPUT_FILE: &str = "db.xlsx";
/// Default top-level folder for mirrored images.
pub const DEFAULT_BACKUP_ROOT: &str = "./backup";
/// Base of the media URL; the record hash is appended as the last path segment.
pub const DEFAULT_MEDIA_BASE_URL: &str = "https://pbs.twimg.com/media";

/// Mirror configuration loaded from `~/.config/twing/config.toml`.
///
/// Passed explicitly into the planner and driver; nothing in the core reads
/// configuration from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Workbook to read records from.
    pub input_file: PathBuf,
    /// Folder under which `{sheet}/{sheet}-{date}-{hash}.{ext}` files are written.
    pub backup_root: PathBuf,
    /// Media endpoint; `{media_base_url}/{hash}` is requested.
    pub media_base_url: String,
    /// Value of the `format` query parameter; also the saved file extension.
    pub image_format: String,
    /// Value of the `name` query parameter (requested rendition size).
    pub image_size: String,
    /// Bound on connection establishment only; 0 (the default) sets none.
    /// The transfer itself is never timed out.
    pub connect_timeout_secs: u64,
    /// Optional User-Agent header for media requests.
    pub user_agent: Option<String>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            backup_root: PathBuf::from(DEFAULT_BACKUP_ROOT),
            media_base_url: DEFAULT_MEDIA_BASE_URL.to_string(),
            image_format: "png".to_string(),
            image_size: "4096x4096".to_string(),
            connect_timeout_secs: 0,
            user_agent: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("twing")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Serialize a configuration in the on-disk format.
pub fn to_toml(cfg: &MirrorConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = to_toml(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MirrorConfig = toml::from_str(&data)?;
    Ok(cfg)
}
