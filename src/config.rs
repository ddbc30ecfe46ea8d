//! Appliance configuration
//!
//! Loaded from `musicbox.toml` (or the path in `MUSICBOX_CONFIG`). Every
//! field has a default so the player boots with no config file present.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_ENV_VAR: &str = "MUSICBOX_CONFIG";
const CONFIG_FILE: &str = "musicbox.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for tracks (the USB mount point on the appliance)
    pub music_dir: PathBuf,
    /// Minimum time between accepted presses on the same input
    pub debounce_ms: u64,
    /// Volume change per rotary encoder detent
    pub encoder_volume_step: u8,
    /// Volume change per console +/- command
    pub console_volume_step: u8,
    /// Startup volume, also the encoder push-button reset target
    pub default_volume: u8,
    /// ALSA mixer control the volume is pushed to
    pub mixer_control: String,
    /// Display panel dimensions, landscape
    pub display_width: u32,
    pub display_height: u32,
    /// Panel rotation in degrees (the stock panel is portrait-native)
    pub display_rotation: u16,
    /// When set, every composed frame is also written to this PNG path
    pub frame_dump: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from("/mnt/usbdrive"),
            debounce_ms: 200,
            encoder_volume_step: 2,
            console_volume_step: 5,
            default_volume: 80,
            mixer_control: "PCM".to_string(),
            display_width: 320,
            display_height: 240,
            display_rotation: 90,
            frame_dump: None,
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}
