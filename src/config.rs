use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    capture::Facing,
    error::{ConfigError, Result},
};

/// Main configuration for Lumina
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External generative service settings
    pub gateway: GatewayConfig,

    /// View state machine settings
    pub session: SessionConfig,

    /// Camera settings
    pub capture: CaptureConfig,

    /// Favorites and custom style persistence
    pub wardrobe: WardrobeConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file
    ///
    /// Missing sections and keys fall back to their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let shown = || path.display().to_string();

        let text = std::fs::read_to_string(path).map_err(|e| {
            debug!("Reading {:?} failed: {}", path, e);
            ConfigError::FileNotFound { path: shown() }
        })?;
        let config = toml::from_str::<Config>(&text).map_err(|e| {
            warn!("Config {:?} does not parse: {}", path, e);
            ConfigError::ParseFailed { path: shown() }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.gateway.validate()?;
        self.session.validate()?;
        self.capture.validate()?;
        Ok(())
    }
}

/// Generative service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the Generative Language REST API
    pub base_url: String,

    /// Model used to describe the captured outfit
    pub analysis_model: String,

    /// Model used to edit the outfit in the image
    pub image_model: String,

    /// Model used to animate the result
    pub video_model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Timeout for a single HTTP request (seconds)
    pub request_timeout_secs: u64,

    /// Delay between video operation polls (seconds)
    pub video_poll_interval_secs: u64,

    /// Give up on video generation after this long (seconds)
    pub video_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            analysis_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            video_model: "veo-3.1-fast-generate-preview".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            request_timeout_secs: 120,
            video_poll_interval_secs: 10,
            video_timeout_secs: 600,
        }
    }
}

impl GatewayConfig {
    fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "gateway.base_url".to_string(),
                value: self.base_url.clone()
            }.into());
        }

        for (key, model) in [
            ("gateway.analysis_model", &self.analysis_model),
            ("gateway.image_model", &self.image_model),
            ("gateway.video_model", &self.video_model),
            ("gateway.api_key_env", &self.api_key_env),
        ] {
            if model.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: model.clone()
                }.into());
            }
        }

        if self.video_poll_interval_secs == 0 || self.video_poll_interval_secs > self.video_timeout_secs {
            return Err(ConfigError::InvalidValue {
                key: "gateway.video_poll_interval_secs".to_string(),
                value: format!("{} (timeout {})", self.video_poll_interval_secs, self.video_timeout_secs)
            }.into());
        }

        Ok(())
    }
}

/// View state machine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How often the progress message advances while transforming (milliseconds)
    pub progress_interval_ms: u64,

    /// Outfit description used when analysis fails or the field is left blank
    pub default_description: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: 3500,
            default_description: "modern clothes".to_string(),
        }
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<()> {
        if self.progress_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "session.progress_interval_ms".to_string(),
                value: self.progress_interval_ms.to_string()
            }.into());
        }

        if self.default_description.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "session.default_description".to_string(),
                value: self.default_description.clone()
            }.into());
        }

        Ok(())
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera used when the camera step opens
    pub default_facing: Facing,

    /// Preferred frame width in pixels
    pub ideal_width: u32,

    /// Preferred frame height in pixels
    pub ideal_height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_facing: Facing::Front,
            ideal_width: 1920,
            ideal_height: 1080,
        }
    }
}

impl CaptureConfig {
    fn validate(&self) -> Result<()> {
        // Minimum accepted by the camera step is 640x480
        if self.ideal_width < 640 || self.ideal_height < 480 {
            return Err(ConfigError::InvalidValue {
                key: "capture.ideal_size".to_string(),
                value: format!("{}x{}", self.ideal_width, self.ideal_height)
            }.into());
        }

        Ok(())
    }
}

/// Wardrobe persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardrobeConfig {
    /// Override for the wardrobe file; defaults to the platform data directory
    pub store_path: Option<PathBuf>,
}

impl WardrobeConfig {
    /// Resolve the wardrobe file location
    pub fn resolve_path(&self) -> PathBuf {
        match &self.store_path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("lumina")
                .join("wardrobe.json"),
        }
    }
}
