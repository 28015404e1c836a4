use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://farmermarketsystem-production.up.railway.app";
pub const DEFAULT_MEDIA_UPLOAD_URL: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiSection,
    #[serde(default)]
    pub media: MediaSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: String,
    #[serde(default = "default_emulate_browser")]
    pub emulate_browser: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSection {
    #[serde(default = "default_media_upload_url")]
    pub upload_url: String,
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default = "default_upload_preset")]
    pub upload_preset: String,
}

fn default_emulate_browser() -> bool {
    true
}

fn default_media_upload_url() -> String {
    DEFAULT_MEDIA_UPLOAD_URL.to_string()
}

fn default_upload_preset() -> String {
    "unsigned_preset".to_string()
}

impl Default for MediaSection {
    fn default() -> Self {
        Self {
            upload_url: default_media_upload_url(),
            cloud_name: "dvnezwrbt".to_string(),
            upload_preset: default_upload_preset(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiSection {
                base_url: DEFAULT_BASE_URL.to_string(),
                emulate_browser: true,
            },
            media: MediaSection::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read client config file: {}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse client config file: {}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise starts from the defaults.
    /// Environment overrides are applied in both cases.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) if std::path::Path::new(path).exists() => Self::from_file(path)?,
            Some(path) => {
                tracing::warn!("Config file not found at {}, using defaults", path);
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = env::var("FARM_MARKET_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(cloud_name) = env::var("FARM_MARKET_MEDIA_CLOUD") {
            self.media.cloud_name = cloud_name;
        }
        if let Ok(preset) = env::var("FARM_MARKET_MEDIA_PRESET") {
            self.media.upload_preset = preset;
        }
    }

    /// Base origin with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }

    pub fn media_upload_endpoint(&self) -> String {
        format!(
            "{}/{}/upload",
            self.media.upload_url.trim_end_matches('/'),
            self.media.cloud_name
        )
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(anyhow::anyhow!("API base_url cannot be empty"));
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API base_url must start with http:// or https://, got {}",
                base_url
            ));
        }

        Ok(())
    }

    pub fn has_media_host(&self) -> bool {
        !self.media.cloud_name.trim().is_empty()
    }
}
