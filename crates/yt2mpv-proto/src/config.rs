use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Transport buttons shown in the panel, in display order.  The `action`
    /// strings are passed verbatim to `/control?action=`.
    #[serde(default = "default_controls")]
    pub controls: Vec<ControlButton>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Applies to the health probe and enqueue calls only; playlist
    /// operations wait for the service as long as it takes.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,
    /// Notification title (and `notify-send --app-name`).
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Directory holding yt48.png / tw48.png / mpv48.png.
    #[serde(default = "default_icons_dir")]
    pub icons_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlButton {
    pub label: String,
    pub action: String,
    pub key: char,
}

impl ControlButton {
    pub fn new(label: &str, action: &str, key: char) -> Self {
        Self {
            label: label.to_string(),
            action: action.to_string(),
            key,
        }
    }
}

impl ServiceConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
            app_name: default_app_name(),
            icons_dir: default_icons_dir(),
        }
    }
}

fn default_host() -> String {
    platform::DEFAULT_SERVICE_HOST.to_string()
}

fn default_port() -> u16 {
    platform::DEFAULT_SERVICE_PORT
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_notifications_enabled() -> bool {
    true
}

fn default_app_name() -> String {
    "Add to MPV".to_string()
}

fn default_icons_dir() -> PathBuf {
    platform::config_dir().join("icons")
}

fn default_controls() -> Vec<ControlButton> {
    vec![
        ControlButton::new("prev", "prev", 'p'),
        ControlButton::new("pause", "pause", ' '),
        ControlButton::new("next", "next", 'n'),
    ]
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load `path`, writing the defaults there first when it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// Controls whose key is one of `reserved`; those stay reachable by
    /// mouse only.
    pub fn shadowed_controls(&self, reserved: &[char]) -> Vec<&ControlButton> {
        self.controls
            .iter()
            .filter(|c| reserved.contains(&c.key))
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            notifications: NotificationsConfig::default(),
            controls: default_controls(),
        }
    }
}
