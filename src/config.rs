use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::monitor::cycle::SourceSpec;
use crate::notify::telegram::DEFAULT_API_BASE;

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for every outbound request in milliseconds (15 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Port the trigger service listens on when neither `--port` nor `PORT` is set
pub const DEFAULT_PORT: u16 = 5000;

const DEFAULT_TITLE: &str = "PUBG Mobile BETA";
const DEFAULT_PAGE_64: &str = "https://web.gpubgm.com/m/download_android_1.html";
const DEFAULT_PAGE_32: &str = "https://web.gpubgm.com/m/download_android.html";

/// Monitor configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Name of the monitored release channel, used in announcements
    pub name: String,
    pub sources: Vec<SourceConfig>,
    pub timeout_ms: u64,
    /// Request headers sent when fetching pages
    pub headers: IndexMap<String, String>,
    pub notify: NotifyConfig,
    pub store: StoreConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TITLE.to_string(),
            sources: vec![
                SourceConfig {
                    id: "64bit".to_string(),
                    label: Some("64-bit".to_string()),
                    url: DEFAULT_PAGE_64.to_string(),
                },
                SourceConfig {
                    id: "32bit".to_string(),
                    label: Some("32-bit".to_string()),
                    url: DEFAULT_PAGE_32.to_string(),
                },
            ],
            timeout_ms: DEFAULT_TIMEOUT_MS,
            headers: default_headers(),
            notify: NotifyConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Browser-like headers; the download pages refuse obvious bots
fn default_headers() -> IndexMap<String, String> {
    [
        (
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
        ),
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
        ("Accept-Language", "zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"),
        ("Referer", "https://www.pubgmobile.com/HK/home.shtml"),
        ("Upgrade-Insecure-Requests", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl MonitorConfig {
    /// Load from an explicit path, or from `config.json` in the data
    /// directory when present, falling back to defaults.
    ///
    /// `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID` override file values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(
            std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            std::env::var("TELEGRAM_CHAT_ID").ok(),
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading config from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn apply_env_overrides(&mut self, bot_token: Option<String>, chat_id: Option<String>) {
        if let Some(token) = bot_token.filter(|t| !t.is_empty()) {
            self.notify.bot_token = token;
        }
        if let Some(chat_id) = chat_id.filter(|c| !c.is_empty()) {
            self.notify.chat_id = chat_id;
        }
    }

    pub fn source_specs(&self) -> Vec<SourceSpec> {
        self.sources
            .iter()
            .map(|s| SourceSpec {
                id: s.id.clone(),
                label: s.label.clone().unwrap_or_else(|| s.id.clone()),
                url: s.url.clone(),
            })
            .collect()
    }
}

/// A monitored page
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceConfig {
    pub id: String,
    /// Display name; the id is used when absent
    #[serde(default)]
    pub label: Option<String>,
    pub url: String,
}

/// Telegram notification settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NotifyConfig {
    pub enabled: bool,
    pub api_base: String,
    pub bot_token: String,
    pub chat_id: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: DEFAULT_API_BASE.to_string(),
            bot_token: String::new(),
            chat_id: String::new(),
        }
    }
}

impl NotifyConfig {
    /// Enabled and carrying credentials
    pub fn is_active(&self) -> bool {
        self.enabled && !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Json,
}

/// Snapshot persistence settings
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Defaults to a file in the data directory
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| match self.kind {
            StoreKind::Sqlite => data_dir().join("snapshots.db"),
            StoreKind::Json => data_dir().join("link_history.json"),
        })
    }
}

/// Returns the path to the data directory for apk-watch.
/// Uses $XDG_DATA_HOME/apk-watch if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/apk-watch,
/// or ./apk-watch if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Returns the directory daily log files are written to.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("apk-watch")
}
