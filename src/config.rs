use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "palms-widget.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheetsConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

/// Fixed delays, in milliseconds, between a trigger and its visible effect.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    #[serde(default = "default_welcome_ms")]
    pub welcome_ms: u64,
    #[serde(default = "default_input_focus_ms")]
    pub input_focus_ms: u64,
    #[serde(default = "default_refocus_after_reply_ms")]
    pub refocus_after_reply_ms: u64,
    #[serde(default = "default_form_reveal_ms")]
    pub form_reveal_ms: u64,
    #[serde(default = "default_form_focus_ms")]
    pub form_focus_ms: u64,
    #[serde(default = "default_form_dismiss_ms")]
    pub form_dismiss_ms: u64,
    #[serde(default = "default_auto_open_ms")]
    pub auto_open_ms: u64,
    #[serde(default = "default_auto_minimize_ms")]
    pub auto_minimize_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            url: None,
            source: default_source(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome_message(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            welcome_ms: default_welcome_ms(),
            input_focus_ms: default_input_focus_ms(),
            refocus_after_reply_ms: default_refocus_after_reply_ms(),
            form_reveal_ms: default_form_reveal_ms(),
            form_focus_ms: default_form_focus_ms(),
            form_dismiss_ms: default_form_dismiss_ms(),
            auto_open_ms: default_auto_open_ms(),
            auto_minimize_ms: default_auto_minimize_ms(),
        }
    }
}

impl TimingConfig {
    pub fn welcome(&self) -> Duration {
        Duration::from_millis(self.welcome_ms)
    }

    pub fn input_focus(&self) -> Duration {
        Duration::from_millis(self.input_focus_ms)
    }

    pub fn refocus_after_reply(&self) -> Duration {
        Duration::from_millis(self.refocus_after_reply_ms)
    }

    pub fn form_reveal(&self) -> Duration {
        Duration::from_millis(self.form_reveal_ms)
    }

    pub fn form_focus(&self) -> Duration {
        Duration::from_millis(self.form_focus_ms)
    }

    pub fn form_dismiss(&self) -> Duration {
        Duration::from_millis(self.form_dismiss_ms)
    }

    pub fn auto_open(&self) -> Duration {
        Duration::from_millis(self.auto_open_ms)
    }

    pub fn auto_minimize(&self) -> Duration {
        Duration::from_millis(self.auto_minimize_ms)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Resolves the config file from an explicit path, then the working
    /// directory, falling back to built-in defaults.
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(&path);
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(&local);
        }

        Ok(Self::default())
    }

    fn parse(content: &str) -> Result<Self> {
        let mut cfg: Config = toml::from_str(content).context("failed to parse config toml")?;

        cfg.service.api_url = cfg.service.api_url.trim().trim_end_matches('/').to_string();
        if cfg.service.api_url.is_empty() {
            bail!("service.api_url must not be empty");
        }

        cfg.sheets.url = cfg
            .sheets
            .url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        Ok(cfg)
    }
}

fn default_api_url() -> String {
    "https://onpalms-6.onrender.com".to_string()
}

fn default_source() -> String {
    "Website Chatbot".to_string()
}

fn default_welcome_message() -> String {
    "Welcome to PALMS™. I'm here to assist you with optimizing your warehouse operations."
        .to_string()
}

fn default_fallback_reply() -> String {
    "Sorry, I couldn't process your request.".to_string()
}

fn default_welcome_ms() -> u64 {
    400
}

fn default_input_focus_ms() -> u64 {
    500
}

fn default_refocus_after_reply_ms() -> u64 {
    100
}

fn default_form_reveal_ms() -> u64 {
    800
}

fn default_form_focus_ms() -> u64 {
    300
}

fn default_form_dismiss_ms() -> u64 {
    2_000
}

fn default_auto_open_ms() -> u64 {
    3_000
}

fn default_auto_minimize_ms() -> u64 {
    10_000
}
