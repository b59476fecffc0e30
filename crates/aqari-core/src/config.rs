use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::BotError;

/// Top-level Aqari configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub script: ScriptConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// Which conversation script this deployment runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptVariant {
    /// Offer-browsing flow: language → welcome → offers → name → phone.
    #[default]
    Catalog,
    /// Broadcast follow-up flow: only senders answering the fire
    /// message with 1/2 enter the conversation; branches into property
    /// details or update preference.
    FireMessage,
}

/// Conversation script settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(default)]
    pub variant: ScriptVariant,
}

/// Remote offer catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog API. Empty means fallback offers only.
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    /// How long a successful fetch stays fresh.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

/// Template refresh settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Seconds between reload ticks.
    #[serde(default = "default_reload_interval")]
    pub reload_interval_secs: u64,
    /// Reset all sessions, the completed set, and the lead buffer on
    /// every reload tick. Matches the deployed behavior; turn off to
    /// let in-flight conversations survive a no-op reload.
    #[serde(default = "default_true")]
    pub reset_on_reload: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            reload_interval_secs: default_reload_interval(),
            reset_on_reload: true,
        }
    }
}

/// Transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Run with the interactive console transport (local testing).
    #[serde(default = "default_true")]
    pub console: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { console: true }
    }
}

fn default_name() -> String {
    "aqari".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_catalog_url() -> String {
    String::new()
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_reload_interval() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

/// Load configuration from a TOML file. A missing file is not an
/// error: defaults apply, so `aqari start` works out of the box.
pub fn load(path: &str) -> Result<Config, BotError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| BotError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| BotError::Config(format!("failed to parse config: {e}")))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.bot.name, "aqari");
        assert_eq!(cfg.script.variant, ScriptVariant::Catalog);
        assert_eq!(cfg.catalog.cache_ttl_secs, 300);
        assert_eq!(cfg.templates.reload_interval_secs, 300);
        assert!(cfg.templates.reset_on_reload);
        assert!(cfg.channel.console);
    }

    #[test]
    fn test_parse_fire_message_variant() {
        let toml_str = r#"
            [script]
            variant = "fire_message"

            [catalog]
            base_url = "https://realestate.example.com"
            cache_ttl_secs = 60

            [templates]
            reset_on_reload = false
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.script.variant, ScriptVariant::FireMessage);
        assert_eq!(cfg.catalog.base_url, "https://realestate.example.com");
        assert_eq!(cfg.catalog.cache_ttl_secs, 60);
        assert!(!cfg.templates.reset_on_reload);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.bot.log_level, "info");
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let cfg = load("/nonexistent/aqari-config.toml").unwrap();
        assert_eq!(cfg.bot.name, "aqari");
    }
}
