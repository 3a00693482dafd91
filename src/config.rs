use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Prefix for environment overrides, e.g. `ADMIN_WATCHDOG_DISCORD__WEBHOOK_URL`.
pub const ENV_PREFIX: &str = "ADMIN_WATCHDOG_";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub monitoring: MonitoringConfig,
    pub discord: DiscordConfig,
    pub logging: LoggingConfig,
    pub custom_responses: CustomResponsesConfig,
    pub messages: MessagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneralConfig {
    /// chrono strftime format used for `%time%`.
    pub time_format: String,
    /// Report audit log write failures at error level.
    pub debug: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            debug: false,
        }
    }
}

// ============================================================================
// Monitoring
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MonitoringConfig {
    pub ops: bool,
    pub console: bool,
    pub gamemode_changes: bool,
    /// Log every player's commands, not only ops and permission holders.
    pub all_commands: bool,
    pub permissions: PermissionMonitoring,
    pub creative_inventory: CreativeInventoryMonitoring,
    pub creative_item_drops: CreativeItemDropMonitoring,
    pub command_blacklist: CommandBlacklist,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            ops: true,
            console: true,
            gamemode_changes: true,
            all_commands: false,
            permissions: PermissionMonitoring::default(),
            creative_inventory: CreativeInventoryMonitoring::default(),
            creative_item_drops: CreativeItemDropMonitoring::default(),
            command_blacklist: CommandBlacklist::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PermissionMonitoring {
    pub enabled: bool,
    pub list: Vec<String>,
}

impl Default for PermissionMonitoring {
    fn default() -> Self {
        Self {
            enabled: true,
            list: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CreativeInventoryMonitoring {
    pub enabled: bool,
    pub ops_only: bool,
    pub permissions_only: bool,
    pub detailed_logging: bool,
}

impl Default for CreativeInventoryMonitoring {
    fn default() -> Self {
        Self {
            enabled: true,
            ops_only: false,
            permissions_only: false,
            detailed_logging: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CreativeItemDropMonitoring {
    pub enabled: bool,
    pub track_pickup: bool,
    /// Seconds a dropped item stays eligible for pickup logging.
    pub tracking_duration: u64,
}

impl Default for CreativeItemDropMonitoring {
    fn default() -> Self {
        Self {
            enabled: true,
            track_pickup: true,
            tracking_duration: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CommandBlacklist {
    pub enabled: bool,
    /// Command names without the leading slash.
    pub commands: Vec<String>,
}

impl Default for CommandBlacklist {
    fn default() -> Self {
        Self {
            enabled: true,
            commands: Vec::new(),
        }
    }
}

// ============================================================================
// Outputs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiscordConfig {
    pub enabled: bool,
    pub webhook_url: String,
    pub timeout_secs: u64,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub file_logging: bool,
    /// Override the default data directory.
    pub log_dir: Option<PathBuf>,
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_logging: true,
            log_dir: None,
            file_name: "commands.log".to_string(),
        }
    }
}

// ============================================================================
// Custom Responses
// ============================================================================

/// A value in the `custom-responses` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Flag(bool),
    Text(String),
    Other(toml::Value),
}

/// Pattern → response table with the reserved `enabled` switch mixed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomResponsesConfig {
    pub entries: IndexMap<String, ResponseValue>,
}

impl CustomResponsesConfig {
    pub fn is_enabled(&self) -> bool {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(crate::core::responses::ENABLED_KEY))
            .is_some_and(|(_, value)| matches!(value, ResponseValue::Flag(true)))
    }

    /// Every entry as (pattern, response). Non-string values become empty
    /// responses; the reserved key is filtered by the pattern store.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| {
            let response = match value {
                ResponseValue::Text(text) => text.as_str(),
                _ => "",
            };
            (key.as_str(), response)
        })
    }

    pub fn insert(&mut self, pattern: impl Into<String>, response: impl Into<String>) {
        self.entries
            .insert(pattern.into(), ResponseValue::Text(response.into()));
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.entries
            .insert(crate::core::responses::ENABLED_KEY.to_string(), ResponseValue::Flag(enabled));
    }
}

// ============================================================================
// Message Templates
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MessagesConfig {
    pub logging: LogMessages,
    pub discord: DiscordMessages,
    pub prefixes: Prefixes,
}

/// Lines written to the audit log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogMessages {
    pub player_command: String,
    pub console_command: String,
    pub gamemode_change: String,
    pub creative_inventory: String,
    pub creative_inventory_detailed: String,
    pub creative_item_drop: String,
    pub creative_item_pickup: String,
}

impl Default for LogMessages {
    fn default() -> Self {
        Self {
            player_command: "[%time%] %prefix%%player% executed: %command%".to_string(),
            console_command: "[%time%] CONSOLE (%sender%) executed: /%command%".to_string(),
            gamemode_change: "[%time%] %player% changed gamemode from %oldmode% to %newmode%"
                .to_string(),
            creative_inventory: "[%time%] %prefix%%player% took %amount%x %item% from creative inventory"
                .to_string(),
            creative_inventory_detailed:
                "[%time%] %prefix%%player% took %amount%x %item% (%material%) from creative inventory"
                    .to_string(),
            creative_item_drop:
                "[%time%] %player% dropped %amount%x %item% (%material%) in creative mode".to_string(),
            creative_item_pickup:
                "[%time%] %picker% picked up %amount%x %item% (%material%) dropped by %dropper%"
                    .to_string(),
        }
    }
}

/// Messages sent to the webhook channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiscordMessages {
    pub player_command: String,
    pub permission_command: String,
    pub console_command: String,
    pub gamemode_change: String,
    pub creative_inventory: String,
    pub creative_item_drop: String,
    pub creative_item_pickup: String,
}

impl Default for DiscordMessages {
    fn default() -> Self {
        Self {
            player_command: "**%player%** executed `%command%` at %time%".to_string(),
            permission_command: "**%player%** (monitored permission) executed `%command%` at %time%"
                .to_string(),
            console_command: "**%sender%** (console) executed `/%command%` at %time%".to_string(),
            gamemode_change: "**%player%** changed gamemode from %oldmode% to %newmode% at %time%"
                .to_string(),
            creative_inventory: "**%player%** took %amount%x %item% (%material%) from creative inventory"
                .to_string(),
            creative_item_drop: "**%player%** dropped %amount%x %item% (%material%) in creative mode"
                .to_string(),
            creative_item_pickup:
                "**%picker%** picked up %amount%x %item% (%material%) dropped by **%dropper%**"
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Prefixes {
    pub normal: String,
    pub op: String,
    pub permission: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            normal: String::new(),
            op: "[OP] ".to_string(),
            permission: "[PERM] ".to_string(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Like [`load_from`](Self::load_from), but logs a broken file and falls
    /// back to defaults instead of failing.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load config - using defaults"
                );
                Self::default()
            }
        }
    }

    /// Defaults, then the TOML file at `path` (if present), then environment
    /// overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {} - using defaults", path.display());
        }
        Ok(Self::figment(path).extract()?)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .map(|key| key.as_str().replace("__", ".").replace('_', "-").into()),
            )
    }

    /// Parse a TOML document on top of the defaults, without environment
    /// overrides.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(contents))
            .extract()?)
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.logging.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("admin-watchdog"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// File the audit trail is appended to.
    pub fn audit_log_path(&self) -> PathBuf {
        self.data_dir().join(&self.logging.file_name)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("admin-watchdog").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl MonitoringConfig {
    /// True when `command` (with its leading `/`) starts with a blacklisted
    /// command name.
    pub fn is_command_blacklisted(&self, command: &str) -> bool {
        if !self.command_blacklist.enabled {
            return false;
        }
        let command = command.to_lowercase();
        self.command_blacklist
            .commands
            .iter()
            .any(|entry| command.starts_with(&format!("/{}", entry.to_lowercase())))
    }
}
