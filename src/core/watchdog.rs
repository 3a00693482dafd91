//! Watchdog Module
//!
//! Entry points for observed server events. Each handler consults the current
//! configuration snapshot, writes an audit record and relays a notification.
//! Failures of either output are logged and never returned to the caller.

use std::fmt::Write as _;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{Duration, Local, Utc};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::core::audit::{AuditKind, AuditLog};
use crate::core::drops::{DropTracker, DroppedItem};
use crate::core::error::WatchdogError;
use crate::core::events::{Actor, GameMode, ItemStack};
use crate::core::monitor::MonitoringPolicy;
use crate::core::placeholders::{render, Placeholder, PlaceholderContext};
use crate::core::responses::{PatternStore, ResponseMatcher};
use crate::core::webhook::Notifier;

/// Sender name used for commands typed into the server console.
pub const CONSOLE_SENDER: &str = "CONSOLE";

pub struct Watchdog {
    config: RwLock<Arc<AppConfig>>,
    matcher: ResponseMatcher,
    drops: DropTracker,
    audit: AuditLog,
    notifier: Arc<dyn Notifier>,
}

impl Watchdog {
    pub fn new(config: AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            matcher: ResponseMatcher::new(PatternStore::from_config(&config.custom_responses)),
            drops: DropTracker::new(),
            audit: AuditLog::new(config.audit_log_path()),
            config: RwLock::new(Arc::new(config)),
            notifier,
        }
    }

    pub fn config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn matcher(&self) -> &ResponseMatcher {
        &self.matcher
    }

    pub fn drops(&self) -> &DropTracker {
        &self.drops
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Swap in a new configuration snapshot and rebuild the response rules.
    ///
    /// The config snapshot is published before the rules, so an event that
    /// sees the new rules also sees the new monitoring and discord settings.
    pub fn reload(&self, config: AppConfig) {
        let store = PatternStore::from_config(&config.custom_responses);

        self.audit.set_path(config.audit_log_path());
        self.notifier.reconfigure(&config.discord);
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
        self.matcher.reload(store);
        tracing::info!("Configuration reloaded");
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub async fn on_player_command(&self, actor: &Actor, command: &str) {
        let config = self.config();
        let policy = MonitoringPolicy::new(&config.monitoring);
        let time = formatted_time(&config);

        if self.matcher.is_enabled() && policy.should_send_custom_response(actor) {
            let context = PlaceholderContext::new()
                .with(Placeholder::Player, &actor.name)
                .with(Placeholder::Command, command)
                .with(Placeholder::Time, &time);
            self.send_custom_response(&config, command, &context).await;
        }

        if policy.is_command_blacklisted(command) {
            return;
        }

        let decision = policy.command_decision(actor);
        if !decision.should_log {
            return;
        }

        let context = PlaceholderContext::new()
            .with(Placeholder::Time, &time)
            .with(Placeholder::Prefix, decision.prefix.resolve(&config.messages.prefixes))
            .with(Placeholder::Player, &actor.name)
            .with(Placeholder::Command, command);

        let discord = &config.messages.discord;
        let template = if decision.has_special_permission {
            &discord.permission_command
        } else {
            &discord.player_command
        };

        self.notify(&config, &render(template, &context)).await;
        self.record(
            &config,
            AuditKind::PlayerCommand,
            &render(&config.messages.logging.player_command, &context),
        )
        .await;
    }

    /// `command` is the console input without a leading slash.
    pub async fn on_console_command(&self, sender: &str, command: &str) {
        let config = self.config();
        if !config.monitoring.console {
            return;
        }

        let policy = MonitoringPolicy::new(&config.monitoring);
        let time = formatted_time(&config);
        let slashed = format!("/{command}");

        if self.matcher.is_enabled() {
            let context = PlaceholderContext::new()
                .with(Placeholder::Sender, sender)
                .with(Placeholder::Command, &slashed)
                .with(Placeholder::Time, &time);
            self.send_custom_response(&config, &slashed, &context).await;
        }

        if policy.is_command_blacklisted(&slashed) {
            return;
        }

        let context = PlaceholderContext::new()
            .with(Placeholder::Time, &time)
            .with(Placeholder::Sender, sender)
            .with(Placeholder::Command, command);

        self.notify(&config, &render(&config.messages.discord.console_command, &context))
            .await;
        self.record(
            &config,
            AuditKind::ConsoleCommand,
            &render(&config.messages.logging.console_command, &context),
        )
        .await;
    }

    async fn send_custom_response(
        &self,
        config: &AppConfig,
        command: &str,
        context: &PlaceholderContext,
    ) {
        let Some(found) = self.matcher.find_match(command) else {
            return;
        };

        tracing::debug!(pattern = %found.pattern, "Custom command response matched");
        self.notify(config, &render(&found.response, context)).await;
    }

    // ========================================================================
    // Game Modes and Creative Inventory
    // ========================================================================

    pub async fn on_gamemode_change(&self, actor: &Actor, old_mode: GameMode, new_mode: GameMode) {
        let config = self.config();
        if !MonitoringPolicy::new(&config.monitoring).should_log_gamemode_change(actor) {
            return;
        }

        let context = PlaceholderContext::new()
            .with(Placeholder::Time, formatted_time(&config))
            .with(Placeholder::Player, &actor.name)
            .with(Placeholder::OldMode, old_mode.to_string())
            .with(Placeholder::NewMode, new_mode.to_string());

        self.notify(&config, &render(&config.messages.discord.gamemode_change, &context))
            .await;
        self.record(
            &config,
            AuditKind::GamemodeChange,
            &render(&config.messages.logging.gamemode_change, &context),
        )
        .await;
    }

    pub async fn on_creative_inventory(&self, actor: &Actor, item: &ItemStack) {
        let config = self.config();
        if !config.monitoring.creative_inventory.enabled || item.is_air() {
            return;
        }

        let policy = MonitoringPolicy::new(&config.monitoring);
        if !policy.should_monitor_creative(actor) {
            return;
        }

        let prefix = policy.creative_prefix(actor).resolve(&config.messages.prefixes);
        let context = item_context(item)
            .with(Placeholder::Time, formatted_time(&config))
            .with(Placeholder::Prefix, prefix)
            .with(Placeholder::Player, &actor.name);

        let logging = &config.messages.logging;
        let template = if config.monitoring.creative_inventory.detailed_logging {
            &logging.creative_inventory_detailed
        } else {
            &logging.creative_inventory
        };

        self.notify(&config, &render(&config.messages.discord.creative_inventory, &context))
            .await;
        self.record(&config, AuditKind::CreativeInventory, &render(template, &context))
            .await;
    }

    // ========================================================================
    // Creative Item Drops
    // ========================================================================

    /// `entity_id` identifies the dropped item entity in the world.
    pub async fn on_item_drop(&self, actor: &Actor, entity_id: Uuid, item: &ItemStack) {
        let config = self.config();
        let drops = &config.monitoring.creative_item_drops;
        if !drops.enabled || actor.game_mode != GameMode::Creative {
            return;
        }

        if !MonitoringPolicy::new(&config.monitoring).should_monitor_creative(actor) {
            return;
        }

        if drops.track_pickup {
            self.drops.track(
                entity_id,
                DroppedItem {
                    dropper_name: actor.name.clone(),
                    dropper_uuid: actor.uuid,
                    item: item.clone(),
                    dropped_at: Utc::now(),
                },
            );
        }

        let context = item_context(item)
            .with(Placeholder::Time, formatted_time(&config))
            .with(Placeholder::Player, &actor.name);

        self.notify(&config, &render(&config.messages.discord.creative_item_drop, &context))
            .await;
        self.record(
            &config,
            AuditKind::CreativeItemDrop,
            &render(&config.messages.logging.creative_item_drop, &context),
        )
        .await;
    }

    pub async fn on_item_pickup(&self, picker: &Actor, entity_id: Uuid) {
        let config = self.config();
        let drops = &config.monitoring.creative_item_drops;
        if !drops.enabled || !drops.track_pickup {
            return;
        }

        let Some(dropped) = self.drops.take(&entity_id) else {
            return;
        };

        if picker.uuid == dropped.dropper_uuid {
            return;
        }

        let context = item_context(&dropped.item)
            .with(Placeholder::Time, formatted_time(&config))
            .with(Placeholder::Picker, &picker.name)
            .with(Placeholder::Dropper, &dropped.dropper_name);

        self.notify(
            &config,
            &render(&config.messages.discord.creative_item_pickup, &context),
        )
        .await;
        self.record(
            &config,
            AuditKind::CreativeItemPickup,
            &render(&config.messages.logging.creative_item_pickup, &context),
        )
        .await;
    }

    /// Forget drops older than the configured tracking duration.
    pub fn purge_expired_drops(&self) -> usize {
        let config = self.config();
        let secs = i64::try_from(config.monitoring.creative_item_drops.tracking_duration)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        let max_age = Duration::seconds(secs);
        let removed = self.drops.purge_expired(max_age, Utc::now());
        if removed > 0 {
            tracing::debug!(removed, "Purged expired creative drops");
        }
        removed
    }

    // ========================================================================
    // Outputs
    // ========================================================================

    async fn notify(&self, config: &AppConfig, content: &str) {
        if !config.discord.enabled || content.is_empty() {
            return;
        }

        match self.notifier.notify(content).await {
            Ok(()) => {}
            Err(WatchdogError::WebhookNotConfigured) => {
                tracing::warn!("Discord webhook URL is not set; skipping notification");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to deliver webhook notification");
            }
        }
    }

    async fn record(&self, config: &AppConfig, kind: AuditKind, line: &str) {
        if !config.logging.file_logging {
            return;
        }

        if let Err(e) = self.audit.append(kind, line).await {
            if config.general.debug {
                tracing::error!(error = ?e, path = %self.audit.path().display(), "Failed to write audit log");
            } else {
                tracing::debug!(error = %e, "Failed to write audit log");
            }
        }
    }
}

fn item_context(item: &ItemStack) -> PlaceholderContext {
    PlaceholderContext::new()
        .with(Placeholder::Amount, item.amount.to_string())
        .with(Placeholder::Item, item.display_name())
        .with(Placeholder::Material, &item.material)
}

/// Current local time in the configured format, falling back to the default
/// format when the configured one is invalid.
fn formatted_time(config: &AppConfig) -> String {
    let now = Local::now();
    let mut formatted = String::new();
    if write!(formatted, "{}", now.format(&config.general.time_format)).is_ok() {
        return formatted;
    }

    tracing::debug!(format = %config.general.time_format, "Invalid time format");
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}
