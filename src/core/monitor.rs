//! Monitoring Policy Module
//!
//! Decides which actors and actions are recorded, based on op status,
//! monitored permissions and per-feature switches.

use crate::config::{MonitoringConfig, Prefixes};
use crate::core::events::Actor;

// ============================================================================
// Bypass Permissions
// ============================================================================

pub const BYPASS_COMMANDS: &str = "adminwatchdog.bypass.commands";
pub const BYPASS_CUSTOM_RESPONSES: &str = "adminwatchdog.bypass.customresponses";
pub const BYPASS_GAMEMODE: &str = "adminwatchdog.bypass.gamemode";
pub const BYPASS_CREATIVE: &str = "adminwatchdog.bypass.creative";

// ============================================================================
// Types
// ============================================================================

/// Which configured prefix labels a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixKind {
    #[default]
    Normal,
    Op,
    Permission,
}

impl PrefixKind {
    pub fn resolve(self, prefixes: &Prefixes) -> &str {
        match self {
            Self::Normal => &prefixes.normal,
            Self::Op => &prefixes.op,
            Self::Permission => &prefixes.permission,
        }
    }
}

/// Outcome of evaluating a player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandDecision {
    pub should_log: bool,
    pub prefix: PrefixKind,
    /// Actor holds a monitored permission; selects the permission variant of
    /// the webhook message.
    pub has_special_permission: bool,
}

// ============================================================================
// Policy
// ============================================================================

pub struct MonitoringPolicy<'a> {
    config: &'a MonitoringConfig,
}

impl<'a> MonitoringPolicy<'a> {
    pub fn new(config: &'a MonitoringConfig) -> Self {
        Self { config }
    }

    pub fn has_monitored_permission(&self, actor: &Actor) -> bool {
        self.config
            .permissions
            .list
            .iter()
            .any(|permission| actor.has_permission(permission))
    }

    pub fn is_command_blacklisted(&self, command: &str) -> bool {
        self.config.is_command_blacklisted(command)
    }

    /// Whether a player's command may trigger a custom response.
    pub fn should_send_custom_response(&self, actor: &Actor) -> bool {
        if actor.has_permission(BYPASS_CUSTOM_RESPONSES) {
            return false;
        }
        if self.config.all_commands {
            return true;
        }
        if self.config.ops && actor.is_op {
            return true;
        }
        self.config.permissions.enabled && self.has_monitored_permission(actor)
    }

    pub fn command_decision(&self, actor: &Actor) -> CommandDecision {
        let mut decision = CommandDecision::default();

        if actor.has_permission(BYPASS_COMMANDS) {
            return decision;
        }

        if self.config.all_commands {
            decision.should_log = true;
            decision.prefix = PrefixKind::Normal;
            return decision;
        }

        if self.config.ops && actor.is_op {
            decision.should_log = true;
            decision.prefix = PrefixKind::Op;
        }

        if self.config.permissions.enabled && self.has_monitored_permission(actor) {
            decision.should_log = true;
            decision.has_special_permission = true;
            decision.prefix = PrefixKind::Permission;
        }

        decision
    }

    pub fn should_log_gamemode_change(&self, actor: &Actor) -> bool {
        if !self.config.gamemode_changes || actor.has_permission(BYPASS_GAMEMODE) {
            return false;
        }
        (self.config.ops && actor.is_op)
            || (self.config.permissions.enabled && self.has_monitored_permission(actor))
    }

    /// Eligibility shared by creative inventory and creative drop logging.
    pub fn should_monitor_creative(&self, actor: &Actor) -> bool {
        if actor.has_permission(BYPASS_CREATIVE) {
            return false;
        }

        let creative = &self.config.creative_inventory;
        if creative.ops_only {
            return actor.is_op;
        }
        if creative.permissions_only {
            return self.config.permissions.enabled && self.has_monitored_permission(actor);
        }

        (self.config.ops && actor.is_op)
            || (self.config.permissions.enabled && self.has_monitored_permission(actor))
    }

    pub fn creative_prefix(&self, actor: &Actor) -> PrefixKind {
        if actor.is_op {
            PrefixKind::Op
        } else if self.has_monitored_permission(actor) {
            PrefixKind::Permission
        } else {
            PrefixKind::Normal
        }
    }
}
