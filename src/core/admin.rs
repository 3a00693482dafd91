//! `adminwatchdog` administrative subcommands.

use std::path::Path;

use crate::config::AppConfig;
use crate::core::watchdog::{Watchdog, CONSOLE_SENDER};

pub const COMMAND_NAME: &str = "adminwatchdog";
pub const RELOAD_PERMISSION: &str = "adminwatchdog.reload";

const SUBCOMMANDS: [&str; 5] = ["version", "v", "ver", "reload", "rl"];

pub const USAGE: &str = "Usage: /adminwatchdog <version|reload>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Version,
    Reload,
    /// Missing or unknown subcommand.
    Usage,
}

impl AdminCommand {
    /// Parse a command line such as `adminwatchdog reload` or
    /// `/adminwatchdog v`. Returns `None` for anything not addressed to the
    /// admin command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let mut args = line.split_whitespace();

        if !args.next()?.eq_ignore_ascii_case(COMMAND_NAME) {
            return None;
        }

        let command = match args.next().map(str::to_lowercase).as_deref() {
            Some("version" | "v" | "ver") => Self::Version,
            Some("reload" | "rl") => Self::Reload,
            _ => Self::Usage,
        };
        Some(command)
    }

    /// Subcommands starting with `partial`, for tab completion.
    pub fn completions(partial: &str) -> Vec<&'static str> {
        let partial = partial.to_lowercase();
        SUBCOMMANDS
            .into_iter()
            .filter(|option| option.starts_with(&partial))
            .collect()
    }
}

/// Handle one line typed into the server console.
///
/// Every non-empty line is reported to the watchdog first, admin commands
/// included. Returns the reply for the console, if the line was an admin
/// command.
pub async fn handle_console_line(
    watchdog: &Watchdog,
    config_path: &Path,
    line: &str,
) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let command = line.strip_prefix('/').unwrap_or(line);
    watchdog.on_console_command(CONSOLE_SENDER, command).await;

    let reply = match AdminCommand::parse(line)? {
        AdminCommand::Version => format!("{} v{}", crate::NAME, crate::VERSION),
        AdminCommand::Reload => match AppConfig::load_from(config_path) {
            Ok(config) => {
                watchdog.reload(config);
                "Configuration reloaded.".to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, path = %config_path.display(), "Error reloading config");
                "Failed to reload configuration; see the log for details.".to_string()
            }
        },
        AdminCommand::Usage => USAGE.to_string(),
    };
    Some(reply)
}
