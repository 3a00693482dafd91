//! Console Line Handling Tests
//!
//! Tests that console input is audited before admin subcommands run:
//! - Reload and version lines are logged and relayed
//! - Reload applies the edited file, or keeps the old config on errors
//! - Plain commands produce no reply

use std::path::PathBuf;

use tempfile::TempDir;

use crate::config::AppConfig;
use crate::core::admin::{handle_console_line, USAGE};
use crate::tests::common::fixtures::*;

const RELOAD_LINE: &str = "adminwatchdog reload";

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    let contents = format!(
        "[general]\ntime-format = \"12:00\"\n\n[logging]\nlog-dir = {:?}\n\n{}",
        dir.path().display().to_string(),
        body
    );
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_reload_line_is_audited_and_applied() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[custom-responses]\nenabled = true\nspawn = \"reloaded\"\n");
    let (watchdog, notifier) = create_test_watchdog(test_config(&dir));

    let reply = handle_console_line(&watchdog, &path, RELOAD_LINE).await;

    assert_eq!(reply.as_deref(), Some("Configuration reloaded."));
    assert_eq!(
        notifier.sent(),
        vec!["**CONSOLE** (console) executed `/adminwatchdog reload` at 12:00"]
    );
    let record = &watchdog.audit().recent(1)[0];
    assert_eq!(record.line, "[12:00] CONSOLE (CONSOLE) executed: /adminwatchdog reload");
    assert_eq!(watchdog.matcher().response_for("/spawn"), "reloaded");
}

#[tokio::test]
async fn test_failed_reload_is_audited_and_keeps_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[monitoring\nops = ").unwrap();
    let config = config_with_responses(&dir, &[("spawn", "original")]);
    let (watchdog, notifier) = create_test_watchdog(config);

    let reply = handle_console_line(&watchdog, &path, "/adminwatchdog rl").await;

    assert!(reply.unwrap().starts_with("Failed to reload configuration"));
    assert_eq!(notifier.sent().len(), 1);
    assert_eq!(watchdog.audit().count(), 1);
    assert_eq!(watchdog.matcher().response_for("/spawn"), "original");
    assert_eq!(watchdog.config().general.time_format, "12:00");
}

#[tokio::test]
async fn test_version_and_usage_lines_are_audited() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unused.toml");
    let (watchdog, notifier) = create_test_watchdog(test_config(&dir));

    let version = handle_console_line(&watchdog, &path, "adminwatchdog ver").await;
    let usage = handle_console_line(&watchdog, &path, "adminwatchdog").await;

    assert_eq!(version, Some(format!("{} v{}", crate::NAME, crate::VERSION)));
    assert_eq!(usage.as_deref(), Some(USAGE));
    assert_eq!(notifier.sent().len(), 2);
    assert_eq!(watchdog.audit().count(), 2);
}

#[tokio::test]
async fn test_plain_console_command() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unused.toml");
    let (watchdog, notifier) = create_test_watchdog(test_config(&dir));

    let reply = handle_console_line(&watchdog, &path, "  /say hello  ").await;

    assert!(reply.is_none());
    assert_eq!(
        notifier.sent(),
        vec!["**CONSOLE** (console) executed `/say hello` at 12:00"]
    );
}

#[tokio::test]
async fn test_blank_line_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unused.toml");
    let (watchdog, notifier) = create_test_watchdog(test_config(&dir));

    assert!(handle_console_line(&watchdog, &path, "   ").await.is_none());
    assert!(notifier.sent().is_empty());
    assert_eq!(watchdog.audit().count(), 0);
}

#[tokio::test]
async fn test_admin_commands_work_with_console_monitoring_off() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[monitoring]\nconsole = false\n\n[custom-responses]\nenabled = true\nspawn = \"on\"\n",
    );
    let mut config = test_config(&dir);
    config.monitoring.console = false;
    let (watchdog, notifier) = create_test_watchdog(config);

    let reply = handle_console_line(&watchdog, &path, RELOAD_LINE).await;

    assert_eq!(reply.as_deref(), Some("Configuration reloaded."));
    assert!(notifier.sent().is_empty());
    assert_eq!(watchdog.matcher().response_for("/spawn"), "on");
}

#[tokio::test]
async fn test_startup_with_malformed_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[monitoring\nops = ").unwrap();

    let mut config = AppConfig::load_or_default(&path);
    assert!(config.monitoring.ops);
    config.logging.log_dir = Some(dir.path().to_path_buf());
    let (watchdog, notifier) = create_test_watchdog(config);

    watchdog.on_player_command(&op("Alex"), "/op Steve").await;

    assert_eq!(notifier.sent().len(), 1);
    assert_eq!(watchdog.audit().count(), 1);
}
