use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use admin_watchdog::config::AppConfig;
use admin_watchdog::core::admin;
use admin_watchdog::core::logging;
use admin_watchdog::core::watchdog::Watchdog;
use admin_watchdog::core::webhook::WebhookNotifier;

const DROP_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Reads console commands from stdin, one per line, and feeds them to the
/// watchdog. `adminwatchdog version` and `adminwatchdog reload` are also
/// answered locally.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init(&logging::default_log_dir());
    log::info!("Admin Watchdog v{} starting", admin_watchdog::VERSION);

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::config_path);

    let config = AppConfig::load_or_default(&config_path);

    let notifier = Arc::new(
        WebhookNotifier::new(&config.discord).context("failed to build webhook client")?,
    );
    let watchdog = Arc::new(Watchdog::new(config, notifier));

    let purger = Arc::clone(&watchdog);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(DROP_PURGE_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            purger.purge_expired_drops();
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = admin::handle_console_line(&watchdog, &config_path, &line).await {
            println!("{reply}");
        }
    }

    log::info!("Admin Watchdog shutting down");
    Ok(())
}
