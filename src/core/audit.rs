//! Audit Log Module
//!
//! Appends human-readable records of monitored actions to the audit file and
//! keeps the most recent lines in memory.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::core::error::Result;

// ============================================================================
// Types
// ============================================================================

/// Kind of action an audit record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    PlayerCommand,
    ConsoleCommand,
    GamemodeChange,
    CreativeInventory,
    CreativeItemDrop,
    CreativeItemPickup,
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlayerCommand => write!(f, "player_command"),
            Self::ConsoleCommand => write!(f, "console_command"),
            Self::GamemodeChange => write!(f, "gamemode_change"),
            Self::CreativeInventory => write!(f, "creative_inventory"),
            Self::CreativeItemDrop => write!(f, "creative_item_drop"),
            Self::CreativeItemPickup => write!(f, "creative_item_pickup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub kind: AuditKind,
    pub line: String,
}

// ============================================================================
// Audit Log
// ============================================================================

pub struct AuditLog {
    path: RwLock<PathBuf>,
    /// Serializes appends so lines never interleave.
    write_lock: Mutex<()>,
    recent: RwLock<VecDeque<AuditRecord>>,
    max_recent: usize,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, 1000)
    }

    pub fn with_capacity(path: impl Into<PathBuf>, max_recent: usize) -> Self {
        Self {
            path: RwLock::new(path.into()),
            write_lock: Mutex::new(()),
            recent: RwLock::new(VecDeque::with_capacity(max_recent.min(1000))),
            max_recent,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.path.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Point subsequent appends at a different file.
    pub fn set_path(&self, path: impl Into<PathBuf>) {
        *self.path.write().unwrap_or_else(PoisonError::into_inner) = path.into();
    }

    /// Append one line, creating the file and its directory if needed.
    pub async fn append(&self, kind: AuditKind, line: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.path();

        write_line(&path, line).await?;
        tracing::info!(kind = %kind, record = %line, "Audit record written");

        let mut recent = self.recent.write().unwrap_or_else(PoisonError::into_inner);
        recent.push_back(AuditRecord {
            kind,
            line: line.to_string(),
        });
        while recent.len() > self.max_recent {
            recent.pop_front();
        }

        Ok(())
    }

    /// Most recent records, newest first.
    pub fn recent(&self, count: usize) -> Vec<AuditRecord> {
        let recent = self.recent.read().unwrap_or_else(PoisonError::into_inner);
        recent.iter().rev().take(count).cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.recent.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

async fn write_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(format!("{line}\n").as_bytes()).await?;
    file.flush().await?;
    Ok(())
}
