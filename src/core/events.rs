//! Plain descriptions of the actors and items the watchdog observes.
//!
//! An embedding server translates its own event objects into these types
//! before handing them to [`Watchdog`](crate::core::watchdog::Watchdog).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Survival => write!(f, "SURVIVAL"),
            Self::Creative => write!(f, "CREATIVE"),
            Self::Adventure => write!(f, "ADVENTURE"),
            Self::Spectator => write!(f, "SPECTATOR"),
        }
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "survival" | "s" | "0" => Ok(Self::Survival),
            "creative" | "c" | "1" => Ok(Self::Creative),
            "adventure" | "a" | "2" => Ok(Self::Adventure),
            "spectator" | "sp" | "3" => Ok(Self::Spectator),
            _ => Err(format!("Unknown game mode: {}", s)),
        }
    }
}

/// A player as seen at the moment of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub uuid: Uuid,
    pub is_op: bool,
    pub permissions: HashSet<String>,
    pub game_mode: GameMode,
}

impl Actor {
    pub fn new(name: impl Into<String>, uuid: Uuid) -> Self {
        Self {
            name: name.into(),
            uuid,
            is_op: false,
            permissions: HashSet::new(),
            game_mode: GameMode::default(),
        }
    }

    pub fn with_op(mut self, is_op: bool) -> Self {
        self.is_op = is_op;
        self
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn with_game_mode(mut self, game_mode: GameMode) -> Self {
        self.game_mode = game_mode;
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Upper-case material identifier, e.g. `DIAMOND_SWORD`.
    pub material: String,
    pub amount: u32,
    /// Custom name, if the item has been renamed.
    pub display_name: Option<String>,
}

impl ItemStack {
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn is_air(&self) -> bool {
        self.material.eq_ignore_ascii_case("AIR")
    }

    /// Custom name if present, otherwise the material in lower case with
    /// underscores replaced by spaces.
    pub fn display_name(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => self.material.to_lowercase().replace('_', " "),
        }
    }
}
