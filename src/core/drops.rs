//! Tracks items dropped by creative-mode players so that a later pickup by
//! someone else can be attributed to the dropper.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::core::events::ItemStack;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedItem {
    pub dropper_name: String,
    pub dropper_uuid: Uuid,
    pub item: ItemStack,
    pub dropped_at: DateTime<Utc>,
}

/// Dropped item entity id → drop record.
#[derive(Debug, Default)]
pub struct DropTracker {
    drops: RwLock<HashMap<Uuid, DroppedItem>>,
}

impl DropTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, entity_id: Uuid, drop: DroppedItem) {
        self.drops
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entity_id, drop);
    }

    /// Remove and return the record for `entity_id`, if it was tracked.
    pub fn take(&self, entity_id: &Uuid) -> Option<DroppedItem> {
        self.drops
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(entity_id)
    }

    /// Drop records older than `max_age` as of `now`. Returns how many were
    /// removed.
    pub fn purge_expired(&self, max_age: Duration, now: DateTime<Utc>) -> usize {
        let mut drops = self.drops.write().unwrap_or_else(PoisonError::into_inner);
        let before = drops.len();
        drops.retain(|_, drop| now - drop.dropped_at <= max_age);
        before - drops.len()
    }

    pub fn len(&self) -> usize {
        self.drops.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
