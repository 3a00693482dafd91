//! Shared test helpers

#![allow(dead_code)]


use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::webhook::Notifier;

/// Notifier that keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, content: &str) -> Result<()> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }
}
