//! Unit tests for the watchdog and its outputs
//!
//! - Event handlers against a recording notifier and a temporary audit log
//! - Console lines, including admin subcommands
//! - Webhook delivery against a wiremock server

mod console_tests;
mod webhook_tests;
