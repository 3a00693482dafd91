pub mod admin;
pub mod audit;
pub mod drops;
pub mod error;
pub mod events;
pub mod logging;
pub mod monitor;
pub mod placeholders;
pub mod webhook;
pub mod watchdog;

// Custom command responses: pattern store, specificity matching, snapshots
pub mod responses;
