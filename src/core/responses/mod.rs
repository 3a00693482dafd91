//! Custom Command Responses
//!
//! Matches commands issued by players or the console against configured
//! patterns and picks a single response template by specificity.

pub mod matcher;
pub mod pattern;
pub mod store;

pub use matcher::ResponseMatcher;
pub use pattern::{normalize_command, CommandPattern, WILDCARD};
pub use store::{PatternStore, ResponseMatch, Rule, ENABLED_KEY};
