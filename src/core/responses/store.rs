//! Immutable snapshot of custom command response rules.

use crate::config::CustomResponsesConfig;

use super::pattern::{normalize_command, CommandPattern};

/// Reserved key that toggles the feature instead of defining a rule.
pub const ENABLED_KEY: &str = "enabled";

/// A configured pattern and the response template it triggers.
#[derive(Debug, Clone)]
pub struct Rule {
    key: String,
    pattern: CommandPattern,
    response: String,
}

impl Rule {
    /// The key exactly as it appeared in the configuration.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn pattern(&self) -> &CommandPattern {
        &self.pattern
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMatch {
    /// Configured key of the winning rule.
    pub pattern: String,
    /// Unrendered response template.
    pub response: String,
}

/// Rules ordered most specific first, compiled once at construction.
///
/// Ordering: more tokens first; among equal token counts, patterns with a
/// wildcard first; remaining ties by normalized pattern text, then raw key.
#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    enabled: bool,
    rules: Vec<Rule>,
}

impl PatternStore {
    pub fn new<I, K, V>(enabled: bool, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut rules: Vec<Rule> = entries
            .into_iter()
            .map(|(key, response)| (key.into(), response.into()))
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, response)| Rule {
                pattern: CommandPattern::compile(&key),
                key,
                response,
            })
            .collect();

        rules.sort_by(|a, b| {
            b.pattern
                .token_count()
                .cmp(&a.pattern.token_count())
                .then_with(|| b.pattern.has_wildcard().cmp(&a.pattern.has_wildcard()))
                .then_with(|| a.pattern.as_str().cmp(b.pattern.as_str()))
                .then_with(|| a.key.cmp(&b.key))
        });

        tracing::debug!(enabled, rules = rules.len(), "Built custom response snapshot");

        Self { enabled, rules }
    }

    pub fn from_config(config: &CustomResponsesConfig) -> Self {
        Self::new(config.is_enabled(), config.rules())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// All rules in specificity order, including those with empty responses.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Most specific rule matching `command`, even if its response is empty.
    pub fn find_rule(&self, command: &str) -> Option<&Rule> {
        let command = normalize_command(command);
        self.rules.iter().find(|rule| rule.pattern.matches(&command))
    }

    /// Most specific matching rule, or `None` when nothing matches or the
    /// winning rule has an empty response.
    pub fn find_match(&self, command: &str) -> Option<ResponseMatch> {
        self.find_rule(command)
            .filter(|rule| !rule.response.is_empty())
            .map(|rule| ResponseMatch {
                pattern: rule.key.clone(),
                response: rule.response.clone(),
            })
    }
}

fn is_reserved_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(ENABLED_KEY)
}
