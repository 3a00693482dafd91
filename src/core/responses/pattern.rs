//! Compiled command patterns.
//!
//! A pattern is a lowercase, space-separated template such as
//! `lp user * permission set *`. Each `*` stands for exactly one
//! whitespace-delimited argument; everything else is literal text.

use regex::{Regex, RegexBuilder};

/// Marker for a single positional argument.
pub const WILDCARD: char = '*';

/// Upper bound on the compiled size of a single wildcard pattern.
const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone)]
enum Predicate {
    /// Whitespace-delimited prefix comparison against the pattern text.
    Literal,
    /// Anchored regex built from escaped literal segments.
    Wildcard(Regex),
    /// Plain prefix test, used when the wildcard regex could not be built.
    Prefix(String),
}

/// A pattern compiled once into an immutable match predicate.
#[derive(Debug, Clone)]
pub struct CommandPattern {
    source: String,
    token_count: usize,
    has_wildcard: bool,
    predicate: Predicate,
}

impl CommandPattern {
    pub fn compile(pattern: &str) -> Self {
        Self::compile_with_limit(pattern, DEFAULT_SIZE_LIMIT)
    }

    pub(crate) fn compile_with_limit(pattern: &str, size_limit: usize) -> Self {
        let source = normalize_pattern(pattern);
        let token_count = source.split_whitespace().count();
        let has_wildcard = source.contains(WILDCARD);

        let predicate = if has_wildcard {
            match wildcard_regex(&source, size_limit) {
                Ok(regex) => Predicate::Wildcard(regex),
                Err(e) => {
                    tracing::warn!(
                        pattern = %source,
                        error = %e,
                        "Custom response pattern could not be compiled, using prefix match"
                    );
                    Predicate::Prefix(source.replace(WILDCARD, "").trim().to_string())
                }
            }
        } else {
            Predicate::Literal
        };

        Self {
            source,
            token_count,
            has_wildcard,
            predicate,
        }
    }

    /// Normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn has_wildcard(&self) -> bool {
        self.has_wildcard
    }

    /// True when the pattern degraded to the permissive prefix test.
    pub fn is_fallback(&self) -> bool {
        matches!(self.predicate, Predicate::Prefix(_))
    }

    /// Test a command that has already been passed through [`normalize_command`].
    pub fn matches(&self, command: &str) -> bool {
        match &self.predicate {
            Predicate::Literal => command
                .strip_prefix(self.source.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace)),
            Predicate::Wildcard(regex) => regex.is_match(command),
            Predicate::Prefix(prefix) => command.starts_with(prefix.as_str()),
        }
    }
}

/// Strip at most one leading `/` and lowercase the command.
pub fn normalize_command(command: &str) -> String {
    command.strip_prefix('/').unwrap_or(command).to_lowercase()
}

fn normalize_pattern(pattern: &str) -> String {
    pattern.trim().to_lowercase()
}

/// `^seg(\S+)seg...` followed by either the end of input or whitespace and
/// any trailing arguments. Segments are escaped, so only `*` is special.
fn wildcard_regex(source: &str, size_limit: usize) -> Result<Regex, regex::Error> {
    let body = source
        .split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\S+");

    RegexBuilder::new(&format!(r"^{body}(?:\s.*)?$"))
        .dot_matches_new_line(true)
        .size_limit(size_limit)
        .build()
}
