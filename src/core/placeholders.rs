//! Placeholder substitution for message templates.
//!
//! Templates reference values as `%name%`. Substitution is a single
//! left-to-right pass, so text inserted for one placeholder is never scanned
//! again.

use std::collections::HashMap;

// ============================================================================
// Placeholder Names
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Time,
    Player,
    Command,
    Sender,
    Prefix,
    OldMode,
    NewMode,
    Amount,
    Item,
    Material,
    Picker,
    Dropper,
}

impl Placeholder {
    pub const ALL: [Placeholder; 12] = [
        Self::Time,
        Self::Player,
        Self::Command,
        Self::Sender,
        Self::Prefix,
        Self::OldMode,
        Self::NewMode,
        Self::Amount,
        Self::Item,
        Self::Material,
        Self::Picker,
        Self::Dropper,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Player => "player",
            Self::Command => "command",
            Self::Sender => "sender",
            Self::Prefix => "prefix",
            Self::OldMode => "oldmode",
            Self::NewMode => "newmode",
            Self::Amount => "amount",
            Self::Item => "item",
            Self::Material => "material",
            Self::Picker => "picker",
            Self::Dropper => "dropper",
        }
    }

    /// The token as written in templates, e.g. `%player%`.
    pub fn token(self) -> String {
        format!("%{}%", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}%", self.name())
    }
}

// ============================================================================
// Substitution Context
// ============================================================================

/// Values for a single render call.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderContext {
    values: HashMap<Placeholder, String>,
}

impl PlaceholderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.set(placeholder, value);
        self
    }

    pub fn set(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.values.insert(placeholder, value.into());
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Replace every `%name%` token whose placeholder has a value in `context`.
///
/// Unknown tokens, and known tokens without a value, are left verbatim.
pub fn render(template: &str, context: &PlaceholderContext) -> String {
    if context.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        match lookup(tail, context) {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('%');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Value and byte length (name plus closing `%`) of the token opening `tail`.
fn lookup<'a>(tail: &str, context: &'a PlaceholderContext) -> Option<(&'a str, usize)> {
    Placeholder::ALL.into_iter().find_map(|placeholder| {
        let name = placeholder.name();
        let value = context.get(placeholder)?;
        tail.strip_prefix(name)?
            .starts_with('%')
            .then_some((value, name.len() + 1))
    })
}
