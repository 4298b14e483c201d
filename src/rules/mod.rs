//! Ordered literal substitution rules
//!
//! A [`RuleSet`] is built once at startup (either the built-in table or a
//! custom JSON mapping) and shared read-only by every migration chain.
//! Rules run strictly in list order; each one sees the output of the ones
//! before it.
//!
//! Rules operate on raw bytes, so files in any ASCII-compatible encoding are
//! migrated as-is.

mod defaults;

use anyhow::{Context, Result};
use bstr::ByteSlice;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use defaults::BUILTIN_RULES;

/// A single literal `pattern -> replacement` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub pattern: String,
    pub replacement: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// Replace every non-overlapping occurrence of the pattern
    pub fn apply(&self, content: &[u8]) -> Vec<u8> {
        content.replace(&self.pattern, &self.replacement)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.pattern, self.replacement)
    }
}

/// Immutable, ordered list of rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The rule table shipped with the binary
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_RULES
                .iter()
                .map(|(pattern, replacement)| Rule::new(*pattern, *replacement))
                .collect(),
        )
    }

    /// Parse a JSON mapping: an array of `[pattern, replacement]` string pairs.
    ///
    /// Entries that are not exactly two elements long, or whose pattern is
    /// empty, are dropped. Anything other than an array of string arrays is
    /// rejected.
    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: Vec<Vec<String>> =
            serde_json::from_str(raw).context("Rule mapping must be an array of string pairs")?;

        let mut rules = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match <[String; 2]>::try_from(entry) {
                Ok([pattern, _]) if pattern.is_empty() => {
                    tracing::debug!("Dropping rule #{}: empty pattern", index);
                }
                Ok([pattern, replacement]) => rules.push(Rule::new(pattern, replacement)),
                Err(entry) => {
                    tracing::debug!(
                        "Dropping rule #{}: expected 2 elements, found {}",
                        index,
                        entry.len()
                    );
                }
            }
        }

        Ok(Self::new(rules))
    }

    /// Read and parse a custom mapping file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule mapping {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid rule mapping {}", path.display()))
    }

    /// Load a custom mapping, falling back to the built-in table on failure.
    ///
    /// The second element carries the reason for the fallback so the caller
    /// can surface it to the operator.
    pub fn load_or_builtin(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::load(path) {
            Ok(rules) => (rules, None),
            Err(e) => {
                tracing::warn!("Falling back to built-in rules: {:#}", e);
                (Self::builtin(), Some(e))
            }
        }
    }

    /// Apply every rule, in order, to `content`
    pub fn apply(&self, content: impl AsRef<[u8]>) -> Vec<u8> {
        let mut current = content.as_ref().to_vec();
        for rule in &self.rules {
            if current.contains_str(&rule.pattern) {
                current = rule.apply(&current);
            }
        }
        current
    }

    /// True when no replacement reintroduces a pattern, so a second pass over
    /// migrated content is a no-op
    pub fn is_idempotent(&self) -> bool {
        self.rules.iter().all(|rule| {
            self.rules
                .iter()
                .all(|other| !rule.replacement.contains(other.pattern.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}
