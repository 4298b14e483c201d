//! Glob pattern utilities
//!
//! File selection matches glob patterns against a file's base name only,
//! never against the full path.

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Compiled set of file name patterns (`*`, `?`, `[...]` classes)
#[derive(Debug, Clone)]
pub struct NameMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl NameMatcher {
    /// Compile a list of patterns. Blank entries are ignored; at least one
    /// pattern must remain.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns: Vec<String> = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if patterns.is_empty() {
            anyhow::bail!("At least one file name pattern is required");
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .with_context(|| format!("Invalid file name pattern '{}'", pattern))?;
            builder.add(glob);
        }

        Ok(Self {
            set: builder.build()?,
            patterns,
        })
    }

    /// Does a base file name match at least one pattern?
    pub fn matches(&self, file_name: &str) -> bool {
        self.set.is_match(file_name)
    }

    /// Match the base name of `path`; paths without a file name never match
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.matches(&name.to_string_lossy()))
            .unwrap_or(false)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_patterns() {
        let matcher = NameMatcher::new(&["*.json", "*.tmpl"]).unwrap();
        assert!(matcher.matches("krakend.json"));
        assert!(matcher.matches("endpoints.tmpl"));
        assert!(!matcher.matches("krakend.yaml"));
        assert!(!matcher.matches("json"));
    }

    #[test]
    fn test_question_mark_and_classes() {
        let matcher = NameMatcher::new(&["settings_?.json", "[ab]*.tmpl", "[!x]y.txt"]).unwrap();
        assert!(matcher.matches("settings_1.json"));
        assert!(!matcher.matches("settings_10.json"));
        assert!(matcher.matches("base.tmpl"));
        assert!(!matcher.matches("core.tmpl"));
        assert!(matcher.matches("zy.txt"));
        assert!(!matcher.matches("xy.txt"));
    }

    #[test]
    fn test_matches_base_name_only() {
        let matcher = NameMatcher::new(&["*.json"]).unwrap();
        assert!(matcher.matches_path(&PathBuf::from("config/partials/a.json")));
        assert!(!matcher.matches_path(&PathBuf::from("config.json/readme.md")));

        let nested = NameMatcher::new(&["partials/*.json"]).unwrap();
        assert!(!nested.matches_path(&PathBuf::from("config/partials/a.json")));
    }

    #[test]
    fn test_blank_patterns_are_ignored() {
        let matcher = NameMatcher::new(&[" *.json ", ""]).unwrap();
        assert_eq!(matcher.patterns(), &["*.json".to_string()]);
        assert!(NameMatcher::new(&["", "  "]).is_err());
        assert!(NameMatcher::new::<&str>(&[]).is_err());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = NameMatcher::new(&["[unclosed"]).unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }
}
