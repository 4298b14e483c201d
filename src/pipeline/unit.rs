use crate::rules::RuleSet;
use std::path::PathBuf;

/// One file moving through the pipeline.
///
/// Units are moved, never shared: each queue boundary transfers ownership to
/// the next stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub path: PathBuf,
    /// Raw file bytes; no encoding is assumed
    pub content: Vec<u8>,
    /// Set once a rule pass altered the content
    pub changed: bool,
}

impl WorkUnit {
    pub fn new(path: PathBuf, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path,
            content: content.into(),
            changed: false,
        }
    }

    /// Replace the content with the result of every rule, in order
    pub fn apply(&mut self, rules: &RuleSet) {
        let migrated = rules.apply(&self.content);
        if migrated != self.content {
            self.content = migrated;
            self.changed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;

    #[test]
    fn test_apply_tracks_changes() {
        let rules = RuleSet::new(vec![Rule::new("whitelist", "allow")]);

        let mut unit = WorkUnit::new("a.json".into(), r#"{"whitelist": []}"#);
        unit.apply(&rules);
        assert_eq!(unit.content, br#"{"allow": []}"#);
        assert!(unit.changed);

        let mut untouched = WorkUnit::new("b.json".into(), "{}");
        untouched.apply(&rules);
        assert_eq!(untouched.content, b"{}");
        assert!(!untouched.changed);
    }
}
