//! Skill tokens and their normalization.

use std::collections::HashSet;

use serde::Serialize;

/// An ordered list of lowercase, trimmed, non-empty skill tokens with no duplicates.
/// First occurrence wins. Only constructible through `SkillList::normalized`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillList(Vec<String>);

impl SkillList {
    /// Trims and lowercases every item, drops empties, and deduplicates in first-seen order.
    /// Idempotent: normalizing an existing `SkillList` returns it unchanged.
    pub fn normalized<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut skills = Vec::new();
        for item in items {
            let skill = item.as_ref().trim().to_lowercase();
            if !skill.is_empty() && seen.insert(skill.clone()) {
                skills.push(skill);
            }
        }
        SkillList(skills)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s == skill)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Comma-joined tokens, or an em-dash when empty.
    pub fn display_joined(&self) -> String {
        if self.0.is_empty() {
            "—".to_string()
        } else {
            self.0.join(", ")
        }
    }
}

impl<'a> IntoIterator for &'a SkillList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
