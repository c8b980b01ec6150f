//! Skill tags

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trim and lower-case a skill tag.
pub fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Case-normalized, deduplicated set of skill tags.
///
/// Ordering is alphabetical so that serialized agents and rendered tables are
/// stable across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a skill; blank input is ignored. Returns true if it was new.
    pub fn insert(&mut self, skill: &str) -> bool {
        let skill = normalize_skill(skill);
        if skill.is_empty() {
            return false;
        }
        self.0.insert(skill)
    }

    /// Remove a skill, matching case-insensitively. Returns true if present.
    pub fn remove(&mut self, skill: &str) -> bool {
        self.0.remove(&normalize_skill(skill))
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(&normalize_skill(skill))
    }

    /// Number of skills shared with `other`.
    pub fn overlap(&self, other: &SkillSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(skills: Vec<String>) -> Self {
        skills.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.0.into_iter().collect()
    }
}

impl std::fmt::Display for SkillSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_and_dedupes() {
        let set: SkillSet = ["Billing", " billing ", "REFUND", ""].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("billing"));
        assert!(set.contains("Refund"));
    }

    #[test]
    fn test_overlap_counts_each_skill_once() {
        let agent: SkillSet = ["billing", "refund", "Billing"].into_iter().collect();
        let required: SkillSet = ["BILLING", "invoice"].into_iter().collect();
        assert_eq!(agent.overlap(&required), 1);
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let mut set: SkillSet = ["login"].into_iter().collect();
        assert!(set.remove("LOGIN"));
        assert!(set.is_empty());
        assert!(!set.remove("login"));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let set: SkillSet = serde_json::from_str(r#"["Auth", "auth", "Login"]"#).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["auth","login"]"#);
    }
}
