//! Ticket classification: category, priority and the category skill map.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::skill::SkillSet;

/// Fixed set of ticket categories
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Billing,
    Authentication,
    #[serde(rename = "Technical Issue")]
    TechnicalIssue,
    #[serde(rename = "Feature Request")]
    FeatureRequest,
    #[default]
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Billing,
        Category::Authentication,
        Category::TechnicalIssue,
        Category::FeatureRequest,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Billing => "Billing",
            Self::Authentication => "Authentication",
            Self::TechnicalIssue => "Technical Issue",
            Self::FeatureRequest => "Feature Request",
            Self::General => "General",
        }
    }

    /// Parse free-form text (e.g. model output). Anything unrecognized is `General`.
    pub fn coerce(value: &str) -> Self {
        let needle: String = value
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match needle.as_str() {
            "billing" => Self::Billing,
            "authentication" | "auth" => Self::Authentication,
            "technicalissue" | "technical" => Self::TechnicalIssue,
            "featurerequest" | "feature" => Self::FeatureRequest,
            _ => Self::General,
        }
    }

    /// Skills an agent should have to handle this category.
    pub fn required_skills(&self) -> SkillSet {
        let skills: &[&str] = match self {
            Self::Billing => &["payment", "invoice", "refund"],
            Self::Authentication => &["login", "auth", "account"],
            Self::TechnicalIssue => &["bug", "error", "crash"],
            Self::FeatureRequest => &["feature", "enhancement"],
            Self::General => &["general"],
        };
        skills.iter().copied().collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Unrecognized values fall back to `Medium`.
    pub fn coerce(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a ticket
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub priority: Priority,
}

impl Classification {
    pub const fn new(category: Category, priority: Priority) -> Self {
        Self { category, priority }
    }

    /// Used whenever neither the keyword rules nor the generator give an answer.
    pub const fn fallback() -> Self {
        Self::new(Category::General, Priority::Medium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_coercion() {
        assert_eq!(Category::coerce("Billing"), Category::Billing);
        assert_eq!(Category::coerce("technical issue"), Category::TechnicalIssue);
        assert_eq!(Category::coerce("Feature-Request"), Category::FeatureRequest);
        assert_eq!(Category::coerce("Shipping"), Category::General);
        assert_eq!(Category::coerce(""), Category::General);
    }

    #[test]
    fn test_priority_coercion() {
        assert_eq!(Priority::coerce(" HIGH "), Priority::High);
        assert_eq!(Priority::coerce("low"), Priority::Low);
        assert_eq!(Priority::coerce("critical"), Priority::Medium);
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&Category::TechnicalIssue).unwrap();
        assert_eq!(json, "\"Technical Issue\"");
        let back: Category = serde_json::from_str("\"Feature Request\"").unwrap();
        assert_eq!(back, Category::FeatureRequest);
    }

    #[test]
    fn test_required_skills_by_category() {
        let billing = Category::Billing.required_skills();
        assert!(billing.contains("invoice"));
        assert_eq!(billing.len(), 3);
        assert_eq!(Category::General.required_skills().len(), 1);
    }
}
