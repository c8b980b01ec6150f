//! Ticket classifier
//!
//! Keyword rules first, then a JSON answer from the text generator, then
//! `{General, Medium}`. Classification never fails.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::value_objects::{Category, Classification, Priority};
use crate::ports::outbound::TextGenerator;

/// Ordered keyword rules; the first rule with any matching keyword wins.
const KEYWORD_RULES: &[(&[&str], Category, Priority)] = &[
    (&["payment"], Category::Billing, Priority::High),
    (&["login", "auth"], Category::Authentication, Priority::Medium),
    (&["bug", "error"], Category::TechnicalIssue, Priority::High),
    (&["feature", "request"], Category::FeatureRequest, Priority::Low),
];

pub struct Classifier {
    generator: Arc<dyn TextGenerator>,
}

impl Classifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn classify(&self, title: &str, description: &str) -> Classification {
        if let Some(found) = classify_by_keywords(title, description) {
            debug!(category = %found.category, priority = %found.priority, "classified by keyword");
            return found;
        }

        let prompt = classification_prompt(title, description);
        match self.generator.complete(&prompt).await {
            Ok(text) => match parse_classification(&text) {
                Some(found) => {
                    debug!(category = %found.category, priority = %found.priority, "classified by generator");
                    found
                }
                None => {
                    warn!(response = %text, "unparseable classification, using fallback");
                    Classification::fallback()
                }
            },
            Err(e) => {
                warn!(error = %e, "classification generator unavailable, using fallback");
                Classification::fallback()
            }
        }
    }
}

/// Apply the keyword rules to the lower-cased `"{title} {description}"`.
pub fn classify_by_keywords(title: &str, description: &str) -> Option<Classification> {
    let text = format!("{title} {description}").to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, category, priority)| Classification::new(*category, *priority))
}

pub fn classification_prompt(title: &str, description: &str) -> String {
    format!(
        "Classify this support ticket.\n\
         Title: \"{title}\"\n\
         Description: \"{description}\"\n\
         Return category and priority in JSON format like:\n\
         {{\"category\": \"Billing|Authentication|Technical Issue|Feature Request|General\", \"priority\": \"High|Medium|Low\"}}"
    )
}

#[derive(Deserialize)]
struct RawClassification {
    #[serde(default)]
    category: String,
    #[serde(default)]
    priority: String,
}

/// Parse the first JSON object in a generator answer, coercing unknown values.
pub fn parse_classification(text: &str) -> Option<Classification> {
    let object = extract_json_object(text)?;
    let raw: RawClassification = serde_json::from_str(object).ok()?;
    Some(Classification::new(
        Category::coerce(&raw.category),
        Priority::coerce(&raw.priority),
    ))
}

/// The first balanced `{ ... }` in `text`, ignoring braces inside strings.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
