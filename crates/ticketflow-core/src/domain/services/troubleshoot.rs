//! Troubleshooting step generation

use std::sync::Arc;

use tracing::warn;

use crate::ports::outbound::TextGenerator;

/// Used verbatim whenever the generator has nothing to offer.
pub const FALLBACK_STEPS: [&str; 5] = [
    "Check if the issue persists after restarting the system.",
    "Verify network or connectivity.",
    "Ensure credentials or inputs are correct.",
    "Reproduce the error and note steps.",
    "Escalate if problem continues.",
];

pub struct TroubleshootGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl TroubleshootGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Ordered remediation steps; never empty.
    pub async fn generate(&self, title: &str, description: Option<&str>) -> Vec<String> {
        let prompt = troubleshoot_prompt(title, description.unwrap_or_default());

        match self.generator.complete(&prompt).await {
            Ok(text) => {
                let steps = split_steps(&text);
                if steps.is_empty() {
                    warn!("generator returned blank troubleshooting steps, using fallback");
                    fallback_steps()
                } else {
                    steps
                }
            }
            Err(e) => {
                warn!(error = %e, "troubleshooting generator unavailable, using fallback");
                fallback_steps()
            }
        }
    }
}

pub fn troubleshoot_prompt(title: &str, description: &str) -> String {
    format!(
        "You are a customer support AI.\n\
         Based on the following issue, generate 5 short and clear troubleshooting steps.\n\n\
         Title: {title}\n\
         Description: {description}\n\
         Return the list as bullet points."
    )
}

/// One step per non-blank line, trimmed. Bullet markers are kept as written.
pub fn split_steps(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn fallback_steps() -> Vec<String> {
    FALLBACK_STEPS.iter().map(|s| s.to_string()).collect()
}
