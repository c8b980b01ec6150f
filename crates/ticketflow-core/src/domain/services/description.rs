//! Generated problem descriptions for agents.

use std::sync::Arc;

use tracing::warn;

use crate::ports::outbound::TextGenerator;

/// Stored when neither the generator nor the caller supplied a description.
pub const DESCRIPTION_UNAVAILABLE: &str = "AI description unavailable.";

pub struct DescriptionWriter {
    generator: Arc<dyn TextGenerator>,
}

impl DescriptionWriter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Short structured summary written at intake.
    pub async fn summarize(&self, title: &str) -> Option<String> {
        self.complete(&summary_prompt(title)).await
    }

    /// Longer description used when an existing ticket is refreshed.
    pub async fn detail(&self, title: &str) -> Option<String> {
        self.complete(&detail_prompt(title)).await
    }

    async fn complete(&self, prompt: &str) -> Option<String> {
        match self.generator.complete(prompt).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!("generator returned a blank description");
                None
            }
            Err(e) => {
                warn!(error = %e, "description generator unavailable");
                None
            }
        }
    }
}

pub fn summary_prompt(title: &str) -> String {
    format!(
        "Write a short and simple problem description for a support ticket titled \"{title}\".\n\
         Keep it concise and clear for a technical support agent. Do not offer numbered options \
         and do not introduce the answer; give only the description and the bullet points below.\n\n\
         **Problem Description**:\n\n\
         **Details**:\n\
         **Action Affected**:\n\
         **Error Message**:\n\
         **Reproducibility**:\n\
         **Environment Details** (please provide):"
    )
}

pub fn detail_prompt(title: &str) -> String {
    format!("Write a detailed problem description for this support ticket titled: \"{title}\".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::generation::{DisabledGenerator, ScriptedGenerator};

    #[tokio::test]
    async fn test_summary_uses_generated_text() {
        let scripted = Arc::new(ScriptedGenerator::new([Ok("  **Problem Description**: login loop \n".to_string())]));
        let writer = DescriptionWriter::new(scripted.clone());

        let text = writer.summarize("Login loop").await;
        assert_eq!(text.as_deref(), Some("**Problem Description**: login loop"));
        assert!(scripted.prompts()[0].contains("\"Login loop\""));
    }

    #[tokio::test]
    async fn test_blank_or_unavailable_gives_none() {
        let blank = DescriptionWriter::new(Arc::new(ScriptedGenerator::always("   ")));
        assert!(blank.detail("Anything").await.is_none());

        let disabled = DescriptionWriter::new(Arc::new(DisabledGenerator));
        assert!(disabled.summarize("Anything").await.is_none());
    }
}
