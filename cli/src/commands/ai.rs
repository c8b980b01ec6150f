//! AI commands

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;
use ticketflow_core::TicketUseCases;

use super::App;
use crate::output::{self, OutputFormat};
use crate::AiCommands;

#[derive(Clone, Serialize, Tabled)]
struct ClassificationView {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Required skills")]
    required_skills: String,
}

pub async fn handle(action: AiCommands, app: &App, format: OutputFormat) -> Result<()> {
    match action {
        AiCommands::Classify { title, description } => {
            let found = app.tickets.classify(&title, &description).await;
            let view = ClassificationView {
                category: found.category.to_string(),
                priority: found.priority.to_string(),
                required_skills: found.category.required_skills().to_string(),
            };
            format.print(&view, || vec![view.clone()])?;
        }
        AiCommands::Steps { title, description } => {
            let steps = app.tickets.generate_steps(&title, description.as_deref()).await;
            format.lines(&steps)?;
        }
        AiCommands::Raw { prompt } => match app.generator.complete(&prompt).await {
            Ok(text) => println!("{text}"),
            Err(e) => output::warning(format!("generator unavailable: {e}")),
        },
    }
    Ok(())
}
