//! CLI Commands

pub mod ai;
pub mod config;
pub mod tickets;
pub mod users;

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use ticketflow_core::domain::services::EscalationDetector;
use ticketflow_core::infrastructure::{build_generator, JsonFileStore, TracingEventPublisher};
use ticketflow_core::{Category, EntityId, TextGenerator, TicketService, UserService};

use crate::config::Config;

/// Wired services over the on-disk store
pub struct App {
    pub tickets: TicketService,
    pub users: UserService,
    pub generator: Arc<dyn TextGenerator>,
}

impl App {
    pub async fn build(config: &Config) -> Result<Self> {
        let data_dir = config.data_dir()?;
        let store = Arc::new(JsonFileStore::open(&data_dir).await?);
        let events = Arc::new(TracingEventPublisher);
        let generator = build_generator(&config.generation)?;

        let tickets = TicketService::new(store.clone(), store.clone(), generator.clone(), events.clone())
            .with_escalation(EscalationDetector::new(config.intake.detect_escalation));
        let users = UserService::new(store, events);

        Ok(Self {
            tickets,
            users,
            generator,
        })
    }
}

pub fn entity_id(raw: &str) -> Result<EntityId> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("id must not be empty");
    }
    Ok(EntityId::from(raw))
}

pub fn parse_category(raw: &str) -> Result<Category> {
    let wanted: String = raw.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase();
    Category::ALL
        .into_iter()
        .find(|c| c.as_str().replace(' ', "").to_lowercase() == wanted)
        .ok_or_else(|| anyhow!("unknown category '{raw}'"))
}
