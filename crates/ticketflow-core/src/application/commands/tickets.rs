//! Ticket application service: the intake pipeline and ticket lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::application::assignment::AgentAssignor;
use crate::application::dto::*;
use crate::application::queries::{compute_stats, sort_tickets, visibility_filter};
use crate::domain::aggregates::{Ticket, TicketDraft, User};
use crate::domain::events::DomainEvent;
use crate::domain::policy::{authorize, Capability, Ownership};
use crate::domain::services::{
    Classifier, DescriptionWriter, EscalationDetector, TroubleshootGenerator, DESCRIPTION_UNAVAILABLE,
};
use crate::domain::value_objects::{Classification, EntityId, SkillSet, TicketStatus};
use crate::ports::inbound::{TicketUseCases, UseCaseError};
use crate::ports::outbound::{EventPublisher, TextGenerator, TicketFilter, TicketRepository, UserRepository};

/// Ticket application service
pub struct TicketService {
    ticket_repo: Arc<dyn TicketRepository>,
    user_repo: Arc<dyn UserRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    classifier: Classifier,
    assignor: AgentAssignor,
    describer: DescriptionWriter,
    troubleshooter: TroubleshootGenerator,
    escalation: EscalationDetector,
}

impl TicketService {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepository>,
        user_repo: Arc<dyn UserRepository>,
        generator: Arc<dyn TextGenerator>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            assignor: AgentAssignor::new(user_repo.clone(), ticket_repo.clone()),
            classifier: Classifier::new(generator.clone()),
            describer: DescriptionWriter::new(generator.clone()),
            troubleshooter: TroubleshootGenerator::new(generator),
            escalation: EscalationDetector::default(),
            ticket_repo,
            user_repo,
            event_publisher,
        }
    }

    pub fn with_escalation(mut self, detector: EscalationDetector) -> Self {
        self.escalation = detector;
        self
    }

    async fn load_actor(&self, actor_id: &EntityId) -> Result<User, UseCaseError> {
        self.user_repo
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(format!("user {actor_id}")))
    }

    async fn load_ticket(&self, ticket_id: &EntityId) -> Result<Ticket, UseCaseError> {
        self.ticket_repo
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(format!("ticket {ticket_id}")))
    }

    async fn resolve_creator(&self, created_by: Option<&str>) -> Result<Option<User>, UseCaseError> {
        let Some(id) = created_by.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(None);
        };
        let creator = self.user_repo.find_by_id(&EntityId::from_string(id)).await?;
        if creator.is_none() {
            warn!(created_by = id, "unknown ticket creator, recording none");
        }
        Ok(creator)
    }

    async fn save_and_publish(&self, ticket: &mut Ticket) -> Result<(), UseCaseError> {
        self.ticket_repo.save(ticket).await?;
        self.publish(ticket.take_events()).await;
        Ok(())
    }

    /// The record is already persisted; a publishing failure is only logged.
    async fn publish(&self, events: Vec<DomainEvent>) {
        if events.is_empty() {
            return;
        }
        if let Err(e) = self.event_publisher.publish(events).await {
            warn!(error = %e, "failed to publish ticket events");
        }
    }
}

#[async_trait]
impl TicketUseCases for TicketService {
    async fn intake(&self, submission: TicketSubmission) -> Result<Ticket, UseCaseError> {
        let title = submission.title.trim().to_string();
        if title.is_empty() {
            return Err(UseCaseError::Validation("title is required".into()));
        }
        let caller_description = submission
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let classification = self.classifier.classify(&title, caller_description.unwrap_or_default()).await;
        let required = classification.category.required_skills();

        let assignee = self.assignor.assign(&required).await?;
        if assignee.is_none() {
            warn!(category = %classification.category, "no agent available, ticket stays unassigned");
        }

        let description = match self.describer.summarize(&title).await {
            Some(generated) => generated,
            None => caller_description
                .map(String::from)
                .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string()),
        };

        let troubleshoot_steps = self.troubleshooter.generate(&title, caller_description).await;
        let (sentiment, escalation_risk) = self.escalation.assess(&title, caller_description.unwrap_or_default());
        let creator = self.resolve_creator(submission.created_by.as_deref()).await?;

        let draft = TicketDraft {
            title,
            description,
            customer_email: submission.customer_email,
            customer_name: submission.customer_name,
            classification,
            sentiment,
            escalation_risk,
            troubleshoot_steps,
        };
        let mut ticket = Ticket::open(draft, assignee.as_ref(), creator.as_ref())?;
        self.save_and_publish(&mut ticket).await?;

        info!(
            ticket_id = %ticket.id(),
            category = %ticket.category(),
            priority = %ticket.priority(),
            assignee = ticket.assigned_to_name(),
            escalation = %ticket.escalation_risk(),
            "ticket created"
        );
        Ok(ticket)
    }

    async fn open_ticket(&self, actor_id: &EntityId, mut submission: TicketSubmission) -> Result<Ticket, UseCaseError> {
        let actor = self.load_actor(actor_id).await?;
        authorize(&actor, Capability::CreateTicket, Ownership::none())?;

        submission.created_by = Some(actor.id().to_string());
        self.intake(submission).await
    }

    async fn classify(&self, title: &str, description: &str) -> Classification {
        self.classifier.classify(title, description).await
    }

    async fn assign_agent(&self, required_skills: &SkillSet) -> Result<Option<User>, UseCaseError> {
        Ok(self.assignor.assign(required_skills).await?)
    }

    async fn generate_steps(&self, title: &str, description: Option<&str>) -> Vec<String> {
        self.troubleshooter.generate(title, description).await
    }

    async fn update_status(&self, actor_id: &EntityId, ticket_id: &EntityId, status: TicketStatus) -> Result<Ticket, UseCaseError> {
        let actor = self.load_actor(actor_id).await?;
        let mut ticket = self.load_ticket(ticket_id).await?;
        authorize(&actor, Capability::UpdateTicketStatus, Ownership::ticket(&ticket))?;

        let from = ticket.status();
        ticket.transition_to(status)?;
        self.save_and_publish(&mut ticket).await?;

        info!(ticket_id = %ticket_id, %from, to = %status, by = %actor_id, "ticket status updated");
        Ok(ticket)
    }

    async fn reassign(&self, actor_id: &EntityId, ticket_id: &EntityId, agent_id: &EntityId) -> Result<Ticket, UseCaseError> {
        let actor = self.load_actor(actor_id).await?;
        authorize(&actor, Capability::ReassignTicket, Ownership::none())?;

        let mut ticket = self.load_ticket(ticket_id).await?;
        let agent = self.load_actor(agent_id).await?;
        ticket.reassign(&agent)?;
        self.save_and_publish(&mut ticket).await?;

        info!(ticket_id = %ticket_id, agent = %agent_id, "ticket reassigned");
        Ok(ticket)
    }

    async fn refresh_ai_details(&self, actor_id: &EntityId, ticket_id: &EntityId) -> Result<Ticket, UseCaseError> {
        let actor = self.load_actor(actor_id).await?;
        let mut ticket = self.load_ticket(ticket_id).await?;
        authorize(&actor, Capability::RefreshTicket, Ownership::ticket(&ticket))?;

        let generated = self.describer.detail(ticket.title()).await;
        let steps = self.troubleshooter.generate(ticket.title(), generated.as_deref()).await;
        let description = generated.unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string());

        ticket.refresh_ai_details(description, steps)?;
        self.save_and_publish(&mut ticket).await?;

        info!(ticket_id = %ticket_id, steps = ticket.troubleshoot_steps().len(), "ticket details refreshed");
        Ok(ticket)
    }

    async fn delete_ticket(&self, actor_id: &EntityId, ticket_id: &EntityId) -> Result<(), UseCaseError> {
        let actor = self.load_actor(actor_id).await?;
        let mut ticket = self.load_ticket(ticket_id).await?;
        authorize(&actor, Capability::DeleteTicket, Ownership::ticket(&ticket))?;

        ticket.mark_deleted(actor.id());
        self.ticket_repo.delete(ticket_id).await?;
        self.publish(ticket.take_events()).await;

        info!(ticket_id = %ticket_id, by = %actor_id, "ticket deleted");
        Ok(())
    }

    async fn get_ticket(&self, id: &EntityId) -> Result<Option<Ticket>, UseCaseError> {
        Ok(self.ticket_repo.find_by_id(id).await?)
    }

    async fn list_tickets(&self, query: TicketQuery) -> Result<Vec<Ticket>, UseCaseError> {
        let mut filter = match &query.viewer {
            Some(viewer_id) => visibility_filter(&self.load_actor(&EntityId::from_string(viewer_id.as_str())).await?),
            None => TicketFilter::default(),
        };
        filter.status = query.status;
        filter.category = query.category;
        filter.search = query.search.filter(|s| !s.trim().is_empty());

        let mut tickets = self.ticket_repo.query(&filter).await?;
        sort_tickets(&mut tickets, query.sort, query.direction);
        Ok(tickets)
    }

    async fn stats(&self, viewer: Option<&EntityId>) -> Result<TicketStats, UseCaseError> {
        let filter = match viewer {
            Some(viewer_id) => visibility_filter(&self.load_actor(viewer_id).await?),
            None => TicketFilter::default(),
        };
        let tickets = self.ticket_repo.query(&filter).await?;
        let pool = self.assignor.pool().await?;
        Ok(compute_stats(&tickets, &pool))
    }
}
