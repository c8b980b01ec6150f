//! Ticket Aggregate
//!
//! Aggregate root for a customer support ticket. Tickets are only built from
//! the output of the intake pipeline (`TicketDraft`), so classification,
//! assignment and troubleshooting steps are always present and consistent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::User;
use crate::domain::events::{DomainEvent, TicketEvent};
use crate::domain::value_objects::{
    Category, Classification, EntityId, EscalationRisk, Priority, Sentiment, TicketStatus,
};

/// Display name used while a ticket has no assignee
pub const UNASSIGNED: &str = "Unassigned";

/// Everything the intake pipeline computed for a new ticket
#[derive(Clone, Debug)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub classification: Classification,
    pub sentiment: Sentiment,
    pub escalation_risk: EscalationRisk,
    pub troubleshoot_steps: Vec<String>,
}

/// Ticket aggregate root
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ticket {
    id: EntityId,
    title: String,
    description: String,
    customer_email: Option<String>,
    customer_name: Option<String>,
    category: Category,
    priority: Priority,
    sentiment: Sentiment,
    status: TicketStatus,
    assigned_to: Option<EntityId>,
    assigned_to_name: String,
    created_by: Option<EntityId>,
    created_by_name: Option<String>,
    troubleshoot_steps: Vec<String>,
    escalation_risk: EscalationRisk,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

impl Ticket {
    /// Open a new ticket from a pipeline draft.
    ///
    /// `assignee` must be an active skilled agent; `creator` is recorded by
    /// reference and display name.
    pub fn open(draft: TicketDraft, assignee: Option<&User>, creator: Option<&User>) -> Result<Self, TicketError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(TicketError::EmptyTitle);
        }
        let steps = clean_steps(draft.troubleshoot_steps);
        if steps.is_empty() {
            return Err(TicketError::NoTroubleshootSteps);
        }
        if let Some(agent) = assignee {
            if !agent.is_assignable() {
                return Err(TicketError::AssigneeNotEligible(agent.id().clone()));
            }
        }

        let now = Utc::now();
        let id = EntityId::new();
        let mut ticket = Self {
            id: id.clone(),
            title,
            description: draft.description,
            customer_email: non_blank(draft.customer_email),
            customer_name: non_blank(draft.customer_name),
            category: draft.classification.category,
            priority: draft.classification.priority,
            sentiment: draft.sentiment,
            status: TicketStatus::Open,
            assigned_to: assignee.map(|a| a.id().clone()),
            assigned_to_name: assignee.map_or_else(|| UNASSIGNED.to_string(), |a| a.name().to_string()),
            created_by: creator.map(|c| c.id().clone()),
            created_by_name: creator.map(|c| c.name().to_string()),
            troubleshoot_steps: steps,
            escalation_risk: draft.escalation_risk,
            created_at: now,
            updated_at: now,
            events: vec![],
        };

        ticket.raise_event(DomainEvent::Ticket(TicketEvent::Created {
            ticket_id: id.clone(),
            category: ticket.category,
            priority: ticket.priority,
            created_by: ticket.created_by.clone(),
            created_at: now,
        }));
        if let Some(agent_id) = ticket.assigned_to.clone() {
            ticket.raise_event(DomainEvent::Ticket(TicketEvent::Assigned { ticket_id: id, agent_id }));
        }

        Ok(ticket)
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> &EntityId { &self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn customer_email(&self) -> Option<&str> { self.customer_email.as_deref() }
    pub fn customer_name(&self) -> Option<&str> { self.customer_name.as_deref() }
    pub fn category(&self) -> Category { self.category }
    pub fn priority(&self) -> Priority { self.priority }
    pub fn classification(&self) -> Classification { Classification::new(self.category, self.priority) }
    pub fn sentiment(&self) -> Sentiment { self.sentiment }
    pub fn status(&self) -> TicketStatus { self.status }
    pub fn assigned_to(&self) -> Option<&EntityId> { self.assigned_to.as_ref() }
    pub fn assigned_to_name(&self) -> &str { &self.assigned_to_name }
    pub fn created_by(&self) -> Option<&EntityId> { self.created_by.as_ref() }
    pub fn created_by_name(&self) -> Option<&str> { self.created_by_name.as_deref() }
    pub fn troubleshoot_steps(&self) -> &[String] { &self.troubleshoot_steps }
    pub fn escalation_risk(&self) -> EscalationRisk { self.escalation_risk }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn is_assigned_to(&self, agent_id: &EntityId) -> bool {
        self.assigned_to.as_ref() == Some(agent_id)
    }

    pub fn is_created_by(&self, user_id: &EntityId) -> bool {
        self.created_by.as_ref() == Some(user_id)
    }

    /// Counts toward the assignee's workload
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Case-insensitive match over title, description and customer fields.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(self.title.as_str()),
            Some(self.description.as_str()),
            self.customer_name.as_deref(),
            self.customer_email.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    // =========================================================================
    // Business Operations
    // =========================================================================

    /// Advance the status by exactly one step.
    pub fn transition_to(&mut self, to: TicketStatus) -> Result<(), TicketError> {
        let from = self.status;
        if !from.can_transition_to(to) {
            return Err(TicketError::InvalidTransition { from, to });
        }

        self.status = to;
        self.touch();
        self.raise_event(DomainEvent::Ticket(TicketEvent::StatusChanged {
            ticket_id: self.id.clone(),
            from,
            to,
        }));
        Ok(())
    }

    pub fn reassign(&mut self, agent: &User) -> Result<(), TicketError> {
        if !agent.is_assignable() {
            return Err(TicketError::AssigneeNotEligible(agent.id().clone()));
        }
        if self.is_assigned_to(agent.id()) {
            return Ok(());
        }

        let from_agent = self.assigned_to.replace(agent.id().clone());
        self.assigned_to_name = agent.name().to_string();
        self.touch();
        self.raise_event(DomainEvent::Ticket(TicketEvent::Reassigned {
            ticket_id: self.id.clone(),
            from_agent,
            to_agent: agent.id().clone(),
        }));
        Ok(())
    }

    /// Replace the generated description and troubleshooting steps.
    pub fn refresh_ai_details(&mut self, description: String, steps: Vec<String>) -> Result<(), TicketError> {
        let steps = clean_steps(steps);
        if steps.is_empty() {
            return Err(TicketError::NoTroubleshootSteps);
        }

        let step_count = steps.len();
        self.description = description;
        self.troubleshoot_steps = steps;
        self.touch();
        self.raise_event(DomainEvent::Ticket(TicketEvent::AiDetailsRefreshed {
            ticket_id: self.id.clone(),
            step_count,
        }));
        Ok(())
    }

    /// Record the deletion; the caller removes the ticket from storage.
    pub fn mark_deleted(&mut self, deleted_by: &EntityId) {
        self.raise_event(DomainEvent::Ticket(TicketEvent::Deleted {
            ticket_id: self.id.clone(),
            deleted_by: deleted_by.clone(),
        }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn clean_steps(steps: Vec<String>) -> Vec<String> {
    steps
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("a ticket needs at least one troubleshooting step")]
    NoTroubleshootSteps,
    #[error("cannot move ticket from {from} to {to}")]
    InvalidTransition { from: TicketStatus, to: TicketStatus },
    #[error("user {0} is not an active skilled agent")]
    AssigneeNotEligible(EntityId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Role;
    use crate::domain::value_objects::Email;

    fn draft(title: &str) -> TicketDraft {
        TicketDraft {
            title: title.to_string(),
            description: "Customer cannot pay".to_string(),
            customer_email: Some("  ".to_string()),
            customer_name: Some("Jo Customer".to_string()),
            classification: Classification::new(Category::Billing, Priority::High),
            sentiment: Sentiment::Neutral,
            escalation_risk: EscalationRisk::Low,
            troubleshoot_steps: vec!["Retry the payment".to_string(), "  ".to_string()],
        }
    }

    fn active_agent(name: &str) -> User {
        let email = Email::parse(&format!("{}@example.com", name.to_lowercase())).unwrap();
        let mut agent = User::register(name, email, Role::skilled()).unwrap();
        agent.approve(&EntityId::new()).unwrap();
        agent
    }

    #[test]
    fn test_open_unassigned() {
        let mut ticket = Ticket::open(draft("Payment failed"), None, None).unwrap();

        assert_eq!(ticket.status(), TicketStatus::Open);
        assert_eq!(ticket.assigned_to_name(), UNASSIGNED);
        assert!(ticket.customer_email().is_none());
        assert_eq!(ticket.troubleshoot_steps(), ["Retry the payment"]);

        let events = ticket.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "ticket.created");
    }

    #[test]
    fn test_open_with_assignee_raises_assigned() {
        let agent = active_agent("Ada");
        let mut ticket = Ticket::open(draft("Payment failed"), Some(&agent), None).unwrap();

        assert!(ticket.is_assigned_to(agent.id()));
        assert_eq!(ticket.assigned_to_name(), "Ada");
        assert_eq!(ticket.take_events().len(), 2);
    }

    #[test]
    fn test_open_rejects_blank_title_and_missing_steps() {
        assert_eq!(Ticket::open(draft("  "), None, None).unwrap_err(), TicketError::EmptyTitle);

        let mut no_steps = draft("Payment failed");
        no_steps.troubleshoot_steps = vec![];
        assert_eq!(Ticket::open(no_steps, None, None).unwrap_err(), TicketError::NoTroubleshootSteps);
    }

    #[test]
    fn test_pending_agent_not_assignable() {
        let email = Email::parse("new@example.com").unwrap();
        let pending = User::register("New", email, Role::skilled()).unwrap();
        let err = Ticket::open(draft("Payment failed"), Some(&pending), None).unwrap_err();
        assert!(matches!(err, TicketError::AssigneeNotEligible(_)));
    }

    #[test]
    fn test_status_moves_one_step_forward() {
        let mut ticket = Ticket::open(draft("Payment failed"), None, None).unwrap();

        let skip = ticket.transition_to(TicketStatus::Resolved);
        assert_eq!(
            skip,
            Err(TicketError::InvalidTransition { from: TicketStatus::Open, to: TicketStatus::Resolved })
        );

        ticket.transition_to(TicketStatus::InProgress).unwrap();
        assert!(ticket.transition_to(TicketStatus::InProgress).is_err());
        ticket.transition_to(TicketStatus::Resolved).unwrap();
        assert!(!ticket.is_active());
        assert!(ticket.transition_to(TicketStatus::Open).is_err());
    }

    #[test]
    fn test_reassign_records_previous_agent() {
        let first = active_agent("Ada");
        let second = active_agent("Bo");
        let mut ticket = Ticket::open(draft("Payment failed"), Some(&first), None).unwrap();
        ticket.take_events();

        ticket.reassign(&second).unwrap();
        assert_eq!(ticket.assigned_to_name(), "Bo");

        let events = ticket.take_events();
        assert_eq!(
            events,
            vec![DomainEvent::Ticket(TicketEvent::Reassigned {
                ticket_id: ticket.id().clone(),
                from_agent: Some(first.id().clone()),
                to_agent: second.id().clone(),
            })]
        );
    }

    #[test]
    fn test_search_covers_customer_fields() {
        let ticket = Ticket::open(draft("Payment failed"), None, None).unwrap();
        assert!(ticket.matches_search("PAYMENT"));
        assert!(ticket.matches_search("jo cust"));
        assert!(!ticket.matches_search("shipping"));
    }

    #[test]
    fn test_serde_skips_events() {
        let ticket = Ticket::open(draft("Payment failed"), None, None).unwrap();
        let json = serde_json::to_string(&ticket).unwrap();
        assert!(!json.contains("events"));

        let mut back: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), ticket.id());
        assert!(back.take_events().is_empty());
    }
}
