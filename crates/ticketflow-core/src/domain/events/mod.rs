//! Domain Events
//!
//! Raised by aggregates, drained by the application services after a
//! successful save and handed to the `EventPublisher` port.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{Category, EntityId, Priority, TicketStatus};

/// All domain events in the ticketing context
#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Ticket(TicketEvent),
    User(UserEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TicketEvent {
    Created {
        ticket_id: EntityId,
        category: Category,
        priority: Priority,
        created_by: Option<EntityId>,
        created_at: DateTime<Utc>,
    },
    Assigned {
        ticket_id: EntityId,
        agent_id: EntityId,
    },
    StatusChanged {
        ticket_id: EntityId,
        from: TicketStatus,
        to: TicketStatus,
    },
    Reassigned {
        ticket_id: EntityId,
        from_agent: Option<EntityId>,
        to_agent: EntityId,
    },
    AiDetailsRefreshed {
        ticket_id: EntityId,
        step_count: usize,
    },
    Deleted {
        ticket_id: EntityId,
        deleted_by: EntityId,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum UserEvent {
    SignedUp {
        user_id: EntityId,
        role: &'static str,
    },
    Approved {
        user_id: EntityId,
        approved_by: EntityId,
    },
    Rejected {
        user_id: EntityId,
        rejected_by: EntityId,
    },
    SkillAdded {
        user_id: EntityId,
        skill: String,
    },
    SkillRemoved {
        user_id: EntityId,
        skill: String,
    },
}

impl DomainEvent {
    /// The aggregate this event belongs to
    pub fn aggregate_id(&self) -> &EntityId {
        match self {
            DomainEvent::Ticket(e) => match e {
                TicketEvent::Created { ticket_id, .. }
                | TicketEvent::Assigned { ticket_id, .. }
                | TicketEvent::StatusChanged { ticket_id, .. }
                | TicketEvent::Reassigned { ticket_id, .. }
                | TicketEvent::AiDetailsRefreshed { ticket_id, .. }
                | TicketEvent::Deleted { ticket_id, .. } => ticket_id,
            },
            DomainEvent::User(e) => match e {
                UserEvent::SignedUp { user_id, .. }
                | UserEvent::Approved { user_id, .. }
                | UserEvent::Rejected { user_id, .. }
                | UserEvent::SkillAdded { user_id, .. }
                | UserEvent::SkillRemoved { user_id, .. } => user_id,
            },
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::Ticket(e) => match e {
                TicketEvent::Created { .. } => "ticket.created",
                TicketEvent::Assigned { .. } => "ticket.assigned",
                TicketEvent::StatusChanged { .. } => "ticket.status_changed",
                TicketEvent::Reassigned { .. } => "ticket.reassigned",
                TicketEvent::AiDetailsRefreshed { .. } => "ticket.ai_details_refreshed",
                TicketEvent::Deleted { .. } => "ticket.deleted",
            },
            DomainEvent::User(e) => match e {
                UserEvent::SignedUp { .. } => "user.signed_up",
                UserEvent::Approved { .. } => "user.approved",
                UserEvent::Rejected { .. } => "user.rejected",
                UserEvent::SkillAdded { .. } => "user.skill_added",
                UserEvent::SkillRemoved { .. } => "user.skill_removed",
            },
        }
    }
}
