//! Authorization policy
//!
//! A single decision function over (actor, capability, ownership). This is a
//! role check on already-identified users, not authentication.

use crate::domain::aggregates::{Role, Ticket, User};
use crate::domain::value_objects::EntityId;

/// Actions that need a role or ownership check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    ManageUsers,
    ManageOwnSkills,
    CreateTicket,
    UpdateTicketStatus,
    ReassignTicket,
    DeleteTicket,
    RefreshTicket,
    ViewAllTickets,
}

impl Capability {
    /// Reading is allowed even for inactive accounts.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ViewAllTickets)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageUsers => "manage users",
            Self::ManageOwnSkills => "manage skills",
            Self::CreateTicket => "create tickets",
            Self::UpdateTicketStatus => "update ticket status",
            Self::ReassignTicket => "reassign tickets",
            Self::DeleteTicket => "delete tickets",
            Self::RefreshTicket => "refresh ticket details",
            Self::ViewAllTickets => "view all tickets",
        }
    }
}

/// Who owns the resource being acted on
#[derive(Clone, Copy, Debug, Default)]
pub struct Ownership<'a> {
    /// Account owner, or ticket creator
    pub owner: Option<&'a EntityId>,
    /// Ticket assignee
    pub assignee: Option<&'a EntityId>,
}

impl<'a> Ownership<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn account(user_id: &'a EntityId) -> Self {
        Self { owner: Some(user_id), assignee: None }
    }

    pub fn ticket(ticket: &'a Ticket) -> Self {
        Self {
            owner: ticket.created_by(),
            assignee: ticket.assigned_to(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{actor} may not {action}: {reason}")]
pub struct AccessDenied {
    pub actor: EntityId,
    pub action: &'static str,
    pub reason: &'static str,
}

pub fn authorize(actor: &User, capability: Capability, ownership: Ownership<'_>) -> Result<(), AccessDenied> {
    let deny = |reason: &'static str| AccessDenied {
        actor: actor.id().clone(),
        action: capability.as_str(),
        reason,
    };

    if !actor.is_active() && !capability.is_read_only() {
        return Err(deny("account is not active"));
    }

    let is_owner = ownership.owner == Some(actor.id());
    let is_assignee = ownership.assignee == Some(actor.id());

    let allowed = match capability {
        Capability::ManageUsers | Capability::ReassignTicket | Capability::ViewAllTickets => actor.is_admin(),
        Capability::ManageOwnSkills => actor.is_agent() && is_owner,
        Capability::CreateTicket => actor.is_admin() || matches!(actor.role(), Role::Sales),
        Capability::UpdateTicketStatus => actor.is_admin() || (actor.is_agent() && is_assignee),
        Capability::DeleteTicket | Capability::RefreshTicket => actor.is_admin() || is_owner,
    };

    if allowed {
        Ok(())
    } else {
        Err(deny("insufficient role or not the owner"))
    }
}
