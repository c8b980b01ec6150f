//! Outbound ports (Repository and service traits)
//!
//! Hexagonal architecture: these are the interfaces that infrastructure must implement.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::aggregates::{Ticket, User};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{Category, Email, EntityId, TicketStatus};

/// User repository port
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<User>, RepositoryError>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// All users, in no particular order
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Skilled users whose account is active
    async fn find_active_agents(&self) -> Result<Vec<User>, RepositoryError>;

    /// Save user (insert or update)
    async fn save(&self, user: &User) -> Result<(), RepositoryError>;

    /// Delete user
    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError>;
}

/// Ticket repository port
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Find ticket by ID
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Ticket>, RepositoryError>;

    /// Tickets matching every set field of the filter, unordered
    async fn query(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, RepositoryError>;

    /// Unresolved tickets currently assigned to the agent
    async fn count_open_assigned(&self, agent_id: &EntityId) -> Result<usize, RepositoryError>;

    /// Unresolved ticket count per assigned agent, from a single pass over
    /// the store. Agents with no open tickets are absent.
    async fn open_workloads(&self) -> Result<HashMap<EntityId, usize>, RepositoryError>;

    /// Save ticket (insert or update)
    async fn save(&self, ticket: &Ticket) -> Result<(), RepositoryError>;

    /// Delete ticket
    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError>;
}

/// Storage-level ticket filter. Unset fields match everything.
#[derive(Clone, Debug, Default)]
pub struct TicketFilter {
    pub assigned_to: Option<EntityId>,
    pub created_by: Option<EntityId>,
    pub status: Option<TicketStatus>,
    pub category: Option<Category>,
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(agent) = &self.assigned_to {
            if !ticket.is_assigned_to(agent) {
                return false;
            }
        }
        if let Some(creator) = &self.created_by {
            if !ticket.is_created_by(creator) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != ticket.status()) {
            return false;
        }
        if self.category.is_some_and(|c| c != ticket.category()) {
            return false;
        }
        match &self.search {
            Some(needle) => ticket.matches_search(needle),
            None => true,
        }
    }
}

/// Text generation port (prompt in, text out)
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a prompt. Implementations must bound the call with a timeout.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish domain events
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// Repository error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Text generation failure. Always recoverable: callers fall back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation is disabled")]
    Disabled,
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("service returned no text")]
    EmptyResponse,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
