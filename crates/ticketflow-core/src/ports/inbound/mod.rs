//! Inbound ports (Use case traits)
//!
//! Hexagonal architecture: application service interfaces.

use async_trait::async_trait;

use crate::application::dto::*;
use crate::domain::aggregates::{Ticket, TicketError, User, UserError};
use crate::domain::policy::AccessDenied;
use crate::domain::value_objects::{Classification, EmailError, EntityId, SkillSet, TicketStatus};
use crate::ports::outbound::RepositoryError;

/// Ticket intake and lifecycle use cases
#[async_trait]
pub trait TicketUseCases: Send + Sync {
    /// Run the intake pipeline: classify, route, generate guidance, persist.
    async fn intake(&self, submission: TicketSubmission) -> Result<Ticket, UseCaseError>;

    /// Intake on behalf of a user allowed to create tickets
    async fn open_ticket(&self, actor_id: &EntityId, submission: TicketSubmission) -> Result<Ticket, UseCaseError>;

    /// Classify text without creating anything
    async fn classify(&self, title: &str, description: &str) -> Classification;

    /// Best agent for a skill set, if any agent is active
    async fn assign_agent(&self, required_skills: &SkillSet) -> Result<Option<User>, UseCaseError>;

    /// Troubleshooting steps for an issue; never empty
    async fn generate_steps(&self, title: &str, description: Option<&str>) -> Vec<String>;

    /// Advance a ticket's status
    async fn update_status(&self, actor_id: &EntityId, ticket_id: &EntityId, status: TicketStatus) -> Result<Ticket, UseCaseError>;

    /// Hand a ticket to another agent
    async fn reassign(&self, actor_id: &EntityId, ticket_id: &EntityId, agent_id: &EntityId) -> Result<Ticket, UseCaseError>;

    /// Regenerate description and troubleshooting steps
    async fn refresh_ai_details(&self, actor_id: &EntityId, ticket_id: &EntityId) -> Result<Ticket, UseCaseError>;

    /// Delete a ticket
    async fn delete_ticket(&self, actor_id: &EntityId, ticket_id: &EntityId) -> Result<(), UseCaseError>;

    /// Get ticket by ID
    async fn get_ticket(&self, id: &EntityId) -> Result<Option<Ticket>, UseCaseError>;

    /// List tickets visible to the query's viewer
    async fn list_tickets(&self, query: TicketQuery) -> Result<Vec<Ticket>, UseCaseError>;

    /// Dashboard counters over the tickets visible to `viewer`
    async fn stats(&self, viewer: Option<&EntityId>) -> Result<TicketStats, UseCaseError>;
}

/// Account management use cases
#[async_trait]
pub trait UserUseCases: Send + Sync {
    /// Register a pending sales or skilled account
    async fn signup(&self, command: SignupCommand) -> Result<User, UseCaseError>;

    /// Create the first, already active, administrator
    async fn bootstrap_admin(&self, name: &str, email: &str) -> Result<User, UseCaseError>;

    async fn approve(&self, actor_id: &EntityId, user_id: &EntityId) -> Result<User, UseCaseError>;

    async fn reject(&self, actor_id: &EntityId, user_id: &EntityId) -> Result<User, UseCaseError>;

    async fn add_skill(&self, actor_id: &EntityId, user_id: &EntityId, skill: &str) -> Result<User, UseCaseError>;

    async fn remove_skill(&self, actor_id: &EntityId, user_id: &EntityId, skill: &str) -> Result<User, UseCaseError>;

    async fn get_user(&self, id: &EntityId) -> Result<Option<User>, UseCaseError>;

    async fn list_users(&self, query: UserQuery) -> Result<Vec<User>, UseCaseError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UseCaseError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Domain error: {0}")]
    Domain(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<TicketError> for UseCaseError {
    fn from(e: TicketError) -> Self {
        match e {
            TicketError::EmptyTitle | TicketError::NoTroubleshootSteps => Self::Validation(e.to_string()),
            _ => Self::Domain(e.to_string()),
        }
    }
}

impl From<UserError> for UseCaseError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::EmptyName | UserError::EmptySkill => Self::Validation(e.to_string()),
            _ => Self::Domain(e.to_string()),
        }
    }
}

impl From<EmailError> for UseCaseError {
    fn from(e: EmailError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<AccessDenied> for UseCaseError {
    fn from(e: AccessDenied) -> Self {
        Self::Forbidden(e.to_string())
    }
}
