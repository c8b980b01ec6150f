//! TicketFlow core
//!
//! Support ticket intake and routing, following Domain-Driven Design and a
//! hexagonal (ports and adapters) layout.
//!
//! ## Architecture
//!
//! - **Domain Layer**: User and Ticket aggregates, value objects, domain events,
//!   the authorization policy and the classification, assignment and
//!   troubleshooting services
//! - **Application Layer**: `TicketService` (the intake pipeline and ticket
//!   lifecycle) and `UserService`
//! - **Ports Layer**: use-case traits inbound; repositories, text generation and
//!   event publishing outbound
//! - **Infrastructure Layer**: in-memory and JSON-file stores, the Gemini
//!   client, event publishers
//!
//! ## Intake
//!
//! A submitted ticket is classified (keyword rules, then the text generator,
//! then `General`/`Medium`), routed to the active skilled agent with the best
//! skill match and lightest workload, given a generated description and
//! troubleshooting steps, checked for escalation and persisted. Generation
//! failures always fall back; only an empty title or a storage failure aborts.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports for convenience
pub use application::{AgentAssignor, TicketService, UserService};
pub use domain::aggregates::{Role, Ticket, TicketError, User, UserError, UNASSIGNED};
pub use domain::events::{DomainEvent, TicketEvent, UserEvent};
pub use domain::policy::{authorize, AccessDenied, Capability, Ownership};
pub use domain::value_objects::{
    AccountStatus, Category, Classification, Email, EntityId, EscalationRisk, Priority, Sentiment, SkillSet,
    TicketStatus,
};
pub use ports::inbound::{TicketUseCases, UseCaseError, UserUseCases};
pub use ports::outbound::{
    EventPublisher, GenerationError, RepositoryError, TextGenerator, TicketFilter, TicketRepository, UserRepository,
};
