//! Application layer
//!
//! Orchestrates use cases and coordinates domain objects.

pub mod assignment;
pub mod commands;
pub mod dto;
pub mod queries;

pub use assignment::AgentAssignor;
pub use commands::{TicketService, UserService};
pub use dto::*;
