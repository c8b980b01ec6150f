//! Aggregates module

pub mod ticket;
pub mod user;

pub use ticket::{Ticket, TicketDraft, TicketError, UNASSIGNED};
pub use user::{Role, User, UserError};
