//! Command handlers
//!
//! Application services that orchestrate use cases.

pub mod tickets;
pub mod users;

pub use tickets::TicketService;
pub use users::UserService;
