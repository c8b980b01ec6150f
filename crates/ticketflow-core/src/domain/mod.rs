//! Domain module
//!
//! Aggregates, value objects, events, the authorization policy and the
//! classification, assignment and troubleshooting services.

pub mod aggregates;
pub mod events;
pub mod policy;
pub mod services;
pub mod value_objects;

pub use aggregates::*;
pub use events::*;
pub use policy::{authorize, AccessDenied, Capability, Ownership};
pub use value_objects::*;
