//! Infrastructure layer
//!
//! Concrete adapters for the outbound ports.

pub mod events;
pub mod generation;
pub mod persistence;

pub use events::{NoOpEventPublisher, RecordingEventPublisher, TracingEventPublisher};
pub use generation::{
    build_generator, DisabledGenerator, GeminiClient, GenerationConfig, ScriptedGenerator,
};
pub use persistence::{InMemoryTicketRepository, InMemoryUserRepository, JsonFileStore};
