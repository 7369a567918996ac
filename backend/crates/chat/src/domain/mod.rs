//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{message::ChatMessage, session::ChatSession, session::SessionSummary};
pub use repository::{ChatMessageRepository, ChatSessionRepository};
