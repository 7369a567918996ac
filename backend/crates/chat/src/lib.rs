//! Chat Storage Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Chat sessions owned by an external user id, with title and favorite flag
//! - Messages from `USER` or `ASSISTANT`, with optional retrieval context
//! - Paginated listing for both
//! - Session deletion removes its messages in the same transaction

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::ChatConfig;
pub use error::{ChatError, ChatResult};
pub use infra::postgres::PgChatRepository;
pub use presentation::router::{chat_router, chat_router_generic};
