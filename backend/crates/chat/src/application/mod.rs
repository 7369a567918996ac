//! Application Layer
//!
//! Use cases orchestrating domain objects and repositories.

pub mod config;
pub mod create_message;
pub mod create_session;
pub mod delete_session;
pub mod get_session;
pub mod list_messages;
pub mod list_sessions;
pub mod paging;
pub mod update_session;

// Re-exports
pub use create_message::{CreateMessageInput, CreateMessageUseCase};
pub use create_session::{CreateSessionInput, CreateSessionUseCase};
pub use delete_session::DeleteSessionUseCase;
pub use get_session::GetSessionUseCase;
pub use list_messages::{ListMessagesInput, ListMessagesUseCase};
pub use list_sessions::{ListSessionsInput, ListSessionsUseCase};
pub use update_session::{UpdateSessionInput, UpdateSessionUseCase};
