//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::SessionId;

use crate::domain::entity::{
    message::ChatMessage,
    session::{ChatSession, SessionSummary},
};
use crate::domain::value_object::{page::PageRequest, text::SessionOwner};
use crate::error::ChatResult;

/// Chat session repository trait
#[trait_variant::make(ChatSessionRepository: Send)]
pub trait LocalChatSessionRepository {
    /// Insert a new session
    async fn create(&self, session: &ChatSession) -> ChatResult<()>;

    /// Find session by ID
    async fn find_by_id(&self, id: &SessionId) -> ChatResult<Option<ChatSession>>;

    /// Check if a session exists
    async fn exists_by_id(&self, id: &SessionId) -> ChatResult<bool>;

    /// One page of a user's sessions, most recently updated first, each
    /// with its message count
    async fn find_by_user_id(
        &self,
        user_id: &SessionOwner,
        page: PageRequest,
    ) -> ChatResult<Vec<SessionSummary>>;

    /// Number of sessions a user owns
    async fn count_by_user_id(&self, user_id: &SessionOwner) -> ChatResult<u64>;

    /// Persist title, favorite flag and update time
    async fn update(&self, session: &ChatSession) -> ChatResult<()>;

    /// Delete a session and all of its messages atomically.
    /// Returns `false` if the session did not exist.
    async fn delete_with_messages(&self, id: &SessionId) -> ChatResult<bool>;
}

/// Chat message repository trait
#[trait_variant::make(ChatMessageRepository: Send)]
pub trait LocalChatMessageRepository {
    /// Store a message
    async fn append(&self, message: &ChatMessage) -> ChatResult<()>;

    /// One page of a session's messages, oldest first
    async fn find_by_session_id(
        &self,
        session_id: &SessionId,
        page: PageRequest,
    ) -> ChatResult<Vec<ChatMessage>>;

    /// Number of messages in a session
    async fn count_by_session_id(&self, session_id: &SessionId) -> ChatResult<u64>;
}
