//! Delete Session Use Case
//!
//! Removes a session together with its messages.

use kernel::id::SessionId;
use std::sync::Arc;

use crate::domain::repository::ChatSessionRepository;
use crate::error::{ChatError, ChatResult};

/// Delete session use case
pub struct DeleteSessionUseCase<S>
where
    S: ChatSessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> DeleteSessionUseCase<S>
where
    S: ChatSessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    pub async fn execute(&self, session_id: SessionId) -> ChatResult<()> {
        tracing::info!(session_id = %session_id, "Deleting session");

        if !self.session_repo.delete_with_messages(&session_id).await? {
            return Err(ChatError::SessionNotFound(session_id));
        }

        tracing::info!(session_id = %session_id, "Deleted session and messages");
        Ok(())
    }
}
