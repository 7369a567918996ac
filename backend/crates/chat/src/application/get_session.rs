//! Get Session Use Case

use kernel::id::SessionId;
use std::sync::Arc;

use crate::domain::entity::session::SessionSummary;
use crate::domain::repository::{ChatMessageRepository, ChatSessionRepository};
use crate::error::{ChatError, ChatResult};

/// Get session use case
pub struct GetSessionUseCase<S, M>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
{
    session_repo: Arc<S>,
    message_repo: Arc<M>,
}

impl<S, M> GetSessionUseCase<S, M>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
{
    pub fn new(session_repo: Arc<S>, message_repo: Arc<M>) -> Self {
        Self {
            session_repo,
            message_repo,
        }
    }

    pub async fn execute(&self, session_id: SessionId) -> ChatResult<SessionSummary> {
        tracing::debug!(session_id = %session_id, "Fetching session");

        let session = self
            .session_repo
            .find_by_id(&session_id)
            .await?
            .ok_or(ChatError::SessionNotFound(session_id))?;

        let message_count = self.message_repo.count_by_session_id(&session_id).await?;

        Ok(SessionSummary {
            session,
            message_count,
        })
    }
}
