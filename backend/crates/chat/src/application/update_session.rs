//! Update Session Use Case

use kernel::id::SessionId;
use std::sync::Arc;

use crate::domain::entity::session::SessionSummary;
use crate::domain::repository::{ChatMessageRepository, ChatSessionRepository};
use crate::domain::value_object::text::SessionTitle;
use crate::error::{ChatError, ChatResult};

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Default)]
pub struct UpdateSessionInput {
    pub title: Option<String>,
    pub is_favorite: Option<bool>,
}

/// Update session use case
pub struct UpdateSessionUseCase<S, M>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
{
    session_repo: Arc<S>,
    message_repo: Arc<M>,
}

impl<S, M> UpdateSessionUseCase<S, M>
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

    pub async fn execute(
        &self,
        session_id: SessionId,
        input: UpdateSessionInput,
    ) -> ChatResult<SessionSummary> {
        let title = input
            .title
            .map(SessionTitle::new)
            .transpose()
            .map_err(ChatError::invalid)?;

        tracing::info!(session_id = %session_id, "Updating session");

        let mut session = self
            .session_repo
            .find_by_id(&session_id)
            .await?
            .ok_or(ChatError::SessionNotFound(session_id))?;

        session.apply(title, input.is_favorite);
        self.session_repo.update(&session).await?;

        let message_count = self.message_repo.count_by_session_id(&session_id).await?;

        tracing::info!(session_id = %session_id, "Updated session");

        Ok(SessionSummary {
            session,
            message_count,
        })
    }
}
