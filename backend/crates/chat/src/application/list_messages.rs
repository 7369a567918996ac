//! List Messages Use Case
//!
//! Paginated messages of one session, oldest first.

use kernel::id::SessionId;
use std::sync::Arc;

use crate::application::config::ChatConfig;
use crate::application::paging::page_request;
use crate::domain::entity::message::ChatMessage;
use crate::domain::repository::{ChatMessageRepository, ChatSessionRepository};
use crate::domain::value_object::page::Page;
use crate::error::{ChatError, ChatResult};

/// Raw query parameters
#[derive(Debug, Default)]
pub struct ListMessagesInput {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// List messages use case
pub struct ListMessagesUseCase<S, M>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
{
    session_repo: Arc<S>,
    message_repo: Arc<M>,
    config: Arc<ChatConfig>,
}

impl<S, M> ListMessagesUseCase<S, M>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
{
    pub fn new(session_repo: Arc<S>, message_repo: Arc<M>, config: Arc<ChatConfig>) -> Self {
        Self {
            session_repo,
            message_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        input: ListMessagesInput,
    ) -> ChatResult<Page<ChatMessage>> {
        let mut violations = Vec::new();
        let request = page_request(input.page, input.size, self.config.messages, &mut violations)
            .ok_or(ChatError::Validation(violations))?;

        tracing::debug!(
            session_id = %session_id,
            page = request.page(),
            size = request.size(),
            "Fetching paginated messages"
        );

        if !self.session_repo.exists_by_id(&session_id).await? {
            return Err(ChatError::SessionNotFound(session_id));
        }

        let total = self.message_repo.count_by_session_id(&session_id).await?;
        let content = self
            .message_repo
            .find_by_session_id(&session_id, request)
            .await?;

        Ok(Page::new(content, request, total))
    }
}
