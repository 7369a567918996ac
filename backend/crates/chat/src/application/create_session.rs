//! Create Session Use Case

use std::sync::Arc;

use crate::domain::entity::session::ChatSession;
use crate::domain::repository::ChatSessionRepository;
use crate::domain::value_object::text::{SessionOwner, SessionTitle};
use crate::error::{ChatError, ChatResult};

/// Create session input
pub struct CreateSessionInput {
    pub user_id: String,
    pub title: Option<String>,
}

/// Create session use case
pub struct CreateSessionUseCase<S>
where
    S: ChatSessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> CreateSessionUseCase<S>
where
    S: ChatSessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    pub async fn execute(&self, input: CreateSessionInput) -> ChatResult<ChatSession> {
        let user_id = SessionOwner::new(input.user_id);
        let title = SessionTitle::or_default(input.title);

        let (user_id, title) = match (user_id, title) {
            (Ok(user_id), Ok(title)) => (user_id, title),
            (user_id, title) => {
                let violations = [user_id.err(), title.err()].into_iter().flatten().collect();
                return Err(ChatError::Validation(violations));
            }
        };

        tracing::info!(user_id = %user_id, "Creating new chat session");

        let session = ChatSession::new(user_id, title);
        self.session_repo.create(&session).await?;

        tracing::info!(session_id = %session.id, "Created session");

        Ok(session)
    }
}
