//! List Sessions Use Case
//!
//! Paginated sessions for one user, most recently updated first.

use std::sync::Arc;

use crate::application::config::ChatConfig;
use crate::application::paging::page_request;
use crate::domain::entity::session::SessionSummary;
use crate::domain::repository::ChatSessionRepository;
use crate::domain::value_object::page::Page;
use crate::domain::value_object::text::SessionOwner;
use crate::error::{ChatError, ChatResult};

/// Raw query parameters
#[derive(Debug, Default)]
pub struct ListSessionsInput {
    pub user_id: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// List sessions use case
pub struct ListSessionsUseCase<S>
where
    S: ChatSessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<ChatConfig>,
}

impl<S> ListSessionsUseCase<S>
where
    S: ChatSessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<ChatConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: ListSessionsInput) -> ChatResult<Page<SessionSummary>> {
        let mut violations = Vec::new();

        let user_id = match SessionOwner::new(input.user_id.unwrap_or_default()) {
            Ok(user_id) => Some(user_id),
            Err(violation) => {
                violations.push(violation);
                None
            }
        };
        let request = page_request(input.page, input.size, self.config.sessions, &mut violations);

        let (Some(user_id), Some(request), true) = (user_id, request, violations.is_empty()) else {
            return Err(ChatError::Validation(violations));
        };

        tracing::debug!(
            user_id = %user_id,
            page = request.page(),
            size = request.size(),
            "Fetching paginated sessions"
        );

        let total = self.session_repo.count_by_user_id(&user_id).await?;
        let content = self.session_repo.find_by_user_id(&user_id, request).await?;

        Ok(Page::new(content, request, total))
    }
}
