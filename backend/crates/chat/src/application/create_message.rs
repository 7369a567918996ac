//! Create Message Use Case

use kernel::id::SessionId;
use std::sync::Arc;

use crate::domain::entity::message::ChatMessage;
use crate::domain::repository::{ChatMessageRepository, ChatSessionRepository};
use crate::domain::value_object::sender::Sender;
use crate::domain::value_object::text::{MessageContent, MessageContext};
use crate::error::{ChatError, ChatResult};
use kernel::error::app_error::FieldViolation;

/// Create message input
pub struct CreateMessageInput {
    pub sender: Option<String>,
    pub content: Option<String>,
    pub context: Option<String>,
}

/// Create message use case
pub struct CreateMessageUseCase<S, M>
where
    S: ChatSessionRepository,
    M: ChatMessageRepository,
{
    session_repo: Arc<S>,
    message_repo: Arc<M>,
}

impl<S, M> CreateMessageUseCase<S, M>
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
        input: CreateMessageInput,
    ) -> ChatResult<ChatMessage> {
        let mut violations = Vec::new();

        let sender = match input.sender.as_deref() {
            Some(raw) if !raw.trim().is_empty() => match raw.parse::<Sender>() {
                Ok(sender) => Some(sender),
                Err(e) => {
                    violations.push(FieldViolation::new("sender", e.to_string()));
                    None
                }
            },
            _ => {
                violations.push(FieldViolation::new("sender", "Sender is required"));
                None
            }
        };
        let content = MessageContent::new(input.content.unwrap_or_default())
            .map_err(|v| violations.push(v))
            .ok();
        let context = match input.context.map(MessageContext::new).transpose() {
            Ok(context) => context,
            Err(v) => {
                violations.push(v);
                None
            }
        };

        let (Some(sender), Some(content), true) = (sender, content, violations.is_empty()) else {
            return Err(ChatError::Validation(violations));
        };

        tracing::info!(session_id = %session_id, "Creating new message");

        if !self.session_repo.exists_by_id(&session_id).await? {
            return Err(ChatError::SessionNotFound(session_id));
        }

        let message = ChatMessage::new(session_id, sender, content, context);
        self.message_repo.append(&message).await?;

        tracing::info!(message_id = %message.id, session_id = %session_id, "Created message");

        Ok(message)
    }
}
