//! Chat Message Entity

use chrono::{DateTime, Utc};
use kernel::id::{MessageId, SessionId};

use crate::domain::value_object::sender::Sender;
use crate::domain::value_object::text::{MessageContent, MessageContext};

/// One message in a session. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub session_id: SessionId,
    pub sender: Sender,
    pub content: MessageContent,
    pub context: Option<MessageContext>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(
        session_id: SessionId,
        sender: Sender,
        content: MessageContent,
        context: Option<MessageContext>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            session_id,
            sender,
            content,
            context,
            created_at: Utc::now(),
        }
    }
}
