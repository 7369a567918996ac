//! Chat Session Entity

use chrono::{DateTime, Utc};
use kernel::id::SessionId;

use crate::domain::value_object::text::{SessionOwner, SessionTitle};

/// A conversation owned by one external user
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub id: SessionId,
    pub user_id: SessionOwner,
    pub title: SessionTitle,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// New, non-favorite session
    pub fn new(user_id: SessionOwner, title: SessionTitle) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            user_id,
            title,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Absent fields keep their value; the update
    /// time moves forward either way.
    pub fn apply(&mut self, title: Option<SessionTitle>, is_favorite: Option<bool>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(is_favorite) = is_favorite {
            self.is_favorite = is_favorite;
        }
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// A session together with how many messages it holds
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub session: ChatSession,
    pub message_count: u64,
}
