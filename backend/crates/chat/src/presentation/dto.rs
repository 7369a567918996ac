//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{message::ChatMessage, session::SessionSummary};
use crate::domain::value_object::{page::Page, sender::Sender};

// ============================================================================
// Sessions
// ============================================================================

/// Create session request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub user_id: Option<String>,
    pub title: Option<String>,
}

/// Update session request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub title: Option<String>,
    pub is_favorite: Option<bool>,
}

/// `GET /api/v1/sessions` query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsQuery {
    pub user_id: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Session response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: u64,
}

impl From<SessionSummary> for SessionResponse {
    fn from(summary: SessionSummary) -> Self {
        let session = summary.session;
        Self {
            id: session.id.into_uuid(),
            user_id: session.user_id.into_inner(),
            title: session.title.into_inner(),
            is_favorite: session.is_favorite,
            created_at: session.created_at,
            updated_at: session.updated_at,
            message_count: summary.message_count,
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Create message request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub sender: Option<String>,
    pub content: Option<String>,
    pub context: Option<String>,
}

/// `GET /api/v1/sessions/{id}/messages` query
#[derive(Debug, Clone, Deserialize)]
pub struct ListMessagesQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Message response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender: Sender,
    pub content: String,
    pub context: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.into_uuid(),
            session_id: message.session_id.into_uuid(),
            sender: message.sender,
            content: message.content.into_inner(),
            context: message.context.map(|c| c.into_inner()),
            created_at: message.created_at,
        }
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Paged response envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> PagedResponse<T> {
    pub fn from_page<U>(page: Page<U>) -> Self
    where
        T: From<U>,
    {
        let page = page.map(T::from);
        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            first: page.first,
            last: page.last,
        }
    }
}
