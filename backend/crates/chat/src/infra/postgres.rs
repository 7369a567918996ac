//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{MessageId, SessionId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    message::ChatMessage,
    session::{ChatSession, SessionSummary},
};
use crate::domain::repository::{ChatMessageRepository, ChatSessionRepository};
use crate::domain::value_object::{
    page::PageRequest,
    sender::Sender,
    text::{MessageContent, MessageContext, SessionOwner, SessionTitle},
};
use crate::error::{ChatError, ChatResult};

/// PostgreSQL-backed chat repository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Chat Session Repository Implementation
// ============================================================================

impl ChatSessionRepository for PgChatRepository {
    async fn create(&self, session: &ChatSession) -> ChatResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_sessions (
                id,
                user_id,
                title,
                is_favorite,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.id.as_uuid())
        .bind(session.user_id.as_str())
        .bind(session.title.as_str())
        .bind(session.is_favorite)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> ChatResult<Option<ChatSession>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                id,
                user_id,
                title,
                is_favorite,
                created_at,
                updated_at
            FROM chat_sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn exists_by_id(&self, id: &SessionId) -> ChatResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM chat_sessions WHERE id = $1)",
        )
        .bind(id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_user_id(
        &self,
        user_id: &SessionOwner,
        page: PageRequest,
    ) -> ChatResult<Vec<SessionSummary>> {
        let rows = sqlx::query_as::<_, SessionSummaryRow>(
            r#"
            SELECT
                s.id,
                s.user_id,
                s.title,
                s.is_favorite,
                s.created_at,
                s.updated_at,
                (SELECT COUNT(*) FROM chat_messages m WHERE m.session_id = s.id) AS message_count
            FROM chat_sessions s
            WHERE s.user_id = $1
            ORDER BY s.updated_at DESC, s.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_summary()).collect()
    }

    async fn count_by_user_id(&self, user_id: &SessionOwner) -> ChatResult<u64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_sessions WHERE user_id = $1")
                .bind(user_id.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(count_to_u64(count))
    }

    async fn update(&self, session: &ChatSession) -> ChatResult<()> {
        sqlx::query(
            r#"
            UPDATE chat_sessions SET
                title = $2,
                is_favorite = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(session.id.as_uuid())
        .bind(session.title.as_str())
        .bind(session.is_favorite)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_with_messages(&self, id: &SessionId) -> ChatResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM chat_messages WHERE session_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM chat_sessions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted > 0)
    }
}

// ============================================================================
// Chat Message Repository Implementation
// ============================================================================

impl ChatMessageRepository for PgChatRepository {
    async fn append(&self, message: &ChatMessage) -> ChatResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (
                id,
                session_id,
                sender,
                content,
                context,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.session_id.as_uuid())
        .bind(message.sender.as_str())
        .bind(message.content.as_str())
        .bind(message.context.as_ref().map(|c| c.as_str()))
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_session_id(
        &self,
        session_id: &SessionId,
        page: PageRequest,
    ) -> ChatResult<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT
                id,
                session_id,
                sender,
                content,
                context,
                created_at
            FROM chat_messages
            WHERE session_id = $1
            ORDER BY created_at ASC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_message()).collect()
    }

    async fn count_by_session_id(&self, session_id: &SessionId) -> ChatResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM chat_messages WHERE session_id = $1",
        )
        .bind(session_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count_to_u64(count))
    }
}

// ============================================================================
// Row Types
// ============================================================================

fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

fn corrupt(column: &str, detail: impl std::fmt::Display) -> ChatError {
    ChatError::Internal(format!("invalid {column} in stored row: {detail}"))
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: String,
    title: String,
    is_favorite: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> ChatResult<ChatSession> {
        Ok(ChatSession {
            id: SessionId::from_uuid(self.id),
            user_id: SessionOwner::new(self.user_id).map_err(|v| corrupt("user_id", v.message))?,
            title: SessionTitle::new(self.title).map_err(|v| corrupt("title", v.message))?,
            is_favorite: self.is_favorite,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionSummaryRow {
    #[sqlx(flatten)]
    session: SessionRow,
    message_count: i64,
}

impl SessionSummaryRow {
    fn into_summary(self) -> ChatResult<SessionSummary> {
        Ok(SessionSummary {
            session: self.session.into_session()?,
            message_count: count_to_u64(self.message_count),
        })
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    session_id: Uuid,
    sender: String,
    content: String,
    context: Option<String>,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> ChatResult<ChatMessage> {
        let sender: Sender = self.sender.parse().map_err(|e| corrupt("sender", e))?;

        Ok(ChatMessage {
            id: MessageId::from_uuid(self.id),
            session_id: SessionId::from_uuid(self.session_id),
            sender,
            content: MessageContent::new(self.content)
                .map_err(|v| corrupt("content", v.message))?,
            context: self
                .context
                .map(MessageContext::new)
                .transpose()
                .map_err(|v| corrupt("context", v.message))?,
            created_at: self.created_at,
        })
    }
}
