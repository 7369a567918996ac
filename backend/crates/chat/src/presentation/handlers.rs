//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use kernel::id::SessionId;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::config::ChatConfig;
use crate::application::{
    CreateMessageInput, CreateMessageUseCase, CreateSessionInput, CreateSessionUseCase,
    DeleteSessionUseCase, GetSessionUseCase, ListMessagesInput, ListMessagesUseCase,
    ListSessionsInput, ListSessionsUseCase, UpdateSessionInput, UpdateSessionUseCase,
};
use crate::domain::entity::session::SessionSummary;
use crate::domain::repository::{ChatMessageRepository, ChatSessionRepository};
use crate::error::ChatResult;
use crate::presentation::dto::{
    CreateMessageRequest, CreateSessionRequest, ListMessagesQuery, ListSessionsQuery,
    MessageResponse, PagedResponse, SessionResponse, UpdateSessionRequest,
};

/// Shared state for chat handlers
#[derive(Clone)]
pub struct ChatAppState<R>
where
    R: ChatSessionRepository + ChatMessageRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<ChatConfig>,
}

// ============================================================================
// Sessions
// ============================================================================

/// POST /api/v1/sessions
pub async fn create_session<R>(
    State(state): State<ChatAppState<R>>,
    Json(req): Json<CreateSessionRequest>,
) -> ChatResult<(StatusCode, Json<SessionResponse>)>
where
    R: ChatSessionRepository + ChatMessageRepository + Clone + Send + Sync + 'static,
{
    let use_case = CreateSessionUseCase::new(state.repo.clone());

    let input = CreateSessionInput {
        user_id: req.user_id.unwrap_or_default(),
        title: req.title,
    };

    let session = use_case.execute(input).await?;
    let summary = SessionSummary {
        session,
        message_count: 0,
    };

    Ok((StatusCode::CREATED, Json(summary.into())))
}

/// GET /api/v1/sessions/{session_id}
pub async fn get_session<R>(
    State(state): State<ChatAppState<R>>,
    Path(session_id): Path<Uuid>,
) -> ChatResult<Json<SessionResponse>>
where
    R: ChatSessionRepository + ChatMessageRepository + Clone + Send + Sync + 'static,
{
    let use_case = GetSessionUseCase::new(state.repo.clone(), state.repo.clone());
    let summary = use_case.execute(SessionId::from_uuid(session_id)).await?;

    Ok(Json(summary.into()))
}

/// GET /api/v1/sessions?userId=&page=&size=
pub async fn list_sessions<R>(
    State(state): State<ChatAppState<R>>,
    Query(query): Query<ListSessionsQuery>,
) -> ChatResult<Json<PagedResponse<SessionResponse>>>
where
    R: ChatSessionRepository + ChatMessageRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListSessionsUseCase::new(state.repo.clone(), state.config.clone());

    let input = ListSessionsInput {
        user_id: query.user_id,
        page: query.page,
        size: query.size,
    };

    let page = use_case.execute(input).await?;

    Ok(Json(PagedResponse::from_page(page)))
}

/// PUT /api/v1/sessions/{session_id}
pub async fn update_session<R>(
    State(state): State<ChatAppState<R>>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<UpdateSessionRequest>,
) -> ChatResult<Json<SessionResponse>>
where
    R: ChatSessionRepository + ChatMessageRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateSessionUseCase::new(state.repo.clone(), state.repo.clone());

    let input = UpdateSessionInput {
        title: req.title,
        is_favorite: req.is_favorite,
    };

    let summary = use_case
        .execute(SessionId::from_uuid(session_id), input)
        .await?;

    Ok(Json(summary.into()))
}

/// DELETE /api/v1/sessions/{session_id}
pub async fn delete_session<R>(
    State(state): State<ChatAppState<R>>,
    Path(session_id): Path<Uuid>,
) -> ChatResult<StatusCode>
where
    R: ChatSessionRepository + ChatMessageRepository + Clone + Send + Sync + 'static,
{
    let use_case = DeleteSessionUseCase::new(state.repo.clone());
    use_case.execute(SessionId::from_uuid(session_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Messages
// ============================================================================

/// POST /api/v1/sessions/{session_id}/messages
pub async fn create_message<R>(
    State(state): State<ChatAppState<R>>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<CreateMessageRequest>,
) -> ChatResult<(StatusCode, Json<MessageResponse>)>
where
    R: ChatSessionRepository + ChatMessageRepository + Clone + Send + Sync + 'static,
{
    let use_case = CreateMessageUseCase::new(state.repo.clone(), state.repo.clone());

    let input = CreateMessageInput {
        sender: req.sender,
        content: req.content,
        context: req.context,
    };

    let message = use_case
        .execute(SessionId::from_uuid(session_id), input)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

/// GET /api/v1/sessions/{session_id}/messages?page=&size=
pub async fn list_messages<R>(
    State(state): State<ChatAppState<R>>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<ListMessagesQuery>,
) -> ChatResult<Json<PagedResponse<MessageResponse>>>
where
    R: ChatSessionRepository + ChatMessageRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListMessagesUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let input = ListMessagesInput {
        page: query.page,
        size: query.size,
    };

    let page = use_case
        .execute(SessionId::from_uuid(session_id), input)
        .await?;

    Ok(Json(PagedResponse::from_page(page)))
}
