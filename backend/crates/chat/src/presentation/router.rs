//! Chat Router
//!
//! Mount under `/api/v1/sessions`.

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::application::config::ChatConfig;
use crate::domain::repository::{ChatMessageRepository, ChatSessionRepository};
use crate::infra::postgres::PgChatRepository;
use crate::presentation::handlers::{self, ChatAppState};

/// Create the chat router with PostgreSQL repository
pub fn chat_router(repo: PgChatRepository, config: ChatConfig) -> Router {
    chat_router_generic(repo, config)
}

/// Create a generic chat router for any repository implementation
pub fn chat_router_generic<R>(repo: R, config: ChatConfig) -> Router
where
    R: ChatSessionRepository + ChatMessageRepository + Clone + Send + Sync + 'static,
{
    let state = ChatAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/",
            get(handlers::list_sessions::<R>).post(handlers::create_session::<R>),
        )
        .route(
            "/{session_id}",
            get(handlers::get_session::<R>)
                .put(handlers::update_session::<R>)
                .delete(handlers::delete_session::<R>),
        )
        .route(
            "/{session_id}/messages",
            get(handlers::list_messages::<R>).post(handlers::create_message::<R>),
        )
        .with_state(state)
}
