//! Admission Middleware
//!
//! Runs the [`AdmissionGate`] in front of every route. Rejected requests are
//! answered here and never reach a handler.

use axum::Router;
use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;

use crate::application::gate::AdmissionGate;
use crate::domain::decision::AdmissionReason;
use crate::error::AdmissionError;

/// Remaining tokens after an admitted request
pub const X_RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-rate-limit-remaining");

/// Middleware that admits or rejects a request.
///
/// The socket address comes from `ConnectInfo`, which is only present when
/// the app is served with `into_make_service_with_connect_info`.
pub async fn require_admission(
    gate: AdmissionGate,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);

    let decision = gate.admit(req.uri().path(), req.headers(), remote_addr);

    match decision.reason {
        AdmissionReason::Exempt => Ok(next.run(req).await),
        AdmissionReason::Ok => {
            let mut response = next.run(req).await;
            response.headers_mut().insert(
                X_RATE_LIMIT_REMAINING,
                HeaderValue::from(decision.remaining_tokens),
            );
            Ok(response)
        }
        AdmissionReason::BadKey => Err(AdmissionError::Unauthorized {
            path: req.uri().path().to_string(),
        }
        .into_response()),
        AdmissionReason::RateLimited => Err(AdmissionError::RateLimited {
            path: req.uri().path().to_string(),
            remaining: decision.remaining_tokens,
            retry_after: decision.retry_after,
        }
        .into_response()),
    }
}

/// Put every route of `router` behind the gate.
///
/// Apply after all routes are added: layers only wrap routes that already
/// exist, and unmatched paths are gated through the fallback.
pub fn with_admission<S>(router: Router<S>, gate: AdmissionGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn(move |req: Request, next: Next| {
        let gate = gate.clone();
        async move { require_admission(gate, req, next).await }
    }))
}
