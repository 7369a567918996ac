//! Router Assembly

use admission::{AdmissionGate, X_RATE_LIMIT_REMAINING, with_admission};
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsOrigins;
use crate::health::health_router;

pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(admission::API_KEY_HEADER),
        ]))
        .expose_headers([X_RATE_LIMIT_REMAINING])
        .max_age(Duration::from_secs(3600))
}

/// Full application router.
///
/// Admission wraps every route, including the fallback; tracing and CORS sit
/// outside it so preflight requests never need a key.
pub fn build_app(sessions: Router, gate: AdmissionGate, cors: CorsLayer) -> Router {
    let routes = Router::new()
        .nest("/api/v1/health", health_router())
        .nest("/api/v1/sessions", sessions);

    with_admission(routes, gate)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
