//! Exempt Paths
//!
//! Requests to these paths skip the key check and rate limiting entirely.

/// Path prefixes for health, monitoring and API documentation endpoints
pub const EXEMPT_PREFIXES: &[&str] = &[
    "/api/v1/health",
    "/actuator",
    "/swagger-ui",
    "/api-docs",
    "/webjars",
];

/// Whether `path` bypasses admission. The root path matches exactly; the
/// rest match by prefix.
pub fn is_exempt_path(path: &str) -> bool {
    path == "/" || EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}
