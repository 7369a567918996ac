//! Client identification utilities
//!
//! Derives the rate-limit partition key for a request.

use http::{HeaderMap, HeaderName};
use std::fmt;
use std::net::SocketAddr;

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");

/// Identifier used when nothing about the request origin is known
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Opaque rate-limit subject, derived from the network origin of a request
/// (not from any authenticated identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentifier(String);

impl ClientIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_CLIENT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the client identifier for a request
///
/// Precedence:
/// 1. first comma-separated `X-Forwarded-For` entry, trimmed
/// 2. `X-Real-IP`, trimmed
/// 3. the remote socket IP
/// 4. [`UNKNOWN_CLIENT`]
///
/// Empty values and values that are not valid UTF-8 count as absent. Header
/// contents are trusted as-is, so this assumes a proxy in front of the
/// service that sets or strips them.
pub fn resolve_client_identifier(
    headers: &HeaderMap,
    remote_addr: Option<SocketAddr>,
) -> ClientIdentifier {
    let forwarded = header_str(headers, &X_FORWARDED_FOR)
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return ClientIdentifier::new(ip);
    }

    // Trimmed the same way as the forwarded entry, so " 1.2.3.4" and
    // "1.2.3.4" share one bucket.
    let real_ip = header_str(headers, &X_REAL_IP)
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = real_ip {
        return ClientIdentifier::new(ip);
    }

    match remote_addr {
        Some(addr) => ClientIdentifier::new(addr.ip().to_string()),
        None => ClientIdentifier::unknown(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn remote() -> Option<SocketAddr> {
        Some("192.0.2.10:54321".parse().unwrap())
    }

    #[test]
    fn test_forwarded_for_wins_over_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static(" 203.0.113.5 , 10.0.0.1, 10.0.0.2"),
        );
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.7"));

        let id = resolve_client_identifier(&headers, remote());
        assert_eq!(id.as_str(), "203.0.113.5");
    }

    #[test]
    fn test_forwarded_for_value_is_not_validated() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("proxy-a"));

        let id = resolve_client_identifier(&headers, None);
        assert_eq!(id.as_str(), "proxy-a");
    }

    #[test]
    fn test_real_ip_used_without_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static("  198.51.100.7 "));

        let id = resolve_client_identifier(&headers, remote());
        assert_eq!(id.as_str(), "198.51.100.7");
    }

    #[test]
    fn test_empty_headers_fall_through() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static(" , 10.0.0.1"));
        headers.insert(X_REAL_IP, HeaderValue::from_static("   "));

        let id = resolve_client_identifier(&headers, remote());
        assert_eq!(id.as_str(), "192.0.2.10");
    }

    #[test]
    fn test_non_utf8_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.7"));

        let id = resolve_client_identifier(&headers, None);
        assert_eq!(id.as_str(), "198.51.100.7");
    }

    #[test]
    fn test_socket_address_drops_port() {
        let id = resolve_client_identifier(&HeaderMap::new(), remote());
        assert_eq!(id.to_string(), "192.0.2.10");

        let v6: SocketAddr = "[2001:db8::1]:443".parse().unwrap();
        let id = resolve_client_identifier(&HeaderMap::new(), Some(v6));
        assert_eq!(id.as_str(), "2001:db8::1");
    }

    #[test]
    fn test_unknown_when_nothing_available() {
        let id = resolve_client_identifier(&HeaderMap::new(), None);
        assert_eq!(id, ClientIdentifier::unknown());
        assert_eq!(id.as_str(), UNKNOWN_CLIENT);
    }
}
