//! Text Value Objects
//!
//! Length-checked strings for sessions and messages. Lengths are counted in
//! characters, not bytes. Each constructor reports a [`FieldViolation`]
//! named after the JSON field it came from.

use kernel::error::app_error::FieldViolation;
use std::fmt;

pub const USER_ID_MAX_LENGTH: usize = 100;
pub const TITLE_MAX_LENGTH: usize = 255;
pub const CONTENT_MAX_LENGTH: usize = 10_000;
pub const CONTEXT_MAX_LENGTH: usize = 5_000;

pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

macro_rules! text_value {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// External user id that owns a session (1..=100 chars, not blank)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionOwner(String);
text_value!(SessionOwner);

impl SessionOwner {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldViolation> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(FieldViolation::new("userId", "User ID is required"));
        }
        if too_long(&value, USER_ID_MAX_LENGTH) {
            return Err(FieldViolation::new(
                "userId",
                "User ID must not exceed 100 characters",
            ));
        }
        Ok(Self(value))
    }
}

/// Session title (at most 255 chars)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTitle(String);
text_value!(SessionTitle);

impl Default for SessionTitle {
    fn default() -> Self {
        Self(DEFAULT_SESSION_TITLE.to_string())
    }
}

impl SessionTitle {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldViolation> {
        let value = value.into();
        if too_long(&value, TITLE_MAX_LENGTH) {
            return Err(FieldViolation::new(
                "title",
                "Title must not exceed 255 characters",
            ));
        }
        Ok(Self(value))
    }

    /// `None` yields the default title.
    pub fn or_default(value: Option<String>) -> Result<Self, FieldViolation> {
        value.map_or_else(|| Ok(Self::default()), Self::new)
    }
}

/// Message body (1..=10000 chars, not blank)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);
text_value!(MessageContent);

impl MessageContent {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldViolation> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(FieldViolation::new("content", "Content is required"));
        }
        if too_long(&value, CONTENT_MAX_LENGTH) {
            return Err(FieldViolation::new(
                "content",
                "Content must not exceed 10000 characters",
            ));
        }
        Ok(Self(value))
    }
}

/// Retrieval context attached to a message (at most 5000 chars)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContext(String);
text_value!(MessageContext);

impl MessageContext {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldViolation> {
        let value = value.into();
        if too_long(&value, CONTEXT_MAX_LENGTH) {
            return Err(FieldViolation::new(
                "context",
                "Context must not exceed 5000 characters",
            ));
        }
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_owner_bounds() {
        assert!(SessionOwner::new("user-1").is_ok());
        assert!(SessionOwner::new("a".repeat(100)).is_ok());

        let err = SessionOwner::new("a".repeat(101)).unwrap_err();
        assert_eq!(err.field, "userId");

        let err = SessionOwner::new("   ").unwrap_err();
        assert_eq!(err.message, "User ID is required");
    }

    #[test]
    fn test_title_default_and_limit() {
        assert_eq!(SessionTitle::or_default(None).unwrap().as_str(), "New Chat");
        assert_eq!(
            SessionTitle::or_default(Some("Trip planning".into()))
                .unwrap()
                .as_str(),
            "Trip planning"
        );
        assert!(SessionTitle::new("").is_ok());
        assert!(SessionTitle::new("t".repeat(255)).is_ok());
        assert_eq!(SessionTitle::new("t".repeat(256)).unwrap_err().field, "title");
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // 255 three-byte characters
        assert!(SessionTitle::new("あ".repeat(255)).is_ok());
        assert!(MessageContext::new("é".repeat(5000)).is_ok());
    }

    #[test]
    fn test_message_content_rules() {
        assert!(MessageContent::new("hello").is_ok());
        assert!(MessageContent::new("x".repeat(10_000)).is_ok());
        assert_eq!(
            MessageContent::new("\n\t ").unwrap_err().message,
            "Content is required"
        );
        assert_eq!(
            MessageContent::new("x".repeat(10_001)).unwrap_err().field,
            "content"
        );
    }

    #[test]
    fn test_message_context_limit() {
        assert!(MessageContext::new("").is_ok());
        assert_eq!(
            MessageContext::new("c".repeat(5001)).unwrap_err().field,
            "context"
        );
    }
}
