//! Application Configuration
//!
//! Paging limits for the chat list endpoints.

/// Page size bounds for one list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

/// Chat application configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub sessions: PageLimits,
    pub messages: PageLimits,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            sessions: PageLimits {
                default_size: 20,
                max_size: 100,
            },
            messages: PageLimits {
                default_size: 50,
                max_size: 200,
            },
        }
    }
}
