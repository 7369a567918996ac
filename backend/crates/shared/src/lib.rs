//! Shared Kernel - Vocabulary shared by every crate in the workspace
//!
//! This crate holds the small set of types that have one meaning everywhere:
//! - The unified error type rendered as RFC 7807 problem details
//! - Typed UUID identifiers for chat entities
//!
//! Anything domain specific (admission rules, chat semantics) lives in the
//! domain crates, not here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
