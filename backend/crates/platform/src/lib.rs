//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Token bucket rate limiting and the per-client bucket store
//! - Client identification from request headers
//! - Constant-time secret comparison

pub mod client;
pub mod crypto;
pub mod rate_limit;
