//! Presentation Layer
//!
//! HTTP handlers, DTOs, and router configuration.

pub mod dto;
pub mod handlers;
pub mod router;
