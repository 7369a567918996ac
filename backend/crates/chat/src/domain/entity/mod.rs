//! Entity Module

pub mod message;
pub mod session;
