//! Presentation Layer

pub mod middleware;
