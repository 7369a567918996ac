//! Value Object Module

pub mod page;
pub mod sender;
pub mod text;
