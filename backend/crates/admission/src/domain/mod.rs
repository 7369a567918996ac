//! Domain Layer

pub mod decision;
pub mod exempt;
