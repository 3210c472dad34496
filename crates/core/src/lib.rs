//! Core business logic for lms-rs.

pub mod services;

pub use services::*;
