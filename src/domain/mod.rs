//! # Domain Layer
//!
//! Conversation, selection, and result types plus the error taxonomy.
//! This layer is independent of HTTP clients and terminal frameworks.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
