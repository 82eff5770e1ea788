//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion gateway and model directory (OpenAI-compatible HTTP, or mock)
//! - Session state (in-memory)
//! - Presentation (CLI controllers and the terminal UI)

pub mod adapter;
pub mod api;
pub mod tui;

pub use adapter::*;
pub use api::*;
