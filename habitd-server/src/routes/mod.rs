//! Route handlers for habitd-server
//!
//! Organized by resource type:
//! - habits: Owner-scoped habit CRUD and the daily mark-done event
//! - health: Health check endpoint

pub mod habits;
pub mod health;

pub use habits::*;
pub use health::*;
