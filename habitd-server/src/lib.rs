//! habitd-server: HTTP and persistence layers around the streak engine
//!
//! Owner-scoped habit CRUD over SQLite, plus the daily "mark done" endpoint
//! that drives `habitd_core::Streak::advance`.

pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod server;
