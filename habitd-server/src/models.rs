//! Request and response models for habitd-server

use chrono::{DateTime, Utc};
use habitd_core::{DayMark, Streak};
use serde::{Deserialize, Serialize};

// ============================================================================
// Habits
// ============================================================================

/// A tracked habit, one row per habit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub title: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    /// The current week-in-progress, slot 0 = first day of the week
    pub streak: Streak,
    pub weeks_completed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub title: String,
    pub owner_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHabitRequest {
    pub owner_id: i64,
    pub title: String,
    /// Administrative overwrite of the week-in-progress (exactly 7 markers)
    pub streak: Option<Vec<DayMark>>,
    /// Administrative overwrite of the completed-weeks counter
    pub weeks_completed: Option<i64>,
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Owner scoping for list/delete/done requests
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OwnerQuery {
    pub owner_id: i64,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub path: String,
    pub size_bytes: Option<u64>,
}
