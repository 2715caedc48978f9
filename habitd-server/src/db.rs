//! SQLite persistence for habitd
//!
//! Uses rusqlite with idempotent schema setup on open. Every query is
//! owner-scoped: a row is only visible to, or mutable by, the `owner_id` it
//! was created with, and a missing row and an owner mismatch look the same
//! to callers.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use habitd_core::Streak;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::ServerResult;
use crate::models::{CreateHabitRequest, Habit};

/// Thread-safe database wrapper
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open(path: impl Into<PathBuf>) -> ServerResult<Self> {
        let path = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> ServerResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get the database file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Get database file size in bytes
    pub fn size_bytes(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    /// Run schema migrations
    fn run_migrations(&self) -> ServerResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(SCHEMA)?;
        conn.execute_batch(INDEXES)?;

        Ok(())
    }

    // ========================================================================
    // Habits
    // ========================================================================

    pub fn list_habits(&self, owner_id: i64) -> ServerResult<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, title, owner_id, created_at, streak, weeks_completed
            FROM habits
            WHERE owner_id = ?
            ORDER BY id
            "#,
        )?;

        let habits = stmt
            .query_map([owner_id], row_to_habit)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    pub fn get_habit(&self, id: i64, owner_id: i64) -> ServerResult<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        let habit = conn
            .query_row(
                r#"
                SELECT id, title, owner_id, created_at, streak, weeks_completed
                FROM habits
                WHERE id = ? AND owner_id = ?
                "#,
                params![id, owner_id],
                row_to_habit,
            )
            .optional()?;

        Ok(habit)
    }

    pub fn create_habit(&self, req: &CreateHabitRequest) -> ServerResult<Habit> {
        let now = Utc::now();
        let streak = Streak::new();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO habits (title, owner_id, created_at, streak, weeks_completed)
            VALUES (?, ?, ?, ?, 0)
            "#,
            params![
                req.title,
                req.owner_id,
                format_datetime(now),
                encode_streak(&streak)?
            ],
        )?;

        Ok(Habit {
            id: conn.last_insert_rowid(),
            title: req.title.clone(),
            owner_id: req.owner_id,
            created_at: now,
            streak,
            weeks_completed: 0,
        })
    }

    /// Administrative overwrite: title always, streak and weeks counter only
    /// when supplied. Bypasses the streak engine entirely.
    ///
    /// Returns `None` when the habit is missing or not owned by `owner_id`.
    pub fn update_habit(
        &self,
        id: i64,
        owner_id: i64,
        title: &str,
        streak: Option<&Streak>,
        weeks_completed: Option<i64>,
    ) -> ServerResult<Option<Habit>> {
        {
            let conn = self.conn.lock().unwrap();

            let rows_affected = match streak {
                Some(streak) => conn.execute(
                    "UPDATE habits SET title = ?, streak = ? WHERE id = ? AND owner_id = ?",
                    params![title, encode_streak(streak)?, id, owner_id],
                )?,
                None => conn.execute(
                    "UPDATE habits SET title = ? WHERE id = ? AND owner_id = ?",
                    params![title, id, owner_id],
                )?,
            };

            if rows_affected == 0 {
                return Ok(None);
            }

            if let Some(weeks) = weeks_completed {
                conn.execute(
                    "UPDATE habits SET weeks_completed = ? WHERE id = ? AND owner_id = ?",
                    params![weeks, id, owner_id],
                )?;
            }
        }

        self.get_habit(id, owner_id)
    }

    /// Persist the result of a streak-engine advance.
    ///
    /// Returns `None` when the habit is missing or not owned by `owner_id`.
    /// Two in-flight writes to the same habit race last-writer-wins; that is
    /// an accepted limitation, not a guarantee.
    pub fn set_streak_state(
        &self,
        id: i64,
        owner_id: i64,
        streak: &Streak,
        weeks_completed: i64,
    ) -> ServerResult<Option<Habit>> {
        {
            let conn = self.conn.lock().unwrap();
            let rows_affected = conn.execute(
                "UPDATE habits SET streak = ?, weeks_completed = ? WHERE id = ? AND owner_id = ?",
                params![encode_streak(streak)?, weeks_completed, id, owner_id],
            )?;

            if rows_affected == 0 {
                return Ok(None);
            }
        }

        self.get_habit(id, owner_id)
    }

    pub fn delete_habit(&self, id: i64, owner_id: i64) -> ServerResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute(
            "DELETE FROM habits WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )?;

        Ok(rows_affected > 0)
    }
}

// ============================================================================
// Schema
// ============================================================================

const SCHEMA: &str = r#"
-- Habits table
CREATE TABLE IF NOT EXISTS habits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    owner_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    streak TEXT NOT NULL,
    weeks_completed INTEGER NOT NULL DEFAULT 0
);
"#;

const INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_habits_owner ON habits(owner_id);
"#;

// ============================================================================
// Helpers
// ============================================================================

fn row_to_habit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(0)?,
        title: row.get(1)?,
        owner_id: row.get(2)?,
        created_at: parse_datetime(row.get::<_, String>(3)?),
        streak: decode_streak(&row.get::<_, String>(4)?),
        weeks_completed: row.get(5)?,
    })
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn encode_streak(streak: &Streak) -> Result<String, serde_json::Error> {
    serde_json::to_string(streak)
}

/// Decode a persisted streak column, substituting a fresh all-pending week
/// when the stored value is not a 7-element marker array. The recovery is
/// logged but never surfaced to the caller.
fn decode_streak(raw: &str) -> Streak {
    match serde_json::from_str(raw) {
        Ok(streak) => streak,
        Err(err) => {
            tracing::warn!("Malformed streak in store, defaulting to pending week: {}", err);
            Streak::new()
        }
    }
}
