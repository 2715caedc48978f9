//! Habit routes - CRUD plus the daily mark-done event

use axum::{
    extract::{Path, Query, State},
    Json,
};
use habitd_core::Streak;
use serde_json::{json, Value};

use crate::db::Database;
use crate::error::{ServerError, ServerResult};
use crate::models::{CreateHabitRequest, Habit, OwnerQuery, UpdateHabitRequest};

/// GET /habits?owner_id= - List an owner's habits
pub async fn list_habits(
    State(db): State<Database>,
    Query(query): Query<OwnerQuery>,
) -> ServerResult<Json<Vec<Habit>>> {
    let habits = db.list_habits(query.owner_id)?;
    Ok(Json(habits))
}

/// POST /habits - Create a habit with a fresh all-pending week
pub async fn create_habit(
    State(db): State<Database>,
    Json(req): Json<CreateHabitRequest>,
) -> ServerResult<Json<Habit>> {
    if req.title.trim().is_empty() {
        return Err(ServerError::BadRequest("Habit title cannot be empty".into()));
    }

    let habit = db.create_habit(&req)?;
    Ok(Json(habit))
}

/// PUT /habits/:id - Update the title, optionally overwriting streak state
///
/// The streak/weeks overwrites are administrative edits: they bypass the
/// streak engine and carry no completion signal.
pub async fn update_habit(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateHabitRequest>,
) -> ServerResult<Json<Habit>> {
    if req.title.trim().is_empty() {
        return Err(ServerError::BadRequest("Habit title cannot be empty".into()));
    }

    let streak = match &req.streak {
        Some(days) => Some(Streak::from_slice(days)?),
        None => None,
    };

    if let Some(weeks) = req.weeks_completed {
        if weeks < 0 {
            return Err(ServerError::BadRequest(
                "weeks_completed cannot be negative".into(),
            ));
        }
    }

    let habit = db
        .update_habit(id, req.owner_id, &req.title, streak.as_ref(), req.weeks_completed)?
        .ok_or_else(|| habit_not_found(id))?;

    Ok(Json(habit))
}

/// DELETE /habits/:id?owner_id= - Delete a habit permanently
pub async fn delete_habit(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Query(query): Query<OwnerQuery>,
) -> ServerResult<Json<Value>> {
    if !db.delete_habit(id, query.owner_id)? {
        return Err(habit_not_found(id));
    }

    Ok(Json(json!({ "message": "Habit deleted" })))
}

/// POST /habits/:id/done?owner_id= - Run the streak engine and persist
pub async fn mark_done(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Query(query): Query<OwnerQuery>,
) -> ServerResult<Json<Habit>> {
    let habit = db
        .get_habit(id, query.owner_id)?
        .ok_or_else(|| habit_not_found(id))?;

    let (streak, week_completed) = habit.streak.advance();
    let weeks_completed = habit.weeks_completed + i64::from(week_completed);

    let updated = db
        .set_streak_state(id, query.owner_id, &streak, weeks_completed)?
        .ok_or_else(|| habit_not_found(id))?;

    if week_completed {
        tracing::info!(habit_id = id, weeks_completed, "Week completed, streak reset");
    }

    Ok(Json(updated))
}

fn habit_not_found(id: i64) -> ServerError {
    ServerError::NotFound(format!("Habit {} not found", id))
}
