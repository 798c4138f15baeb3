// SPDX-License-Identifier: MIT

//! Class schedule routes.
//!
//! Listing and search are open to any signed-in member; mutations are
//! admin-only. `enrolled_members` is edited directly by the admin and is
//! deliberately not reconciled against attendance records.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::listing::{matches_query, sort_by_key_stable, SortOrder};
use crate::middleware::auth::AuthUser;
use crate::models::GymClass;
use crate::time_utils::{format_utc_rfc3339, parse_form_datetime};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/schedule", get(list_classes).post(create_class))
        .route("/api/schedule/{id}", put(update_class).delete(delete_class))
}

// ─── Responses ───────────────────────────────────────────────

/// Schedule entry as returned by the API.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ClassResponse {
    pub id: String,
    pub class_name: String,
    pub trainer_name: String,
    pub date_time: String,
    pub duration_minutes: u32,
    pub max_members: u32,
    pub enrolled_members: u32,
    pub created_at: String,
}

impl From<GymClass> for ClassResponse {
    fn from(class: GymClass) -> Self {
        Self {
            id: class.id,
            class_name: class.class_name,
            trainer_name: class.trainer_name,
            date_time: format_utc_rfc3339(class.date_time),
            duration_minutes: class.duration_minutes,
            max_members: class.max_members,
            enrolled_members: class.enrolled_members,
            created_at: format_utc_rfc3339(class.created_at),
        }
    }
}

// ─── List ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ScheduleQuery {
    /// Case-insensitive substring match against class or trainer name
    #[serde(default)]
    q: String,
    /// Sort direction for the class name column
    #[serde(default)]
    sort: SortOrder,
}

/// List classes, filtered and sorted in memory.
async fn list_classes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScheduleQuery>,
) -> Result<Json<Vec<ClassResponse>>> {
    let mut classes: Vec<GymClass> = state
        .db
        .list_classes()
        .await?
        .into_iter()
        .filter(|c| matches_query(&params.q, &[Some(&c.class_name), Some(&c.trainer_name)]))
        .collect();

    sort_by_key_stable(&mut classes, params.sort, |c| c.class_name.clone());

    Ok(Json(classes.into_iter().map(ClassResponse::from).collect()))
}

// ─── Create ──────────────────────────────────────────────────

fn default_duration() -> u32 {
    60
}
fn default_max_members() -> u32 {
    10
}

#[derive(Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1, message = "Class name is required."))]
    pub class_name: String,
    #[validate(length(min = 1, message = "Trainer name is required."))]
    pub trainer_name: String,
    /// Datetime-local form value or RFC3339
    pub date_time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default = "default_max_members")]
    pub max_members: u32,
}

/// Add a class (admin). Enrollment starts at zero.
async fn create_class(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateClassRequest>,
) -> Result<(StatusCode, Json<ClassResponse>)> {
    state.admin_policy.require_admin(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let date_time = parse_form_datetime(&payload.date_time)
        .ok_or_else(|| AppError::BadRequest("Invalid class date/time".to_string()))?;

    let class = GymClass {
        id: String::new(),
        class_name: payload.class_name,
        trainer_name: payload.trainer_name,
        date_time,
        duration_minutes: payload.duration_minutes,
        max_members: payload.max_members,
        enrolled_members: 0,
        created_at: Utc::now(),
    };

    let created = state.db.insert_class(&class).await?;

    tracing::info!(class_id = %created.id, class_name = %created.class_name, "Class added");

    Ok((StatusCode::CREATED, Json(created.into())))
}

// ─── Update / Delete ─────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct UpdateClassRequest {
    #[validate(length(min = 1, message = "Class name is required."))]
    pub class_name: String,
    #[validate(length(min = 1, message = "Trainer name is required."))]
    pub trainer_name: String,
    pub date_time: String,
    pub duration_minutes: u32,
    pub max_members: u32,
    /// Manually maintained; may legitimately exceed max_members
    pub enrolled_members: u32,
}

/// Edit a class (admin), including the enrollment counter.
async fn update_class(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(class_id): Path<String>,
    Json(payload): Json<UpdateClassRequest>,
) -> Result<Json<ClassResponse>> {
    state.admin_policy.require_admin(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut class = state
        .db
        .get_class(&class_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Class {} not found", class_id)))?;

    class.class_name = payload.class_name;
    class.trainer_name = payload.trainer_name;
    class.date_time = parse_form_datetime(&payload.date_time)
        .ok_or_else(|| AppError::BadRequest("Invalid class date/time".to_string()))?;
    class.duration_minutes = payload.duration_minutes;
    class.max_members = payload.max_members;
    class.enrolled_members = payload.enrolled_members;

    state.db.update_class(&class).await?;

    tracing::info!(class_id = %class.id, "Class updated");

    Ok(Json(class.into()))
}

/// Delete a class (admin). Attendance rows that reference it are untouched.
async fn delete_class(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(class_id): Path<String>,
) -> Result<StatusCode> {
    state.admin_policy.require_admin(&user)?;

    state.db.delete_class(&class_id).await?;

    tracing::info!(class_id = %class_id, "Class deleted");

    Ok(StatusCode::NO_CONTENT)
}
