// SPDX-License-Identifier: MIT

//! Attendance routes.
//!
//! Admins see and manage every record; everyone else sees only their own
//! rows, scoped in the store query. Creation rejects future dates; there is
//! no duplicate guard and no check that the class occurs on that date.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Attendance, AttendanceStatus};
use crate::time_utils::{format_utc_rfc3339, parse_form_date};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/attendance", get(list_attendance).post(create_attendance))
        .route(
            "/api/attendance/{id}",
            put(update_attendance).delete(delete_attendance),
        )
}

// ─── Responses ───────────────────────────────────────────────

/// Attendance record as returned by the API.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AttendanceResponse {
    pub id: String,
    pub user_id: String,
    pub class_id: String,
    pub date: String,
    pub status: AttendanceStatus,
}

impl From<Attendance> for AttendanceResponse {
    fn from(record: Attendance) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            class_id: record.class_id,
            date: format_utc_rfc3339(record.date),
            status: record.status,
        }
    }
}

// ─── List ────────────────────────────────────────────────────

/// List attendance. Admin sees everything; other principals only rows where
/// `user_id` equals their own uid.
async fn list_attendance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<AttendanceResponse>>> {
    let records = if state.admin_policy.is_admin(&user) {
        state.db.list_attendance().await?
    } else {
        state.db.list_attendance_for_user(&user.uid).await?
    };

    Ok(Json(
        records.into_iter().map(AttendanceResponse::from).collect(),
    ))
}

// ─── Create ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAttendanceRequest {
    pub user_id: String,
    pub class_id: String,
    /// Calendar date or RFC3339
    pub date: String,
    pub status: AttendanceStatus,
}

/// Mark attendance (admin). Future dates are rejected before any store call.
async fn create_attendance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateAttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>)> {
    state.admin_policy.require_admin(&user)?;

    if payload.user_id.is_empty() || payload.class_id.is_empty() {
        return Err(AppError::BadRequest(
            "Member and class are required.".to_string(),
        ));
    }

    let date = parse_form_date(&payload.date)
        .ok_or_else(|| AppError::BadRequest("Invalid attendance date".to_string()))?;

    if date > Utc::now() {
        return Err(AppError::BadRequest(
            "Cannot mark attendance for a future date.".to_string(),
        ));
    }

    let record = Attendance {
        id: String::new(),
        user_id: payload.user_id,
        class_id: payload.class_id,
        date,
        status: payload.status,
    };

    let created = state.db.insert_attendance(&record).await?;

    tracing::info!(
        record_id = %created.id,
        user_id = %created.user_id,
        class_id = %created.class_id,
        "Attendance marked"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

// ─── Update / Delete ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateAttendanceRequest {
    pub status: AttendanceStatus,
}

/// Edit an attendance record (admin). Only the status is editable; member,
/// class, and date are fixed at creation.
async fn update_attendance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(record_id): Path<String>,
    Json(payload): Json<UpdateAttendanceRequest>,
) -> Result<Json<AttendanceResponse>> {
    state.admin_policy.require_admin(&user)?;

    let mut record = state
        .db
        .get_attendance(&record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", record_id)))?;

    record.status = payload.status;
    state.db.update_attendance(&record).await?;

    tracing::info!(record_id = %record.id, "Attendance updated");

    Ok(Json(record.into()))
}

/// Delete an attendance record (admin).
async fn delete_attendance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(record_id): Path<String>,
) -> Result<StatusCode> {
    state.admin_policy.require_admin(&user)?;

    state.db.delete_attendance(&record_id).await?;

    tracing::info!(record_id = %record_id, "Attendance record deleted");

    Ok(StatusCode::NO_CONTENT)
}
