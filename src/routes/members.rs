// SPDX-License-Identifier: MIT

//! Member management routes.
//!
//! Everyone signed in can list and search members; create, edit, renew, and
//! delete are admin-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
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
use crate::models::{Member, MemberRole, MemberStatus, MembershipPlan};
use crate::time_utils::{format_utc_rfc3339, parse_form_date};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/members", get(list_members).post(create_member))
        .route("/api/members/{id}", put(update_member).delete(delete_member))
        .route("/api/members/{id}/renew", post(renew_member))
}

// ─── Responses ───────────────────────────────────────────────

/// Member record as returned by the API.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub membership_plan: Option<MembershipPlan>,
    pub status: MemberStatus,
    pub join_date: String,
    pub role: Option<MemberRole>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            name: member.name,
            email: member.email,
            phone: member.phone,
            membership_plan: member.membership_plan,
            status: member.status,
            join_date: format_utc_rfc3339(member.join_date),
            role: member.role,
        }
    }
}

// ─── List ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MembersQuery {
    /// Case-insensitive substring match against name or email
    #[serde(default)]
    q: String,
    /// Sort direction for the name column
    #[serde(default)]
    sort: SortOrder,
}

/// List members, filtered and sorted in memory.
async fn list_members(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MembersQuery>,
) -> Result<Json<Vec<MemberResponse>>> {
    let mut members: Vec<Member> = state
        .db
        .list_members()
        .await?
        .into_iter()
        .filter(|m| matches_query(&params.q, &[Some(&m.name), Some(&m.email)]))
        .collect();

    sort_by_key_stable(&mut members, params.sort, |m| m.name.clone());

    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

// ─── Create ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Calendar date or RFC3339; defaults to the current moment
    #[serde(default)]
    pub join_date: Option<String>,
}

/// Add a member (admin). New members start Active with the member role.
async fn create_member(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>)> {
    state.admin_policy.require_admin(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let join_date = match payload.join_date.as_deref() {
        Some(raw) => parse_form_date(raw)
            .ok_or_else(|| AppError::BadRequest("Invalid join date".to_string()))?,
        None => Utc::now(),
    };

    let member = Member {
        id: String::new(),
        name: payload.name,
        email: payload.email,
        phone: payload.phone.filter(|p| !p.is_empty()),
        membership_plan: None,
        status: MemberStatus::Active,
        join_date,
        role: Some(MemberRole::Member),
    };

    let created = state.db.insert_member(&member).await?;

    tracing::info!(member_id = %created.id, name = %created.name, "Member added");

    Ok((StatusCode::CREATED, Json(created.into())))
}

// ─── Update / Renew / Delete ─────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: MemberStatus,
}

/// Edit a member's details (admin). Plan, role, and join date survive the
/// fetch-modify-write untouched.
async fn update_member(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(member_id): Path<String>,
    Json(payload): Json<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>> {
    state.admin_policy.require_admin(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut member = state
        .db
        .get_member(&member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;

    member.name = payload.name;
    member.email = payload.email;
    member.phone = payload.phone.filter(|p| !p.is_empty());
    member.status = payload.status;

    state.db.update_member(&member).await?;

    tracing::info!(member_id = %member.id, "Member updated");

    Ok(Json(member.into()))
}

/// Renew a membership (admin): sets the status back to Active, nothing else.
async fn renew_member(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(member_id): Path<String>,
) -> Result<Json<MemberResponse>> {
    state.admin_policy.require_admin(&user)?;

    let mut member = state
        .db
        .get_member(&member_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_id)))?;

    member.status = MemberStatus::Active;
    state.db.update_member(&member).await?;

    tracing::info!(member_id = %member.id, "Membership renewed");

    Ok(Json(member.into()))
}

/// Delete a member (admin). Removes exactly this record; attendance and
/// schedule entries that reference it are left alone.
async fn delete_member(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(member_id): Path<String>,
) -> Result<StatusCode> {
    state.admin_policy.require_admin(&user)?;

    state.db.delete_member(&member_id).await?;

    tracing::info!(member_id = %member_id, "Member deleted");

    Ok(StatusCode::NO_CONTENT)
}
