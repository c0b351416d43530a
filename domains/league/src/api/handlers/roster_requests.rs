//! Join request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use matchday_auth::AuthUser;
use matchday_common::Result;
use uuid::Uuid;

use crate::api::middleware::LeagueState;
use crate::domain::entities::RosterRequest;
use crate::services::roster_requests;

/// **POST /v1/teams/{id}/join-requests**
pub async fn create_join_request(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(team_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RosterRequest>)> {
    let request =
        roster_requests::create_join_request(state.store.as_ref(), &actor, team_id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// **GET /v1/teams/{id}/join-requests**
///
/// Pending requests for a team, visible to its leadership.
pub async fn list_team_requests(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<RosterRequest>>> {
    let requests = roster_requests::pending_for_team(state.store.as_ref(), &actor, team_id).await?;
    Ok(Json(requests))
}

/// **GET /v1/me/roster-requests**
pub async fn my_requests(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
) -> Result<Json<Vec<RosterRequest>>> {
    let requests = roster_requests::my_pending_requests(state.store.as_ref(), &actor).await?;
    Ok(Json(requests))
}

/// **POST /v1/roster-requests/{id}/approve**
pub async fn approve_request(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<RosterRequest>> {
    let request =
        roster_requests::approve_join_request(state.store.as_ref(), &actor, request_id).await?;
    Ok(Json(request))
}

/// **POST /v1/roster-requests/{id}/reject**
pub async fn reject_request(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<RosterRequest>> {
    let request =
        roster_requests::reject_join_request(state.store.as_ref(), &actor, request_id).await?;
    Ok(Json(request))
}

/// **DELETE /v1/roster-requests/{id}**
pub async fn cancel_request(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(request_id): Path<Uuid>,
) -> Result<StatusCode> {
    roster_requests::cancel_my_request(state.store.as_ref(), &actor, request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
