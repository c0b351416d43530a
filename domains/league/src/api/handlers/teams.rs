//! Team lifecycle and membership handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use matchday_auth::{AdminUser, AuthUser};
use matchday_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::LeagueState;
use crate::domain::entities::{MembershipRole, Team, TeamMembership};
use crate::repository::MemberWithName;
use crate::services::membership;
use crate::services::team_lifecycle::{self, LeaveOutcome, NewTeam};

/// Request for creating a new team
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 30))]
    pub primary_color: Option<String>,

    #[validate(length(min = 1, max = 30))]
    pub secondary_color: Option<String>,
}

impl From<CreateTeamRequest> for NewTeam {
    fn from(request: CreateTeamRequest) -> Self {
        Self {
            name: request.name,
            primary_color: request.primary_color,
            secondary_color: request.secondary_color,
        }
    }
}

/// Request for changing a member's role
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMemberRoleRequest {
    pub role: MembershipRole,
}

#[derive(Debug, Serialize)]
pub struct LeaveTeamResponse {
    pub outcome: LeaveOutcome,
}

/// **POST /v1/teams**
///
/// Creates a team in PendingApproval with the caller as its leader.
pub async fn create_team(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    ValidatedJson(request): ValidatedJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>)> {
    let team = team_lifecycle::create_team(state.store.as_ref(), &actor, request.into()).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// **POST /v1/admin/teams**
///
/// Creates an already approved team with no members.
pub async fn create_team_as_admin(
    AdminUser(actor): AdminUser,
    State(state): State<LeagueState>,
    ValidatedJson(request): ValidatedJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>)> {
    let team =
        team_lifecycle::create_team_as_admin(state.store.as_ref(), &actor, request.into()).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// **POST /v1/admin/teams/{id}/approve**
pub async fn approve_team(
    AdminUser(actor): AdminUser,
    State(state): State<LeagueState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Team>> {
    let team = team_lifecycle::approve_team(state.store.as_ref(), &actor, team_id).await?;
    Ok(Json(team))
}

/// **POST /v1/admin/teams/{id}/reject**
pub async fn reject_team(
    AdminUser(actor): AdminUser,
    State(state): State<LeagueState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Team>> {
    let team = team_lifecycle::reject_team(state.store.as_ref(), &actor, team_id).await?;
    Ok(Json(team))
}

/// **POST /v1/teams/{id}/leave**
pub async fn leave_team(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<LeaveTeamResponse>> {
    let outcome = team_lifecycle::leave_team(state.store.as_ref(), &actor, team_id).await?;
    Ok(Json(LeaveTeamResponse { outcome }))
}

/// **POST /v1/teams/{id}/disband**
pub async fn disband_team(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(team_id): Path<Uuid>,
) -> Result<StatusCode> {
    team_lifecycle::disband_team(state.store.as_ref(), &actor, team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// **GET /v1/teams/{id}/members**
pub async fn list_members(
    AuthUser(_actor): AuthUser,
    State(state): State<LeagueState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<MemberWithName>>> {
    let members = membership::get_members(state.store.as_ref(), team_id).await?;
    Ok(Json(members))
}

/// **PATCH /v1/teams/{id}/members/{user_id}**
///
/// Promoting the assistant leader to leader hands leadership over.
pub async fn update_member_role(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateMemberRoleRequest>,
) -> Result<Json<Vec<TeamMembership>>> {
    let memberships =
        membership::update_role(state.store.as_ref(), &actor, team_id, user_id, request.role)
            .await?;
    Ok(Json(memberships))
}
