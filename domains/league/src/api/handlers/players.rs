//! Player roster handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use matchday_auth::{AdminUser, AuthUser};
use matchday_common::{Result, ValidatedJson};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::LeagueState;
use crate::domain::entities::Player;
use crate::services::players;

/// Request for creating a player.
///
/// Without `team_id` the caller registers their own profile.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub team_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RenamePlayerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignTeamRequest {
    pub team_id: Uuid,
}

/// **POST /v1/players**
pub async fn create_player(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    ValidatedJson(request): ValidatedJson<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<Player>)> {
    let player =
        players::create_player(state.store.as_ref(), &actor, request.name, request.team_id)
            .await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// **PATCH /v1/players/{id}**
pub async fn rename_player(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(player_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RenamePlayerRequest>,
) -> Result<Json<Player>> {
    let player =
        players::rename_player(state.store.as_ref(), &actor, player_id, request.name).await?;
    Ok(Json(player))
}

/// **POST /v1/players/{id}/release**
///
/// Takes the player off their team's roster; the profile stays.
pub async fn release_player(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<Player>> {
    let player = players::remove_player_from_roster(state.store.as_ref(), &actor, player_id).await?;
    Ok(Json(player))
}

/// **DELETE /v1/admin/players/{id}**
pub async fn delete_player(
    AdminUser(actor): AdminUser,
    State(state): State<LeagueState>,
    Path(player_id): Path<Uuid>,
) -> Result<StatusCode> {
    players::delete_player_permanently(state.store.as_ref(), &actor, player_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// **PUT /v1/admin/players/{id}/team**
pub async fn assign_team(
    AdminUser(actor): AdminUser,
    State(state): State<LeagueState>,
    Path(player_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AssignTeamRequest>,
) -> Result<Json<Player>> {
    let player =
        players::assign_player_to_team(state.store.as_ref(), &actor, player_id, request.team_id)
            .await?;
    Ok(Json(player))
}

/// **GET /v1/players/unassigned**
pub async fn list_unassigned(
    AuthUser(_actor): AuthUser,
    State(state): State<LeagueState>,
) -> Result<Json<Vec<Player>>> {
    let players = players::unassigned_players(state.store.as_ref()).await?;
    Ok(Json(players))
}
