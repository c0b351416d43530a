//! Fixture, result and standings handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use matchday_auth::{AdminUser, AuthUser};
use matchday_common::{Result, ValidatedJson};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::LeagueState;
use crate::domain::entities::{Fixture, MatchResult};
use crate::domain::standings::{StandingRow, TopScorer};
use crate::domain::state::ResultStatus;
use crate::services::results::{self, MomVoteSubmission, ResultSubmission, SubmittedResult};
use crate::services::{fixtures, standings};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFixtureRequest {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub kick_off: DateTime<Utc>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DelayFixtureRequest {
    pub kick_off: DateTime<Utc>,
}

/// Request for submitting a fixture result
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitResultRequest {
    #[validate(range(min = 0, max = 99))]
    pub home_score: i32,

    #[validate(range(min = 0, max = 99))]
    pub away_score: i32,

    /// Player ids, one entry per goal
    #[serde(default)]
    pub goalscorers: Vec<Uuid>,

    pub mom_vote: Option<MomVoteSubmission>,
}

impl From<SubmitResultRequest> for ResultSubmission {
    fn from(request: SubmitResultRequest) -> Self {
        Self {
            home_score: request.home_score,
            away_score: request.away_score,
            goalscorers: request.goalscorers,
            mom_vote: request.mom_vote,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateResultStatusRequest {
    pub status: ResultStatus,
}

#[derive(Debug, Deserialize)]
pub struct TopScorersQuery {
    pub limit: Option<usize>,
}

/// **POST /v1/admin/fixtures**
pub async fn create_fixture(
    AdminUser(actor): AdminUser,
    State(state): State<LeagueState>,
    ValidatedJson(request): ValidatedJson<CreateFixtureRequest>,
) -> Result<(StatusCode, Json<Fixture>)> {
    let fixture = fixtures::create_fixture(
        state.store.as_ref(),
        &actor,
        request.home_team_id,
        request.away_team_id,
        request.kick_off,
        request.location_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(fixture)))
}

/// **POST /v1/admin/fixtures/{id}/delay**
pub async fn delay_fixture(
    AdminUser(actor): AdminUser,
    State(state): State<LeagueState>,
    Path(fixture_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<DelayFixtureRequest>,
) -> Result<Json<Fixture>> {
    let fixture =
        fixtures::delay_fixture(state.store.as_ref(), &actor, fixture_id, request.kick_off)
            .await?;
    Ok(Json(fixture))
}

/// **POST /v1/fixtures/{id}/result**
///
/// One submission per fixture; a second one is rejected with 409.
pub async fn submit_result(
    AuthUser(actor): AuthUser,
    State(state): State<LeagueState>,
    Path(fixture_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<SubmitResultRequest>,
) -> Result<(StatusCode, Json<SubmittedResult>)> {
    let submitted =
        results::submit_result(state.store.as_ref(), &actor, fixture_id, request.into()).await?;
    Ok((StatusCode::CREATED, Json(submitted)))
}

/// **PUT /v1/admin/results/{id}/status**
pub async fn update_result_status(
    AdminUser(actor): AdminUser,
    State(state): State<LeagueState>,
    Path(result_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateResultStatusRequest>,
) -> Result<Json<MatchResult>> {
    let result =
        results::update_result_status(state.store.as_ref(), &actor, result_id, request.status)
            .await?;
    Ok(Json(result))
}

/// **GET /v1/standings**
pub async fn league_table(State(state): State<LeagueState>) -> Result<Json<Vec<StandingRow>>> {
    Ok(Json(standings::league_table(state.store.as_ref()).await?))
}

/// **GET /v1/standings/top-scorers**
pub async fn top_scorers(
    State(state): State<LeagueState>,
    Query(query): Query<TopScorersQuery>,
) -> Result<Json<Vec<TopScorer>>> {
    let limit = query.limit.unwrap_or(standings::DEFAULT_TOP_SCORERS_LIMIT);
    Ok(Json(standings::top_scorers(state.store.as_ref(), limit).await?))
}
