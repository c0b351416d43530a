//! League configuration handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use matchday_auth::AdminUser;
use matchday_common::{Result, ValidatedJson};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::LeagueState;
use crate::domain::entities::LeagueConfiguration;
use crate::services::configuration::{self, ConfigurationUpdate};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConfigurationRequest {
    #[validate(range(min = 1))]
    pub min_players_per_team: i32,

    #[validate(range(min = 1))]
    pub match_length_minutes: i32,

    #[validate(range(min = 1))]
    pub mid_season_transfer_limit: i32,

    /// Stored for later use; not enforced by any workflow yet
    pub roster_lock_date: Option<DateTime<Utc>>,
}

/// **GET /v1/admin/configuration**
pub async fn get_configuration(
    AdminUser(_actor): AdminUser,
    State(state): State<LeagueState>,
) -> Result<Json<LeagueConfiguration>> {
    Ok(Json(
        configuration::get_configuration(state.store.as_ref()).await?,
    ))
}

/// **PUT /v1/admin/configuration**
pub async fn update_configuration(
    AdminUser(actor): AdminUser,
    State(state): State<LeagueState>,
    ValidatedJson(request): ValidatedJson<UpdateConfigurationRequest>,
) -> Result<Json<LeagueConfiguration>> {
    let update = ConfigurationUpdate {
        min_players_per_team: request.min_players_per_team,
        match_length_minutes: request.match_length_minutes,
        mid_season_transfer_limit: request.mid_season_transfer_limit,
        roster_lock_date: request.roster_lock_date,
    };
    let config = configuration::update_configuration(state.store.as_ref(), &actor, update).await?;
    Ok(Json(config))
}
