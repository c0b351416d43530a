//! League configuration accessor

use chrono::{DateTime, Utc};
use matchday_auth::Actor;
use matchday_common::Result;
use serde::Deserialize;

use crate::domain::entities::LeagueConfiguration;
use crate::repository::{LeagueStore, LeagueTx};

/// Replacement values for the league configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigurationUpdate {
    pub min_players_per_team: i32,
    pub match_length_minutes: i32,
    pub mid_season_transfer_limit: i32,
    pub roster_lock_date: Option<DateTime<Utc>>,
}

/// Stored configuration, or the defaults if none has been saved yet
pub(crate) async fn current_configuration(tx: &mut dyn LeagueTx) -> Result<LeagueConfiguration> {
    Ok(tx.get_configuration().await?.unwrap_or_default())
}

/// Read the configuration, persisting the defaults on first access
pub async fn get_configuration(store: &dyn LeagueStore) -> Result<LeagueConfiguration> {
    let mut tx = store.begin().await?;

    if let Some(config) = tx.get_configuration().await? {
        return Ok(config);
    }

    let config = LeagueConfiguration::default();
    tx.save_configuration(&config).await?;
    tx.commit().await?;

    tracing::info!(
        min_players_per_team = config.min_players_per_team,
        "League configuration initialized with defaults"
    );
    Ok(config)
}

/// Replace the configuration (administrators only)
pub async fn update_configuration(
    store: &dyn LeagueStore,
    actor: &Actor,
    update: ConfigurationUpdate,
) -> Result<LeagueConfiguration> {
    actor.require_admin()?;

    let config = LeagueConfiguration {
        min_players_per_team: update.min_players_per_team,
        match_length_minutes: update.match_length_minutes,
        mid_season_transfer_limit: update.mid_season_transfer_limit,
        roster_lock_date: update.roster_lock_date,
        updated_at: Utc::now(),
    };
    config.validate()?;

    let mut tx = store.begin().await?;
    tx.save_configuration(&config).await?;
    tx.commit().await?;

    tracing::info!(
        min_players_per_team = config.min_players_per_team,
        match_length_minutes = config.match_length_minutes,
        mid_season_transfer_limit = config.mid_season_transfer_limit,
        "League configuration updated"
    );
    Ok(config)
}
