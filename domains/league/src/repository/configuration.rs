//! League configuration singleton

use sqlx::{Postgres, Transaction};

use super::RepoResult;
use crate::domain::entities::LeagueConfiguration;

pub async fn get_configuration_tx(
    transaction: &mut Transaction<'_, Postgres>,
) -> RepoResult<Option<LeagueConfiguration>> {
    let config = sqlx::query_as::<_, LeagueConfiguration>(
        r#"
        SELECT min_players_per_team, match_length_minutes, mid_season_transfer_limit,
               roster_lock_date, updated_at
        FROM league_configuration
        WHERE id
        "#,
    )
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(config)
}

/// Insert or replace the singleton row
pub async fn save_configuration_tx(
    transaction: &mut Transaction<'_, Postgres>,
    config: &LeagueConfiguration,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO league_configuration
            (id, min_players_per_team, match_length_minutes, mid_season_transfer_limit,
             roster_lock_date, updated_at)
        VALUES (TRUE, $1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE SET
            min_players_per_team = EXCLUDED.min_players_per_team,
            match_length_minutes = EXCLUDED.match_length_minutes,
            mid_season_transfer_limit = EXCLUDED.mid_season_transfer_limit,
            roster_lock_date = EXCLUDED.roster_lock_date,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(config.min_players_per_team)
    .bind(config.match_length_minutes)
    .bind(config.mid_season_transfer_limit)
    .bind(config.roster_lock_date)
    .bind(config.updated_at)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}
