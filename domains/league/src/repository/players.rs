//! Player queries (transactional free functions)

use matchday_common::RepositoryError;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::RepoResult;
use crate::domain::entities::Player;

const PLAYER_COLUMNS: &str = "id, name, team_id, user_id, created_at";

pub async fn get_player_tx(
    transaction: &mut Transaction<'_, Postgres>,
    player_id: Uuid,
) -> RepoResult<Option<Player>> {
    let player = sqlx::query_as::<_, Player>(&format!(
        "SELECT {} FROM players WHERE id = $1",
        PLAYER_COLUMNS
    ))
    .bind(player_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(player)
}

pub async fn lock_player_tx(
    transaction: &mut Transaction<'_, Postgres>,
    player_id: Uuid,
) -> RepoResult<Option<Player>> {
    let player = sqlx::query_as::<_, Player>(&format!(
        "SELECT {} FROM players WHERE id = $1 FOR UPDATE",
        PLAYER_COLUMNS
    ))
    .bind(player_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(player)
}

/// The profile linked to a user account, locked for update
pub async fn player_for_user_tx(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> RepoResult<Option<Player>> {
    let player = sqlx::query_as::<_, Player>(&format!(
        "SELECT {} FROM players WHERE user_id = $1 FOR UPDATE",
        PLAYER_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(player)
}

pub async fn players_for_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<Vec<Player>> {
    let players = sqlx::query_as::<_, Player>(&format!(
        "SELECT {} FROM players WHERE team_id = $1 ORDER BY name",
        PLAYER_COLUMNS
    ))
    .bind(team_id)
    .fetch_all(&mut **transaction)
    .await?;
    Ok(players)
}

pub async fn unassigned_players_tx(
    transaction: &mut Transaction<'_, Postgres>,
) -> RepoResult<Vec<Player>> {
    let players = sqlx::query_as::<_, Player>(&format!(
        "SELECT {} FROM players WHERE team_id IS NULL ORDER BY name",
        PLAYER_COLUMNS
    ))
    .fetch_all(&mut **transaction)
    .await?;
    Ok(players)
}

pub async fn count_players_for_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players WHERE team_id = $1")
        .bind(team_id)
        .fetch_one(&mut **transaction)
        .await?;
    Ok(count)
}

/// True if the player scored or received a man-of-the-match vote
pub async fn player_has_match_history_tx(
    transaction: &mut Transaction<'_, Postgres>,
    player_id: Uuid,
) -> RepoResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM goals WHERE player_id = $1)
            OR EXISTS(
                SELECT 1 FROM mom_votes
                WHERE voted_for_own_player_id = $1 OR voted_for_opponent_player_id = $1
            )
        "#,
    )
    .bind(player_id)
    .fetch_one(&mut **transaction)
    .await?;
    Ok(exists)
}

pub async fn create_player_tx(
    transaction: &mut Transaction<'_, Postgres>,
    player: &Player,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO players (id, name, team_id, user_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(player.id)
    .bind(&player.name)
    .bind(player.team_id)
    .bind(player.user_id)
    .bind(player.created_at)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

/// Attach a player to a team, or detach with `None`
pub async fn set_player_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    player_id: Uuid,
    team_id: Option<Uuid>,
) -> RepoResult<()> {
    let result = sqlx::query("UPDATE players SET team_id = $2 WHERE id = $1")
        .bind(player_id)
        .bind(team_id)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn rename_player_tx(
    transaction: &mut Transaction<'_, Postgres>,
    player_id: Uuid,
    name: &str,
) -> RepoResult<()> {
    let result = sqlx::query("UPDATE players SET name = $2 WHERE id = $1")
        .bind(player_id)
        .bind(name)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn delete_player_tx(
    transaction: &mut Transaction<'_, Postgres>,
    player_id: Uuid,
) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM players WHERE id = $1")
        .bind(player_id)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
