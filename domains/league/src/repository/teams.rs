//! Team queries (transactional free functions)

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::RepoResult;
use crate::domain::entities::Team;
use crate::domain::state::TeamStatus;

const TEAM_COLUMNS: &str =
    "id, name, primary_color, secondary_color, status, created_at, updated_at";

pub async fn get_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<Option<Team>> {
    let team = sqlx::query_as::<_, Team>(&format!(
        "SELECT {} FROM teams WHERE id = $1",
        TEAM_COLUMNS
    ))
    .bind(team_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(team)
}

/// Fetch a team and hold its row lock until the transaction ends
pub async fn lock_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<Option<Team>> {
    let team = sqlx::query_as::<_, Team>(&format!(
        "SELECT {} FROM teams WHERE id = $1 FOR UPDATE",
        TEAM_COLUMNS
    ))
    .bind(team_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(team)
}

/// Case-insensitive name lookup
pub async fn team_name_exists_tx(
    transaction: &mut Transaction<'_, Postgres>,
    name: &str,
) -> RepoResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM teams WHERE lower(name) = lower($1))",
    )
    .bind(name)
    .fetch_one(&mut **transaction)
    .await?;
    Ok(exists)
}

pub async fn list_teams_tx(transaction: &mut Transaction<'_, Postgres>) -> RepoResult<Vec<Team>> {
    let teams = sqlx::query_as::<_, Team>(&format!(
        "SELECT {} FROM teams ORDER BY lower(name)",
        TEAM_COLUMNS
    ))
    .fetch_all(&mut **transaction)
    .await?;
    Ok(teams)
}

pub async fn create_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team: &Team,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO teams (id, name, primary_color, secondary_color, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(team.id)
    .bind(&team.name)
    .bind(&team.primary_color)
    .bind(&team.secondary_color)
    .bind(team.status)
    .bind(team.created_at)
    .bind(team.updated_at)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

pub async fn update_team_status_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    status: TeamStatus,
) -> RepoResult<()> {
    let result = sqlx::query("UPDATE teams SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(team_id)
        .bind(status)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(matchday_common::RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn delete_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(team_id)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(matchday_common::RepositoryError::NotFound);
    }
    Ok(())
}
