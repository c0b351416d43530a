//! Fixture queries (transactional free functions)

use chrono::{DateTime, Utc};
use matchday_common::RepositoryError;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::RepoResult;
use crate::domain::entities::Fixture;
use crate::domain::state::FixtureStatus;

/// Fetch a fixture and lock it; result submission serializes on this row
pub async fn lock_fixture_tx(
    transaction: &mut Transaction<'_, Postgres>,
    fixture_id: Uuid,
) -> RepoResult<Option<Fixture>> {
    let fixture = sqlx::query_as::<_, Fixture>(
        r#"
        SELECT id, home_team_id, away_team_id, kick_off, status, location_id, created_at
        FROM fixtures
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(fixture_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(fixture)
}

pub async fn count_fixtures_for_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM fixtures WHERE home_team_id = $1 OR away_team_id = $1",
    )
    .bind(team_id)
    .fetch_one(&mut **transaction)
    .await?;
    Ok(count)
}

pub async fn create_fixture_tx(
    transaction: &mut Transaction<'_, Postgres>,
    fixture: &Fixture,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO fixtures (id, home_team_id, away_team_id, kick_off, status, location_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(fixture.id)
    .bind(fixture.home_team_id)
    .bind(fixture.away_team_id)
    .bind(fixture.kick_off)
    .bind(fixture.status)
    .bind(fixture.location_id)
    .bind(fixture.created_at)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

pub async fn update_fixture_schedule_tx(
    transaction: &mut Transaction<'_, Postgres>,
    fixture_id: Uuid,
    status: FixtureStatus,
    kick_off: DateTime<Utc>,
) -> RepoResult<()> {
    let result = sqlx::query("UPDATE fixtures SET status = $2, kick_off = $3 WHERE id = $1")
        .bind(fixture_id)
        .bind(status)
        .bind(kick_off)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
