//! Roster request queries (transactional free functions)

use matchday_common::RepositoryError;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::RepoResult;
use crate::domain::entities::RosterRequest;
use crate::domain::state::RosterRequestStatus;

const REQUEST_COLUMNS: &str =
    "id, user_id, team_id, request_type, status, created_at, updated_at";

const PENDING_FILTER: &str =
    "status IN ('pending_leader_approval', 'pending_player_acceptance')";

pub async fn lock_roster_request_tx(
    transaction: &mut Transaction<'_, Postgres>,
    request_id: Uuid,
) -> RepoResult<Option<RosterRequest>> {
    let request = sqlx::query_as::<_, RosterRequest>(&format!(
        "SELECT {} FROM roster_requests WHERE id = $1 FOR UPDATE",
        REQUEST_COLUMNS
    ))
    .bind(request_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(request)
}

pub async fn pending_request_for_user_tx(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> RepoResult<Option<RosterRequest>> {
    let request = sqlx::query_as::<_, RosterRequest>(&format!(
        "SELECT {} FROM roster_requests WHERE user_id = $1 AND {}",
        REQUEST_COLUMNS, PENDING_FILTER
    ))
    .bind(user_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(request)
}

pub async fn pending_requests_for_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<Vec<RosterRequest>> {
    let requests = sqlx::query_as::<_, RosterRequest>(&format!(
        "SELECT {} FROM roster_requests WHERE team_id = $1 AND {} ORDER BY created_at",
        REQUEST_COLUMNS, PENDING_FILTER
    ))
    .bind(team_id)
    .fetch_all(&mut **transaction)
    .await?;
    Ok(requests)
}

pub async fn create_roster_request_tx(
    transaction: &mut Transaction<'_, Postgres>,
    request: &RosterRequest,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO roster_requests (id, user_id, team_id, request_type, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(request.id)
    .bind(request.user_id)
    .bind(request.team_id)
    .bind(request.request_type)
    .bind(request.status)
    .bind(request.created_at)
    .bind(request.updated_at)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

pub async fn update_roster_request_status_tx(
    transaction: &mut Transaction<'_, Postgres>,
    request_id: Uuid,
    status: RosterRequestStatus,
) -> RepoResult<()> {
    let result =
        sqlx::query("UPDATE roster_requests SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(request_id)
            .bind(status)
            .execute(&mut **transaction)
            .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn delete_roster_request_tx(
    transaction: &mut Transaction<'_, Postgres>,
    request_id: Uuid,
) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM roster_requests WHERE id = $1")
        .bind(request_id)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn delete_roster_requests_for_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM roster_requests WHERE team_id = $1")
        .bind(team_id)
        .execute(&mut **transaction)
        .await?;
    Ok(result.rows_affected())
}
