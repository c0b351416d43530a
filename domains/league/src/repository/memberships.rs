//! Team membership queries (transactional free functions)

use matchday_common::RepositoryError;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{MemberWithName, RepoResult};
use crate::domain::entities::{MembershipRole, TeamMembership};

const MEMBERSHIP_COLUMNS: &str = "id, user_id, team_id, role, created_at";

/// Fetch a membership, locking it for the rest of the transaction
pub async fn get_membership_by_team_and_user_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
    user_id: Uuid,
) -> RepoResult<Option<TeamMembership>> {
    let membership = sqlx::query_as::<_, TeamMembership>(&format!(
        "SELECT {} FROM team_memberships WHERE team_id = $1 AND user_id = $2 FOR UPDATE",
        MEMBERSHIP_COLUMNS
    ))
    .bind(team_id)
    .bind(user_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(membership)
}

pub async fn memberships_for_user_tx(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> RepoResult<Vec<TeamMembership>> {
    let memberships = sqlx::query_as::<_, TeamMembership>(&format!(
        "SELECT {} FROM team_memberships WHERE user_id = $1 ORDER BY created_at",
        MEMBERSHIP_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(&mut **transaction)
    .await?;
    Ok(memberships)
}

/// All memberships of a team, locked so role checks stay valid until commit
pub async fn memberships_for_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<Vec<TeamMembership>> {
    let memberships = sqlx::query_as::<_, TeamMembership>(&format!(
        "SELECT {} FROM team_memberships WHERE team_id = $1 ORDER BY created_at FOR UPDATE",
        MEMBERSHIP_COLUMNS
    ))
    .bind(team_id)
    .fetch_all(&mut **transaction)
    .await?;
    Ok(memberships)
}

/// List a team's members with the name of their player profile
pub async fn members_with_names_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<Vec<MemberWithName>> {
    let members = sqlx::query_as::<_, MemberWithName>(
        r#"
        SELECT m.id, m.team_id, m.user_id, m.role, m.created_at, p.name AS player_name
        FROM team_memberships m
        LEFT JOIN players p ON p.user_id = m.user_id
        WHERE m.team_id = $1
        ORDER BY
            CASE m.role
                WHEN 'leader' THEN 0
                WHEN 'assistant_leader' THEN 1
                WHEN 'member' THEN 2
            END ASC,
            p.name ASC NULLS LAST
        "#,
    )
    .bind(team_id)
    .fetch_all(&mut **transaction)
    .await?;
    Ok(members)
}

pub async fn create_membership_tx(
    transaction: &mut Transaction<'_, Postgres>,
    membership: &TeamMembership,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO team_memberships (id, user_id, team_id, role, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(membership.id)
    .bind(membership.user_id)
    .bind(membership.team_id)
    .bind(membership.role)
    .bind(membership.created_at)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

pub async fn update_role_tx(
    transaction: &mut Transaction<'_, Postgres>,
    membership_id: Uuid,
    role: MembershipRole,
) -> RepoResult<()> {
    let result = sqlx::query("UPDATE team_memberships SET role = $2 WHERE id = $1")
        .bind(membership_id)
        .bind(role)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn delete_membership_tx(
    transaction: &mut Transaction<'_, Postgres>,
    membership_id: Uuid,
) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM team_memberships WHERE id = $1")
        .bind(membership_id)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn delete_memberships_for_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team_id: Uuid,
) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM team_memberships WHERE team_id = $1")
        .bind(team_id)
        .execute(&mut **transaction)
        .await?;
    Ok(result.rows_affected())
}
