//! Result, goal and MOM vote queries (transactional free functions)

use matchday_common::RepositoryError;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::RepoResult;
use crate::domain::entities::{Goal, MatchResult, MomVote};
use crate::domain::standings::{ScoredFixture, ScorerGoal};
use crate::domain::state::ResultStatus;

const RESULT_COLUMNS: &str =
    "id, fixture_id, home_score, away_score, status, submitted_by, created_at, updated_at";

pub async fn get_result_tx(
    transaction: &mut Transaction<'_, Postgres>,
    result_id: Uuid,
) -> RepoResult<Option<MatchResult>> {
    let result = sqlx::query_as::<_, MatchResult>(&format!(
        "SELECT {} FROM results WHERE id = $1 FOR UPDATE",
        RESULT_COLUMNS
    ))
    .bind(result_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(result)
}

pub async fn result_for_fixture_tx(
    transaction: &mut Transaction<'_, Postgres>,
    fixture_id: Uuid,
) -> RepoResult<Option<MatchResult>> {
    let result = sqlx::query_as::<_, MatchResult>(&format!(
        "SELECT {} FROM results WHERE fixture_id = $1",
        RESULT_COLUMNS
    ))
    .bind(fixture_id)
    .fetch_optional(&mut **transaction)
    .await?;
    Ok(result)
}

pub async fn goals_for_fixture_tx(
    transaction: &mut Transaction<'_, Postgres>,
    fixture_id: Uuid,
) -> RepoResult<Vec<Goal>> {
    let goals = sqlx::query_as::<_, Goal>(
        "SELECT id, player_id, fixture_id FROM goals WHERE fixture_id = $1",
    )
    .bind(fixture_id)
    .fetch_all(&mut **transaction)
    .await?;
    Ok(goals)
}

pub async fn mom_votes_for_fixture_tx(
    transaction: &mut Transaction<'_, Postgres>,
    fixture_id: Uuid,
) -> RepoResult<Vec<MomVote>> {
    let votes = sqlx::query_as::<_, MomVote>(
        r#"
        SELECT id, fixture_id, voting_team_id, voted_for_own_player_id, voted_for_opponent_player_id
        FROM mom_votes
        WHERE fixture_id = $1
        "#,
    )
    .bind(fixture_id)
    .fetch_all(&mut **transaction)
    .await?;
    Ok(votes)
}

/// Insert a result. A second result for the same fixture violates
/// `results_fixture_id_key` and surfaces as `AlreadyExists`.
pub async fn create_result_tx(
    transaction: &mut Transaction<'_, Postgres>,
    result: &MatchResult,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO results (id, fixture_id, home_score, away_score, status, submitted_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(result.id)
    .bind(result.fixture_id)
    .bind(result.home_score)
    .bind(result.away_score)
    .bind(result.status)
    .bind(result.submitted_by)
    .bind(result.created_at)
    .bind(result.updated_at)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

pub async fn update_result_status_tx(
    transaction: &mut Transaction<'_, Postgres>,
    result_id: Uuid,
    status: ResultStatus,
) -> RepoResult<()> {
    let result = sqlx::query("UPDATE results SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(result_id)
        .bind(status)
        .execute(&mut **transaction)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

pub async fn create_goal_tx(
    transaction: &mut Transaction<'_, Postgres>,
    goal: &Goal,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO goals (id, player_id, fixture_id) VALUES ($1, $2, $3)")
        .bind(goal.id)
        .bind(goal.player_id)
        .bind(goal.fixture_id)
        .execute(&mut **transaction)
        .await?;
    Ok(())
}

pub async fn create_mom_vote_tx(
    transaction: &mut Transaction<'_, Postgres>,
    vote: &MomVote,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO mom_votes (id, fixture_id, voting_team_id, voted_for_own_player_id, voted_for_opponent_player_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(vote.id)
    .bind(vote.fixture_id)
    .bind(vote.voting_team_id)
    .bind(vote.voted_for_own_player_id)
    .bind(vote.voted_for_opponent_player_id)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

/// Every result joined with its fixture's sides
pub async fn scored_fixtures_tx(
    transaction: &mut Transaction<'_, Postgres>,
) -> RepoResult<Vec<ScoredFixture>> {
    let rows = sqlx::query_as::<_, ScoredFixture>(
        r#"
        SELECT f.home_team_id, f.away_team_id, r.home_score, r.away_score, r.status
        FROM results r
        INNER JOIN fixtures f ON f.id = r.fixture_id
        "#,
    )
    .fetch_all(&mut **transaction)
    .await?;
    Ok(rows)
}

/// Every goal joined with its scorer and result status
pub async fn scorer_goals_tx(
    transaction: &mut Transaction<'_, Postgres>,
) -> RepoResult<Vec<ScorerGoal>> {
    let rows = sqlx::query_as::<_, ScorerGoal>(
        r#"
        SELECT g.player_id, p.name AS player_name, p.team_id, r.status
        FROM goals g
        INNER JOIN players p ON p.id = g.player_id
        INNER JOIN results r ON r.fixture_id = g.fixture_id
        "#,
    )
    .fetch_all(&mut **transaction)
    .await?;
    Ok(rows)
}
