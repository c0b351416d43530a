//! Match result submission and approval
//!
//! A fixture gets exactly one result submission. The result, its goals, the
//! optional MOM vote and the fixture's completion are written in a single
//! transaction; corrections go through the status update, never through a
//! second submission.

use matchday_auth::Actor;
use matchday_common::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fixtures::require_fixture;
use super::policy_context;
use crate::domain::entities::{Fixture, Goal, MatchResult, MomVote};
use crate::domain::policy::PolicyContext;
use crate::domain::state::{FixtureEvent, FixtureStateMachine, ResultStatus};
use crate::repository::{LeagueStore, LeagueTx};

/// Man-of-the-match picks from the submitting team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomVoteSubmission {
    pub own_player_id: Uuid,
    pub opponent_player_id: Uuid,
}

/// A result as reported by a team or an administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSubmission {
    pub home_score: i32,
    pub away_score: i32,
    /// One entry per goal scored, by either side
    pub goalscorers: Vec<Uuid>,
    pub mom_vote: Option<MomVoteSubmission>,
}

/// Everything written by a successful submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedResult {
    pub result: MatchResult,
    pub goals: Vec<Goal>,
    pub mom_vote: Option<MomVote>,
}

/// Check every goalscorer plays for one of the two sides
async fn validate_goalscorers(
    tx: &mut dyn LeagueTx,
    fixture: &Fixture,
    goalscorers: &[Uuid],
) -> Result<()> {
    for player_id in goalscorers {
        let on_either_side = tx.get_player(*player_id)
            .await?
            .and_then(|p| p.team_id)
            .is_some_and(|team_id| fixture.involves(team_id));
        if !on_either_side {
            return Err(Error::Validation(format!(
                "Goalscorer {} does not play for either team in this fixture",
                player_id
            )));
        }
    }
    Ok(())
}

/// Resolve the voting team and check both picks
async fn build_mom_vote(
    tx: &mut dyn LeagueTx,
    policy: &PolicyContext<'_>,
    fixture: &Fixture,
    vote: MomVoteSubmission,
) -> Result<MomVote> {
    let voting_team_id = policy.managed_side(fixture).ok_or_else(|| {
        Error::Unauthorized(
            "Only leadership of a competing team can cast a man-of-the-match vote".to_string(),
        )
    })?;
    let opposing_team_id = fixture
        .opponent_of(voting_team_id)
        .ok_or_else(|| Error::Internal("Voting team is not in the fixture".to_string()))?;

    let own_ok = tx.get_player(vote.own_player_id)
        .await?
        .is_some_and(|p| p.plays_for(voting_team_id));
    if !own_ok {
        return Err(Error::Validation(
            "Own-team vote must go to a player on the voting team".to_string(),
        ));
    }

    let opponent_ok = tx.get_player(vote.opponent_player_id)
        .await?
        .is_some_and(|p| p.plays_for(opposing_team_id));
    if !opponent_ok {
        return Err(Error::Validation(
            "Opponent vote must go to a player on the opposing team".to_string(),
        ));
    }

    Ok(MomVote::new(
        fixture.id,
        voting_team_id,
        vote.own_player_id,
        vote.opponent_player_id,
    ))
}

/// Submit the result of a fixture
pub async fn submit_result(
    store: &dyn LeagueStore,
    actor: &Actor,
    fixture_id: Uuid,
    submission: ResultSubmission,
) -> Result<SubmittedResult> {
    let mut tx = store.begin().await?;
    let fixture = require_fixture(tx.as_mut(), fixture_id).await?;
    let user_id = actor.require_user()?;

    let policy = policy_context(tx.as_mut(), actor).await?;
    if !policy.can_submit_result(&fixture) {
        return Err(Error::Unauthorized(
            "Only administrators or leadership of a competing team can submit results"
                .to_string(),
        ));
    }

    if tx.result_for_fixture(fixture_id).await?.is_some() {
        return Err(Error::Conflict(
            "A result has already been submitted for this fixture".to_string(),
        ));
    }

    let result = MatchResult::new(
        fixture_id,
        submission.home_score,
        submission.away_score,
        user_id,
    )?;
    let total_goals = result.total_goals()?;
    if submission.goalscorers.len() != total_goals {
        tracing::warn!(
            fixture_id = %fixture_id,
            goals = total_goals,
            goalscorers = submission.goalscorers.len(),
            "Rejected result submission"
        );
        return Err(Error::Validation(format!(
            "Goalscorer count mismatch: score has {} goals but {} goalscorers were listed",
            total_goals,
            submission.goalscorers.len()
        )));
    }
    validate_goalscorers(tx.as_mut(), &fixture, &submission.goalscorers).await?;

    let mom_vote = match submission.mom_vote {
        Some(vote) => Some(build_mom_vote(tx.as_mut(), &policy, &fixture, vote).await?),
        None => None,
    };

    let completed = FixtureStateMachine::transition(fixture.status, FixtureEvent::Complete)?;

    tx.insert_result(&result).await?;
    tx.update_fixture_schedule(fixture_id, completed, fixture.kick_off)
        .await?;
    let goals: Vec<Goal> = submission
        .goalscorers
        .iter()
        .map(|player_id| Goal::new(fixture_id, *player_id))
        .collect();
    for goal in &goals {
        tx.insert_goal(goal).await?;
    }
    if let Some(vote) = &mom_vote {
        tx.insert_mom_vote(vote).await?;
    }
    tx.commit().await?;

    tracing::info!(
        fixture_id = %fixture_id,
        result_id = %result.id,
        home_score = result.home_score,
        away_score = result.away_score,
        mom_vote = mom_vote.is_some(),
        "Result submitted"
    );
    Ok(SubmittedResult {
        result,
        goals,
        mom_vote,
    })
}

/// Overwrite a result's status (administrators only).
///
/// Any status may be set from any other; this is the manual correction path.
pub async fn update_result_status(
    store: &dyn LeagueStore,
    actor: &Actor,
    result_id: Uuid,
    status: ResultStatus,
) -> Result<MatchResult> {
    actor.require_admin()?;

    let mut tx = store.begin().await?;
    let mut result = tx
        .get_result(result_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Result {} not found", result_id)))?;

    tx.update_result_status(result_id, status).await?;
    tx.commit().await?;

    tracing::info!(
        result_id = %result_id,
        fixture_id = %result.fixture_id,
        from = %result.status,
        to = %status,
        "Result status updated"
    );
    result.status = status;
    Ok(result)
}
