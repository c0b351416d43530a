//! Team lifecycle: creation, approval, leaving and disbanding

use matchday_auth::Actor;
use matchday_common::{Error, Result};
use serde::Serialize;
use uuid::Uuid;

use super::configuration::current_configuration;
use super::{policy_context, require_team};
use crate::domain::entities::{MembershipRole, Team, TeamMembership};
use crate::domain::state::{TeamEvent, TeamGuardContext, TeamStateMachine, TeamStatus};
use crate::repository::{LeagueStore, LeagueTx};

/// Fields for a new team
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

async fn ensure_name_free(tx: &mut dyn LeagueTx, name: &str) -> Result<()> {
    if tx.team_name_exists(name).await? {
        return Err(Error::Conflict(format!(
            "A team named '{}' already exists",
            name
        )));
    }
    Ok(())
}

/// Register a team led by the actor.
///
/// The team starts out pending approval. If the actor has a player profile
/// that is not on a team, it joins the new team's roster.
pub async fn create_team(store: &dyn LeagueStore, actor: &Actor, new_team: NewTeam) -> Result<Team> {
    let user_id = actor.require_user()?;
    let team = Team::new(new_team.name, new_team.primary_color, new_team.secondary_color)?;

    let mut tx = store.begin().await?;
    ensure_name_free(tx.as_mut(), &team.name).await?;

    let policy = policy_context(tx.as_mut(), actor).await?;
    if policy.holds_management_role() {
        return Err(Error::Validation(
            "You already lead or assist a team".to_string(),
        ));
    }
    if tx.pending_request_for_user(user_id).await?.is_some() {
        return Err(Error::Validation(
            "You have an outstanding join request; cancel it before creating a team".to_string(),
        ));
    }

    tx.insert_team(&team).await?;
    tx.insert_membership(&TeamMembership::new(team.id, user_id, MembershipRole::Leader))
        .await?;

    let attached_player = match tx.player_for_user(user_id).await? {
        Some(player) if player.team_id.is_none() => {
            tx.set_player_team(player.id, Some(team.id)).await?;
            Some(player.id)
        }
        _ => None,
    };

    tx.commit().await?;

    tracing::info!(
        team_id = %team.id,
        leader_id = %user_id,
        attached_player = ?attached_player,
        "Team created, awaiting approval"
    );
    Ok(team)
}

/// Create an already-approved team with no members (administrators only)
pub async fn create_team_as_admin(
    store: &dyn LeagueStore,
    actor: &Actor,
    new_team: NewTeam,
) -> Result<Team> {
    actor.require_admin()?;
    let team = Team::new_approved(new_team.name, new_team.primary_color, new_team.secondary_color)?;

    let mut tx = store.begin().await?;
    ensure_name_free(tx.as_mut(), &team.name).await?;
    tx.insert_team(&team).await?;
    tx.commit().await?;

    tracing::info!(team_id = %team.id, "Team created by administrator");
    Ok(team)
}

/// Approve a pending team once its roster and colors are complete
pub async fn approve_team(store: &dyn LeagueStore, actor: &Actor, team_id: Uuid) -> Result<Team> {
    actor.require_admin()?;

    let mut tx = store.begin().await?;
    let mut team = require_team(tx.as_mut(), team_id).await?;
    let config = current_configuration(tx.as_mut()).await?;

    let context = TeamGuardContext {
        roster_size: tx.count_players_for_team(team_id).await?,
        min_players: config.min_players_per_team,
        has_primary_color: team.has_primary_color(),
    };
    let next = TeamStateMachine::transition(team.status, TeamEvent::Approve, Some(&context))?;

    tx.update_team_status(team_id, next).await?;
    tx.commit().await?;

    tracing::info!(team_id = %team_id, roster_size = context.roster_size, "Team approved");
    team.status = next;
    Ok(team)
}

/// Reject a pending team. Rejection is final.
pub async fn reject_team(store: &dyn LeagueStore, actor: &Actor, team_id: Uuid) -> Result<Team> {
    actor.require_admin()?;

    let mut tx = store.begin().await?;
    let mut team = require_team(tx.as_mut(), team_id).await?;
    let next = TeamStateMachine::transition(team.status, TeamEvent::Reject, None)?;

    tx.update_team_status(team_id, next).await?;
    tx.commit().await?;

    tracing::info!(team_id = %team_id, "Team rejected");
    team.status = next;
    Ok(team)
}

/// What happened when a member left a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveOutcome {
    /// The actor's membership was removed
    Left,
    /// The leader left a team that was never approved, so the team is gone
    TeamDissolved,
}

/// Remove every trace of a team that never made it into the league:
/// linked players are detached, roster-only players deleted.
async fn dissolve_unapproved_team(tx: &mut dyn LeagueTx, team_id: Uuid) -> Result<()> {
    for player in tx.players_for_team(team_id).await? {
        if player.is_linked() {
            tx.set_player_team(player.id, None).await?;
        } else {
            tx.delete_player(player.id).await?;
        }
    }
    tx.delete_roster_requests_for_team(team_id).await?;
    tx.delete_memberships_for_team(team_id).await?;
    tx.delete_team(team_id).await?;
    Ok(())
}

/// Detach the user's player profile if it is on this team
async fn detach_linked_player(tx: &mut dyn LeagueTx, user_id: Uuid, team_id: Uuid) -> Result<()> {
    if let Some(player) = tx.player_for_user(user_id).await? {
        if player.plays_for(team_id) {
            tx.set_player_team(player.id, None).await?;
        }
    }
    Ok(())
}

/// Leave a team.
///
/// A leader leaving a team that is not approved dissolves it. On an approved
/// team the leader cannot leave without first handing over leadership.
/// Leaving a pending team only drops the membership; the player stays on
/// its roster.
pub async fn leave_team(store: &dyn LeagueStore, actor: &Actor, team_id: Uuid) -> Result<LeaveOutcome> {
    let user_id = actor.require_user()?;

    let mut tx = store.begin().await?;
    let team = require_team(tx.as_mut(), team_id).await?;
    let membership = tx
        .get_membership(team_id, user_id)
        .await?
        .ok_or_else(|| Error::NotFound("You are not a member of this team".to_string()))?;

    let outcome = match (team.status, membership.role) {
        (TeamStatus::Approved, MembershipRole::Leader) => {
            let other_leaders = tx
                .memberships_for_team(team_id)
                .await?
                .into_iter()
                .filter(|m| m.role.is_leader() && m.user_id != user_id)
                .count();
            if other_leaders == 0 {
                tracing::warn!(team_id = %team_id, user_id = %user_id, "Last leader tried to leave");
                return Err(Error::Validation(
                    "You are the last leader of this team; hand over leadership before leaving"
                        .to_string(),
                ));
            }
            tx.delete_membership(membership.id).await?;
            detach_linked_player(tx.as_mut(), user_id, team_id).await?;
            LeaveOutcome::Left
        }
        (_, MembershipRole::Leader) => {
            dissolve_unapproved_team(tx.as_mut(), team_id).await?;
            LeaveOutcome::TeamDissolved
        }
        (TeamStatus::PendingApproval, _) => {
            tx.delete_membership(membership.id).await?;
            LeaveOutcome::Left
        }
        _ => {
            tx.delete_membership(membership.id).await?;
            detach_linked_player(tx.as_mut(), user_id, team_id).await?;
            LeaveOutcome::Left
        }
    };

    tx.commit().await?;

    tracing::info!(team_id = %team_id, user_id = %user_id, outcome = ?outcome, "Member left team");
    Ok(outcome)
}

/// Disband an approved team (its leader only).
///
/// Memberships are removed and players are released to the unassigned pool.
pub async fn disband_team(store: &dyn LeagueStore, actor: &Actor, team_id: Uuid) -> Result<()> {
    let user_id = actor.require_user()?;

    let mut tx = store.begin().await?;
    let team = require_team(tx.as_mut(), team_id).await?;

    let is_leader = tx
        .get_membership(team_id, user_id)
        .await?
        .is_some_and(|m| m.role.is_leader());
    if !is_leader {
        return Err(Error::Unauthorized(
            "Only the team leader can disband the team".to_string(),
        ));
    }
    if team.status != TeamStatus::Approved {
        return Err(Error::Validation(
            "Only approved teams can be disbanded; leave the team instead".to_string(),
        ));
    }
    if tx.count_fixtures_for_team(team_id).await? > 0 {
        return Err(Error::Conflict(
            "Team has fixtures and cannot be disbanded".to_string(),
        ));
    }

    let players = tx.players_for_team(team_id).await?;
    for player in &players {
        tx.set_player_team(player.id, None).await?;
    }
    tx.delete_roster_requests_for_team(team_id).await?;
    let removed = tx.delete_memberships_for_team(team_id).await?;
    tx.delete_team(team_id).await?;
    tx.commit().await?;

    tracing::info!(
        team_id = %team_id,
        released_players = players.len(),
        removed_memberships = removed,
        "Team disbanded"
    );
    Ok(())
}
