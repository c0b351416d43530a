//! Join request workflow

use matchday_auth::Actor;
use matchday_common::{Error, Result};
use uuid::Uuid;

use super::{policy_context, require_team};
use crate::domain::entities::{MembershipRole, RosterRequest, TeamMembership};
use crate::domain::state::{RosterRequestEvent, RosterRequestStateMachine, TeamStatus};
use crate::repository::{LeagueStore, LeagueTx};

async fn require_request(tx: &mut dyn LeagueTx, request_id: Uuid) -> Result<RosterRequest> {
    tx.lock_roster_request(request_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Roster request {} not found", request_id)))
}

/// Fetch a request and check the actor manages the requested team
async fn require_managed_request(
    tx: &mut dyn LeagueTx,
    actor: &Actor,
    request_id: Uuid,
) -> Result<RosterRequest> {
    let request = require_request(tx, request_id).await?;
    let policy = policy_context(tx, actor).await?;
    if !policy.can_manage_team(request.team_id) {
        return Err(Error::Unauthorized(
            "Only team leadership can decide on join requests".to_string(),
        ));
    }
    Ok(request)
}

/// Ask to join a team
pub async fn create_join_request(
    store: &dyn LeagueStore,
    actor: &Actor,
    team_id: Uuid,
) -> Result<RosterRequest> {
    let user_id = actor.require_user()?;

    let mut tx = store.begin().await?;
    let team = tx
        .get_team(team_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Team {} not found", team_id)))?;
    if team.status == TeamStatus::Rejected {
        return Err(Error::Validation(
            "Rejected teams do not accept join requests".to_string(),
        ));
    }

    if tx.pending_request_for_user(user_id).await?.is_some() {
        return Err(Error::Conflict(
            "You already have a pending roster request".to_string(),
        ));
    }

    for membership in tx.memberships_for_user(user_id).await? {
        if membership.team_id == team_id {
            return Err(Error::Conflict(
                "You are already a member of this team".to_string(),
            ));
        }
        if membership.role.is_leader() {
            let led = tx.get_team(membership.team_id).await?;
            if led.is_some_and(|t| t.status == TeamStatus::PendingApproval) {
                return Err(Error::Conflict(
                    "You lead a team that is still awaiting approval".to_string(),
                ));
            }
        }
    }

    let request = RosterRequest::new_join_request(user_id, team_id);
    tx.insert_roster_request(&request).await?;
    tx.commit().await?;

    tracing::info!(request_id = %request.id, team_id = %team_id, user_id = %user_id, "Join request created");
    Ok(request)
}

/// Accept a join request: the requester's player joins the roster and the
/// requester becomes a member, all in one transaction.
pub async fn approve_join_request(
    store: &dyn LeagueStore,
    actor: &Actor,
    request_id: Uuid,
) -> Result<RosterRequest> {
    actor.require_user()?;

    let mut tx = store.begin().await?;
    let mut request = require_managed_request(tx.as_mut(), actor, request_id).await?;
    let next = RosterRequestStateMachine::transition(request.status, RosterRequestEvent::Approve)?;
    require_team(tx.as_mut(), request.team_id).await?;

    let player = tx.player_for_user(request.user_id).await?.ok_or_else(|| {
        Error::Validation("The requester has no player profile to add to the roster".to_string())
    })?;
    if player.team_id.is_some() {
        return Err(Error::Conflict(
            "The requester's player already belongs to a team".to_string(),
        ));
    }

    tx.set_player_team(player.id, Some(request.team_id)).await?;
    tx.insert_membership(&TeamMembership::new(
        request.team_id,
        request.user_id,
        MembershipRole::Member,
    ))
    .await?;
    tx.update_roster_request_status(request.id, next).await?;
    tx.commit().await?;

    tracing::info!(
        request_id = %request.id,
        team_id = %request.team_id,
        player_id = %player.id,
        "Join request approved"
    );
    request.status = next;
    Ok(request)
}

/// Turn down a join request; nothing else changes
pub async fn reject_join_request(
    store: &dyn LeagueStore,
    actor: &Actor,
    request_id: Uuid,
) -> Result<RosterRequest> {
    actor.require_user()?;

    let mut tx = store.begin().await?;
    let mut request = require_managed_request(tx.as_mut(), actor, request_id).await?;
    let next = RosterRequestStateMachine::transition(request.status, RosterRequestEvent::Reject)?;

    tx.update_roster_request_status(request.id, next).await?;
    tx.commit().await?;

    tracing::info!(request_id = %request.id, team_id = %request.team_id, "Join request rejected");
    request.status = next;
    Ok(request)
}

/// Withdraw one's own pending request. The request is deleted.
pub async fn cancel_my_request(store: &dyn LeagueStore, actor: &Actor, request_id: Uuid) -> Result<()> {
    let user_id = actor.require_user()?;

    let mut tx = store.begin().await?;
    let request = require_request(tx.as_mut(), request_id).await?;
    if request.user_id != user_id {
        return Err(Error::Unauthorized(
            "Only the requester can cancel this request".to_string(),
        ));
    }
    RosterRequestStateMachine::transition(request.status, RosterRequestEvent::Cancel)?;

    tx.delete_roster_request(request.id).await?;
    tx.commit().await?;

    tracing::info!(request_id = %request.id, user_id = %user_id, "Roster request cancelled");
    Ok(())
}

/// Pending requests for a team the actor manages
pub async fn pending_for_team(
    store: &dyn LeagueStore,
    actor: &Actor,
    team_id: Uuid,
) -> Result<Vec<RosterRequest>> {
    let mut tx = store.begin().await?;
    if tx.get_team(team_id).await?.is_none() {
        return Err(Error::NotFound(format!("Team {} not found", team_id)));
    }
    let policy = policy_context(tx.as_mut(), actor).await?;
    if !policy.can_manage_team(team_id) {
        return Err(Error::Unauthorized(
            "Only team leadership can view join requests".to_string(),
        ));
    }
    Ok(tx.pending_requests_for_team(team_id).await?)
}

/// The actor's own outstanding requests
pub async fn my_pending_requests(store: &dyn LeagueStore, actor: &Actor) -> Result<Vec<RosterRequest>> {
    let user_id = actor.require_user()?;
    let mut tx = store.begin().await?;
    Ok(tx.pending_request_for_user(user_id).await?.into_iter().collect())
}
