//! Player roster management

use matchday_auth::Actor;
use matchday_common::{Error, Result};
use uuid::Uuid;

use super::{policy_context, require_team};
use crate::domain::entities::{MembershipRole, Player};
use crate::domain::validation::validate_player_name;
use crate::repository::{LeagueStore, LeagueTx};

async fn require_player(tx: &mut dyn LeagueTx, player_id: Uuid) -> Result<Player> {
    tx.lock_player(player_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Player {} not found", player_id)))
}

/// Create a player.
///
/// A manager of `team_id` adds a roster-only player there. Otherwise a user
/// without a player profile registers themselves: the new player is linked
/// to them and starts unassigned.
pub async fn create_player(
    store: &dyn LeagueStore,
    actor: &Actor,
    name: String,
    team_id: Option<Uuid>,
) -> Result<Player> {
    let user_id = actor.require_user()?;

    let mut tx = store.begin().await?;
    if let Some(team_id) = team_id {
        require_team(tx.as_mut(), team_id).await?;
    }
    let policy = policy_context(tx.as_mut(), actor).await?;
    let manages_team = team_id.is_some_and(|id| policy.can_edit_roster(id));
    let has_profile = tx.player_for_user(user_id).await?.is_some();

    let player = match team_id {
        Some(team_id) if manages_team => Player::new_unlinked(name, Some(team_id))?,
        _ if !has_profile && !actor.is_admin() => Player::new_for_user(name, user_id, None)?,
        None => {
            return Err(Error::Validation(
                "A team is required when adding a player to a roster".to_string(),
            ))
        }
        Some(_) => {
            return Err(Error::Unauthorized(
                "You can only add players to a team you manage".to_string(),
            ))
        }
    };

    tx.insert_player(&player).await?;
    tx.commit().await?;

    tracing::info!(
        player_id = %player.id,
        team_id = ?player.team_id,
        linked = player.is_linked(),
        "Player created"
    );
    Ok(player)
}

/// Rename a player the actor may update
pub async fn rename_player(
    store: &dyn LeagueStore,
    actor: &Actor,
    player_id: Uuid,
    name: String,
) -> Result<Player> {
    let name = name.trim().to_string();
    validate_player_name(&name)?;

    let mut tx = store.begin().await?;
    let mut player = require_player(tx.as_mut(), player_id).await?;
    let policy = policy_context(tx.as_mut(), actor).await?;
    if !policy.can_update_player(&player) {
        return Err(Error::Unauthorized(
            "You are not allowed to update this player".to_string(),
        ));
    }

    tx.rename_player(player_id, &name).await?;
    tx.commit().await?;

    tracing::info!(player_id = %player_id, "Player renamed");
    player.name = name;
    Ok(player)
}

/// Release a player from their team. The player itself is kept; a linked
/// user also loses their membership on that team.
pub async fn remove_player_from_roster(
    store: &dyn LeagueStore,
    actor: &Actor,
    player_id: Uuid,
) -> Result<Player> {
    let mut tx = store.begin().await?;
    let mut player = require_player(tx.as_mut(), player_id).await?;
    let team_id = player
        .team_id
        .ok_or_else(|| Error::Validation("Player is not on a team".to_string()))?;

    let policy = policy_context(tx.as_mut(), actor).await?;
    if !policy.can_edit_roster(team_id) {
        return Err(Error::Unauthorized(
            "Only team leadership can edit the roster".to_string(),
        ));
    }

    if let Some(user_id) = player.user_id {
        if let Some(membership) = tx.get_membership(team_id, user_id).await? {
            if membership.role == MembershipRole::Leader {
                return Err(Error::Validation(
                    "The team leader's player cannot be removed from the roster".to_string(),
                ));
            }
            tx.delete_membership(membership.id).await?;
        }
    }

    tx.set_player_team(player_id, None).await?;
    tx.commit().await?;

    tracing::info!(player_id = %player_id, team_id = %team_id, "Player removed from roster");
    player.team_id = None;
    Ok(player)
}

/// Hard-delete a roster-only player (administrators only)
pub async fn delete_player_permanently(
    store: &dyn LeagueStore,
    actor: &Actor,
    player_id: Uuid,
) -> Result<()> {
    actor.require_admin()?;

    let mut tx = store.begin().await?;
    let player = require_player(tx.as_mut(), player_id).await?;
    if player.is_linked() {
        return Err(Error::Validation(
            "Players linked to a user account must be released, not deleted".to_string(),
        ));
    }
    if tx.player_has_match_history(player_id).await? {
        return Err(Error::Conflict(
            "Player has recorded goals or votes and cannot be deleted".to_string(),
        ));
    }

    tx.delete_player(player_id).await?;
    tx.commit().await?;

    tracing::info!(player_id = %player_id, "Player deleted");
    Ok(())
}

/// Place a player on a team directly (administrators only)
pub async fn assign_player_to_team(
    store: &dyn LeagueStore,
    actor: &Actor,
    player_id: Uuid,
    team_id: Uuid,
) -> Result<Player> {
    actor.require_admin()?;

    let mut tx = store.begin().await?;
    let mut player = require_player(tx.as_mut(), player_id).await?;
    require_team(tx.as_mut(), team_id).await?;

    tx.set_player_team(player_id, Some(team_id)).await?;
    tx.commit().await?;

    tracing::info!(
        player_id = %player_id,
        team_id = %team_id,
        previous_team_id = ?player.team_id,
        "Player assigned by administrator"
    );
    player.team_id = Some(team_id);
    Ok(player)
}

/// Players with no team
pub async fn unassigned_players(store: &dyn LeagueStore) -> Result<Vec<Player>> {
    let mut tx = store.begin().await?;
    Ok(tx.unassigned_players().await?)
}
