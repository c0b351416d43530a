//! League workflows
//!
//! Each operation takes the acting user explicitly, runs inside a single
//! store transaction and commits only after every rule has passed.

pub mod configuration;
pub mod fixtures;
pub mod membership;
pub mod players;
pub mod results;
pub mod roster_requests;
pub mod standings;
pub mod team_lifecycle;

use matchday_auth::Actor;
use matchday_common::{Error, Result};
use uuid::Uuid;

use crate::domain::entities::Team;
use crate::domain::policy::PolicyContext;
use crate::repository::LeagueTx;

/// Load the actor's memberships for policy checks
pub(crate) async fn policy_context<'a>(
    tx: &mut dyn LeagueTx,
    actor: &'a Actor,
) -> Result<PolicyContext<'a>> {
    let memberships = match actor.user_id {
        Some(user_id) => tx.memberships_for_user(user_id).await?,
        None => Vec::new(),
    };
    Ok(PolicyContext::new(actor, memberships))
}

/// Fetch and lock a team or fail with NotFound
pub(crate) async fn require_team(tx: &mut dyn LeagueTx, team_id: Uuid) -> Result<Team> {
    tx.lock_team(team_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Team {} not found", team_id)))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Seeding helpers for workflow tests

    use uuid::Uuid;

    use crate::domain::entities::{MembershipRole, Player, Team, TeamMembership};
    use crate::domain::state::TeamStatus;
    use crate::repository::{LeagueStore, MemoryLeagueStore};

    pub async fn seed_team(store: &MemoryLeagueStore, name: &str, status: TeamStatus) -> Team {
        let mut team = Team::new(name.to_string(), Some("Red".to_string()), None).unwrap();
        team.status = status;
        let mut tx = store.begin().await.unwrap();
        tx.insert_team(&team).await.unwrap();
        tx.commit().await.unwrap();
        team
    }

    /// Add a user with a linked player on the team; returns the user id
    pub async fn seed_member(
        store: &MemoryLeagueStore,
        team_id: Uuid,
        role: MembershipRole,
    ) -> Uuid {
        let user_id = Uuid::new_v4();
        let player =
            Player::new_for_user(format!("User {}", &user_id.to_string()[..8]), user_id, Some(team_id))
                .unwrap();
        let mut tx = store.begin().await.unwrap();
        tx.insert_player(&player).await.unwrap();
        tx.insert_membership(&TeamMembership::new(team_id, user_id, role))
            .await
            .unwrap();
        tx.commit().await.unwrap();
        user_id
    }

    pub async fn seed_player(store: &MemoryLeagueStore, team_id: Option<Uuid>) -> Player {
        let player = Player::new_unlinked("Roster Player".to_string(), team_id).unwrap();
        let mut tx = store.begin().await.unwrap();
        tx.insert_player(&player).await.unwrap();
        tx.commit().await.unwrap();
        player
    }

    /// A profile for a user who belongs to no team
    pub async fn seed_free_agent(store: &MemoryLeagueStore) -> (Uuid, Player) {
        let user_id = Uuid::new_v4();
        let player = Player::new_for_user("Free Agent".to_string(), user_id, None).unwrap();
        let mut tx = store.begin().await.unwrap();
        tx.insert_player(&player).await.unwrap();
        tx.commit().await.unwrap();
        (user_id, player)
    }
}
