//! Team membership roles and leadership handover

use matchday_auth::Actor;
use matchday_common::{Error, Result};
use uuid::Uuid;

use super::require_team;
use crate::domain::entities::{MembershipRole, TeamMembership};
use crate::domain::state::{plan_role_change, RoleTransition};
use crate::repository::{LeagueStore, MemberWithName};

/// List a team's members with their player names, leader first
pub async fn get_members(store: &dyn LeagueStore, team_id: Uuid) -> Result<Vec<MemberWithName>> {
    let mut tx = store.begin().await?;
    if tx.get_team(team_id).await?.is_none() {
        return Err(Error::NotFound(format!("Team {} not found", team_id)));
    }
    Ok(tx.members_with_names(team_id).await?)
}

/// Change another member's role (team leader only).
///
/// Promoting the assistant leader to leader is a handover: the caller is
/// demoted to assistant leader in the same transaction, so the team never
/// has zero or two leaders. Returns the team's memberships afterwards.
pub async fn update_role(
    store: &dyn LeagueStore,
    actor: &Actor,
    team_id: Uuid,
    target_user_id: Uuid,
    new_role: MembershipRole,
) -> Result<Vec<TeamMembership>> {
    let user_id = actor.require_user()?;

    let mut tx = store.begin().await?;
    require_team(tx.as_mut(), team_id).await?;
    let memberships = tx.memberships_for_team(team_id).await?;

    let caller = memberships
        .iter()
        .find(|m| m.user_id == user_id && m.role.is_leader())
        .cloned()
        .ok_or_else(|| {
            Error::Unauthorized("Only the team leader can change member roles".to_string())
        })?;
    let target = memberships
        .iter()
        .find(|m| m.user_id == target_user_id)
        .cloned()
        .ok_or_else(|| Error::NotFound("Member not found on this team".to_string()))?;

    let assistant_taken = memberships
        .iter()
        .any(|m| m.id != target.id && m.role == MembershipRole::AssistantLeader);

    match plan_role_change(target.role, new_role, assistant_taken)? {
        RoleTransition::Unchanged => return Ok(memberships),
        RoleTransition::Overwrite(role) => {
            tx.update_membership_role(target.id, role).await?;
        }
        RoleTransition::Handover => {
            // Order keeps both single-holder roles unique at every step
            tx.update_membership_role(caller.id, MembershipRole::Member)
                .await?;
            tx.update_membership_role(target.id, MembershipRole::Leader)
                .await?;
            tx.update_membership_role(caller.id, MembershipRole::AssistantLeader)
                .await?;
        }
    }

    let updated = tx.memberships_for_team(team_id).await?;
    tx.commit().await?;

    tracing::info!(
        team_id = %team_id,
        target_user_id = %target_user_id,
        from = %target.role,
        to = %new_role,
        "Member role changed"
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::TeamStatus;
    use crate::repository::MemoryLeagueStore;
    use crate::services::test_support::*;

    fn role_of(memberships: &[TeamMembership], user_id: Uuid) -> MembershipRole {
        memberships
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role)
            .unwrap()
    }

    #[tokio::test]
    async fn test_handover_swaps_leader_and_assistant() {
        let store = MemoryLeagueStore::new();
        let team = seed_team(&store, "Reds", TeamStatus::Approved).await;
        let leader = seed_member(&store, team.id, MembershipRole::Leader).await;
        let assistant = seed_member(&store, team.id, MembershipRole::AssistantLeader).await;

        let after = update_role(&store, &Actor::user(leader), team.id, assistant, MembershipRole::Leader)
            .await
            .unwrap();

        assert_eq!(role_of(&after, assistant), MembershipRole::Leader);
        assert_eq!(role_of(&after, leader), MembershipRole::AssistantLeader);
        assert_eq!(after.iter().filter(|m| m.role.is_leader()).count(), 1);
    }

    #[tokio::test]
    async fn test_only_leader_changes_roles() {
        let store = MemoryLeagueStore::new();
        let team = seed_team(&store, "Reds", TeamStatus::Approved).await;
        seed_member(&store, team.id, MembershipRole::Leader).await;
        let assistant = seed_member(&store, team.id, MembershipRole::AssistantLeader).await;
        let member = seed_member(&store, team.id, MembershipRole::Member).await;

        let err = update_role(&store, &Actor::user(assistant), team.id, member, MembershipRole::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_second_assistant_is_conflict() {
        let store = MemoryLeagueStore::new();
        let team = seed_team(&store, "Reds", TeamStatus::Approved).await;
        let leader = seed_member(&store, team.id, MembershipRole::Leader).await;
        seed_member(&store, team.id, MembershipRole::AssistantLeader).await;
        let member = seed_member(&store, team.id, MembershipRole::Member).await;

        let err = update_role(
            &store,
            &Actor::user(leader),
            team.id,
            member,
            MembershipRole::AssistantLeader,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_member_cannot_be_made_leader_directly() {
        let store = MemoryLeagueStore::new();
        let team = seed_team(&store, "Reds", TeamStatus::Approved).await;
        let leader = seed_member(&store, team.id, MembershipRole::Leader).await;
        let member = seed_member(&store, team.id, MembershipRole::Member).await;

        let err = update_role(&store, &Actor::user(leader), team.id, member, MembershipRole::Leader)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_promote_and_demote_assistant() {
        let store = MemoryLeagueStore::new();
        let team = seed_team(&store, "Reds", TeamStatus::Approved).await;
        let leader = seed_member(&store, team.id, MembershipRole::Leader).await;
        let member = seed_member(&store, team.id, MembershipRole::Member).await;
        let actor = Actor::user(leader);

        let after = update_role(&store, &actor, team.id, member, MembershipRole::AssistantLeader)
            .await
            .unwrap();
        assert_eq!(role_of(&after, member), MembershipRole::AssistantLeader);

        let after = update_role(&store, &actor, team.id, member, MembershipRole::Member)
            .await
            .unwrap();
        assert_eq!(role_of(&after, member), MembershipRole::Member);
    }

    #[tokio::test]
    async fn test_members_listed_with_names() {
        let store = MemoryLeagueStore::new();
        let team = seed_team(&store, "Reds", TeamStatus::Approved).await;
        let member = seed_member(&store, team.id, MembershipRole::Member).await;
        let leader = seed_member(&store, team.id, MembershipRole::Leader).await;

        let members = get_members(&store, team.id).await.unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].user_id, leader);
        assert_eq!(members[1].user_id, member);
        assert!(members.iter().all(|m| m.player_name.is_some()));

        let err = get_members(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
