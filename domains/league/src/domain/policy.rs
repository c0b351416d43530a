//! Authorization policies for league resources
//!
//! The identity provider only tells us who the actor is and whether they
//! hold the administrator role. Standing on a particular team, player or
//! fixture comes from the actor's memberships, which this context carries.

use matchday_auth::Actor;
use uuid::Uuid;

use crate::domain::entities::{Fixture, MembershipRole, Player, TeamMembership};

/// Actor plus the memberships they hold across the league
#[derive(Debug, Clone)]
pub struct PolicyContext<'a> {
    pub actor: &'a Actor,
    pub memberships: Vec<TeamMembership>,
}

impl<'a> PolicyContext<'a> {
    pub fn new(actor: &'a Actor, memberships: Vec<TeamMembership>) -> Self {
        Self { actor, memberships }
    }

    /// Role held on a specific team
    pub fn team_role(&self, team_id: Uuid) -> Option<MembershipRole> {
        let user_id = self.actor.user_id?;
        self.memberships
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .map(|m| m.role)
    }

    /// CanManageTeam: admin, or Leader/AssistantLeader of the team
    pub fn can_manage_team(&self, team_id: Uuid) -> bool {
        self.actor.is_admin() || self.team_role(team_id).is_some_and(|role| role.can_manage())
    }

    /// CanEditRoster shares the CanManageTeam rule
    pub fn can_edit_roster(&self, team_id: Uuid) -> bool {
        self.can_manage_team(team_id)
    }

    /// CanUpdatePlayer: admin, the linked user, or team management for an
    /// unlinked player
    pub fn can_update_player(&self, player: &Player) -> bool {
        if self.actor.is_admin() {
            return true;
        }
        match (player.user_id, self.actor.user_id) {
            (Some(owner), Some(actor)) => owner == actor,
            (Some(_), None) => false,
            (None, _) => player
                .team_id
                .is_some_and(|team_id| self.can_manage_team(team_id)),
        }
    }

    /// CanSubmitResult: admin, or management on either competing team
    pub fn can_submit_result(&self, fixture: &Fixture) -> bool {
        self.actor.is_admin() || self.managed_side(fixture).is_some()
    }

    /// The competing team this actor manages, home side first
    pub fn managed_side(&self, fixture: &Fixture) -> Option<Uuid> {
        [fixture.home_team_id, fixture.away_team_id]
            .into_iter()
            .find(|team_id| self.team_role(*team_id).is_some_and(|role| role.can_manage()))
    }

    /// True if the actor leads or assists any team
    pub fn holds_management_role(&self) -> bool {
        self.memberships.iter().any(|m| m.role.can_manage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn membership(user_id: Uuid, team_id: Uuid, role: MembershipRole) -> TeamMembership {
        TeamMembership::new(team_id, user_id, role)
    }

    #[test]
    fn test_manage_team_requires_management_role() {
        let user_id = Uuid::new_v4();
        let (led, assisted, joined) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let actor = Actor::user(user_id);
        let ctx = PolicyContext::new(
            &actor,
            vec![
                membership(user_id, led, MembershipRole::Leader),
                membership(user_id, assisted, MembershipRole::AssistantLeader),
                membership(user_id, joined, MembershipRole::Member),
            ],
        );

        assert!(ctx.can_manage_team(led));
        assert!(ctx.can_edit_roster(assisted));
        assert!(!ctx.can_manage_team(joined));
        assert!(!ctx.can_manage_team(Uuid::new_v4()));
        assert!(ctx.holds_management_role());
    }

    #[test]
    fn test_admin_manages_everything() {
        let actor = Actor::admin(Uuid::new_v4());
        let ctx = PolicyContext::new(&actor, vec![]);
        assert!(ctx.can_manage_team(Uuid::new_v4()));
        assert!(!ctx.holds_management_role());
    }

    #[test]
    fn test_update_player_rules() {
        let user_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let actor = Actor::user(user_id);
        let ctx = PolicyContext::new(
            &actor,
            vec![membership(user_id, team_id, MembershipRole::AssistantLeader)],
        );

        let own = Player::new_for_user("Me".to_string(), user_id, None).unwrap();
        assert!(ctx.can_update_player(&own));

        let someone_else =
            Player::new_for_user("Them".to_string(), Uuid::new_v4(), Some(team_id)).unwrap();
        assert!(!ctx.can_update_player(&someone_else));

        let roster_only = Player::new_unlinked("Sub".to_string(), Some(team_id)).unwrap();
        assert!(ctx.can_update_player(&roster_only));

        let elsewhere = Player::new_unlinked("Away".to_string(), Some(Uuid::new_v4())).unwrap();
        assert!(!ctx.can_update_player(&elsewhere));

        let pool = Player::new_unlinked("Pool".to_string(), None).unwrap();
        assert!(!ctx.can_update_player(&pool));
    }

    #[test]
    fn test_submit_result_on_either_side() {
        let user_id = Uuid::new_v4();
        let (home, away) = (Uuid::new_v4(), Uuid::new_v4());
        let fixture = Fixture::new(home, away, Utc::now(), None).unwrap();

        let actor = Actor::user(user_id);
        let away_leader = PolicyContext::new(
            &actor,
            vec![membership(user_id, away, MembershipRole::Leader)],
        );
        assert!(away_leader.can_submit_result(&fixture));
        assert_eq!(away_leader.managed_side(&fixture), Some(away));

        let home_member = PolicyContext::new(
            &actor,
            vec![membership(user_id, home, MembershipRole::Member)],
        );
        assert!(!home_member.can_submit_result(&fixture));
    }

    #[test]
    fn test_anonymous_actor_has_no_standing() {
        let actor = Actor::anonymous();
        let team_id = Uuid::new_v4();
        let ctx = PolicyContext::new(
            &actor,
            vec![membership(Uuid::new_v4(), team_id, MembershipRole::Leader)],
        );
        assert_eq!(ctx.team_role(team_id), None);
        assert!(!ctx.can_manage_team(team_id));
    }
}
