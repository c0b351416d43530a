//! Workflow scenarios
//!
//! Covers leadership, roster, join request and result invariants, the
//! league table and the documented end-to-end scenarios.

use matchday_auth::Actor;
use matchday_common::Error;
use matchday_league::services::membership::update_role;
use matchday_league::services::results::{submit_result, update_result_status, ResultSubmission};
use matchday_league::services::team_lifecycle::{
    create_team, disband_team, leave_team, LeaveOutcome, NewTeam,
};
use matchday_league::services::{players, roster_requests, standings};
use matchday_league::{
    FixtureStatus, MembershipRole, ResultStatus, RosterRequestStatus, TeamStatus,
};
use uuid::Uuid;

use crate::common::{TestLeague, TestTeam};

fn score(home: i32, away: i32, goalscorers: Vec<Uuid>) -> ResultSubmission {
    ResultSubmission {
        home_score: home,
        away_score: away,
        goalscorers,
        mom_vote: None,
    }
}

/// Submit a result as an administrator and approve it
async fn approved_result(
    league: &TestLeague,
    home: &TestTeam,
    away: &TestTeam,
    submission: ResultSubmission,
) {
    let fixture = league.fixture(home, away).await;
    let submitted = submit_result(league.store(), &league.admin, fixture.id, submission)
        .await
        .unwrap();
    update_result_status(
        league.store(),
        &league.admin,
        submitted.result.id,
        ResultStatus::Approved,
    )
    .await
    .unwrap();
}

mod test_leadership {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_exactly_one_leader_across_role_changes_and_leaves() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let (assistant, _) = league.join(&reds, "Assistant").await;
        let (member, _) = league.join(&reds, "Member").await;
        let team_id = reds.team.id;
        assert_eq!(league.leader_count(team_id).await, 1);

        update_role(
            league.store(),
            &Actor::user(reds.leader),
            team_id,
            assistant,
            MembershipRole::AssistantLeader,
        )
        .await
        .unwrap();
        assert_eq!(league.leader_count(team_id).await, 1);

        // Handover: the assistant becomes leader, the old leader assists
        update_role(
            league.store(),
            &Actor::user(reds.leader),
            team_id,
            assistant,
            MembershipRole::Leader,
        )
        .await
        .unwrap();
        assert_eq!(league.leader_count(team_id).await, 1);

        let err = update_role(
            league.store(),
            &Actor::user(reds.leader),
            team_id,
            member,
            MembershipRole::AssistantLeader,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        assert_eq!(
            leave_team(league.store(), &Actor::user(member), team_id)
                .await
                .unwrap(),
            LeaveOutcome::Left
        );
        assert_eq!(league.leader_count(team_id).await, 1);

        let err = leave_team(league.store(), &Actor::user(assistant), team_id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(league.leader_count(team_id).await, 1);

        leave_team(league.store(), &Actor::user(reds.leader), team_id)
            .await
            .unwrap();
        assert_eq!(league.leader_count(team_id).await, 1);

        disband_team(league.store(), &Actor::user(assistant), team_id)
            .await
            .unwrap();
        assert!(league.memberships(team_id).await.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_handover_is_atomic() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let (assistant, _) = league.join(&reds, "Assistant").await;
        let leader = Actor::user(reds.leader);
        update_role(
            league.store(),
            &leader,
            reds.team.id,
            assistant,
            MembershipRole::AssistantLeader,
        )
        .await
        .unwrap();

        let (handover, leaders_seen) = tokio::join!(
            update_role(
                league.store(),
                &leader,
                reds.team.id,
                assistant,
                MembershipRole::Leader,
            ),
            league.leader_count(reds.team.id)
        );

        let after = handover.unwrap();
        assert_eq!(leaders_seen, 1);
        let role_of = |user_id: Uuid| {
            after
                .iter()
                .find(|m| m.user_id == user_id)
                .map(|m| m.role)
                .unwrap()
        };
        assert_eq!(role_of(assistant), MembershipRole::Leader);
        assert_eq!(role_of(reds.leader), MembershipRole::AssistantLeader);
        assert_eq!(after.iter().filter(|m| m.role.is_leader()).count(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_last_leader_must_hand_over_before_leaving() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let (member, _) = league.join(&reds, "Successor").await;
        let leader = Actor::user(reds.leader);

        let err = leave_team(league.store(), &leader, reds.team.id)
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::Validation(msg) if msg.contains("last leader")));

        update_role(
            league.store(),
            &leader,
            reds.team.id,
            member,
            MembershipRole::AssistantLeader,
        )
        .await
        .unwrap();
        update_role(league.store(), &leader, reds.team.id, member, MembershipRole::Leader)
            .await
            .unwrap();

        assert_eq!(
            leave_team(league.store(), &leader, reds.team.id)
                .await
                .unwrap(),
            LeaveOutcome::Left
        );
        let memberships = league.memberships(reds.team.id).await;
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].user_id, member);
        assert_eq!(memberships[0].role, MembershipRole::Leader);
        assert_eq!(league.player_of(reds.leader).await.unwrap().team_id, None);
    }
}

mod test_team_creation {
    use super::*;

    fn reds(name: &str) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            primary_color: Some("Red".to_string()),
            secondary_color: Some("White".to_string()),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_create_team_then_case_insensitive_conflict() {
        let league = TestLeague::new();
        let founder = Uuid::new_v4();

        let team = create_team(league.store(), &Actor::user(founder), reds("Reds"))
            .await
            .unwrap();
        assert_eq!(team.status, TeamStatus::PendingApproval);
        let memberships = league.memberships(team.id).await;
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].user_id, founder);
        assert_eq!(memberships[0].role, MembershipRole::Leader);

        let err = create_team(league.store(), &Actor::user(Uuid::new_v4()), reds("reds"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test_log::test(tokio::test)]
    async fn test_leader_leaving_unapproved_team_dissolves_it() {
        let league = TestLeague::new();
        let (founder, profile) = league.free_agent("Founder").await;
        let actor = Actor::user(founder);
        let team = create_team(league.store(), &actor, reds("Reds")).await.unwrap();
        let roster_only = players::create_player(
            league.store(),
            &actor,
            "Roster Only".to_string(),
            Some(team.id),
        )
        .await
        .unwrap();

        assert_eq!(
            leave_team(league.store(), &actor, team.id).await.unwrap(),
            LeaveOutcome::TeamDissolved
        );

        let mut tx = league.store().begin().await.unwrap();
        assert!(tx.get_team(team.id).await.unwrap().is_none());
        assert!(tx.get_player(roster_only.id).await.unwrap().is_none());
        let profile = tx.get_player(profile.id).await.unwrap().unwrap();
        assert_eq!(profile.team_id, None);
    }
}

mod test_roster {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_join_request_approved_twice_updates_once() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let (user_id, player) = league.free_agent("Newcomer").await;
        let request = roster_requests::create_join_request(
            league.store(),
            &Actor::user(user_id),
            reds.team.id,
        )
        .await
        .unwrap();
        let leader = Actor::user(reds.leader);

        let (first, second) = tokio::join!(
            roster_requests::approve_join_request(league.store(), &leader, request.id),
            roster_requests::approve_join_request(league.store(), &leader, request.id)
        );

        let outcomes = [first, second];
        let approved: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].status, RosterRequestStatus::Approved);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(Error::Conflict(_)))));

        let memberships: Vec<_> = league
            .memberships(reds.team.id)
            .await
            .into_iter()
            .filter(|m| m.user_id == user_id)
            .collect();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role, MembershipRole::Member);
        let joined = league.player_of(user_id).await.unwrap();
        assert_eq!(joined.id, player.id);
        assert_eq!(joined.team_id, Some(reds.team.id));
    }

    #[test_log::test(tokio::test)]
    async fn test_player_is_on_one_roster_under_concurrent_moves() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let blues = league.approved_team("Blues").await;
        let (user_id, player) = league.free_agent("Contested").await;
        let request = roster_requests::create_join_request(
            league.store(),
            &Actor::user(user_id),
            reds.team.id,
        )
        .await
        .unwrap();

        let reds_leader = Actor::user(reds.leader);
        let _ = tokio::join!(
            roster_requests::approve_join_request(
                league.store(),
                &reds_leader,
                request.id
            ),
            players::assign_player_to_team(league.store(), &league.admin, player.id, blues.team.id)
        );

        let mut tx = league.store().begin().await.unwrap();
        let on_reds = tx
            .players_for_team(reds.team.id)
            .await
            .unwrap()
            .iter()
            .any(|p| p.id == player.id);
        let on_blues = tx
            .players_for_team(blues.team.id)
            .await
            .unwrap()
            .iter()
            .any(|p| p.id == player.id);
        assert!(on_reds ^ on_blues, "player must be on exactly one roster");
        assert_eq!(
            tx.get_player(player.id).await.unwrap().unwrap().team_id,
            Some(blues.team.id)
        );
    }
}

mod test_results {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_submit_result_scenario() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let blues = league.approved_team("Blues").await;
        let fixture = league.fixture(&reds, &blues).await;
        let p1 = reds.leader_player.id;
        let p2 = blues.leader_player.id;
        let leader = Actor::user(reds.leader);

        let err = submit_result(league.store(), &leader, fixture.id, score(2, 1, vec![p1, p2]))
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .to_lowercase()
            .contains("goalscorer count mismatch"));

        let submitted = submit_result(
            league.store(),
            &leader,
            fixture.id,
            score(2, 1, vec![p1, p1, p2]),
        )
        .await
        .unwrap();
        assert_eq!(submitted.goals.len(), 3);

        let mut tx = league.store().begin().await.unwrap();
        let fixture = tx.lock_fixture(fixture.id).await.unwrap().unwrap();
        assert_eq!(fixture.status, FixtureStatus::Completed);
        assert_eq!(tx.goals_for_fixture(fixture.id).await.unwrap().len(), 3);
    }

    #[test_log::test(tokio::test)]
    async fn test_concurrent_submissions_keep_one_result() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let blues = league.approved_team("Blues").await;
        let fixture = league.fixture(&reds, &blues).await;
        let home_scorer = reds.leader_player.id;
        let away_scorer = blues.leader_player.id;

        let reds_leader = Actor::user(reds.leader);
        let blues_leader = Actor::user(blues.leader);
        let (home, away) = tokio::join!(
            submit_result(
                league.store(),
                &reds_leader,
                fixture.id,
                score(1, 0, vec![home_scorer]),
            ),
            submit_result(
                league.store(),
                &blues_leader,
                fixture.id,
                score(0, 2, vec![away_scorer, away_scorer]),
            )
        );

        let (winner, loser) = match (home, away) {
            (Ok(winner), Err(loser)) | (Err(loser), Ok(winner)) => (winner, loser),
            other => panic!("expected exactly one successful submission, got {:?}", other),
        };
        assert!(matches!(loser, Error::Conflict(_)));

        let mut tx = league.store().begin().await.unwrap();
        let stored = tx.result_for_fixture(fixture.id).await.unwrap().unwrap();
        assert_eq!(stored, winner.result);
        assert_eq!(
            tx.goals_for_fixture(fixture.id).await.unwrap().len(),
            winner.goals.len()
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_resubmission_leaves_original_unchanged() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let blues = league.approved_team("Blues").await;
        let fixture = league.fixture(&reds, &blues).await;
        let scorer = reds.leader_player.id;
        let first = submit_result(
            league.store(),
            &Actor::user(reds.leader),
            fixture.id,
            score(1, 0, vec![scorer]),
        )
        .await
        .unwrap();

        let err = submit_result(
            league.store(),
            &league.admin,
            fixture.id,
            score(0, 0, vec![]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let mut tx = league.store().begin().await.unwrap();
        assert_eq!(
            tx.result_for_fixture(fixture.id).await.unwrap().unwrap(),
            first.result
        );
        assert_eq!(tx.goals_for_fixture(fixture.id).await.unwrap(), first.goals);
    }
}

mod test_standings {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_league_table_counts_only_approved_results() {
        let league = TestLeague::new();
        let a = league.approved_team("Alpha").await;
        let b = league.approved_team("Bravo").await;
        let c = league.approved_team("Charlie").await;
        let a_scorer = a.leader_player.id;
        let b_scorer = b.leader_player.id;
        let c_scorer = c.leader_player.id;

        approved_result(
            &league,
            &a,
            &b,
            score(3, 1, vec![a_scorer, a_scorer, a_scorer, b_scorer]),
        )
        .await;
        approved_result(
            &league,
            &a,
            &c,
            score(2, 2, vec![a_scorer, a_scorer, c_scorer, c_scorer]),
        )
        .await;

        // Pending and disputed results between B and C must not count
        let pending = league.fixture(&b, &c).await;
        submit_result(league.store(), &league.admin, pending.id, score(5, 0, vec![b_scorer; 5]))
            .await
            .unwrap();
        let disputed = league.fixture(&c, &b).await;
        let submitted = submit_result(
            league.store(),
            &league.admin,
            disputed.id,
            score(4, 0, vec![c_scorer; 4]),
        )
        .await
        .unwrap();
        update_result_status(
            league.store(),
            &league.admin,
            submitted.result.id,
            ResultStatus::Disputed,
        )
        .await
        .unwrap();

        let table = standings::league_table(league.store()).await.unwrap();
        let row = |team: &TestTeam| {
            table
                .iter()
                .find(|r| r.team_id == team.team.id)
                .cloned()
                .unwrap()
        };

        assert_eq!(table[0].team_id, a.team.id);
        assert_eq!((row(&a).points, row(&a).played), (4, 2));
        assert_eq!((row(&b).points, row(&b).played), (0, 1));
        assert_eq!((row(&c).points, row(&c).played), (1, 1));

        let scorers = standings::top_scorers(league.store(), 10).await.unwrap();
        assert_eq!(scorers[0].player_id, a_scorer);
        assert_eq!(scorers[0].goals, 5);
        assert!(scorers
            .iter()
            .all(|s| s.player_id != b_scorer || s.goals == 1));
    }
}
