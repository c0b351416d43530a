//! Postgres-backed league store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::configuration::*;
use super::fixtures::*;
use super::memberships::*;
use super::players::*;
use super::results::*;
use super::roster_requests::*;
use super::teams::*;
use super::{LeagueStore, LeagueTx, MemberWithName, RepoResult};
use crate::domain::entities::{
    Fixture, Goal, LeagueConfiguration, MatchResult, MembershipRole, MomVote, Player,
    RosterRequest, Team, TeamMembership,
};
use crate::domain::standings::{ScoredFixture, ScorerGoal};
use crate::domain::state::{FixtureStatus, ResultStatus, RosterRequestStatus, TeamStatus};

/// League store over a Postgres pool
#[derive(Clone)]
pub struct PgLeagueStore {
    pool: PgPool,
}

impl PgLeagueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeagueStore for PgLeagueStore {
    async fn begin(&self) -> RepoResult<Box<dyn LeagueTx>> {
        let transaction = self.pool.begin().await?;
        Ok(Box::new(PgLeagueTx { transaction }))
    }
}

/// An open Postgres transaction; rolled back by sqlx when dropped uncommitted
pub struct PgLeagueTx {
    transaction: Transaction<'static, Postgres>,
}

#[async_trait]
impl LeagueTx for PgLeagueTx {
    async fn get_team(&mut self, team_id: Uuid) -> RepoResult<Option<Team>> {
        get_team_tx(&mut self.transaction, team_id).await
    }

    async fn lock_team(&mut self, team_id: Uuid) -> RepoResult<Option<Team>> {
        lock_team_tx(&mut self.transaction, team_id).await
    }

    async fn team_name_exists(&mut self, name: &str) -> RepoResult<bool> {
        team_name_exists_tx(&mut self.transaction, name).await
    }

    async fn list_teams(&mut self) -> RepoResult<Vec<Team>> {
        list_teams_tx(&mut self.transaction).await
    }

    async fn insert_team(&mut self, team: &Team) -> RepoResult<()> {
        create_team_tx(&mut self.transaction, team).await
    }

    async fn update_team_status(&mut self, team_id: Uuid, status: TeamStatus) -> RepoResult<()> {
        update_team_status_tx(&mut self.transaction, team_id, status).await
    }

    async fn delete_team(&mut self, team_id: Uuid) -> RepoResult<()> {
        delete_team_tx(&mut self.transaction, team_id).await
    }

    async fn get_player(&mut self, player_id: Uuid) -> RepoResult<Option<Player>> {
        get_player_tx(&mut self.transaction, player_id).await
    }

    async fn lock_player(&mut self, player_id: Uuid) -> RepoResult<Option<Player>> {
        lock_player_tx(&mut self.transaction, player_id).await
    }

    async fn player_for_user(&mut self, user_id: Uuid) -> RepoResult<Option<Player>> {
        player_for_user_tx(&mut self.transaction, user_id).await
    }

    async fn players_for_team(&mut self, team_id: Uuid) -> RepoResult<Vec<Player>> {
        players_for_team_tx(&mut self.transaction, team_id).await
    }

    async fn unassigned_players(&mut self) -> RepoResult<Vec<Player>> {
        unassigned_players_tx(&mut self.transaction).await
    }

    async fn count_players_for_team(&mut self, team_id: Uuid) -> RepoResult<i64> {
        count_players_for_team_tx(&mut self.transaction, team_id).await
    }

    async fn player_has_match_history(&mut self, player_id: Uuid) -> RepoResult<bool> {
        player_has_match_history_tx(&mut self.transaction, player_id).await
    }

    async fn insert_player(&mut self, player: &Player) -> RepoResult<()> {
        create_player_tx(&mut self.transaction, player).await
    }

    async fn set_player_team(&mut self, player_id: Uuid, team_id: Option<Uuid>) -> RepoResult<()> {
        set_player_team_tx(&mut self.transaction, player_id, team_id).await
    }

    async fn rename_player(&mut self, player_id: Uuid, name: &str) -> RepoResult<()> {
        rename_player_tx(&mut self.transaction, player_id, name).await
    }

    async fn delete_player(&mut self, player_id: Uuid) -> RepoResult<()> {
        delete_player_tx(&mut self.transaction, player_id).await
    }

    async fn get_membership(
        &mut self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<TeamMembership>> {
        get_membership_by_team_and_user_tx(&mut self.transaction, team_id, user_id).await
    }

    async fn memberships_for_user(&mut self, user_id: Uuid) -> RepoResult<Vec<TeamMembership>> {
        memberships_for_user_tx(&mut self.transaction, user_id).await
    }

    async fn memberships_for_team(&mut self, team_id: Uuid) -> RepoResult<Vec<TeamMembership>> {
        memberships_for_team_tx(&mut self.transaction, team_id).await
    }

    async fn members_with_names(&mut self, team_id: Uuid) -> RepoResult<Vec<MemberWithName>> {
        members_with_names_tx(&mut self.transaction, team_id).await
    }

    async fn insert_membership(&mut self, membership: &TeamMembership) -> RepoResult<()> {
        create_membership_tx(&mut self.transaction, membership).await
    }

    async fn update_membership_role(
        &mut self,
        membership_id: Uuid,
        role: MembershipRole,
    ) -> RepoResult<()> {
        update_role_tx(&mut self.transaction, membership_id, role).await
    }

    async fn delete_membership(&mut self, membership_id: Uuid) -> RepoResult<()> {
        delete_membership_tx(&mut self.transaction, membership_id).await
    }

    async fn delete_memberships_for_team(&mut self, team_id: Uuid) -> RepoResult<u64> {
        delete_memberships_for_team_tx(&mut self.transaction, team_id).await
    }

    async fn lock_roster_request(&mut self, request_id: Uuid) -> RepoResult<Option<RosterRequest>> {
        lock_roster_request_tx(&mut self.transaction, request_id).await
    }

    async fn pending_request_for_user(
        &mut self,
        user_id: Uuid,
    ) -> RepoResult<Option<RosterRequest>> {
        pending_request_for_user_tx(&mut self.transaction, user_id).await
    }

    async fn pending_requests_for_team(&mut self, team_id: Uuid) -> RepoResult<Vec<RosterRequest>> {
        pending_requests_for_team_tx(&mut self.transaction, team_id).await
    }

    async fn insert_roster_request(&mut self, request: &RosterRequest) -> RepoResult<()> {
        create_roster_request_tx(&mut self.transaction, request).await
    }

    async fn update_roster_request_status(
        &mut self,
        request_id: Uuid,
        status: RosterRequestStatus,
    ) -> RepoResult<()> {
        update_roster_request_status_tx(&mut self.transaction, request_id, status).await
    }

    async fn delete_roster_request(&mut self, request_id: Uuid) -> RepoResult<()> {
        delete_roster_request_tx(&mut self.transaction, request_id).await
    }

    async fn delete_roster_requests_for_team(&mut self, team_id: Uuid) -> RepoResult<u64> {
        delete_roster_requests_for_team_tx(&mut self.transaction, team_id).await
    }

    async fn lock_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Option<Fixture>> {
        lock_fixture_tx(&mut self.transaction, fixture_id).await
    }

    async fn count_fixtures_for_team(&mut self, team_id: Uuid) -> RepoResult<i64> {
        count_fixtures_for_team_tx(&mut self.transaction, team_id).await
    }

    async fn insert_fixture(&mut self, fixture: &Fixture) -> RepoResult<()> {
        create_fixture_tx(&mut self.transaction, fixture).await
    }

    async fn update_fixture_schedule(
        &mut self,
        fixture_id: Uuid,
        status: FixtureStatus,
        kick_off: DateTime<Utc>,
    ) -> RepoResult<()> {
        update_fixture_schedule_tx(&mut self.transaction, fixture_id, status, kick_off).await
    }

    async fn get_result(&mut self, result_id: Uuid) -> RepoResult<Option<MatchResult>> {
        get_result_tx(&mut self.transaction, result_id).await
    }

    async fn result_for_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Option<MatchResult>> {
        result_for_fixture_tx(&mut self.transaction, fixture_id).await
    }

    async fn goals_for_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Vec<Goal>> {
        goals_for_fixture_tx(&mut self.transaction, fixture_id).await
    }

    async fn mom_votes_for_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Vec<MomVote>> {
        mom_votes_for_fixture_tx(&mut self.transaction, fixture_id).await
    }

    async fn insert_result(&mut self, result: &MatchResult) -> RepoResult<()> {
        create_result_tx(&mut self.transaction, result).await
    }

    async fn update_result_status(
        &mut self,
        result_id: Uuid,
        status: ResultStatus,
    ) -> RepoResult<()> {
        update_result_status_tx(&mut self.transaction, result_id, status).await
    }

    async fn insert_goal(&mut self, goal: &Goal) -> RepoResult<()> {
        create_goal_tx(&mut self.transaction, goal).await
    }

    async fn insert_mom_vote(&mut self, vote: &MomVote) -> RepoResult<()> {
        create_mom_vote_tx(&mut self.transaction, vote).await
    }

    async fn scored_fixtures(&mut self) -> RepoResult<Vec<ScoredFixture>> {
        scored_fixtures_tx(&mut self.transaction).await
    }

    async fn scorer_goals(&mut self) -> RepoResult<Vec<ScorerGoal>> {
        scorer_goals_tx(&mut self.transaction).await
    }

    async fn get_configuration(&mut self) -> RepoResult<Option<LeagueConfiguration>> {
        get_configuration_tx(&mut self.transaction).await
    }

    async fn save_configuration(&mut self, config: &LeagueConfiguration) -> RepoResult<()> {
        save_configuration_tx(&mut self.transaction, config).await
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.transaction.commit().await?;
        Ok(())
    }
}
