//! Persistence for the league domain
//!
//! Every workflow opens one [`LeagueTx`], performs its reads, checks and
//! writes through it, then commits. Dropping a transaction without
//! committing discards all of its writes.
//!
//! Two stores implement the traits: [`PgLeagueStore`] backed by Postgres
//! (per-entity `_tx` free functions, uniqueness enforced by the schema) and
//! [`MemoryLeagueStore`] for tests and database-less local runs.

pub mod configuration;
pub mod fixtures;
pub mod memberships;
pub mod memory;
pub mod players;
pub mod postgres;
pub mod results;
pub mod roster_requests;
pub mod teams;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use matchday_common::RepositoryError;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{
    Fixture, Goal, LeagueConfiguration, MatchResult, MembershipRole, MomVote, Player,
    RosterRequest, Team, TeamMembership,
};
use crate::domain::standings::{ScoredFixture, ScorerGoal};
use crate::domain::state::{FixtureStatus, ResultStatus, RosterRequestStatus, TeamStatus};

pub use memory::MemoryLeagueStore;
pub use postgres::PgLeagueStore;

pub type RepoResult<T> = std::result::Result<T, RepositoryError>;

/// Unique constraint names shared by both stores
pub mod constraints {
    pub const TEAM_NAME: &str = "teams_name_lower_key";
    pub const PLAYER_USER: &str = "players_user_id_key";
    pub const MEMBERSHIP: &str = "team_memberships_team_user_key";
    pub const ONE_LEADER: &str = "team_memberships_one_leader";
    pub const ONE_ASSISTANT: &str = "team_memberships_one_assistant";
    pub const ONE_MANAGED_TEAM: &str = "team_memberships_one_managed_team";
    pub const ONE_PENDING_REQUEST: &str = "roster_requests_one_pending";
    pub const RESULT_FIXTURE: &str = "results_fixture_id_key";
    pub const MOM_VOTE: &str = "mom_votes_fixture_team_key";
}

/// Membership joined with the member's player name
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MemberWithName {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub created_at: DateTime<Utc>,
    pub player_name: Option<String>,
}

/// Source of league transactions
#[async_trait]
pub trait LeagueStore: Send + Sync {
    async fn begin(&self) -> RepoResult<Box<dyn LeagueTx>>;
}

/// One open league transaction.
///
/// Reads of rows that a workflow goes on to modify (`lock_*`) take a row
/// lock in stores that support it, so concurrent read-check-write sequences
/// on the same team, request or fixture are serialized.
#[async_trait]
pub trait LeagueTx: Send {
    // Teams
    async fn get_team(&mut self, team_id: Uuid) -> RepoResult<Option<Team>>;
    async fn lock_team(&mut self, team_id: Uuid) -> RepoResult<Option<Team>>;
    async fn team_name_exists(&mut self, name: &str) -> RepoResult<bool>;
    async fn list_teams(&mut self) -> RepoResult<Vec<Team>>;
    async fn insert_team(&mut self, team: &Team) -> RepoResult<()>;
    async fn update_team_status(&mut self, team_id: Uuid, status: TeamStatus) -> RepoResult<()>;
    async fn delete_team(&mut self, team_id: Uuid) -> RepoResult<()>;

    // Players
    async fn get_player(&mut self, player_id: Uuid) -> RepoResult<Option<Player>>;
    async fn lock_player(&mut self, player_id: Uuid) -> RepoResult<Option<Player>>;
    async fn player_for_user(&mut self, user_id: Uuid) -> RepoResult<Option<Player>>;
    async fn players_for_team(&mut self, team_id: Uuid) -> RepoResult<Vec<Player>>;
    async fn unassigned_players(&mut self) -> RepoResult<Vec<Player>>;
    async fn count_players_for_team(&mut self, team_id: Uuid) -> RepoResult<i64>;
    async fn player_has_match_history(&mut self, player_id: Uuid) -> RepoResult<bool>;
    async fn insert_player(&mut self, player: &Player) -> RepoResult<()>;
    async fn set_player_team(&mut self, player_id: Uuid, team_id: Option<Uuid>) -> RepoResult<()>;
    async fn rename_player(&mut self, player_id: Uuid, name: &str) -> RepoResult<()>;
    async fn delete_player(&mut self, player_id: Uuid) -> RepoResult<()>;

    // Memberships
    async fn get_membership(
        &mut self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<TeamMembership>>;
    async fn memberships_for_user(&mut self, user_id: Uuid) -> RepoResult<Vec<TeamMembership>>;
    async fn memberships_for_team(&mut self, team_id: Uuid) -> RepoResult<Vec<TeamMembership>>;
    async fn members_with_names(&mut self, team_id: Uuid) -> RepoResult<Vec<MemberWithName>>;
    async fn insert_membership(&mut self, membership: &TeamMembership) -> RepoResult<()>;
    async fn update_membership_role(
        &mut self,
        membership_id: Uuid,
        role: MembershipRole,
    ) -> RepoResult<()>;
    async fn delete_membership(&mut self, membership_id: Uuid) -> RepoResult<()>;
    async fn delete_memberships_for_team(&mut self, team_id: Uuid) -> RepoResult<u64>;

    // Roster requests
    async fn lock_roster_request(&mut self, request_id: Uuid) -> RepoResult<Option<RosterRequest>>;
    async fn pending_request_for_user(&mut self, user_id: Uuid)
        -> RepoResult<Option<RosterRequest>>;
    async fn pending_requests_for_team(&mut self, team_id: Uuid) -> RepoResult<Vec<RosterRequest>>;
    async fn insert_roster_request(&mut self, request: &RosterRequest) -> RepoResult<()>;
    async fn update_roster_request_status(
        &mut self,
        request_id: Uuid,
        status: RosterRequestStatus,
    ) -> RepoResult<()>;
    async fn delete_roster_request(&mut self, request_id: Uuid) -> RepoResult<()>;
    async fn delete_roster_requests_for_team(&mut self, team_id: Uuid) -> RepoResult<u64>;

    // Fixtures
    async fn lock_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Option<Fixture>>;
    async fn count_fixtures_for_team(&mut self, team_id: Uuid) -> RepoResult<i64>;
    async fn insert_fixture(&mut self, fixture: &Fixture) -> RepoResult<()>;
    async fn update_fixture_schedule(
        &mut self,
        fixture_id: Uuid,
        status: FixtureStatus,
        kick_off: DateTime<Utc>,
    ) -> RepoResult<()>;

    // Results
    async fn get_result(&mut self, result_id: Uuid) -> RepoResult<Option<MatchResult>>;
    async fn result_for_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Option<MatchResult>>;
    async fn goals_for_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Vec<Goal>>;
    async fn mom_votes_for_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Vec<MomVote>>;
    async fn insert_result(&mut self, result: &MatchResult) -> RepoResult<()>;
    async fn update_result_status(&mut self, result_id: Uuid, status: ResultStatus)
        -> RepoResult<()>;
    async fn insert_goal(&mut self, goal: &Goal) -> RepoResult<()>;
    async fn insert_mom_vote(&mut self, vote: &MomVote) -> RepoResult<()>;
    async fn scored_fixtures(&mut self) -> RepoResult<Vec<ScoredFixture>>;
    async fn scorer_goals(&mut self) -> RepoResult<Vec<ScorerGoal>>;

    // Configuration
    async fn get_configuration(&mut self) -> RepoResult<Option<LeagueConfiguration>>;
    async fn save_configuration(&mut self, config: &LeagueConfiguration) -> RepoResult<()>;

    /// Make every write of this transaction visible
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
