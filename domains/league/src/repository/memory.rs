//! In-memory league store
//!
//! Used by the test suites and by local runs without `DATABASE_URL`. A
//! transaction holds the store lock for its whole lifetime and works on a
//! private copy of the state, so transactions are fully serialized and an
//! uncommitted transaction leaves nothing behind. The same uniqueness rules
//! as the Postgres schema are enforced and reported under the same
//! constraint names.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use matchday_common::RepositoryError;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::constraints;
use super::{LeagueStore, LeagueTx, MemberWithName, RepoResult};
use crate::domain::entities::{
    Fixture, Goal, LeagueConfiguration, MatchResult, MembershipRole, MomVote, Player,
    RosterRequest, Team, TeamMembership,
};
use crate::domain::standings::{ScoredFixture, ScorerGoal};
use crate::domain::state::{FixtureStatus, ResultStatus, RosterRequestStatus, TeamStatus};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    teams: HashMap<Uuid, Team>,
    players: HashMap<Uuid, Player>,
    memberships: HashMap<Uuid, TeamMembership>,
    roster_requests: HashMap<Uuid, RosterRequest>,
    fixtures: HashMap<Uuid, Fixture>,
    results: HashMap<Uuid, MatchResult>,
    goals: Vec<Goal>,
    mom_votes: Vec<MomVote>,
    configuration: Option<LeagueConfiguration>,
}

/// League store kept in process memory
#[derive(Clone, Default)]
pub struct MemoryLeagueStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeagueStore for MemoryLeagueStore {
    async fn begin(&self) -> RepoResult<Box<dyn LeagueTx>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryLeagueTx { guard, working }))
    }
}

/// Transaction over a private copy of the store
pub struct MemoryLeagueTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

fn role_rank(role: MembershipRole) -> u8 {
    match role {
        MembershipRole::Leader => 0,
        MembershipRole::AssistantLeader => 1,
        MembershipRole::Member => 2,
    }
}

impl MemoryLeagueTx {
    fn check_role_slot(
        &self,
        membership_id: Uuid,
        team_id: Uuid,
        user_id: Uuid,
        role: MembershipRole,
    ) -> RepoResult<()> {
        let constraint = match role {
            MembershipRole::Leader => constraints::ONE_LEADER,
            MembershipRole::AssistantLeader => constraints::ONE_ASSISTANT,
            MembershipRole::Member => return Ok(()),
        };
        let others: Vec<&TeamMembership> = self
            .working
            .memberships
            .values()
            .filter(|m| m.id != membership_id)
            .collect();
        if others.iter().any(|m| m.team_id == team_id && m.role == role) {
            return Err(RepositoryError::AlreadyExists(constraint.to_string()));
        }
        if others.iter().any(|m| m.user_id == user_id && m.role.can_manage()) {
            return Err(RepositoryError::AlreadyExists(
                constraints::ONE_MANAGED_TEAM.to_string(),
            ));
        }
        Ok(())
    }

    fn sorted_players<'a>(players: impl Iterator<Item = &'a Player>) -> Vec<Player> {
        let mut players: Vec<Player> = players.cloned().collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        players
    }
}

#[async_trait]
impl LeagueTx for MemoryLeagueTx {
    async fn get_team(&mut self, team_id: Uuid) -> RepoResult<Option<Team>> {
        Ok(self.working.teams.get(&team_id).cloned())
    }

    async fn lock_team(&mut self, team_id: Uuid) -> RepoResult<Option<Team>> {
        self.get_team(team_id).await
    }

    async fn team_name_exists(&mut self, name: &str) -> RepoResult<bool> {
        let lowered = name.to_lowercase();
        Ok(self
            .working
            .teams
            .values()
            .any(|t| t.name.to_lowercase() == lowered))
    }

    async fn list_teams(&mut self) -> RepoResult<Vec<Team>> {
        let mut teams: Vec<Team> = self.working.teams.values().cloned().collect();
        teams.sort_by_key(|t| t.name.to_lowercase());
        Ok(teams)
    }

    async fn insert_team(&mut self, team: &Team) -> RepoResult<()> {
        if self.team_name_exists(&team.name).await? {
            return Err(RepositoryError::AlreadyExists(
                constraints::TEAM_NAME.to_string(),
            ));
        }
        self.working.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn update_team_status(&mut self, team_id: Uuid, status: TeamStatus) -> RepoResult<()> {
        let team = self
            .working
            .teams
            .get_mut(&team_id)
            .ok_or(RepositoryError::NotFound)?;
        team.status = status;
        team.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_team(&mut self, team_id: Uuid) -> RepoResult<()> {
        if self.working.teams.remove(&team_id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        // Mirrors the schema's ON DELETE actions
        self.working.memberships.retain(|_, m| m.team_id != team_id);
        self.working.roster_requests.retain(|_, r| r.team_id != team_id);
        for player in self.working.players.values_mut() {
            if player.team_id == Some(team_id) {
                player.team_id = None;
            }
        }
        Ok(())
    }

    async fn get_player(&mut self, player_id: Uuid) -> RepoResult<Option<Player>> {
        Ok(self.working.players.get(&player_id).cloned())
    }

    async fn lock_player(&mut self, player_id: Uuid) -> RepoResult<Option<Player>> {
        self.get_player(player_id).await
    }

    async fn player_for_user(&mut self, user_id: Uuid) -> RepoResult<Option<Player>> {
        Ok(self
            .working
            .players
            .values()
            .find(|p| p.user_id == Some(user_id))
            .cloned())
    }

    async fn players_for_team(&mut self, team_id: Uuid) -> RepoResult<Vec<Player>> {
        Ok(Self::sorted_players(
            self.working
                .players
                .values()
                .filter(|p| p.team_id == Some(team_id)),
        ))
    }

    async fn unassigned_players(&mut self) -> RepoResult<Vec<Player>> {
        Ok(Self::sorted_players(
            self.working.players.values().filter(|p| p.team_id.is_none()),
        ))
    }

    async fn count_players_for_team(&mut self, team_id: Uuid) -> RepoResult<i64> {
        Ok(self
            .working
            .players
            .values()
            .filter(|p| p.team_id == Some(team_id))
            .count() as i64)
    }

    async fn player_has_match_history(&mut self, player_id: Uuid) -> RepoResult<bool> {
        let scored = self.working.goals.iter().any(|g| g.player_id == player_id);
        let voted = self.working.mom_votes.iter().any(|v| {
            v.voted_for_own_player_id == player_id || v.voted_for_opponent_player_id == player_id
        });
        Ok(scored || voted)
    }

    async fn insert_player(&mut self, player: &Player) -> RepoResult<()> {
        if let Some(user_id) = player.user_id {
            if self.player_for_user(user_id).await?.is_some() {
                return Err(RepositoryError::AlreadyExists(
                    constraints::PLAYER_USER.to_string(),
                ));
            }
        }
        self.working.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn set_player_team(&mut self, player_id: Uuid, team_id: Option<Uuid>) -> RepoResult<()> {
        let player = self
            .working
            .players
            .get_mut(&player_id)
            .ok_or(RepositoryError::NotFound)?;
        player.team_id = team_id;
        Ok(())
    }

    async fn rename_player(&mut self, player_id: Uuid, name: &str) -> RepoResult<()> {
        let player = self
            .working
            .players
            .get_mut(&player_id)
            .ok_or(RepositoryError::NotFound)?;
        player.name = name.to_string();
        Ok(())
    }

    async fn delete_player(&mut self, player_id: Uuid) -> RepoResult<()> {
        self.working
            .players
            .remove(&player_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_membership(
        &mut self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<TeamMembership>> {
        Ok(self
            .working
            .memberships
            .values()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .cloned())
    }

    async fn memberships_for_user(&mut self, user_id: Uuid) -> RepoResult<Vec<TeamMembership>> {
        let mut memberships: Vec<TeamMembership> = self
            .working
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.created_at);
        Ok(memberships)
    }

    async fn memberships_for_team(&mut self, team_id: Uuid) -> RepoResult<Vec<TeamMembership>> {
        let mut memberships: Vec<TeamMembership> = self
            .working
            .memberships
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.created_at);
        Ok(memberships)
    }

    async fn members_with_names(&mut self, team_id: Uuid) -> RepoResult<Vec<MemberWithName>> {
        let mut members: Vec<MemberWithName> = Vec::new();
        for membership in self.memberships_for_team(team_id).await? {
            let player_name = self
                .player_for_user(membership.user_id)
                .await?
                .map(|p| p.name);
            members.push(MemberWithName {
                id: membership.id,
                team_id: membership.team_id,
                user_id: membership.user_id,
                role: membership.role,
                created_at: membership.created_at,
                player_name,
            });
        }
        members.sort_by(|a, b| {
            role_rank(a.role)
                .cmp(&role_rank(b.role))
                .then_with(|| match (&a.player_name, &b.player_name) {
                    (Some(x), Some(y)) => x.cmp(y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
        });
        Ok(members)
    }

    async fn insert_membership(&mut self, membership: &TeamMembership) -> RepoResult<()> {
        if self
            .get_membership(membership.team_id, membership.user_id)
            .await?
            .is_some()
        {
            return Err(RepositoryError::AlreadyExists(
                constraints::MEMBERSHIP.to_string(),
            ));
        }
        self.check_role_slot(
            membership.id,
            membership.team_id,
            membership.user_id,
            membership.role,
        )?;
        self.working
            .memberships
            .insert(membership.id, membership.clone());
        Ok(())
    }

    async fn update_membership_role(
        &mut self,
        membership_id: Uuid,
        role: MembershipRole,
    ) -> RepoResult<()> {
        let (team_id, user_id) = self
            .working
            .memberships
            .get(&membership_id)
            .map(|m| (m.team_id, m.user_id))
            .ok_or(RepositoryError::NotFound)?;
        self.check_role_slot(membership_id, team_id, user_id, role)?;
        if let Some(membership) = self.working.memberships.get_mut(&membership_id) {
            membership.role = role;
        }
        Ok(())
    }

    async fn delete_membership(&mut self, membership_id: Uuid) -> RepoResult<()> {
        self.working
            .memberships
            .remove(&membership_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete_memberships_for_team(&mut self, team_id: Uuid) -> RepoResult<u64> {
        let before = self.working.memberships.len();
        self.working.memberships.retain(|_, m| m.team_id != team_id);
        Ok((before - self.working.memberships.len()) as u64)
    }

    async fn lock_roster_request(&mut self, request_id: Uuid) -> RepoResult<Option<RosterRequest>> {
        Ok(self.working.roster_requests.get(&request_id).cloned())
    }

    async fn pending_request_for_user(
        &mut self,
        user_id: Uuid,
    ) -> RepoResult<Option<RosterRequest>> {
        Ok(self
            .working
            .roster_requests
            .values()
            .find(|r| r.user_id == user_id && r.is_pending())
            .cloned())
    }

    async fn pending_requests_for_team(&mut self, team_id: Uuid) -> RepoResult<Vec<RosterRequest>> {
        let mut requests: Vec<RosterRequest> = self
            .working
            .roster_requests
            .values()
            .filter(|r| r.team_id == team_id && r.is_pending())
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.created_at);
        Ok(requests)
    }

    async fn insert_roster_request(&mut self, request: &RosterRequest) -> RepoResult<()> {
        if request.is_pending() && self.pending_request_for_user(request.user_id).await?.is_some()
        {
            return Err(RepositoryError::AlreadyExists(
                constraints::ONE_PENDING_REQUEST.to_string(),
            ));
        }
        self.working
            .roster_requests
            .insert(request.id, request.clone());
        Ok(())
    }

    async fn update_roster_request_status(
        &mut self,
        request_id: Uuid,
        status: RosterRequestStatus,
    ) -> RepoResult<()> {
        let user_id = self
            .working
            .roster_requests
            .get(&request_id)
            .map(|r| r.user_id)
            .ok_or(RepositoryError::NotFound)?;
        if status.is_pending()
            && self
                .working
                .roster_requests
                .values()
                .any(|r| r.id != request_id && r.user_id == user_id && r.is_pending())
        {
            return Err(RepositoryError::AlreadyExists(
                constraints::ONE_PENDING_REQUEST.to_string(),
            ));
        }
        if let Some(request) = self.working.roster_requests.get_mut(&request_id) {
            request.status = status;
            request.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_roster_request(&mut self, request_id: Uuid) -> RepoResult<()> {
        self.working
            .roster_requests
            .remove(&request_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete_roster_requests_for_team(&mut self, team_id: Uuid) -> RepoResult<u64> {
        let before = self.working.roster_requests.len();
        self.working.roster_requests.retain(|_, r| r.team_id != team_id);
        Ok((before - self.working.roster_requests.len()) as u64)
    }

    async fn lock_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Option<Fixture>> {
        Ok(self.working.fixtures.get(&fixture_id).cloned())
    }

    async fn count_fixtures_for_team(&mut self, team_id: Uuid) -> RepoResult<i64> {
        Ok(self
            .working
            .fixtures
            .values()
            .filter(|f| f.involves(team_id))
            .count() as i64)
    }

    async fn insert_fixture(&mut self, fixture: &Fixture) -> RepoResult<()> {
        self.working.fixtures.insert(fixture.id, fixture.clone());
        Ok(())
    }

    async fn update_fixture_schedule(
        &mut self,
        fixture_id: Uuid,
        status: FixtureStatus,
        kick_off: DateTime<Utc>,
    ) -> RepoResult<()> {
        let fixture = self
            .working
            .fixtures
            .get_mut(&fixture_id)
            .ok_or(RepositoryError::NotFound)?;
        fixture.status = status;
        fixture.kick_off = kick_off;
        Ok(())
    }

    async fn get_result(&mut self, result_id: Uuid) -> RepoResult<Option<MatchResult>> {
        Ok(self.working.results.get(&result_id).cloned())
    }

    async fn result_for_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Option<MatchResult>> {
        Ok(self
            .working
            .results
            .values()
            .find(|r| r.fixture_id == fixture_id)
            .cloned())
    }

    async fn goals_for_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Vec<Goal>> {
        Ok(self
            .working
            .goals
            .iter()
            .filter(|g| g.fixture_id == fixture_id)
            .cloned()
            .collect())
    }

    async fn mom_votes_for_fixture(&mut self, fixture_id: Uuid) -> RepoResult<Vec<MomVote>> {
        Ok(self
            .working
            .mom_votes
            .iter()
            .filter(|v| v.fixture_id == fixture_id)
            .cloned()
            .collect())
    }

    async fn insert_result(&mut self, result: &MatchResult) -> RepoResult<()> {
        if self.result_for_fixture(result.fixture_id).await?.is_some() {
            return Err(RepositoryError::AlreadyExists(
                constraints::RESULT_FIXTURE.to_string(),
            ));
        }
        self.working.results.insert(result.id, result.clone());
        Ok(())
    }

    async fn update_result_status(
        &mut self,
        result_id: Uuid,
        status: ResultStatus,
    ) -> RepoResult<()> {
        let result = self
            .working
            .results
            .get_mut(&result_id)
            .ok_or(RepositoryError::NotFound)?;
        result.status = status;
        result.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_goal(&mut self, goal: &Goal) -> RepoResult<()> {
        self.working.goals.push(goal.clone());
        Ok(())
    }

    async fn insert_mom_vote(&mut self, vote: &MomVote) -> RepoResult<()> {
        let duplicate = self.working.mom_votes.iter().any(|v| {
            v.fixture_id == vote.fixture_id && v.voting_team_id == vote.voting_team_id
        });
        if duplicate {
            return Err(RepositoryError::AlreadyExists(
                constraints::MOM_VOTE.to_string(),
            ));
        }
        self.working.mom_votes.push(vote.clone());
        Ok(())
    }

    async fn scored_fixtures(&mut self) -> RepoResult<Vec<ScoredFixture>> {
        Ok(self
            .working
            .results
            .values()
            .filter_map(|result| {
                self.working
                    .fixtures
                    .get(&result.fixture_id)
                    .map(|fixture| ScoredFixture {
                        home_team_id: fixture.home_team_id,
                        away_team_id: fixture.away_team_id,
                        home_score: result.home_score,
                        away_score: result.away_score,
                        status: result.status,
                    })
            })
            .collect())
    }

    async fn scorer_goals(&mut self) -> RepoResult<Vec<ScorerGoal>> {
        let statuses: HashMap<Uuid, ResultStatus> = self
            .working
            .results
            .values()
            .map(|r| (r.fixture_id, r.status))
            .collect();

        Ok(self
            .working
            .goals
            .iter()
            .filter_map(|goal| {
                let player = self.working.players.get(&goal.player_id)?;
                let status = statuses.get(&goal.fixture_id)?;
                Some(ScorerGoal {
                    player_id: player.id,
                    player_name: player.name.clone(),
                    team_id: player.team_id,
                    status: *status,
                })
            })
            .collect())
    }

    async fn get_configuration(&mut self) -> RepoResult<Option<LeagueConfiguration>> {
        Ok(self.working.configuration.clone())
    }

    async fn save_configuration(&mut self, config: &LeagueConfiguration) -> RepoResult<()> {
        self.working.configuration = Some(config.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let MemoryLeagueTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
