//! Shared fixtures for integration tests
//!
//! Every fixture is built through the public workflows, so the league state
//! a test starts from is one the system itself could have produced.

use std::sync::Arc;

use matchday_auth::{Actor, LeagueClaims};
use matchday_common::config::Config;
use matchday_league::services::{fixtures, players, roster_requests, team_lifecycle};
use matchday_league::{
    Fixture, LeagueStore, MemoryLeagueStore, Player, Team, TeamMembership,
    DEFAULT_MIN_PLAYERS_PER_TEAM,
};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// A fresh in-memory league with an administrator
pub struct TestLeague {
    pub store: Arc<MemoryLeagueStore>,
    pub admin: Actor,
}

/// An approved team and its leader
pub struct TestTeam {
    pub team: Team,
    pub leader: Uuid,
    pub leader_player: Player,
}

impl TestLeague {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryLeagueStore::new()),
            admin: Actor::admin(Uuid::new_v4()),
        }
    }

    pub fn store(&self) -> &dyn LeagueStore {
        self.store.as_ref()
    }

    /// A user with a player profile and no team
    pub async fn free_agent(&self, name: &str) -> (Uuid, Player) {
        let user_id = Uuid::new_v4();
        let player = players::create_player(self.store(), &Actor::user(user_id), name.to_string(), None)
            .await
            .unwrap();
        (user_id, player)
    }

    /// Register a team, fill its roster to the minimum and have it approved
    pub async fn approved_team(&self, name: &str) -> TestTeam {
        let (leader, _) = self.free_agent(&format!("{} Captain", name)).await;
        let actor = Actor::user(leader);
        let team = team_lifecycle::create_team(
            self.store(),
            &actor,
            team_lifecycle::NewTeam {
                name: name.to_string(),
                primary_color: Some("Red".to_string()),
                secondary_color: Some("White".to_string()),
            },
        )
        .await
        .unwrap();

        for n in 1..DEFAULT_MIN_PLAYERS_PER_TEAM {
            players::create_player(
                self.store(),
                &actor,
                format!("{} Player {}", name, n),
                Some(team.id),
            )
            .await
            .unwrap();
        }

        let team = team_lifecycle::approve_team(self.store(), &self.admin, team.id)
            .await
            .unwrap();
        let leader_player = self.player_of(leader).await.unwrap();
        TestTeam {
            team,
            leader,
            leader_player,
        }
    }

    /// Join a new user to the team through a request approved by its leader
    pub async fn join(&self, team: &TestTeam, name: &str) -> (Uuid, Player) {
        let (user_id, _) = self.free_agent(name).await;
        let request =
            roster_requests::create_join_request(self.store(), &Actor::user(user_id), team.team.id)
                .await
                .unwrap();
        roster_requests::approve_join_request(self.store(), &Actor::user(team.leader), request.id)
            .await
            .unwrap();
        let player = self.player_of(user_id).await.unwrap();
        (user_id, player)
    }

    pub async fn fixture(&self, home: &TestTeam, away: &TestTeam) -> Fixture {
        fixtures::create_fixture(
            self.store(),
            &self.admin,
            home.team.id,
            away.team.id,
            chrono::Utc::now(),
            None,
        )
        .await
        .unwrap()
    }

    pub async fn player_of(&self, user_id: Uuid) -> Option<Player> {
        let mut tx = self.store().begin().await.unwrap();
        tx.player_for_user(user_id).await.unwrap()
    }

    pub async fn memberships(&self, team_id: Uuid) -> Vec<TeamMembership> {
        let mut tx = self.store().begin().await.unwrap();
        tx.memberships_for_team(team_id).await.unwrap()
    }

    pub async fn leader_count(&self, team_id: Uuid) -> usize {
        self.memberships(team_id)
            .await
            .iter()
            .filter(|m| m.role.is_leader())
            .count()
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_issuer: None,
        jwt_audience: None,
        admin_role: "admin".to_string(),
        rust_log: "matchday=debug".to_string(),
        port: 0,
    }
}

/// Sign a bearer token the way the identity provider would
pub fn create_test_jwt(user_id: Uuid, roles: &[&str]) -> String {
    use jsonwebtoken::{Algorithm, EncodingKey, Header};

    let now = chrono::Utc::now().timestamp() as u64;
    let claims = LeagueClaims {
        sub: user_id.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        iat: now,
        exp: now + 3600,
        aud: None,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}
