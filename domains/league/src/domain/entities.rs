//! Domain entities for the league
//!
//! Teams, players and memberships form the roster graph; fixtures own at most
//! one result, and a result owns the goals and MOM votes created with it.

use chrono::{DateTime, Utc};
use matchday_common::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::state::{FixtureStatus, ResultStatus, RosterRequestStatus, TeamStatus};
use crate::domain::validation::{validate_color, validate_player_name, validate_team_name};

/// Team entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub status: TeamStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a team awaiting league approval
    pub fn new(
        name: String,
        primary_color: Option<String>,
        secondary_color: Option<String>,
    ) -> Result<Self> {
        let name = name.trim().to_string();
        validate_team_name(&name)?;
        for color in primary_color.iter().chain(secondary_color.iter()) {
            validate_color(color)?;
        }

        let now = Utc::now();
        Ok(Team {
            id: Uuid::new_v4(),
            name,
            primary_color,
            secondary_color,
            status: TeamStatus::PendingApproval,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a team that skips the approval queue (admin-created)
    pub fn new_approved(
        name: String,
        primary_color: Option<String>,
        secondary_color: Option<String>,
    ) -> Result<Self> {
        let mut team = Self::new(name, primary_color, secondary_color)?;
        team.status = TeamStatus::Approved;
        Ok(team)
    }

    pub fn is_approved(&self) -> bool {
        self.status == TeamStatus::Approved
    }

    pub fn has_primary_color(&self) -> bool {
        self.primary_color
            .as_deref()
            .is_some_and(|color| !color.trim().is_empty())
    }
}

/// Player entity.
///
/// `user_id` is a soft back-reference to a registered account; a player
/// without one is a roster-only entry managed by team leadership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub team_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Roster-only player with no user account
    pub fn new_unlinked(name: String, team_id: Option<Uuid>) -> Result<Self> {
        let name = name.trim().to_string();
        validate_player_name(&name)?;
        Ok(Player {
            id: Uuid::new_v4(),
            name,
            team_id,
            user_id: None,
            created_at: Utc::now(),
        })
    }

    /// Player profile owned by a registered user
    pub fn new_for_user(name: String, user_id: Uuid, team_id: Option<Uuid>) -> Result<Self> {
        let mut player = Self::new_unlinked(name, team_id)?;
        player.user_id = Some(user_id);
        Ok(player)
    }

    pub fn is_linked(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn plays_for(&self, team_id: Uuid) -> bool {
        self.team_id == Some(team_id)
    }
}

/// Membership roles within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "membership_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    Leader,
    AssistantLeader,
    #[default]
    Member,
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipRole::Leader => write!(f, "leader"),
            MembershipRole::AssistantLeader => write!(f, "assistant_leader"),
            MembershipRole::Member => write!(f, "member"),
        }
    }
}

impl MembershipRole {
    /// Leader and AssistantLeader share roster and result authority
    pub fn can_manage(&self) -> bool {
        matches!(self, MembershipRole::Leader | MembershipRole::AssistantLeader)
    }

    pub fn is_leader(&self) -> bool {
        matches!(self, MembershipRole::Leader)
    }
}

/// Membership entity - association between a user and a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMembership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub role: MembershipRole,
    pub created_at: DateTime<Utc>,
}

impl TeamMembership {
    pub fn new(team_id: Uuid, user_id: Uuid, role: MembershipRole) -> Self {
        TeamMembership {
            id: Uuid::new_v4(),
            user_id,
            team_id,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Kind of roster request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "roster_request_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RosterRequestType {
    /// Player asks to join; team leadership decides
    JoinRequest,
    /// Team asks a player to join; the player decides
    Invite,
}

/// Roster request entity - proposal to link a user to a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RosterRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub request_type: RosterRequestType,
    pub status: RosterRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RosterRequest {
    pub fn new_join_request(user_id: Uuid, team_id: Uuid) -> Self {
        let now = Utc::now();
        RosterRequest {
            id: Uuid::new_v4(),
            user_id,
            team_id,
            request_type: RosterRequestType::JoinRequest,
            status: RosterRequestStatus::PendingLeaderApproval,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}

/// Fixture entity - a scheduled match between two distinct teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Fixture {
    pub id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub kick_off: DateTime<Utc>,
    pub status: FixtureStatus,
    pub location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Fixture {
    pub fn new(
        home_team_id: Uuid,
        away_team_id: Uuid,
        kick_off: DateTime<Utc>,
        location_id: Option<Uuid>,
    ) -> Result<Self> {
        if home_team_id == away_team_id {
            return Err(Error::Validation(
                "A team cannot play against itself".to_string(),
            ));
        }
        Ok(Fixture {
            id: Uuid::new_v4(),
            home_team_id,
            away_team_id,
            kick_off,
            status: FixtureStatus::Scheduled,
            location_id,
            created_at: Utc::now(),
        })
    }

    pub fn involves(&self, team_id: Uuid) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// The other side of the fixture, if `team_id` is one of the two teams
    pub fn opponent_of(&self, team_id: Uuid) -> Option<Uuid> {
        if team_id == self.home_team_id {
            Some(self.away_team_id)
        } else if team_id == self.away_team_id {
            Some(self.home_team_id)
        } else {
            None
        }
    }
}

/// Result of a fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchResult {
    pub id: Uuid,
    pub fixture_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
    pub status: ResultStatus,
    pub submitted_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Highest score one side may be credited with in a single match
pub const MAX_SCORE: i32 = 99;

impl MatchResult {
    pub fn new(fixture_id: Uuid, home_score: i32, away_score: i32, submitted_by: Uuid) -> Result<Self> {
        if home_score < 0 || away_score < 0 {
            return Err(Error::Validation("Scores cannot be negative".to_string()));
        }
        if home_score > MAX_SCORE || away_score > MAX_SCORE {
            return Err(Error::Validation(format!(
                "Scores cannot exceed {}",
                MAX_SCORE
            )));
        }
        let now = Utc::now();
        Ok(MatchResult {
            id: Uuid::new_v4(),
            fixture_id,
            home_score,
            away_score,
            status: ResultStatus::PendingApproval,
            submitted_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn total_goals(&self) -> Result<usize> {
        self.home_score
            .checked_add(self.away_score)
            .and_then(|total| usize::try_from(total).ok())
            .ok_or_else(|| Error::Validation("Score total is out of range".to_string()))
    }
}

/// One scored goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub player_id: Uuid,
    pub fixture_id: Uuid,
}

impl Goal {
    pub fn new(fixture_id: Uuid, player_id: Uuid) -> Self {
        Goal {
            id: Uuid::new_v4(),
            player_id,
            fixture_id,
        }
    }
}

/// Man-of-the-match vote cast by one competing team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MomVote {
    pub id: Uuid,
    pub fixture_id: Uuid,
    pub voting_team_id: Uuid,
    pub voted_for_own_player_id: Uuid,
    pub voted_for_opponent_player_id: Uuid,
}

impl MomVote {
    pub fn new(
        fixture_id: Uuid,
        voting_team_id: Uuid,
        voted_for_own_player_id: Uuid,
        voted_for_opponent_player_id: Uuid,
    ) -> Self {
        MomVote {
            id: Uuid::new_v4(),
            fixture_id,
            voting_team_id,
            voted_for_own_player_id,
            voted_for_opponent_player_id,
        }
    }
}

/// Default minimum roster size for team approval
pub const DEFAULT_MIN_PLAYERS_PER_TEAM: i32 = 7;

/// Default match length
pub const DEFAULT_MATCH_LENGTH_MINUTES: i32 = 90;

/// Default number of mid-season transfers a team may make
pub const DEFAULT_MID_SEASON_TRANSFER_LIMIT: i32 = 2;

/// League-wide settings (singleton row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeagueConfiguration {
    pub min_players_per_team: i32,
    pub match_length_minutes: i32,
    pub mid_season_transfer_limit: i32,
    /// Reserved: stored but not enforced by roster operations yet
    pub roster_lock_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Default for LeagueConfiguration {
    fn default() -> Self {
        LeagueConfiguration {
            min_players_per_team: DEFAULT_MIN_PLAYERS_PER_TEAM,
            match_length_minutes: DEFAULT_MATCH_LENGTH_MINUTES,
            mid_season_transfer_limit: DEFAULT_MID_SEASON_TRANSFER_LIMIT,
            roster_lock_date: None,
            updated_at: Utc::now(),
        }
    }
}

impl LeagueConfiguration {
    pub fn validate(&self) -> Result<()> {
        if self.min_players_per_team < 1 {
            return Err(Error::Validation(
                "Minimum players per team must be at least 1".to_string(),
            ));
        }
        if self.match_length_minutes < 1 {
            return Err(Error::Validation(
                "Match length must be a positive number of minutes".to_string(),
            ));
        }
        if self.mid_season_transfer_limit < 0 {
            return Err(Error::Validation(
                "Mid-season transfer limit cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}
