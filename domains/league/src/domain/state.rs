//! State machines for league entities
//!
//! Each status enumeration is a closed type and every legal transition is
//! decided here, so workflows never compare raw statuses at call sites.
//! Each state machine defines:
//! - Valid states
//! - Events that trigger transitions
//! - Guard conditions for transitions
//! - Terminal states

use matchday_common::StateError;
use serde::{Deserialize, Serialize};

use crate::domain::entities::MembershipRole;

// ============================================================================
// Team State Machine
// ============================================================================

/// Team approval status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "team_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    PendingApproval,
    Approved,
    Rejected,
}

impl TeamStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PendingApproval => write!(f, "pending_approval"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Events that trigger team status transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TeamEvent {
    Approve,
    Reject,
}

impl std::fmt::Display for TeamEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Guard context for team approval
#[derive(Debug, Clone)]
pub struct TeamGuardContext {
    pub roster_size: i64,
    pub min_players: i32,
    pub has_primary_color: bool,
}

/// Team state machine
pub struct TeamStateMachine;

impl TeamStateMachine {
    pub fn transition(
        current: TeamStatus,
        event: TeamEvent,
        context: Option<&TeamGuardContext>,
    ) -> Result<TeamStatus, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match event {
            TeamEvent::Approve => {
                if let Some(ctx) = context {
                    if ctx.roster_size < i64::from(ctx.min_players) {
                        return Err(StateError::GuardFailed(format!(
                            "Team needs at least {} players to be approved (has {})",
                            ctx.min_players, ctx.roster_size
                        )));
                    }
                    if !ctx.has_primary_color {
                        return Err(StateError::GuardFailed(
                            "Team must have a primary color before approval".to_string(),
                        ));
                    }
                }
                TeamStatus::Approved
            }
            TeamEvent::Reject => TeamStatus::Rejected,
        };

        Ok(next)
    }
}

// ============================================================================
// Roster Request State Machine
// ============================================================================

/// Roster request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "roster_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RosterRequestStatus {
    PendingLeaderApproval,
    /// Awaiting the invited player's answer (invites are modeled, not yet issued)
    PendingPlayerAcceptance,
    Approved,
    Rejected,
    Cancelled,
}

impl RosterRequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::PendingLeaderApproval | Self::PendingPlayerAcceptance
        )
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    pub fn valid_transitions(&self) -> &'static [RosterRequestStatus] {
        match self {
            Self::PendingLeaderApproval => &[Self::Approved, Self::Rejected, Self::Cancelled],
            Self::PendingPlayerAcceptance => &[Self::Rejected, Self::Cancelled],
            Self::Approved | Self::Rejected | Self::Cancelled => &[],
        }
    }
}

impl std::fmt::Display for RosterRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PendingLeaderApproval => write!(f, "pending_leader_approval"),
            Self::PendingPlayerAcceptance => write!(f, "pending_player_acceptance"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Events that trigger roster request transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RosterRequestEvent {
    /// Team management approves a join request
    Approve,
    /// Team management (or the invited player) turns the request down
    Reject,
    /// The requester withdraws
    Cancel,
}

impl std::fmt::Display for RosterRequestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

/// Roster request state machine
pub struct RosterRequestStateMachine;

impl RosterRequestStateMachine {
    pub fn transition(
        current: RosterRequestStatus,
        event: RosterRequestEvent,
    ) -> Result<RosterRequestStatus, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (current, event) {
            (RosterRequestStatus::PendingLeaderApproval, RosterRequestEvent::Approve) => {
                RosterRequestStatus::Approved
            }
            (_, RosterRequestEvent::Reject) => RosterRequestStatus::Rejected,
            (_, RosterRequestEvent::Cancel) => RosterRequestStatus::Cancelled,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    to: RosterRequestStatus::Approved.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }
}

// ============================================================================
// Fixture State Machine
// ============================================================================

/// Fixture status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fixture_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    Scheduled,
    Delayed,
    Completed,
}

impl std::fmt::Display for FixtureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Delayed => write!(f, "delayed"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Events that trigger fixture transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureEvent {
    Delay,
    Complete,
}

impl std::fmt::Display for FixtureEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delay => write!(f, "delay"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Fixture state machine
pub struct FixtureStateMachine;

impl FixtureStateMachine {
    pub fn transition(
        current: FixtureStatus,
        event: FixtureEvent,
    ) -> Result<FixtureStatus, StateError> {
        match (current, event) {
            (FixtureStatus::Completed, _) => {
                Err(StateError::TerminalState(current.to_string()))
            }
            (_, FixtureEvent::Delay) => Ok(FixtureStatus::Delayed),
            (_, FixtureEvent::Complete) => Ok(FixtureStatus::Completed),
        }
    }
}

// ============================================================================
// Result Status
// ============================================================================

/// Match result approval status.
///
/// Administrators may overwrite it freely (manual correction path), so there
/// is no transition table. Only approved results feed standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "result_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    PendingApproval,
    Approved,
    Disputed,
}

impl ResultStatus {
    pub fn counts_toward_standings(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PendingApproval => write!(f, "pending_approval"),
            Self::Approved => write!(f, "approved"),
            Self::Disputed => write!(f, "disputed"),
        }
    }
}

// ============================================================================
// Membership Role Changes
// ============================================================================

/// Outcome of a leader's role-change request for another member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTransition {
    /// Target already holds the requested role
    Unchanged,
    /// Plain overwrite of the target's role
    Overwrite(MembershipRole),
    /// Target becomes Leader and the current Leader becomes AssistantLeader
    Handover,
}

/// Decide how a role change is applied.
///
/// `assistant_taken` is true when a member other than the target already
/// holds the AssistantLeader role.
pub fn plan_role_change(
    current: MembershipRole,
    requested: MembershipRole,
    assistant_taken: bool,
) -> Result<RoleTransition, StateError> {
    if current == requested {
        return Ok(RoleTransition::Unchanged);
    }

    match (current, requested) {
        (MembershipRole::Leader, _) => Err(StateError::GuardFailed(
            "The leader's role can only change through a leadership handover".to_string(),
        )),
        (MembershipRole::AssistantLeader, MembershipRole::Leader) => Ok(RoleTransition::Handover),
        (_, MembershipRole::Leader) => Err(StateError::GuardFailed(
            "Only the assistant leader can be promoted to leader".to_string(),
        )),
        (_, MembershipRole::AssistantLeader) if assistant_taken => {
            Err(StateError::InvalidTransition {
                from: current.to_string(),
                to: requested.to_string(),
                event: "promote (team already has an assistant leader)".to_string(),
            })
        }
        (_, role) => Ok(RoleTransition::Overwrite(role)),
    }
}

// ============================================================================
// Tests
// ============================================================================
