//! League domain: teams, rosters, roster requests, fixtures, results, standings

pub mod api;
pub mod domain;
pub mod repository;
pub mod services;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::standings::{StandingRow, TopScorer};
pub use domain::state::{
    FixtureEvent, FixtureStateMachine, FixtureStatus, ResultStatus, RosterRequestEvent,
    RosterRequestStateMachine, RosterRequestStatus, TeamEvent, TeamStateMachine, TeamStatus,
};

// Re-export repository types
pub use repository::{LeagueStore, LeagueTx, MemberWithName, MemoryLeagueStore, PgLeagueStore};

// Re-export API types
pub use api::routes;
pub use api::LeagueState;
