//! HTTP layer for the league domain
//!
//! Thin handlers over the workflow services; every rule lives in `services`.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::LeagueState;
pub use routes::routes;
