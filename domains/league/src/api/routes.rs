//! Route definitions for the league API

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use super::handlers::{configuration, matches, players, roster_requests, teams};
use super::middleware::LeagueState;

/// Team lifecycle and membership routes
fn team_routes() -> Router<LeagueState> {
    Router::new()
        .route("/v1/teams", post(teams::create_team))
        .route("/v1/admin/teams", post(teams::create_team_as_admin))
        .route("/v1/admin/teams/{id}/approve", post(teams::approve_team))
        .route("/v1/admin/teams/{id}/reject", post(teams::reject_team))
        .route("/v1/teams/{id}/leave", post(teams::leave_team))
        .route("/v1/teams/{id}/disband", post(teams::disband_team))
        .route("/v1/teams/{id}/members", get(teams::list_members))
        .route(
            "/v1/teams/{id}/members/{user_id}",
            patch(teams::update_member_role),
        )
}

/// Join request routes
fn roster_request_routes() -> Router<LeagueState> {
    Router::new()
        .route(
            "/v1/teams/{id}/join-requests",
            get(roster_requests::list_team_requests).post(roster_requests::create_join_request),
        )
        .route("/v1/me/roster-requests", get(roster_requests::my_requests))
        .route(
            "/v1/roster-requests/{id}",
            delete(roster_requests::cancel_request),
        )
        .route(
            "/v1/roster-requests/{id}/approve",
            post(roster_requests::approve_request),
        )
        .route(
            "/v1/roster-requests/{id}/reject",
            post(roster_requests::reject_request),
        )
}

/// Player roster routes
fn player_routes() -> Router<LeagueState> {
    Router::new()
        .route("/v1/players", post(players::create_player))
        .route("/v1/players/unassigned", get(players::list_unassigned))
        .route("/v1/players/{id}", patch(players::rename_player))
        .route("/v1/players/{id}/release", post(players::release_player))
        .route(
            "/v1/admin/players/{id}",
            delete(players::delete_player),
        )
        .route("/v1/admin/players/{id}/team", put(players::assign_team))
}

/// Fixture, result and standings routes
fn match_routes() -> Router<LeagueState> {
    Router::new()
        .route("/v1/admin/fixtures", post(matches::create_fixture))
        .route("/v1/admin/fixtures/{id}/delay", post(matches::delay_fixture))
        .route("/v1/fixtures/{id}/result", post(matches::submit_result))
        .route(
            "/v1/admin/results/{id}/status",
            put(matches::update_result_status),
        )
        .route("/v1/standings", get(matches::league_table))
        .route("/v1/standings/top-scorers", get(matches::top_scorers))
}

fn configuration_routes() -> Router<LeagueState> {
    Router::new().route(
        "/v1/admin/configuration",
        get(configuration::get_configuration).put(configuration::update_configuration),
    )
}

/// Create all league API routes
pub fn routes() -> Router<LeagueState> {
    Router::new()
        .merge(team_routes())
        .merge(roster_request_routes())
        .merge(player_routes())
        .merge(match_routes())
        .merge(configuration_routes())
}
