//! HTTP endpoint integration tests
//!
//! Each test builds the router over a fresh in-memory league and sends
//! requests with tokens signed by the test identity provider secret.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{create_test_jwt, test_config, TestLeague};

fn router(league: &TestLeague) -> Router {
    matchday_app::create_app(&test_config(), league.store.clone())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

mod test_teams {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_create_team_and_duplicate_name() {
        let league = TestLeague::new();
        let app = router(&league);
        let founder = create_test_jwt(Uuid::new_v4(), &["player"]);
        let rival = create_test_jwt(Uuid::new_v4(), &["player"]);
        let body = json!({"name": "Reds", "primary_color": "Red", "secondary_color": "White"});

        let (status, team) = send(&app, Method::POST, "/v1/teams", Some(&founder), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(team["status"], "pending_approval");

        let (status, error) = send(
            &app,
            Method::POST,
            "/v1/teams",
            Some(&rival),
            Some(json!({"name": "reds"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error["error"]["code"], "CONFLICT");
    }

    #[test_log::test(tokio::test)]
    async fn test_authentication_and_admin_gates() {
        let league = TestLeague::new();
        let app = router(&league);
        let body = json!({"name": "Reds", "primary_color": "Red"});

        let (status, _) = send(&app, Method::POST, "/v1/teams", None, Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::POST,
            "/v1/teams",
            Some("not-a-jwt"),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let player = create_test_jwt(Uuid::new_v4(), &["player"]);
        let (status, _) = send(
            &app,
            Method::POST,
            "/v1/admin/teams",
            Some(&player),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = create_test_jwt(Uuid::new_v4(), &["admin"]);
        let (status, team) =
            send(&app, Method::POST, "/v1/admin/teams", Some(&admin), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(team["status"], "approved");
    }

    #[test_log::test(tokio::test)]
    async fn test_invalid_body_is_bad_request() {
        let league = TestLeague::new();
        let app = router(&league);
        let token = create_test_jwt(Uuid::new_v4(), &[]);

        let (status, error) = send(
            &app,
            Method::POST,
            "/v1/teams",
            Some(&token),
            Some(json!({"name": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    }

    #[test_log::test(tokio::test)]
    async fn test_last_leader_cannot_leave() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let app = router(&league);
        let token = create_test_jwt(reds.leader, &[]);

        let (status, error) = send(
            &app,
            Method::POST,
            &format!("/v1/teams/{}/leave", reds.team.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"]["message"]
            .as_str()
            .unwrap()
            .contains("last leader"));

        let (status, members) = send(
            &app,
            Method::GET,
            &format!("/v1/teams/{}/members", reds.team.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(members.as_array().unwrap().len(), 1);
        assert_eq!(members[0]["role"], "leader");
    }
}

mod test_roster_requests {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_join_request_flow() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let app = router(&league);
        let (newcomer, _) = league.free_agent("Newcomer").await;
        let newcomer_token = create_test_jwt(newcomer, &[]);
        let leader_token = create_test_jwt(reds.leader, &[]);

        let (status, request) = send(
            &app,
            Method::POST,
            &format!("/v1/teams/{}/join-requests", reds.team.id),
            Some(&newcomer_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let request_id = request["id"].as_str().unwrap().to_string();

        let (status, mine) = send(
            &app,
            Method::GET,
            "/v1/me/roster-requests",
            Some(&newcomer_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine.as_array().unwrap().len(), 1);

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/v1/teams/{}/join-requests", reds.team.id),
            Some(&newcomer_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let approve = format!("/v1/roster-requests/{}/approve", request_id);
        let (status, approved) = send(&app, Method::POST, &approve, Some(&leader_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(approved["status"], "approved");

        let (status, _) = send(&app, Method::POST, &approve, Some(&leader_token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}

mod test_results {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_result_submission_and_standings() {
        let league = TestLeague::new();
        let reds = league.approved_team("Reds").await;
        let blues = league.approved_team("Blues").await;
        let app = router(&league);
        let admin = create_test_jwt(Uuid::new_v4(), &["admin"]);
        let leader = create_test_jwt(reds.leader, &[]);
        let scorer = reds.leader_player.id;

        let (status, fixture) = send(
            &app,
            Method::POST,
            "/v1/admin/fixtures",
            Some(&admin),
            Some(json!({
                "home_team_id": reds.team.id,
                "away_team_id": blues.team.id,
                "kick_off": chrono::Utc::now(),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let result_uri = format!("/v1/fixtures/{}/result", fixture["id"].as_str().unwrap());

        let (status, error) = send(
            &app,
            Method::POST,
            &result_uri,
            Some(&leader),
            Some(json!({"home_score": 2, "away_score": 0, "goalscorers": [scorer]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");

        let (status, submitted) = send(
            &app,
            Method::POST,
            &result_uri,
            Some(&leader),
            Some(json!({"home_score": 2, "away_score": 0, "goalscorers": [scorer, scorer]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(submitted["result"]["status"], "pending_approval");

        let (status, _) = send(
            &app,
            Method::POST,
            &result_uri,
            Some(&admin),
            Some(json!({"home_score": 0, "away_score": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let result_id = submitted["result"]["id"].as_str().unwrap();
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/v1/admin/results/{}/status", result_id),
            Some(&admin),
            Some(json!({"status": "approved"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, table) = send(&app, Method::GET, "/v1/standings", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(table[0]["team_id"], json!(reds.team.id));
        assert_eq!(table[0]["points"], 3);

        let (status, scorers) = send(
            &app,
            Method::GET,
            "/v1/standings/top-scorers?limit=1",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(scorers.as_array().unwrap().len(), 1);
        assert_eq!(scorers[0]["goals"], 2);
    }

    #[test_log::test(tokio::test)]
    async fn test_configuration_endpoints() {
        let league = TestLeague::new();
        let app = router(&league);
        let admin = create_test_jwt(Uuid::new_v4(), &["admin"]);

        let (status, config) =
            send(&app, Method::GET, "/v1/admin/configuration", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(config["min_players_per_team"], 7);

        let (status, config) = send(
            &app,
            Method::PUT,
            "/v1/admin/configuration",
            Some(&admin),
            Some(json!({
                "min_players_per_team": 5,
                "match_length_minutes": 60,
                "mid_season_transfer_limit": 1,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(config["min_players_per_team"], 5);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/v1/admin/configuration",
            Some(&admin),
            Some(json!({
                "min_players_per_team": 0,
                "match_length_minutes": 60,
                "mid_season_transfer_limit": 1,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
