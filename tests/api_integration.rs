//! End-to-end API integration tests
//!
//! Drive the full router over the in-memory store:
//! - JWT authentication and capability checks
//! - Player, team, event and match flows
//! - Response envelopes and error codes

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use padel_tournament_api::api::{self, AppState};
use padel_tournament_api::auth::jwt::create_token;
use padel_tournament_api::domain::access::Capability;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot
use uuid::Uuid;

use common::*;

const SECRET: &str = "test-secret";

fn setup_app() -> Router {
    api::router(AppState::new(services(), SECRET))
}

fn token(capabilities: &[Capability]) -> String {
    create_token(Uuid::new_v4(), capabilities, SECRET).unwrap()
}

fn admin_token() -> String {
    token(&ALL_CAPABILITIES)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn player_payload(tag: &str, company: &str) -> Value {
    json!({
        "firstName": format!("Prenom{}", tag),
        "lastName": format!("Nom{}", tag),
        "email": format!("{}@example.com", tag),
        "company": company,
        "licenseNumber": format!("LIC-{}", tag),
    })
}

/// Registers two players and pairs them, returning the team id
async fn create_team(app: &Router, token: &str, company: &str, tag: &str) -> i64 {
    let mut ids = Vec::new();
    for n in 1..=2 {
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/players",
            Some(token),
            Some(player_payload(&format!("{}-{}", tag, n), company)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/teams",
        Some(token),
        Some(json!({ "company": company, "player1Id": ids[0], "player2Id": ids[1] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_mutation_without_token_is_unauthorized() {
    let app = setup_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/players",
        None,
        Some(player_payload("a", "Acme")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = setup_app();
    let forged = create_token(Uuid::new_v4(), &ALL_CAPABILITIES, "other-secret").unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/players",
        Some(&forged),
        Some(player_payload("a", "Acme")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_capability_is_forbidden() {
    let app = setup_app();
    let planner = token(&[Capability::ManageEvents]);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/players",
        Some(&planner),
        Some(player_payload("a", "Acme")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_reads_are_public() {
    let app = setup_app();

    let (status, body) = send(&app, "GET", "/api/v1/teams", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": [] }));

    let (status, _) = send(&app, "GET", "/api/v1/results/rankings", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_event_flow_and_schedule_conflict() {
    let app = setup_app();
    let admin = admin_token();
    let acme = create_team(&app, &admin, "Acme", "a").await;
    let globex = create_team(&app, &admin, "Globex", "g").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/events",
        Some(&admin),
        Some(json!({
            "eventDate": "2025-06-12",
            "eventTime": "18:00",
            "matches": [{ "courtNumber": 1, "team1Id": acme, "team2Id": globex }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["eventTime"], "18:00");
    assert_eq!(body["data"]["matches"][0]["status"], "ONGOING");
    assert_eq!(body["data"]["matches"][0]["team1"]["company"], "Acme");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/events",
        Some(&admin),
        Some(json!({
            "eventDate": "2025-06-12",
            "eventTime": "18:45",
            "matches": [{ "courtNumber": 2, "team1Id": acme, "team2Id": globex }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "SCHEDULE_CONFLICT");

    let (status, body) = send(&app, "GET", "/api/v1/events?month=2025-06", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/v1/events?month=2025-07", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_match_placement_reports_court_clash() {
    let app = setup_app();
    let admin = admin_token();
    let teams = [
        create_team(&app, &admin, "Acme", "a").await,
        create_team(&app, &admin, "Globex", "g").await,
        create_team(&app, &admin, "Initech", "i").await,
        create_team(&app, &admin, "Umbrella", "u").await,
    ];

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/matches",
        Some(&admin),
        Some(json!({
            "date": "2025-06-20",
            "time": "19:00",
            "courtNumber": 1,
            "team1Id": teams[0],
            "team2Id": teams[1]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["event"]["eventTime"], "19:00");
    let match_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/matches",
        Some(&admin),
        Some(json!({
            "date": "2025-06-20",
            "time": "19:00",
            "courtNumber": 1,
            "team1Id": teams[2],
            "team2Id": teams[3]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "COURT_TAKEN");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/matches/{}/score", match_id),
        Some(&admin),
        Some(json!({ "scoreTeam1": "6-4, 4-6", "scoreTeam2": "4-6, 6-4" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "THIRD_SET_REQUIRED");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/matches/{}/score", match_id),
        Some(&admin),
        Some(json!({ "scoreTeam1": "6-4, 4-6, 7-5", "scoreTeam2": "4-6, 6-4, 5-7" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "COMPLETED");

    let (_, body) = send(&app, "GET", "/api/v1/results/rankings", None, None).await;
    assert_eq!(body["data"]["ranking"][0]["company"], "Acme");
    assert_eq!(body["data"]["ranking"][0]["points"], 3);
}

#[tokio::test]
async fn test_delete_returns_no_content() {
    let app = setup_app();
    let admin = admin_token();

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/players",
        Some(&admin),
        Some(player_payload("solo", "Acme")),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/players/{}", id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_requests_are_bad_requests() {
    let app = setup_app();
    let admin = admin_token();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/events",
        Some(&admin),
        Some(json!({ "eventDate": "2025-06-12", "eventTime": "6pm", "matches": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "GET", "/api/v1/events?start=2025-06-01", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/v1/events?month=June", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_personal_views_require_authentication() {
    let app = setup_app();

    let (status, _) = send(&app, "GET", "/api/v1/results/my-results", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/v1/matches?mine=true", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A valid account without a player profile
    let viewer = token(&[]);
    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/results/my-results",
        Some(&viewer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Profil joueur introuvable");
}

#[tokio::test]
async fn test_non_numeric_id_is_a_bad_request() {
    let app = setup_app();

    let (status, body) = send(&app, "GET", "/api/v1/players/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "ID invalide");

    let admin = admin_token();
    let (status, body) = send(&app, "DELETE", "/api/v1/teams/1.5", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "ID invalide");
}

#[tokio::test]
async fn test_admin_stats_dashboard() {
    let app = setup_app();
    let admin = admin_token();
    create_team(&app, &admin, "Acme", "a").await;

    let (status, body) = send(&app, "GET", "/api/v1/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!({ "players": 2, "teams": 1, "pools": 0, "matches": 0 }));

    let manager = token(&[Capability::ManageTeams, Capability::ManagePlayers]);
    let (status, _) = send(&app, "GET", "/api/v1/admin/stats", Some(&manager), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/v1/admin/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_with_privileges_of_other_services_is_accepted() {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use padel_tournament_api::auth::jwt::Claims;

    let app = setup_app();
    let claims = Claims {
        sub: Uuid::new_v4(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
        privileges: ["MANAGE_ACCOUNTS", "MANAGE_PLAYERS", "MANAGE_USERS", "MANAGE_PLANNING"]
            .iter()
            .map(|name| name.to_string())
            .collect(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/players",
        Some(&token),
        Some(player_payload("x", "Acme")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, "GET", "/api/v1/admin/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_player_birth_date_is_kept_and_checked() {
    let app = setup_app();
    let admin = admin_token();

    let mut payload = player_payload("b", "Acme");
    payload["birthDate"] = json!("1990-04-12");
    let (status, body) = send(&app, "POST", "/api/v1/players", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["birthDate"], "1990-04-12");

    let (_, body) = send(&app, "POST", "/api/v1/players", Some(&admin), Some(player_payload("c", "Acme"))).await;
    assert_eq!(body["data"]["birthDate"], Value::Null);

    let mut payload = player_payload("d", "Acme");
    payload["birthDate"] = json!("2999-01-01");
    let (status, body) = send(&app, "POST", "/api/v1/players", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "La date de naissance ne peut pas être dans le futur"
    );
}
