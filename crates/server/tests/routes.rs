use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let body = match body {
        Some(body) => Body::from(body.to_string()),
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, first_name: &str) -> i64 {
    let email = format!("{first_name}@example.com");
    let (status, _) = send(
        app,
        "POST",
        "/users/create-account",
        Some(json!({
            "firstName": first_name,
            "lastName": "Tester",
            "email": email,
            "password": "goalposts"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/users/login",
        Some(json!({ "email": email, "password": "goalposts" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["user"]["id"].as_i64().unwrap()
}

async fn create_team_event(app: &Router, host_id: i64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/events/create-event",
        Some(json!({
            "title": "Five-a-side",
            "location": "Riverside pitch",
            "date": "2099-06-01",
            "time": "18:30:00",
            "numberOfPlayers": 2,
            "isTeamDistributionEnabled": true,
            "teamDistribution": { "teamOne": 1, "teamTwo": 1 },
            "teamColors": { "teamOneColor": "red", "teamTwoColor": "blue" },
            "hostId": host_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["event"].clone()
}

#[tokio::test]
async fn login_distinguishes_unknown_user_and_bad_password() {
    let app = app().await;
    register(&app, "hana").await;

    let (status, body) = send(
        &app,
        "POST",
        "/users/login",
        Some(json!({ "email": "hana@example.com", "password": "offside" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid password or user");

    let (status, _) = send(
        &app,
        "POST",
        "/users/login",
        Some(json!({ "email": "nobody@example.com", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_account_is_409() {
    let app = app().await;
    register(&app, "hana").await;
    let (status, _) = send(
        &app,
        "POST",
        "/users/create-account",
        Some(json!({
            "firstName": "Hana",
            "lastName": "Again",
            "email": "hana@example.com",
            "password": "x"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn join_flow_over_http() {
    let app = app().await;
    let host = register(&app, "hana").await;
    let guest = register(&app, "gus").await;
    let late = register(&app, "lou").await;
    let event = create_team_event(&app, host).await;
    let event_id = event["id"].as_i64().unwrap();
    let code = event["inviteCode"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/events/validate-invite-code",
        Some(json!({ "inviteCode": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["id"], event_id);

    let (status, body) = send(
        &app,
        "POST",
        "/events/join-event",
        Some(json!({ "eventId": event_id, "userId": guest, "paymentMethod": "card" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["participant"]["teamColor"], "blue");
    assert_eq!(body["participant"]["paid"], false);

    let (status, body) = send(
        &app,
        "POST",
        "/events/join-event",
        Some(json!({ "eventId": event_id, "userId": late, "paymentMethod": "direct" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "teams are already full");

    let (status, body) = send(
        &app,
        "POST",
        "/events/join-event",
        Some(json!({ "eventId": event_id, "userId": guest, "paymentMethod": "direct" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = send(
        &app,
        "POST",
        "/events/update-participant-color",
        Some(json!({ "eventId": event_id, "participant1Id": host, "participant2Id": guest })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/events/event/{event_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let participants = body["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0]["id"], host);
    assert_eq!(participants[0]["teamColor"], "blue");
    assert_eq!(participants[1]["teamColor"], "red");

    let (status, body) = send(&app, "GET", &format!("/events/user-events/{guest}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "POST",
        "/events/leave-event",
        Some(json!({ "eventId": event_id, "userId": guest })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/events/leave-event",
        Some(json!({ "eventId": event_id, "userId": guest })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancelled_event_code_stops_resolving() {
    let app = app().await;
    let host = register(&app, "hana").await;
    let event = create_team_event(&app, host).await;
    let event_id = event["id"].as_i64().unwrap();

    let (status, _) = send(&app, "PUT", &format!("/events/cancel-event/{event_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "PUT", &format!("/events/cancel-event/{event_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "PUT", "/events/cancel-event/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", &format!("/events/event/{event_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["status"], "cancelled");

    let (status, _) = send(
        &app,
        "POST",
        "/events/validate-invite-code",
        Some(json!({ "inviteCode": event["inviteCode"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_requests_are_400() {
    let app = app().await;
    let host = register(&app, "hana").await;
    let event = create_team_event(&app, host).await;
    let guest = register(&app, "gus").await;

    let (status, _) = send(
        &app,
        "POST",
        "/events/join-event",
        Some(json!({ "eventId": event["id"], "userId": guest, "paymentMethod": "cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/events/validate-invite-code",
        Some(json!({ "inviteCode": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_sheet_without_processor_is_a_generic_500() {
    let app = app().await;
    let host = register(&app, "hana").await;
    let (status, body) = send(
        &app,
        "POST",
        "/events/create-event",
        Some(json!({
            "title": "Paid game",
            "location": "Indoor hall",
            "date": "2099-06-01",
            "time": "20:00:00",
            "numberOfPlayers": 10,
            "priceMinor": 750,
            "hostId": host
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = body["event"]["id"].clone();

    let (status, body) = send(
        &app,
        "POST",
        "/payments/payment-sheet",
        Some(json!({ "eventId": event_id })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "internal server error");
}
