//! End-to-end tests for the REST API through the full router.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use copilot_dash_core::{DailyUsage, Timeframe, UsageBundle};
use copilot_dash_db::Database;
use copilot_dash_server::create_app;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn seeded_app() -> (Router, Database) {
    let db = Database::new_in_memory().await.unwrap();
    db.seed_demo(NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(), 35)
        .await
        .unwrap();
    (create_app(db.clone()), db)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_invalid_timeframe_is_400_everywhere() {
    let (app, _db) = seeded_app().await;
    for uri in [
        "/api/usage?timeframe=30",
        "/api/usage/series?metric=activeUsers&timeframe=30",
        "/api/usage/chat-modes?timeframe=30",
        "/api/usage/models?timeframe=abc",
        "/api/usage/weekly?timeframe=",
        "/api/usage?timeframe=%207%20",
        "/api/usage/models?timeframe=14%20",
        "/api/usage?timeframe=7&timeframe=14",
        "/api/usage/series?metric=activeUsers&timeframe=7&timeframe=7",
    ] {
        let (status, body) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "Bad request", "{uri}");
    }
}

#[tokio::test]
async fn test_summary_defaults_to_28_days() {
    let (app, db) = seeded_app().await;
    let (status, body) = get(app, "/api/usage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeframe"], "28");

    let expected = db.get_usage_summary(Timeframe::FourWeeks).await.unwrap();
    assert_eq!(body, serde_json::to_value(&expected).unwrap());
}

#[tokio::test]
async fn test_empty_database_returns_zeroed_summary() {
    let app = create_app(Database::new_in_memory().await.unwrap());
    let (status, body) = get(app, "/api/usage?timeframe=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ideActiveUsers"], 0);
    assert_eq!(body["agentAdoption"]["percentage"], 0.0);
    assert_eq!(body["mostUsedChatModel"], Value::Null);
}

#[tokio::test]
async fn test_huge_counts_do_not_break_summary() {
    let db = Database::new_in_memory().await.unwrap();
    let big = i64::MAX / 2 + 1;
    let row = |day: u32| DailyUsage {
        date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
        active_users: big,
        total_suggestions: big,
        accepted_suggestions: big,
        chat_requests: big,
        agent_requests: big,
    };
    db.ingest_bundle(&UsageBundle {
        daily_usage: vec![row(30), row(31)],
        ..UsageBundle::default()
    })
    .await
    .unwrap();
    let app = create_app(db);

    let (status, body) = get(app.clone(), "/api/usage?timeframe=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ideActiveUsers"], big);
    assert_eq!(body["acceptanceRate"], 100.0);

    let (status, body) = get(app, "/api/usage/series?metric=chatRequests&timeframe=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_series_requires_known_metric() {
    let (app, _db) = seeded_app().await;

    let (status, body) = get(app.clone(), "/api/usage/series?timeframe=7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "metric is required");

    let (status, _) = get(app.clone(), "/api/usage/series?metric=tokens").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(app, "/api/usage/series?metric=acceptanceRate&timeframe=7").await;
    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 7);
    assert_eq!(points.last().unwrap()["date"], "2024-07-31");
}

#[tokio::test]
async fn test_chat_modes_and_weekly_shapes() {
    let (app, _db) = seeded_app().await;

    let (status, body) = get(app.clone(), "/api/usage/chat-modes?timeframe=14").await;
    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 14);
    for key in ["date", "edit", "ask", "agent", "custom", "inline"] {
        assert!(points[0].get(key).is_some(), "missing {key}");
    }

    let (status, body) = get(app, "/api/usage/weekly?timeframe=14").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_chat_model_question_matches_summary_and_breakdown() {
    let (app, _db) = seeded_app().await;

    let (status, chat) = post_chat(
        app.clone(),
        json!({ "message": "which chat model is most used?", "context": { "timeframe": "14" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chat["intent"], "models");
    assert_eq!(chat["timeframe"], "14");

    let (_, summary) = get(app.clone(), "/api/usage?timeframe=14").await;
    let (_, models) = get(app, "/api/usage/models?timeframe=14").await;

    let answered = &chat["data"]["mostUsedChatModel"];
    assert_eq!(answered, &summary["mostUsedChatModel"]);
    assert_eq!(answered, &models[0]);
    assert!(chat["message"]
        .as_str()
        .unwrap()
        .contains(answered["name"].as_str().unwrap()));
}

#[tokio::test]
async fn test_chat_help_and_validation() {
    let (app, _db) = seeded_app().await;

    let (status, body) = post_chat(app.clone(), json!({ "message": "what's the weather" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "help");
    assert_eq!(body["timeframe"], "28");
    assert!(!body["data"]["examples"].as_array().unwrap().is_empty());

    let (status, _) = post_chat(app.clone(), json!({ "message": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for timeframe in ["30", " 14", "7 "] {
        let (status, _) = post_chat(
            app.clone(),
            json!({ "message": "models", "context": { "timeframe": timeframe } }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{timeframe:?}");
    }

    let (status, body) = send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request");
}

#[tokio::test]
async fn test_chat_intents_route_to_their_reports() {
    let (app, _db) = seeded_app().await;
    let cases = [
        ("how are chat modes split?", "chatModes", "totals"),
        ("what is our agent adoption?", "agentAdoption", "agentAdoption"),
        ("suggestion acceptance rate please", "suggestions", "acceptanceRate"),
        ("how many active users?", "activeUsers", "ideActiveUsers"),
        ("give me a summary", "summary", "windowEnd"),
    ];
    for (message, intent, field) in cases {
        let (status, body) = post_chat(app.clone(), json!({ "message": message })).await;
        assert_eq!(status, StatusCode::OK, "{message}");
        assert_eq!(body["intent"], intent, "{message}");
        assert!(body["data"].get(field).is_some(), "{message}: missing {field}");
    }
}
