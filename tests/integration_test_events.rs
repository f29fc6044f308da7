mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_event(app: &TestApp, auth: &AuthHeaders, capacity: i32, price_cents: i64) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "title": "Tech Fest",
                "description": "Annual college tech fest",
                "category": "TECH",
                "venue": "Main Auditorium",
                "starts_at": (Utc::now() + Duration::days(7)).to_rfc3339(),
                "ends_at": (Utc::now() + Duration::days(7) + Duration::hours(6)).to_rfc3339(),
                "capacity": capacity,
                "price_cents": price_cents
            }).to_string())).unwrap()
    ).await.unwrap()
}

async fn set_event_status(app: &TestApp, event_id: &str, action: &str) -> axum::response::Response {
    let admin = app.login_admin().await;
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/admin/events/{}/{}", event_id, action))
            .header(header::COOKIE, format!("access_token={}", admin.access_token))
            .header("X-CSRF-Token", &admin.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_event_approval_flow() {
    let app = TestApp::new().await;
    app.register("org1", "super-secret-pw", "ORGANIZER").await;
    let auth = app.login("org1", "super-secret-pw").await;

    let res = create_event(&app, &auth, 100, 1500).await;
    assert_eq!(res.status(), StatusCode::OK);
    let event = parse_body(res).await;
    assert_eq!(event["status"], "PENDING");
    let event_id = event["id"].as_str().unwrap().to_string();

    // Pending events are not publicly listed.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/events").body(Body::empty()).unwrap()
    ).await.unwrap();
    let list = parse_body(res).await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    // But they show up in the admin approval queue.
    let admin = app.login_admin().await;
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/admin/events/pending")
            .header(header::COOKIE, format!("access_token={}", admin.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let pending = parse_body(res).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let res = set_event_status(&app, &event_id, "approve").await;
    assert_eq!(res.status(), StatusCode::OK);
    let approved = parse_body(res).await;
    assert_eq!(approved["status"], "APPROVED");

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/events").body(Body::empty()).unwrap()
    ).await.unwrap();
    let list = parse_body(res).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], event_id.as_str());
}

#[tokio::test]
async fn test_rejected_event_stays_hidden() {
    let app = TestApp::new().await;
    app.register("org2", "super-secret-pw", "ORGANIZER").await;
    let auth = app.login("org2", "super-secret-pw").await;

    let res = create_event(&app, &auth, 50, 0).await;
    let event_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = set_event_status(&app, &event_id, "reject").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "REJECTED");

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/events").body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_student_cannot_create_event() {
    let app = TestApp::new().await;
    app.register("student1", "super-secret-pw", "STUDENT").await;
    let auth = app.login("student1", "super-secret-pw").await;

    let res = create_event(&app, &auth, 100, 0).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_cannot_approve_event() {
    let app = TestApp::new().await;
    app.register("org3", "super-secret-pw", "ORGANIZER").await;
    let org_auth = app.login("org3", "super-secret-pw").await;
    let res = create_event(&app, &org_auth, 100, 0).await;
    let event_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    app.register("student2", "super-secret-pw", "STUDENT").await;
    let auth = app.login("student2", "super-secret-pw").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/admin/events/{}/approve", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_event_validation() {
    let app = TestApp::new().await;
    app.register("org4", "super-secret-pw", "ORGANIZER").await;
    let auth = app.login("org4", "super-secret-pw").await;

    let res = create_event(&app, &auth, 0, 0).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "title": "Backwards", "description": "ends before it starts", "category": "TECH",
                "venue": "Nowhere",
                "starts_at": (Utc::now() + Duration::days(2)).to_rfc3339(),
                "ends_at": (Utc::now() + Duration::days(1)).to_rfc3339(),
                "capacity": 10,
                "price_cents": 0
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pending_event_hidden_from_public_get() {
    let app = TestApp::new().await;
    app.register("org5", "super-secret-pw", "ORGANIZER").await;
    let auth = app.login("org5", "super-secret-pw").await;

    let res = create_event(&app, &auth, 100, 0).await;
    let event_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    // Guests get a 404 for an unapproved event.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/events/{}", event_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The owning organizer still sees it.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/events/{}", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_event_requires_ownership() {
    let app = TestApp::new().await;
    app.register("org6", "super-secret-pw", "ORGANIZER").await;
    let owner = app.login("org6", "super-secret-pw").await;
    let res = create_event(&app, &owner, 100, 0).await;
    let event_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    app.register("org7", "super-secret-pw", "ORGANIZER").await;
    let intruder = app.login("org7", "super-secret-pw").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/events/{}", event_id))
            .header(header::COOKIE, format!("access_token={}", intruder.access_token))
            .header("X-CSRF-Token", &intruder.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"title": "Hijacked"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/events/{}", event_id))
            .header(header::COOKIE, format!("access_token={}", owner.access_token))
            .header("X-CSRF-Token", &owner.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"title": "Tech Fest 2.0"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["title"], "Tech Fest 2.0");
}

#[tokio::test]
async fn test_banner_upload_returns_mock_url() {
    let app = TestApp::new().await;
    app.register("org8", "super-secret-pw", "ORGANIZER").await;
    let auth = app.login("org8", "super-secret-pw").await;

    let res = create_event(&app, &auth, 100, 0).await;
    let event_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/banner", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    let banner_url = body["banner_url"].as_str().unwrap();
    assert!(banner_url.contains("cdn.campus-events.local"));
    assert!(banner_url.contains(&event_id));

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/events/{}", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(parse_body(res).await["banner_url"], banner_url);
}
