use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use projecthub::app::build_app;
use projecthub::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

// ─── Test helpers ───────────────────────────────────────────────────────

fn test_app() -> Router {
    build_app(AppState::fake())
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
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
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
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

async fn signup(app: &Router, email: &str, password: &str) -> (String, Value) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/signup",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"].clone(),
    )
}

fn error_kind(body: &Value) -> &str {
    body["error"]["kind"].as_str().unwrap_or("")
}

// ─── Auth endpoints ─────────────────────────────────────────────────────

#[tokio::test]
async fn signup_returns_token_and_public_user() {
    let app = test_app();
    let (token, user) = signup(&app, "testuser_1@example.com", "password123").await;
    assert!(!token.is_empty());
    assert_eq!(user["email"], "testuser_1@example.com");
    assert!(!user["id"].as_str().unwrap().is_empty());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn signup_rejects_duplicate_email() {
    let app = test_app();
    signup(&app, "dup@example.com", "password123").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/signup",
        None,
        Some(json!({"email": "dup@example.com", "password": "password456"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "duplicate_email");
}

#[tokio::test]
async fn signup_rejects_bad_input() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/signup",
        None,
        Some(json!({"email": "not-an-email", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/signup",
        None,
        Some(json!({"email": "ok@example.com", "password": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_succeeds_then_rejects_wrong_password() {
    let app = test_app();
    signup(&app, "login@example.com", "password123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": "login@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": "login@example.com", "password": "wrongpassword"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(&body), "invalid_credentials");
}

// ─── Token middleware ───────────────────────────────────────────────────

#[tokio::test]
async fn protected_prefix_requires_token() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(&body), "missing_token");
}

#[tokio::test]
async fn non_bearer_credential_is_invalid_token() {
    // the credential after the scheme reaches verification and fails there
    let app = test_app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/users")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bare_scheme_without_credential_counts_as_missing() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/users")
        .header(header::AUTHORIZATION, "Bearer")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_forbidden() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/users",
        Some("not.a.token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_kind(&body), "invalid_token");
}

#[tokio::test]
async fn tampered_token_is_forbidden() {
    let app = test_app();
    let (token, _) = signup(&app, "tamper@example.com", "password123").await;
    let tampered = format!("{token}x");
    let (status, _) = send(&app, Method::GET, "/api/users", Some(&tampered), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ─── User management flow ───────────────────────────────────────────────

#[tokio::test]
async fn full_user_lifecycle() {
    let app = test_app();
    let (token, user) = signup(&app, "lifecycle@example.com", "password123").await;
    let user_id = user["id"].as_str().unwrap().to_string();

    // list contains the new user
    let (status, body) = send(&app, Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&"lifecycle@example.com"));

    // lookups by id and email agree
    let (status, by_id) = send(
        &app,
        Method::GET,
        &format!("/api/users/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, by_email) = send(
        &app,
        Method::GET,
        "/api/users/email/lifecycle@example.com",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["id"], by_email["id"]);

    // password update, then the old password is stale
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/users/password",
        Some(&token),
        Some(json!({
            "email": "lifecycle@example.com",
            "oldPassword": "password123",
            "newPassword": "newPassword123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/users/password",
        Some(&token),
        Some(json!({
            "email": "lifecycle@example.com",
            "oldPassword": "password123",
            "newPassword": "anotherPassword"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(&body), "password_mismatch");

    // login works with the new password only
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": "lifecycle@example.com", "password": "newPassword123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // delete, then the user is gone
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/users/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/users/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_kind(&body), "not_found");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = test_app();
    let (token, _) = signup(&app, "seeker@example.com", "password123").await;
    let (status, _) = send(
        &app,
        Method::GET,
        "/api/users/00000000-0000-0000-0000-000000000000",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_create_endpoint_makes_a_user() {
    let app = test_app();
    let (token, _) = signup(&app, "admin@example.com", "password123").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(&token),
        Some(json!({"email": "made@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "made@example.com");
}

// ─── Projects ───────────────────────────────────────────────────────────

#[tokio::test]
async fn projects_crud_without_token() {
    let app = test_app();
    let (_, user) = signup(&app, "owner@example.com", "password123").await;
    let owner_id = user["id"].as_str().unwrap();

    let (status, project) = send(
        &app,
        Method::POST,
        "/api/projects",
        None,
        Some(json!({"ownerId": owner_id, "name": "alpha", "description": "first"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = project["id"].as_str().unwrap().to_string();

    let (status, list) = send(&app, Method::GET, "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/projects/{project_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "alpha");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/projects/{project_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/projects/{project_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_open() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}
