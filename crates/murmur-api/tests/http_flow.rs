use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use murmur_api::auth::AppStateInner;
use murmur_api::cache::share_cache;
use murmur_api::router::router;
use murmur_db::Database;

fn app(auto_activate: bool) -> (Router, Arc<Database>) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let state = Arc::new(AppStateInner::new(
        db.clone(),
        share_cache(64),
        "test-secret".into(),
        auto_activate,
    ));
    (router(state), db)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn register_and_login(app: &Router, username: &str) -> String {
    let (status, _) = send(
        app,
        post_json("/auth/register", json!({ "username": username, "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        post_json("/auth/login", json!({ "username": username, "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn share_then_list_and_probe() {
    let (app, _) = app(true);
    let token = register_and_login(&app, "Alice").await;
    let status_id = Uuid::new_v4();

    let (status, body) = send(&app, authed("GET", &format!("/statuses/{}/shared", status_id), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shared"], false);

    let (status, _) = send(&app, authed("POST", &format!("/statuses/{}/shares", status_id), &token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, authed("GET", &format!("/statuses/{}/shared", status_id), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shared"], true);

    let (status, body) = send(&app, authed("GET", &format!("/statuses/{}/shares", status_id), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usernames"], json!(["alice"]));
}

#[tokio::test]
async fn malformed_status_id_is_bad_request() {
    let (app, _) = app(true);
    let token = register_and_login(&app, "bob").await;

    let (status, _) = send(&app, authed("POST", "/statuses/not-a-uuid/shares", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, authed("GET", "/statuses/garbage/shares", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn share_routes_require_a_token() {
    let (app, _) = app(true);
    let uri = format!("/statuses/{}/shares", Uuid::new_v4());

    let req = Request::get(&uri).body(Body::empty()).unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, authed("GET", &uri, "not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inactive_and_unknown_accounts_get_the_same_refusal() {
    let (app, db) = app(false);

    let (status, body) = send(
        &app,
        post_json("/auth/register", json!({ "username": "carol", "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["activated"], false);

    let login = json!({ "username": "carol", "password": "hunter2hunter2" });
    let (inactive, _) = send(&app, post_json("/auth/login", login.clone())).await;
    let (unknown, _) = send(
        &app,
        post_json("/auth/login", json!({ "username": "nobody", "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(inactive, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);

    // Fetch the key the way an operator would hand it out.
    let key: String = db
        .with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT activation_key FROM accounts WHERE username = 'carol'",
                [],
                |row| row.get(0),
            )?)
        })
        .unwrap();

    let req = Request::get(format!("/auth/activate?key={}", key)).body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activated"], true);

    let (status, body) = send(&app, post_json("/auth/login", login)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorities"], json!(["ROLE_USER"]));
}

#[tokio::test]
async fn wrong_password_and_duplicate_registration() {
    let (app, _) = app(true);
    register_and_login(&app, "dave").await;

    let (status, _) = send(
        &app,
        post_json("/auth/login", json!({ "username": "DAVE", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post_json("/auth/register", json!({ "username": "Dave", "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
