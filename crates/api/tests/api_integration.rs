//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use domain::{EventKind, PaginationConfig};
use events::{BroadcastPublisher, DispatchConfig, InMemoryEventLog, PublishDispatcher};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::InMemoryUserRepository;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    router: axum::Router,
    repository: InMemoryUserRepository,
    event_log: InMemoryEventLog,
}

fn setup() -> TestApp {
    let repository = InMemoryUserRepository::new();
    let event_log = InMemoryEventLog::new();
    let dispatcher = Arc::new(PublishDispatcher::spawn(
        BroadcastPublisher::default(),
        DispatchConfig::default(),
    ));
    let state = api::create_state(
        repository.clone(),
        event_log.clone(),
        dispatcher,
        PaginationConfig::default(),
    );

    TestApp {
        router: api::create_app(state, get_metrics_handle()),
        repository,
        event_log,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn send_json(&self, method: &str, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
    }

    async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Creates a user through the API and returns its id.
    async fn create_user(&self, first_name: &str, email: &str, country: &str) -> String {
        let response = self
            .send_json(
                "POST",
                "/users",
                serde_json::json!({
                    "first_name": first_name,
                    "last_name": "Doe",
                    "nickname": first_name.to_lowercase(),
                    "password": "s3cret",
                    "email": email,
                    "country": country,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_user() {
    let app = setup();

    let response = app
        .send_json(
            "POST",
            "/users",
            serde_json::json!({
                "first_name": "John",
                "last_name": "Doe",
                "nickname": "jd",
                "password": "s3cret",
                "email": "john@doe.com",
                "country": "UK",
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["email"], "john@doe.com");
    assert_eq!(json["created_at"], json["updated_at"]);
    assert!(json.get("password").is_none());
    assert!(json.get("password_hash").is_none());
    assert_eq!(app.repository.len().await, 1);
}

#[tokio::test]
async fn test_create_user_without_email_is_bad_request() {
    let app = setup();

    let response = app
        .send_json(
            "POST",
            "/users",
            serde_json::json!({ "first_name": "John", "password": "pw" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Email is required");
    assert!(app.repository.is_empty().await);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = setup();
    app.create_user("John", "john@doe.com", "UK").await;

    let response = app
        .send_json(
            "POST",
            "/users",
            serde_json::json!({ "first_name": "Jim", "email": "john@doe.com" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.repository.len().await, 1);
}

#[tokio::test]
async fn test_list_users_with_filter_and_pagination() {
    let app = setup();
    app.create_user("John", "john@doe.com", "US").await;
    app.create_user("John", "john2@doe.com", "UK").await;
    app.create_user("Jane", "jane@doe.com", "UK").await;

    let response = app.get("/users?first_name=John&country=UK").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let users = json["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "john2@doe.com");

    let response = app.get("/users?limit=2&offset=2").await;
    let json = body_json(response).await;
    let users = json["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "jane@doe.com");

    let response = app.get("/users").await;
    let json = body_json(response).await;
    assert_eq!(json["users"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_users_negative_offset_is_bad_request() {
    let app = setup();

    let response = app.get("/users?offset=-1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_modify_user() {
    let app = setup();
    let id = app.create_user("John", "john@doe.com", "UK").await;

    let response = app
        .send_json(
            "PATCH",
            &format!("/users/{id}"),
            serde_json::json!({ "country": "PL" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(app.get("/users?email=john@doe.com").await).await;
    let user = &json["users"][0];
    assert_eq!(user["country"], "PL");
    assert_eq!(user["first_name"], "John");
}

#[tokio::test]
async fn test_modify_unknown_user_is_not_found() {
    let app = setup();

    let response = app
        .send_json(
            "PATCH",
            "/users/5f0c1a9e-6f3a-4a0e-9d2c-1b7f3c9e8a11",
            serde_json::json!({ "nickname": "x" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user() {
    let app = setup();
    let id = app.create_user("John", "john@doe.com", "UK").await;
    app.create_user("Jane", "jane@doe.com", "UK").await;

    let response = app.delete(&format!("/users/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.repository.len().await, 1);

    let again = app.delete(&format!("/users/{id}")).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_user_id_format() {
    let app = setup();

    let response = app.delete("/users/not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid user ID format")
    );
    assert!(app.event_log.is_empty().await);
}

#[tokio::test]
async fn test_commands_are_logged_as_events() {
    let app = setup();
    let id = app.create_user("John", "john@doe.com", "UK").await;
    app.send_json(
        "PATCH",
        &format!("/users/{id}"),
        serde_json::json!({ "nickname": "johnny" }),
    )
    .await;
    app.delete(&format!("/users/{id}")).await;
    app.get("/users").await;

    let kinds: Vec<EventKind> = app
        .event_log
        .events()
        .await
        .iter()
        .map(|logged| logged.event.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::UserAdded,
            EventKind::UserModified,
            EventKind::UserDeleted
        ]
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    app.create_user("John", "john@doe.com", "UK").await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("commands_total"));
    assert!(text.contains("events_logged_total"));
}
