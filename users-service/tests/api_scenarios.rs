//! End-to-end scenarios driven through the router

use std::io::Write;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;
use users_service::prelude::*;

const INDEX_HTML: &str = "<!doctype html><title>users</title><h1>Users</h1>";

struct TestApp {
    router: Router,
    _index: NamedTempFile,
}

impl TestApp {
    fn new() -> Self {
        let mut index = NamedTempFile::new().unwrap();
        index.write_all(INDEX_HTML.as_bytes()).unwrap();

        let mut config = Config::default();
        config.static_files.index_path = index.path().to_path_buf();

        let state = AppState::new(config, Arc::new(MemoryCollection::new()));
        Self {
            router: router(state),
            _index: index,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(method, uri, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn create(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/users/create",
                Some(json!({"name": name, "email": email})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "User created successfully");
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_bob_lifecycle() {
    let app = TestApp::new();
    let id = app.create("Bob", "bob@example.com").await;
    assert_eq!(id.len(), 24);

    let (status, user) = app.send(Method::GET, &format!("/users/get?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], id.as_str());
    assert_eq!(user["name"], "Bob");
    assert_eq!(user["email"], "bob@example.com");
    assert_eq!(user["created_at"], user["updated_at"]);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/users/update?id={id}"),
            Some(json!({"name": "Robert"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "success", "message": "User updated successfully"})
    );

    let (_, updated) = app.send(Method::GET, &format!("/users/find?id={id}"), None).await;
    assert_eq!(updated["name"], "Robert");
    assert_eq!(updated["email"], "bob@example.com");
    assert_eq!(updated["created_at"], user["created_at"]);
    assert_ne!(updated["updated_at"], user["updated_at"]);

    let (status, body) = app
        .send(Method::DELETE, &format!("/users/delete?id={id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, body) = app.send(Method::GET, &format!("/users/get?id={id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"status": "fail", "message": "User not found"}));
}

#[tokio::test]
async fn test_filter_pagination() {
    let app = TestApp::new();
    for i in 1..=7 {
        app.create(&format!("user{i}"), &format!("user{i}@example.com"))
            .await;
    }

    let (status, body) = app
        .send(Method::GET, "/users/filter?page=2&limit=3", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["limit"], 3);
    assert_eq!(body["totalUsers"], 7);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["users"].as_array().unwrap().len(), 3);
    assert_eq!(body["users"][0]["name"], "user4");

    let (_, beyond) = app
        .send(Method::GET, "/users/filter?page=5&limit=3", None)
        .await;
    assert_eq!(beyond["users"], json!([]));
    assert_eq!(beyond["totalUsers"], 7);

    let (_, defaults) = app
        .send(Method::GET, "/users/filter?page=abc&limit=-2", None)
        .await;
    assert_eq!(defaults["currentPage"], 1);
    assert_eq!(defaults["limit"], 6);
    assert_eq!(defaults["totalPages"], 2);
}

#[tokio::test]
async fn test_filter_case_insensitive_and_sorted() {
    let app = TestApp::new();
    app.create("Alice", "alice@example.com").await;
    app.create("Bob", "bob@example.org").await;
    app.create("Malice", "malice@example.org").await;

    for needle in ["alice", "ALICE"] {
        let (_, body) = app
            .send(Method::GET, &format!("/users/filter?name={needle}"), None)
            .await;
        assert_eq!(body["totalUsers"], 2);
    }

    let (_, body) = app
        .send(
            Method::GET,
            "/users/filter?name=alice&email=ORG&sort=name&order=desc",
            None,
        )
        .await;
    assert_eq!(body["totalUsers"], 1);
    assert_eq!(body["users"][0]["name"], "Malice");

    let (_, body) = app
        .send(Method::GET, "/users/filter?sort=name&order=desc", None)
        .await;
    let names: Vec<_> = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Malice", "Bob", "Alice"]);
}

#[tokio::test]
async fn test_filter_repeated_key_uses_first_value() {
    let app = TestApp::new();
    app.create("Alice", "alice@example.com").await;
    app.create("Bob", "bob@example.org").await;

    let (status, body) = app
        .send(Method::GET, "/users/filter?name=bob&name=alice", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 1);
    assert_eq!(body["users"][0]["name"], "Bob");
}

#[tokio::test]
async fn test_list_all() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    app.create("Alice", "alice@example.com").await;
    app.create("Alice", "alice@example.com").await;
    let (_, body) = app.send(Method::GET, "/users", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_id_validation() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/users/get", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ID is required");

    let (status, body) = app.send(Method::GET, "/users/find?id=xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ID format");

    let (status, body) = app.send(Method::DELETE, "/users/delete?id=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ID is required");
}

#[tokio::test]
async fn test_create_rejects_invalid_body() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/users/create", Some(json!({"name": "NoEmail"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "fail", "message": "Invalid input data"}));
}

#[tokio::test]
async fn test_update_rejects_immutable_fields() {
    let app = TestApp::new();
    let id = app.create("Bob", "bob@example.com").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/users/update?id={id}"),
            Some(json!({"created_at": "2000-01-01T00:00:00Z"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid input data");
}

// Missing documents surface as 500, same as store failures
#[tokio::test]
async fn test_update_and_delete_missing_user_is_server_error() {
    let app = TestApp::new();
    let missing = ObjectId::new().to_hex();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/users/update?id={missing}"),
            Some(json!({"name": "Ghost"})),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error updating user or user not found");

    let (status, body) = app
        .send(Method::DELETE, &format!("/users/delete?id={missing}"), None)
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error deleting user or user not found");
}

#[tokio::test]
async fn test_wrong_verb_is_method_not_allowed() {
    let app = TestApp::new();
    for (method, uri) in [
        (Method::POST, "/users"),
        (Method::GET, "/users/create"),
        (Method::POST, "/users/get"),
        (Method::GET, "/users/update"),
        (Method::PUT, "/users/delete"),
        (Method::DELETE, "/users/filter"),
        (Method::PUT, "/api"),
    ] {
        let (status, body) = app.send(method.clone(), uri, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
        assert_eq!(
            body,
            json!({"status": "fail", "message": "Method not allowed"})
        );
    }
}

#[tokio::test]
async fn test_api_echo() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data successfully received");

    let (status, _) = app
        .send(Method::POST, "/api", Some(json!({"message": "hi"})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::POST, "/api", Some(json!({"message": 1})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid JSON message");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "users-service");

    let (status, body) = app.send(Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn test_static_page_rate_limited() {
    let app = TestApp::new();

    let (status, page) = app.send_raw(Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, INDEX_HTML.as_bytes());

    let (status, body) = app.send_raw(Method::GET, "/anything/else", None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, b"Rate limit exceeded");

    // API routes do not spend tokens
    let (status, _) = app.send(Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
}
