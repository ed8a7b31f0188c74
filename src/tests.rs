//! End-to-end checks of the full router over the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::auth::TokenService;
use crate::routes::create_router;
use crate::state::AppState;
use crate::store::{Collection, DocumentStore, Filter, MemoryDocumentStore};

const SECRET: &str = "router-secret";

struct TestApp {
    state: AppState,
    store: Arc<MemoryDocumentStore>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_secret(Some(SECRET))
    }

    fn with_secret(secret: Option<&str>) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let state = AppState::new(store.clone(), TokenService::new(secret));
        Self { state, store }
    }

    fn router(&self) -> Router {
        create_router(&self.state).with_state(self.state.clone())
    }

    async fn seed(&self, collection: Collection, doc: Value) -> i64 {
        self.store.insert_one(collection, doc.as_object().cloned().unwrap()).await.unwrap()
    }

    async fn token_for(&self, email: &str) -> String {
        let (status, body) = self.send(Method::POST, "/jwt", None, Some(json!({ "email": email }))).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }
}

#[tokio::test]
async fn root_and_health_are_public() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Bistro Boss server is running"));

    let (status, _) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn issue_credential_with_empty_body_is_400() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::POST, "/jwt", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Email is required" }));
}

#[tokio::test]
async fn issue_credential_without_secret_is_500() {
    let app = TestApp::with_secret(None);
    let (status, body) = app.send(Method::POST, "/jwt", None, Some(json!({ "email": "a@x.com" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error generating token" }));
}

#[tokio::test]
async fn protected_routes_need_a_credential() {
    let app = TestApp::new();
    for (method, uri) in [
        (Method::GET, "/users"),
        (Method::GET, "/users/admin/a@x.com"),
        (Method::GET, "/carts?email=a@x.com"),
        (Method::DELETE, "/carts/1"),
        (Method::POST, "/menu"),
    ] {
        let (status, body) = app.send(method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body, json!({ "message": "Unauthorized access" }));
    }
}

#[tokio::test]
async fn admin_route_without_user_record_is_403() {
    let app = TestApp::new();
    let token = app.token_for("a@x.com").await;
    let (status, body) = app.send(Method::GET, "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Unauthorized access" }));
}

#[tokio::test]
async fn non_admin_gets_403_on_every_admin_route() {
    let app = TestApp::new();
    let id = app.seed(Collection::Users, json!({ "email": "member@x.com" })).await;
    let token = app.token_for("member@x.com").await;

    for (method, uri) in [
        (Method::GET, "/users".to_string()),
        (Method::PATCH, format!("/users/admin/{id}")),
        (Method::DELETE, format!("/users/{id}")),
        (Method::POST, "/menu".to_string()),
    ] {
        let (status, _) = app.send(method, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }
}

#[tokio::test]
async fn admin_can_list_promote_and_delete_users() {
    let app = TestApp::new();
    app.seed(Collection::Users, json!({ "email": "boss@x.com", "role": "admin" })).await;
    let member = app.seed(Collection::Users, json!({ "email": "member@x.com" })).await;
    let token = app.token_for("boss@x.com").await;

    let (status, body) = app.send(Method::GET, "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = app.send(Method::PATCH, &format!("/users/admin/{member}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "acknowledged": true, "matchedCount": 1, "modifiedCount": 1 }));

    let (status, body) = app.send(Method::DELETE, &format!("/users/{member}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "acknowledged": true, "deletedCount": 1 }));

    let (status, body) = app.send(Method::DELETE, "/users/not-an-id", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid document id" }));
}

#[tokio::test]
async fn register_user_is_idempotent_by_email_and_cannot_self_promote() {
    let app = TestApp::new();
    let user = json!({ "email": "new@x.com", "name": "New", "role": "admin" });

    let (status, body) = app.send(Method::POST, "/users", None, Some(user.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], json!(true));
    assert!(body["insertedId"].is_i64());

    let (_, body) = app.send(Method::POST, "/users", None, Some(user)).await;
    assert_eq!(body, json!({ "message": "User already exists", "insertedId": null }));

    let stored = app.store.find_one(Collection::Users, &Filter::by_email("new@x.com")).await.unwrap().unwrap();
    assert!(stored.body.get("role").is_none());

    let (status, _) = app.send(Method::POST, "/users", None, Some(json!({ "name": "Anon" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_status_is_self_scoped() {
    let app = TestApp::new();
    app.seed(Collection::Users, json!({ "email": "boss@x.com", "role": "admin" })).await;
    let boss = app.token_for("boss@x.com").await;
    let guest = app.token_for("guest@x.com").await;

    let (status, body) = app.send(Method::GET, "/users/admin/boss@x.com", Some(&boss), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "admin": true }));

    let (status, body) = app.send(Method::GET, "/users/admin/guest@x.com", Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "admin": false }));

    let (status, _) = app.send(Method::GET, "/users/admin/boss@x.com", Some(&guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn cart_read_for_another_email_is_403() {
    let app = TestApp::new();
    let token = app.token_for("b@x.com").await;

    let (status, body) = app.send(Method::GET, "/carts?email=c@x.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Unauthorized access" }));

    let (status, _) = app.send(Method::GET, "/carts", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn cart_read_with_repeated_email_is_403_json() {
    let app = TestApp::new();
    let token = app.token_for("b@x.com").await;

    let (status, body) = app
        .send(Method::GET, "/carts?email=b@x.com&email=c@x.com", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Unauthorized access" }));
}

#[tokio::test]
async fn cart_lifecycle_is_scoped_to_the_caller() {
    let app = TestApp::new();
    let token = app.token_for("b@x.com").await;
    let other = app.seed(Collection::Carts, json!({ "email": "c@x.com", "menuId": 9 })).await;

    let (status, body) = app.send(Method::POST, "/carts", Some(&token), Some(json!({ "menuId": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    let mine = body["insertedId"].as_i64().unwrap();

    let (status, _) = app
        .send(Method::POST, "/carts", Some(&token), Some(json!({ "email": "c@x.com", "menuId": 2 })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send(Method::GET, "/carts?email=b@x.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "_id": mine, "menuId": 1, "email": "b@x.com" }]));

    let (_, body) = app.send(Method::DELETE, &format!("/carts/{other}"), Some(&token), None).await;
    assert_eq!(body["deletedCount"], json!(0));

    let (_, body) = app.send(Method::DELETE, &format!("/carts/{mine}"), Some(&token), None).await;
    assert_eq!(body["deletedCount"], json!(1));
}

#[tokio::test]
async fn menu_and_reviews_are_readable_by_anyone() {
    let app = TestApp::new();
    app.seed(Collection::Menu, json!({ "name": "Soup", "price": 4.5 })).await;
    app.seed(Collection::Reviews, json!({ "rating": 5 })).await;

    let (status, body) = app.send(Method::GET, "/menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], json!("Soup"));

    let (status, body) = app.send(Method::GET, "/reviews", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["rating"], json!(5));
}

#[tokio::test]
async fn admin_can_add_menu_items() {
    let app = TestApp::new();
    app.seed(Collection::Users, json!({ "email": "boss@x.com", "role": "admin" })).await;
    let token = app.token_for("boss@x.com").await;

    let (status, body) = app.send(Method::POST, "/menu", Some(&token), Some(json!({ "name": "Pie" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], json!(true));

    let menu = app.store.find(Collection::Menu, &Filter::all()).await.unwrap();
    assert_eq!(menu.len(), 1);
}
