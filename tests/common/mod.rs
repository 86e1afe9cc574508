#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    middleware::Logger,
    test, web, App, Error,
};
use planboard::{auth::TokenService, models::Role, routes, store::MemoryStore, AppState};
use serde_json::{json, Value};
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";

/// Lowest cost bcrypt accepts; keeps hashing cheap in tests.
pub const TEST_COST: u32 = 4;

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new(TEST_COST))
}

/// The full application on top of `store`, wired exactly as in `main`.
pub async fn init_app(
    store: Arc<MemoryStore>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let tokens = TokenService::new(SECRET);
    test::init_service(
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(AppState::new(store, tokens.clone())))
            .configure(move |cfg| routes::config(cfg, tokens)),
    )
    .await
}

/// Sends `req` and returns the status with the parsed body (`Null` when empty or not JSON).
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn authed(req: test::TestRequest, token: &str) -> Request {
    req.insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request()
}

/// Registers `username` with a derived email and returns `(token, user_id)`.
pub async fn register<S, B>(app: &S, username: &str) -> (String, Uuid)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123"
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register {}: {}", username, body);

    let token = body["data"]["token"].as_str().unwrap().to_string();
    let id = body["data"]["user"]["id"].as_str().unwrap().parse().unwrap();
    (token, id)
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    send(app, req).await
}

/// Registers `username`, promotes it to admin and logs in again so the token carries the role.
pub async fn register_admin<S, B>(app: &S, store: &MemoryStore, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let (_, id) = register(app, username).await;
    assert!(store.set_role(id, Role::Admin).await);

    let (status, body) = login(app, username, "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["role"], "admin");
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Creates a project and returns its id.
pub async fn create_project<S, B>(app: &S, token: &str, name: &str) -> Uuid
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = authed(
        test::TestRequest::post()
            .uri("/api/projects")
            .set_json(json!({ "name": name })),
        token,
    );
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create project: {}", body);
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}

/// Creates a task in `project_id` and returns its id.
pub async fn create_task<S, B>(app: &S, token: &str, project_id: Uuid, title: &str) -> Uuid
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = authed(
        test::TestRequest::post()
            .uri("/api/tasks")
            .set_json(json!({ "title": title, "project_id": project_id })),
        token,
    );
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create task: {}", body);
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}
