#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use serde_json::{json, Value};
use task_manager_server::auth::{AuthMiddleware, TokenService};
use task_manager_server::{routes, Store};

pub const TEST_SECRET: &[u8] = b"integration_test_secret";

/// Shared state behind a test app, kept so tests can inspect the store directly.
pub struct TestState {
    pub store: web::Data<Store>,
    pub tokens: web::Data<TokenService>,
}

impl TestState {
    pub fn new() -> Self {
        Self {
            store: web::Data::new(Store::in_memory()),
            tokens: web::Data::new(TokenService::new(TEST_SECRET)),
        }
    }
}

/// Builds the application the same way `main.rs` does, over an in-memory store.
pub async fn init_app(
    state: &TestState,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(state.store.clone())
            .app_data(state.tokens.clone())
            .wrap(AuthMiddleware)
            .wrap(routes::cors())
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

/// Obtains a token from `POST /jwt`.
pub async fn issue_token(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    claims: Value,
) -> String {
    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(&claims)
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    body["token"]
        .as_str()
        .expect("`/jwt` should answer with a token")
        .to_string()
}

/// Creates a task through the authenticated route and returns its id.
pub async fn create_task(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    token: &str,
    task: Value,
) -> String {
    let req = test::TestRequest::post()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(&task)
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    assert_eq!(body["acknowledged"], json!(true), "unexpected insert result: {}", body);
    body["insertedId"]
        .as_str()
        .expect("insert result should carry an id")
        .to_string()
}
