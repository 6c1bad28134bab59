mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use task_manager_server::auth::TokenService;
use task_manager_server::routes::INVALID_JSON_MESSAGE;

use common::{init_app, issue_token, TestState, TEST_SECRET};

#[actix_rt::test]
async fn test_issued_token_is_accepted_on_protected_route() {
    let state = TestState::new();
    let app = init_app(&state).await;

    let token = issue_token(&app, json!({ "email": "a@b.com" })).await;
    assert!(!token.is_empty(), "Token should be a non-empty string");

    let req = test::TestRequest::post()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({ "title": "Created with a token", "category": "todo" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["acknowledged"], json!(true));
    assert!(body["insertedId"].is_string());
}

#[actix_rt::test]
async fn test_missing_authorization_header_is_rejected() {
    let state = TestState::new();
    let app = init_app(&state).await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .set_json(json!({ "title": "No token" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Unauthorized access" }));
    assert!(state.store.tasks.find_all().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_header_without_token_segment_is_rejected() {
    let state = TestState::new();
    let app = init_app(&state).await;
    let token = issue_token(&app, json!({ "email": "a@b.com" })).await;

    // Only the second segment is read, so a bare token is not enough.
    for value in ["Bearer", token.as_str(), ""] {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .append_header((header::AUTHORIZATION, value))
            .set_json(json!({ "title": "Bad header" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header value {:?}", value);
    }
}

#[actix_rt::test]
async fn test_expired_token_is_rejected() {
    let state = TestState::new();
    let app = init_app(&state).await;

    let expired = TokenService::with_ttl(TEST_SECRET, Duration::hours(-13))
        .issue(json!({ "email": "a@b.com" }).as_object().cloned().unwrap())
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", expired)))
        .set_json(json!({ "title": "Too late" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_tampered_token_is_rejected() {
    let state = TestState::new();
    let app = init_app(&state).await;
    let token = issue_token(&app, json!({ "email": "a@b.com" })).await;

    // Flip one character in the middle of the signature segment.
    let signature_start = token.rfind('.').unwrap() + 1;
    let target = signature_start + (token.len() - signature_start) / 2;
    let mut tampered: Vec<char> = token.chars().collect();
    tampered[target] = if tampered[target] == 'a' { 'b' } else { 'a' };
    let tampered: String = tampered.into_iter().collect();
    assert_ne!(tampered, token);

    let req = test::TestRequest::post()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", tampered)))
        .set_json(json!({ "title": "Forged" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(state.store.tasks.find_all().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let state = TestState::new();
    let app = init_app(&state).await;

    let foreign = TokenService::new(b"someone_elses_secret")
        .issue(json!({ "email": "a@b.com" }).as_object().cloned().unwrap())
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", foreign)))
        .set_json(json!({ "title": "Forged" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_public_routes_ignore_bad_tokens() {
    let state = TestState::new();
    let app = init_app(&state).await;

    let req = test::TestRequest::get()
        .uri("/tasks")
        .append_header((header::AUTHORIZATION, "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_unauthorized_response_carries_cors_headers() {
    let state = TestState::new();
    let app = init_app(&state).await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header((header::ORIGIN, "https://tasks.example.com"))
        .set_json(json!({ "title": "No token" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[actix_rt::test]
async fn test_jwt_rejects_malformed_json() {
    let state = TestState::new();
    let app = init_app(&state).await;

    let req = test::TestRequest::post()
        .uri("/jwt")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": INVALID_JSON_MESSAGE }));
}
