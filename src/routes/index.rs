use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

pub const WELCOME_MESSAGE: &str = "Welcome to Task Manager Server!";

/// Plain-text greeting at the root path.
#[get("/")]
pub async fn welcome() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(WELCOME_MESSAGE)
}

/// Health check endpoint
///
/// Returns the current status of the API and timestamp.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}
