pub mod auth;
pub mod index;
pub mod tasks;
pub mod users;

use actix_cors::Cors;
use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::AppError;

/// Registers every route of the application.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .service(index::welcome)
        .service(index::health)
        .service(auth::issue_token)
        .service(users::register)
        .service(
            web::scope("/tasks")
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Cross-origin requests are accepted from anywhere.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Client-facing message for a body that is not the expected JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body";

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected body of {} {}: {}", req.method(), req.path(), err);
    AppError::BadRequest(INVALID_JSON_MESSAGE.to_string()).into()
}
