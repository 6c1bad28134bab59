use crate::{
    auth::AuthenticatedClaims,
    error::AppError,
    models::{CategoryUpdate, TaskInput},
    store::Store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Lists every task.
///
/// ## Responses:
/// - `200 OK`: a JSON array of task documents, oldest first.
/// - `500 Internal Server Error`: if the store fails.
#[get("")]
pub async fn get_tasks(store: web::Data<Store>) -> Result<impl Responder, AppError> {
    let tasks = store.tasks.find_all().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task.
///
/// Requires a valid bearer token (see `auth::policy`). The body is stored as
/// given, except for any `_id`, which the store assigns.
///
/// ## Responses:
/// - `200 OK`: the insert result, `{acknowledged, insertedId}`.
/// - `400 Bad Request`: if the body is not a JSON object.
/// - `401 Unauthorized`: if the token is missing, invalid or expired.
#[post("")]
pub async fn create_task(
    store: web::Data<Store>,
    claims: AuthenticatedClaims,
    task: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let outcome = store.tasks.insert_one(task.into_inner().into_document()).await?;
    log::info!(
        "Task {} created by {}",
        outcome.inserted_id,
        claims.0.email().unwrap_or("<no email claim>")
    );
    Ok(HttpResponse::Ok().json(outcome))
}

/// Retrieves a task by id.
///
/// ## Path Parameters:
/// - `id`: the task identifier.
///
/// ## Responses:
/// - `200 OK`: the task document.
/// - `404 Not Found`: no task has this id.
/// - `500 Internal Server Error`: the id is malformed or the store fails.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<Store>,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = store.tasks.find_by_id(&task_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Changes the category of a task. No other field can be updated.
///
/// An id that matches no task is not an error: the result reports
/// `matchedCount: 0` and nothing is written.
///
/// ## Request Body:
/// `{"category": <any JSON value>}`
///
/// ## Responses:
/// - `200 OK`: the update result, `{acknowledged, matchedCount, modifiedCount, ...}`.
/// - `500 Internal Server Error`: the id is malformed or the store fails.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<Store>,
    task_id: web::Path<String>,
    update: web::Json<CategoryUpdate>,
) -> Result<impl Responder, AppError> {
    let outcome = store
        .tasks
        .update_one(&task_id, update.into_inner().into_fields())
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Deletes a task.
///
/// Every response body carries a `success` flag.
///
/// ## Responses:
/// - `200 OK`: `{success: true, message}`.
/// - `404 Not Found`: `{success: false, message: "Task not found"}`.
/// - `500 Internal Server Error`: `{success: false, ...}` for a malformed id or store failure.
#[delete("/{id}")]
pub async fn delete_task(store: web::Data<Store>, task_id: web::Path<String>) -> HttpResponse {
    let result = match store.tasks.delete_one(&task_id).await {
        Ok(outcome) if outcome.deleted_count == 1 => Ok(()),
        Ok(_) => Err(AppError::NotFound("Task not found".into())),
        Err(e) => Err(AppError::from(e)),
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Task deleted successfully"
        })),
        Err(err) => err.failure_response(),
    }
}
