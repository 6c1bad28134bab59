use crate::{
    error::AppError,
    models::{UserExists, UserInput},
    store::{Store, StoreError},
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::Value;

/// Register a user
///
/// Stores the posted user document unless a user with the same email already
/// exists. Registering an existing email is not an error: the response is a
/// 200 with `insertedId: null`.
///
/// ## Responses:
/// - `200 OK`: the insert result (`{acknowledged, insertedId}`), or
///   `{message: "User already exists", insertedId: null}`.
/// - `400 Bad Request`: if the body has no string `email`.
/// - `500 Internal Server Error`: if the store fails.
#[post("/users")]
pub async fn register(
    store: web::Data<Store>,
    user: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    let user = user.into_inner();

    let email = Value::String(user.email.clone());
    if store.users.find_one("email", &email).await?.is_some() {
        return Ok(HttpResponse::Ok().json(UserExists::default()));
    }

    // A concurrent registration can still win between the lookup and the insert;
    // the unique index turns that into a conflict.
    match store.users.insert_one(user.into_document()).await {
        Ok(outcome) => {
            log::info!("Registered user {}", outcome.inserted_id);
            Ok(HttpResponse::Ok().json(outcome))
        }
        Err(StoreError::Conflict(_)) => Ok(HttpResponse::Ok().json(UserExists::default())),
        Err(e) => Err(e.into()),
    }
}
