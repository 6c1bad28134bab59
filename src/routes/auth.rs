use crate::{auth::TokenService, error::AppError};
use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response body of `POST /jwt`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Issue a token
///
/// Signs the posted JSON object as token claims, valid for 12 hours.
/// No credentials are checked; the caller decides what identity to claim.
#[post("/jwt")]
pub async fn issue_token(
    tokens: web::Data<TokenService>,
    claims: web::Json<Map<String, Value>>,
) -> Result<impl Responder, AppError> {
    let token = tokens.issue(claims.into_inner())?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
