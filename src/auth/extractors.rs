use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;

/// The decoded token claims of the current request.
///
/// Only available on routes the policy table marks as authenticated, where
/// `AuthMiddleware` has verified the token and stored the claims in the
/// request extensions. Anywhere else extraction fails with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedClaims(pub Claims);

impl FromRequest for AuthenticatedClaims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedClaims(claims))),
            None => {
                let err = AppError::Unauthorized("No verified claims on request".to_string());
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    #[actix_rt::test]
    async fn test_authenticated_claims_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        let claims = Claims {
            payload: json!({ "email": "a@b.com" }).as_object().cloned().unwrap(),
            iat: 0,
            exp: 0,
        };
        req.extensions_mut().insert(claims);

        let mut payload = Payload::None;
        let extracted = AuthenticatedClaims::from_request(&req, &mut payload).await;
        assert_eq!(extracted.unwrap().0.email(), Some("a@b.com"));
    }

    #[actix_rt::test]
    async fn test_authenticated_claims_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let extracted = AuthenticatedClaims::from_request(&req, &mut payload).await;

        let err = extracted.unwrap_err();
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
