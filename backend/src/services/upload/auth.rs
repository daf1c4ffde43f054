use crate::error::AppError;
use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;
use subtle::ConstantTimeEq;

/// Extracts the token from an `Authorization: Bearer <token>` value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Checks the request's bearer token against the configured secret.
///
/// The comparison is constant-time in the token contents. Without a
/// configured secret nothing is authorized.
pub fn authorize(req: &HttpRequest, secret: Option<&str>) -> Result<(), AppError> {
    let secret = secret.ok_or(AppError::Unauthorized)?;
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::Unauthorized)?;

    if bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}
