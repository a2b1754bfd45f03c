use actix_web::http::StatusCode;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use futures_util::future::{ready, Ready};
use std::fmt;
use uuid::Uuid;

use super::jwt::validate_token;
use super::model::{Claims, CurrentUser};
use crate::AppState;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    Forbidden,
    Misconfigured,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidToken => "Invalid or expired token",
            AuthError::Forbidden => "Admin role required",
            AuthError::Misconfigured => "Authentication is not configured",
        };
        f.write_str(message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let kind = match self.status_code() {
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            _ => "InternalServerError",
        };
        HttpResponse::build(self.status_code())
            .json(crate::ErrorResponse::new(kind, &self.to_string()))
    }
}

/// Extract token from the Authorization header, falling back to the
/// session cookie.
fn extract_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        req.cookie(AUTH_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Validate the session token on a request and return its claims.
pub fn validate_request_token(req: &HttpRequest, secret: &str) -> Result<Claims, AuthError> {
    let token = extract_token(req).ok_or(AuthError::MissingToken)?;

    validate_token(secret, &token).map_err(|e| {
        log::warn!("Token validation failed: {:?}", e);
        AuthError::InvalidToken
    })
}

fn current_user(req: &HttpRequest) -> Result<CurrentUser, AuthError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(AuthError::Misconfigured)?;
    let claims = validate_request_token(req, &state.session.secret)?;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

    Ok(CurrentUser {
        id,
        email: claims.email,
        role: claims.role,
    })
}

impl FromRequest for CurrentUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(current_user(req))
    }
}

/// An authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequest for AdminUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(current_user(req).and_then(|user| {
            if user.is_admin() {
                Ok(AdminUser(user))
            } else {
                Err(AuthError::Forbidden)
            }
        }))
    }
}
