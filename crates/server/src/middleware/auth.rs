//! # Authentication Middleware
//!
//! JWT authentication middleware for protecting API endpoints.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    jwt::{extract_bearer_token, validate_token},
    AppState,
};

/// User information extracted from a validated JWT
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID
    pub id:       Uuid,
    /// User email
    pub email:    String,
    /// Staff flag, gates catalog mutation endpoints
    pub is_staff: bool,
}

/// Authentication middleware
///
/// Extracts the Bearer token from the Authorization header, validates it,
/// and inserts an [`AuthenticatedUser`] into request extensions. Requests
/// with a missing or invalid token are rejected with `401`.
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        Some(header) => {
            match header.to_str() {
                Ok(h) => h,
                Err(_) => {
                    return create_auth_error_response("Invalid authorization header encoding");
                },
            }
        },
        None => {
            return create_auth_error_response("Missing authorization header");
        },
    };

    let token = match extract_bearer_token(auth_header) {
        Some(token) => token,
        None => {
            return create_auth_error_response("Invalid authorization header format");
        },
    };

    let claims = match validate_token(&state.config.jwt, &token) {
        Ok(claims) => claims,
        Err(e) => {
            let error_msg = e.to_string().to_lowercase();
            if error_msg.contains("expired") {
                return create_auth_error_response("Token has expired");
            }
            else if error_msg.contains("signature") {
                return create_auth_error_response("Invalid token signature");
            }
            else {
                return create_auth_error_response("Invalid token");
            }
        },
    };

    let user_id = match claims.sub.parse::<Uuid>() {
        Ok(id) => id,
        Err(_) => {
            return create_auth_error_response("Invalid token subject");
        },
    };

    let user = AuthenticatedUser {
        id:       user_id,
        email:    claims.email,
        is_staff: claims.is_staff,
    };

    request.extensions_mut().insert(user);

    next.run(request).await
}

/// Create standardized authentication error response
fn create_auth_error_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        axum::Json(json!({
            "status": "error",
            "code": "UNAUTHORIZED",
            "message": message
        })),
    )
        .into_response()
}
