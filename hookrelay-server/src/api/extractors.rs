//! Custom Axum extractors for request authentication.
//!
//! Provides `AdminAuth`, which checks the `Hookrelay-Admin-Authorization`
//! header against the argon2 hash of the admin secret. It guards both the
//! scheduler entry point and the admin API.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Header carrying the plaintext admin secret.
pub const ADMIN_AUTH_HEADER: &str = "Hookrelay-Admin-Authorization";

/// Marker extractor: the request presented the admin secret.
pub struct AdminAuth;

/// Errors returned by the [`AdminAuth`] extractor.
#[derive(Debug, thiserror::Error)]
pub enum AdminAuthError {
    #[error("missing Hookrelay-Admin-Authorization header")]
    MissingHeader,
    #[error("invalid Hookrelay-Admin-Authorization header")]
    InvalidHeader,
    #[error("admin secret mismatch")]
    Mismatch,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AdminAuthError::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                "missing Hookrelay-Admin-Authorization header",
            ),
            AdminAuthError::InvalidHeader => (
                StatusCode::BAD_REQUEST,
                "invalid Hookrelay-Admin-Authorization header",
            ),
            AdminAuthError::Mismatch => (StatusCode::UNAUTHORIZED, "invalid admin secret"),
        };
        (status, message).into_response()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .ok_or(AdminAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AdminAuthError::InvalidHeader)?;

        let admin = state.config.admin.read().await;
        let verified = admin.verify(secret);
        drop(admin);

        if verified {
            Ok(AdminAuth)
        } else {
            tracing::warn!("Rejected request with wrong admin secret");
            Err(AdminAuthError::Mismatch)
        }
    }
}
