//! Error taxonomy for the credential and session authority.
//!
//! Every failure a handler can surface maps to exactly one variant here, and
//! the variant alone decides the HTTP status and the client-visible message.
//! Client messages never reveal counters, lock expiry timestamps, or whether
//! an email exists; the locked-account message is the one deliberate
//! exception, preserved from the original contract.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

use super::store::StoreError;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input, fixable by the caller. Never touches storage or
    /// lockout state.
    #[error("{0}")]
    Validation(String),

    /// Duplicate email on registration.
    #[error("User with this email already exists")]
    Conflict,

    /// Wrong email/password combination; never says which.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The lockout window is active.
    #[error(
        "Account is temporarily locked due to too many failed login attempts. Please try again later."
    )]
    AccountLocked,

    /// Missing, invalid, or expired token, or a token bound to an account
    /// that no longer exists. The message says which case.
    #[error("{0}")]
    Unauthenticated(String),

    /// Storage or signing infrastructure failure; safe to retry.
    #[error("transient infrastructure failure")]
    Transient(#[source] anyhow::Error),

    /// Everything else. Logged, never detailed to the caller.
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::AccountLocked | Self::Unauthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Transient(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            // 500s keep a generic body; details go to the logs only.
            Self::Transient(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::Transient(source) => {
                warn!("Transient failure, safe to retry: {source:?}");
            }
            AuthError::Internal(source) => {
                error!("Internal error: {source:?}");
            }
            _ => {}
        }

        let body = Json(ErrorResponse {
            message: self.client_message(),
        });
        (self.status(), body).into_response()
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict,
            StoreError::Transient(source) => Self::Transient(source.into()),
            StoreError::Database(source) => Self::Internal(source.into()),
            StoreError::Hash(source) => Self::Internal(source),
        }
    }
}
