use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::types::{AccountBody, AuthResponse, LoginRequest};
use crate::auth::{
    error::ErrorResponse,
    password,
    utils::{normalize_email, valid_email},
    AuthError, CredentialStore, TokenAuthority,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid login payload", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or account locked", body = ErrorResponse),
    ),
    tag = "auth"
)]
// Payload carries a plaintext password; never record arguments in the span.
#[instrument(skip_all)]
pub async fn login(
    store: Extension<CredentialStore>,
    authority: Extension<Arc<TokenAuthority>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, AuthError> {
    let Some(Json(payload)) = payload else {
        return Err(AuthError::Validation("Missing payload".to_string()));
    };

    let email = normalize_email(&payload.email);
    if !valid_email(&email) {
        return Err(AuthError::Validation(
            "Please provide a valid email".to_string(),
        ));
    }
    if payload.password.is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }

    // Unknown email and wrong password share one generic error so the
    // response never says whether the email exists.
    let Some(record) = store.find_by_email(&email).await? else {
        debug!("login attempt for unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    // The lock check runs before password verification, so attempts during
    // the lock window do not push the counter further.
    if store.is_locked(&email).await? {
        debug!(account_id = %record.id, "login attempt on locked account");
        return Err(AuthError::AccountLocked);
    }

    let plaintext = payload.password.clone();
    let password_hash = record.password_hash.clone();
    let matched = tokio::task::spawn_blocking(move || password::verify(&plaintext, &password_hash))
        .await
        .map_err(|err| AuthError::Internal(anyhow::Error::new(err)))?;

    if !matched {
        store.record_failed_attempt(&email).await?;
        // If this attempt was the one that locked the account, say so now
        // instead of inviting an immediate retry.
        if store.is_locked(&email).await? {
            return Err(AuthError::AccountLocked);
        }
        return Err(AuthError::InvalidCredentials);
    }

    store.record_success(record.id).await?;
    let token = authority
        .issue(record.id)
        .map_err(|err| AuthError::Internal(err.into()))?;

    debug!(account_id = %record.id, "login successful");

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user: AccountBody {
                id: record.id.to_string(),
                full_name: record.full_name,
                email,
            },
        }),
    ))
}
