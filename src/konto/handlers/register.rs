use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::types::{AccountBody, AuthResponse, RegisterRequest};
use crate::auth::{
    error::ErrorResponse,
    utils::{normalize_email, valid_email, validate_full_name, validate_password},
    AuthError, CredentialStore, TokenAuthority,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Invalid registration payload", body = ErrorResponse),
        (status = 409, description = "User with this email already exists", body = ErrorResponse),
    ),
    tag = "auth"
)]
// Payload carries a plaintext password; never record arguments in the span.
#[instrument(skip_all)]
pub async fn register(
    store: Extension<CredentialStore>,
    authority: Extension<Arc<TokenAuthority>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, AuthError> {
    let Some(Json(payload)) = payload else {
        return Err(AuthError::Validation("Missing payload".to_string()));
    };

    // Validation runs before anything touches storage.
    validate(&payload)?;
    let email = normalize_email(&payload.email);

    let account = store
        .create(&payload.full_name, &email, &payload.password)
        .await?;
    let token = authority
        .issue(account.id)
        .map_err(|err| AuthError::Internal(err.into()))?;

    debug!(account_id = %account.id, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: AccountBody::from(account),
        }),
    ))
}

fn validate(payload: &RegisterRequest) -> Result<(), AuthError> {
    validate_full_name(&payload.full_name)
        .map_err(|message| AuthError::Validation(message.to_string()))?;

    if !valid_email(&normalize_email(&payload.email)) {
        return Err(AuthError::Validation(
            "Please provide a valid email".to_string(),
        ));
    }

    validate_password(&payload.password)
        .map_err(|message| AuthError::Validation(message.to_string()))?;

    if payload.confirm_password != payload.password {
        return Err(AuthError::Validation("Passwords do not match".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            full_name: "Alice Example".to_string(),
            email: "alice@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            confirm_password: "Str0ng!Pass".to_string(),
        }
    }

    #[test]
    fn validate_accepts_compliant_payload() {
        assert!(validate(&request()).is_ok());
    }

    #[test]
    fn validate_rejects_short_name_first() {
        let payload = RegisterRequest {
            full_name: "Al".to_string(),
            ..request()
        };
        let result = validate(&payload);
        assert!(
            matches!(result, Err(AuthError::Validation(message)) if message == "Name must be at least 3 characters")
        );
    }

    #[test]
    fn validate_rejects_bad_email() {
        let payload = RegisterRequest {
            email: "not-an-email".to_string(),
            ..request()
        };
        let result = validate(&payload);
        assert!(
            matches!(result, Err(AuthError::Validation(message)) if message == "Please provide a valid email")
        );
    }

    #[test]
    fn validate_rejects_weak_password() {
        let payload = RegisterRequest {
            password: "password".to_string(),
            confirm_password: "password".to_string(),
            ..request()
        };
        assert!(matches!(
            validate(&payload),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_mismatched_confirmation() {
        let payload = RegisterRequest {
            confirm_password: "Str0ng!Pas5".to_string(),
            ..request()
        };
        let result = validate(&payload);
        assert!(
            matches!(result, Err(AuthError::Validation(message)) if message == "Passwords do not match")
        );
    }
}
