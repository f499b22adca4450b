use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::types::{ProfileBody, ProfileResponse};
use crate::auth::{
    error::ErrorResponse, require_auth, AuthError, CredentialStore, TokenAuthority,
};

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Return the authenticated account profile", body = ProfileResponse),
        (status = 401, description = "Missing, invalid, or expired bearer token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
    ),
    security(("bearer_token" = [])),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn profile(
    headers: HeaderMap,
    store: Extension<CredentialStore>,
    authority: Extension<Arc<TokenAuthority>>,
) -> Result<Response, AuthError> {
    let principal = require_auth(&headers, &authority, &store).await?;

    match store.fetch_profile(principal.account_id).await? {
        Some(profile) => Ok((
            StatusCode::OK,
            Json(ProfileResponse {
                user: ProfileBody {
                    id: profile.id.to_string(),
                    full_name: profile.full_name,
                    email: profile.email,
                    created_at: profile.created_at,
                },
            }),
        )
            .into_response()),
        // Account deleted between the gate and the fetch.
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                message: "User not found".to_string(),
            }),
        )
            .into_response()),
    }
}
