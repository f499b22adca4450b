//! Bearer-token gate for protected requests.
//!
//! Flow Overview: extract the bearer token, verify it, resolve the bound
//! account, and return a principal that downstream handlers can use. The
//! gate has no side effects, so it is safe to run on every protected
//! request.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use super::{error::AuthError, store::CredentialStore, token, token::TokenAuthority};

/// Authenticated account context derived from a verified bearer token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub account_id: Uuid,
    pub email: String,
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Verify the request's bearer token and return the bound account id.
///
/// # Errors
///
/// `Unauthenticated` with a message reflecting the case: missing header,
/// expired token, or anything else wrong with the token.
pub fn authenticate(headers: &HeaderMap, authority: &TokenAuthority) -> Result<Uuid, AuthError> {
    let Some(token) = bearer_token(headers) else {
        return Err(AuthError::Unauthenticated(
            "Authentication required".to_string(),
        ));
    };

    match authority.verify(token) {
        Ok(account_id) => Ok(account_id),
        Err(token::Error::Expired) => {
            Err(AuthError::Unauthenticated("Token expired".to_string()))
        }
        Err(_) => Err(AuthError::Unauthenticated("Invalid token".to_string())),
    }
}

/// Resolve the request's bearer token all the way to a live account.
///
/// # Errors
///
/// `Unauthenticated` when the token is missing/invalid/expired or the
/// account was deleted after the token was issued; `Transient`/`Internal`
/// on storage failure.
pub async fn require_auth(
    headers: &HeaderMap,
    authority: &TokenAuthority,
    store: &CredentialStore,
) -> Result<Principal, AuthError> {
    let account_id = authenticate(headers, authority)?;

    match store.find_by_id(account_id).await? {
        Some(account) => Ok(Principal {
            account_id: account.id,
            email: account.email,
        }),
        None => Err(AuthError::Unauthenticated("User not found".to_string())),
    }
}
