//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a symmetric secret held only by the
//! server process. A token asserts `{sub, iat, exp}` and nothing else; its
//! only storage is client-side. Verification is stateless: signature plus
//! expiry fully determine validity, with no lookup against the database.
//!
//! Checks run format -> algorithm -> signature -> expiry, so a tampered
//! token can never surface as `Expired` (and an expired token with a valid
//! signature is reported as expired, not invalid).

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Default session lifetime.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokenHeader {
    pub alg: String,
    pub typ: String,
}

impl SessionTokenHeader {
    fn hs256() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlg(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid subject")]
    InvalidSubject,
    #[error("signing key rejected")]
    Sign,
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| Error::Base64)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() as i64)
}

/// Issues and verifies session tokens for account ids.
///
/// The secret and TTL are construction-time configuration; there is no
/// process-global signing state.
pub struct TokenAuthority {
    secret: SecretString,
    ttl_seconds: i64,
}

impl TokenAuthority {
    #[must_use]
    pub fn new(secret: SecretString, ttl_seconds: i64) -> Self {
        Self {
            secret,
            ttl_seconds,
        }
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issue a token for `account_id`, valid from now for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if claims or header JSON cannot be encoded, or the
    /// secret is rejected by the MAC.
    pub fn issue(&self, account_id: Uuid) -> Result<String, Error> {
        self.issue_at(account_id, unix_now())
    }

    /// Issue a token with an explicit clock, for tests and deterministic use.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TokenAuthority::issue`].
    pub fn issue_at(&self, account_id: Uuid, now_unix_seconds: i64) -> Result<String, Error> {
        let header_b64 = b64e_json(&SessionTokenHeader::hs256())?;
        let claims = SessionTokenClaims {
            sub: account_id.to_string(),
            iat: now_unix_seconds,
            exp: now_unix_seconds + self.ttl_seconds,
        };
        let claims_b64 = b64e_json(&claims)?;
        let signing_input = format!("{header_b64}.{claims_b64}");

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| Error::Sign)?;
        mac.update(signing_input.as_bytes());
        let signature_b64 = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature_b64}"))
    }

    /// Verify a token and return the bound account id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Expired`] for a well-signed token past its expiry;
    /// every other failure means the token is malformed or forged.
    pub fn verify(&self, token: &str) -> Result<Uuid, Error> {
        self.verify_at(token, unix_now())
    }

    /// Verify a token against an explicit clock.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TokenAuthority::verify`].
    pub fn verify_at(&self, token: &str, now_unix_seconds: i64) -> Result<Uuid, Error> {
        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(Error::TokenFormat)?;
        let claims_b64 = parts.next().ok_or(Error::TokenFormat)?;
        let sig_b64 = parts.next().ok_or(Error::TokenFormat)?;
        if parts.next().is_some() {
            return Err(Error::TokenFormat);
        }

        let header: SessionTokenHeader = b64d_json(header_b64)?;
        if header.alg != "HS256" {
            return Err(Error::UnsupportedAlg(header.alg));
        }

        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| Error::Base64)?;
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| Error::Sign)?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| Error::InvalidSignature)?;

        let claims: SessionTokenClaims = b64d_json(claims_b64)?;
        if claims.exp <= now_unix_seconds {
            return Err(Error::Expired);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| Error::InvalidSubject)
    }
}

// Keep the secret out of debug output.
impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("secret", &"***")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}
