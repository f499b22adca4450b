//! # Konto (Account & Session Service)
//!
//! `konto` is a mobile-app-facing account service. Users register and log in,
//! receive a bearer token, and present it on every protected request.
//!
//! ## Credentials & Lockout
//!
//! Passwords are hashed with bcrypt (salt embedded, fixed work factor) and
//! never stored or logged in plaintext. Five consecutive failed login
//! attempts lock an account for 15 minutes. The lock is lazy: no background
//! job clears it, `account_locked_until` is simply compared against `NOW()`
//! at read time.
//!
//! ## Session Tokens
//!
//! Sessions are stateless HS256 tokens signed with a symmetric secret held
//! only by the server process. Validity is fully determined by signature and
//! expiry at verification time; there is no server-side session table and no
//! revocation list.
//!
//! All lockout counter updates are single SQL statements so concurrent
//! attempts against the same account cannot lose increments.

pub mod auth;
pub mod cli;
pub mod konto;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
