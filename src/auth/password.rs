//! Password hashing and verification.
//!
//! bcrypt with a fixed work factor; the salt is generated per call and
//! embedded in the hash, so `hash` output is self-contained. Verification is
//! constant-time and treats any malformed stored hash as "not matched"
//! rather than an error, so callers never branch on hash parse failures.
//!
//! Both operations are CPU-bound; async callers go through
//! `tokio::task::spawn_blocking`.

use anyhow::{Context, Result};

/// bcrypt cost factor; ~100ms per hash on current hardware.
pub const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password.
///
/// # Errors
///
/// Only fails on bcrypt library faults, which are fatal to the calling
/// operation.
pub fn hash(plaintext: &str) -> Result<String> {
    bcrypt::hash(plaintext, BCRYPT_COST).context("failed to hash password")
}

/// Verify a plaintext password against a stored hash.
///
/// Returns `false` for a mismatch and for any malformed hash.
#[must_use]
pub fn verify(plaintext: &str, password_hash: &str) -> bool {
    bcrypt::verify(plaintext, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() -> Result<()> {
        let hashed = hash("Str0ng!Pass")?;
        assert!(verify("Str0ng!Pass", &hashed));
        Ok(())
    }

    #[test]
    fn verify_rejects_wrong_password() -> Result<()> {
        let hashed = hash("Str0ng!Pass")?;
        assert!(!verify("Wr0ng!Pass", &hashed));
        Ok(())
    }

    #[test]
    fn hashes_are_salted_per_call() -> Result<()> {
        let first = hash("Str0ng!Pass")?;
        let second = hash("Str0ng!Pass")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn verify_returns_false_on_malformed_hash() {
        assert!(!verify("Str0ng!Pass", ""));
        assert!(!verify("Str0ng!Pass", "not-a-bcrypt-hash"));
        assert!(!verify("Str0ng!Pass", "$2b$10$short"));
    }

    #[test]
    fn hash_embeds_cost_factor() -> Result<()> {
        let hashed = hash("Str0ng!Pass")?;
        assert!(hashed.contains("$10$"));
        Ok(())
    }
}
