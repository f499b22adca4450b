//! Durable account state and its atomic mutations.
//!
//! Every lockout-counter mutation is a single SQL statement; the database,
//! not the application, performs the read-modify-write. Email uniqueness is
//! enforced by the `accounts` UNIQUE constraint, with SQLSTATE 23505 as the
//! source of truth under concurrent registrations.

use sqlx::{PgPool, Row};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use super::password;
use super::policy::{LOCKOUT_DURATION, LOCK_THRESHOLD};
use super::utils::is_unique_violation;

/// A newly created or resolved account. Never carries the password hash.
#[derive(Clone, Debug)]
pub struct Account {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

/// Minimal fields needed to decide a login attempt. The hash stays
/// crate-private; it exists only to be verified.
pub struct LoginRecord {
    pub id: Uuid,
    pub full_name: String,
    pub(crate) password_hash: String,
}

/// Minimal identity resolved for a verified bearer token.
#[derive(Clone, Debug)]
pub struct AccountRef {
    pub id: Uuid,
    pub email: String,
}

/// Profile fields returned to the authenticated owner.
#[derive(Clone, Debug)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Another account already holds this email.
    #[error("email already registered")]
    Conflict,
    /// Pool or connection trouble; safe to retry.
    #[error("storage temporarily unavailable")]
    Transient(#[source] sqlx::Error),
    /// Any other database failure.
    #[error("database error")]
    Database(#[source] sqlx::Error),
    /// Password hashing fault during account creation.
    #[error("password hashing failed")]
    Hash(#[source] anyhow::Error),
}

fn classify(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => StoreError::Transient(err),
        _ => StoreError::Database(err),
    }
}

/// Owns the durable `accounts` table.
#[derive(Clone)]
pub struct CredentialStore {
    pool: PgPool,
}

impl CredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up login data by (normalized) email.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure; a missing account is
    /// `Ok(None)`.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<LoginRecord>, StoreError> {
        let query = "SELECT id, full_name, password_hash FROM accounts WHERE email = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(classify)?;

        Ok(row.map(|row| LoginRecord {
            id: row.get("id"),
            full_name: row.get("full_name"),
            password_hash: row.get("password_hash"),
        }))
    }

    /// Resolve an account id from a verified token to a live account.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure; a deleted account is
    /// `Ok(None)`.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRef>, StoreError> {
        let query = "SELECT id, email FROM accounts WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(classify)?;

        Ok(row.map(|row| AccountRef {
            id: row.get("id"),
            email: row.get("email"),
        }))
    }

    /// Fetch the profile fields returned to the account owner.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    pub async fn fetch_profile(&self, id: Uuid) -> Result<Option<ProfileRecord>, StoreError> {
        let query = r#"
            SELECT
                id,
                full_name,
                email,
                to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
            FROM accounts
            WHERE id = $1
            LIMIT 1
        "#;
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(classify)?;

        Ok(row.map(|row| ProfileRecord {
            id: row.get("id"),
            full_name: row.get("full_name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        }))
    }

    /// Create an account, hashing the password before it touches storage.
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] when the email is already registered; the
    /// UNIQUE constraint decides, so concurrent registrations cannot both
    /// succeed.
    pub async fn create(
        &self,
        full_name: &str,
        email: &str,
        plaintext_password: &str,
    ) -> Result<Account, StoreError> {
        // bcrypt is CPU-bound; keep it off the async executor.
        let plaintext = plaintext_password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash(&plaintext))
            .await
            .map_err(|err| StoreError::Hash(anyhow::Error::new(err)))?
            .map_err(StoreError::Hash)?;

        let query = r"
            INSERT INTO accounts (full_name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(full_name)
            .bind(email)
            .bind(&password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(Account {
                id: row.get("id"),
                full_name: full_name.to_string(),
                email: email.to_string(),
            }),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict),
            Err(err) => Err(classify(err)),
        }
    }

    /// Record one failed login attempt.
    ///
    /// Both SET expressions read the pre-update row, so the lock decision is
    /// made from the pre-increment counter inside one atomic statement:
    /// concurrent wrong-password attempts cannot lose increments, and the
    /// `LOCK_THRESHOLD`-th failure is the one that locks. Below the
    /// threshold the lock column is reset to NULL, so a failure after an
    /// expired lock does not re-lock until the threshold is reached again.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure. Unknown emails are a
    /// no-op.
    pub async fn record_failed_attempt(&self, email: &str) -> Result<(), StoreError> {
        let query = r"
            UPDATE accounts
            SET failed_login_attempts = failed_login_attempts + 1,
                account_locked_until = CASE
                    WHEN failed_login_attempts >= $2 THEN NOW() + ($3 * INTERVAL '1 second')
                    ELSE NULL
                END
            WHERE email = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(email)
            .bind(LOCK_THRESHOLD - 1)
            .bind(LOCKOUT_DURATION.as_secs() as i64)
            .execute(&self.pool)
            .instrument(span)
            .await
            .map_err(classify)?;
        Ok(())
    }

    /// Record a successful login: reset the counter, clear any lock, stamp
    /// `last_login_at`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    pub async fn record_success(&self, id: Uuid) -> Result<(), StoreError> {
        let query = r"
            UPDATE accounts
            SET failed_login_attempts = 0,
                account_locked_until = NULL,
                last_login_at = NOW()
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .map_err(classify)?;
        Ok(())
    }

    /// Whether the account's lockout window is currently active.
    ///
    /// Expiry is lazy: nothing ever clears `account_locked_until` on a
    /// timer, it is simply compared against `NOW()` here.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on storage failure.
    pub async fn is_locked(&self, email: &str) -> Result<bool, StoreError> {
        let query = "SELECT 1 FROM accounts WHERE email = $1 AND account_locked_until > NOW()";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(classify)?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_debug_names() {
        assert_eq!(format!("{:?}", StoreError::Conflict), "Conflict");
        assert!(format!("{:?}", StoreError::Transient(sqlx::Error::PoolTimedOut))
            .starts_with("Transient"));
    }

    #[test]
    fn classify_marks_pool_timeouts_transient() {
        assert!(matches!(
            classify(sqlx::Error::PoolTimedOut),
            StoreError::Transient(_)
        ));
        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ));
        assert!(matches!(classify(io), StoreError::Transient(_)));
    }

    #[test]
    fn classify_marks_other_errors_database() {
        assert!(matches!(
            classify(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }

    #[test]
    fn login_record_holds_values() {
        let record = LoginRecord {
            id: Uuid::nil(),
            full_name: "Alice Example".to_string(),
            password_hash: "$2b$10$hash".to_string(),
        };
        assert_eq!(record.id, Uuid::nil());
        assert_eq!(record.password_hash, "$2b$10$hash");
    }
}
