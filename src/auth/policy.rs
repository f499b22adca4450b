//! Account-lockout policy.
//!
//! The rule is deliberately isolated here because the arithmetic is easy to
//! get wrong by one: the lock must trigger on the `LOCK_THRESHOLD`-th
//! consecutive failure, decided from the counter value *before* the current
//! failure is recorded. The store binds these constants into its atomic
//! `UPDATE` so SQL and policy cannot drift apart.

use std::time::Duration;

/// Consecutive failed attempts after which an account locks.
pub const LOCK_THRESHOLD: i32 = 5;

/// How long an account stays locked once the threshold is reached.
pub const LOCKOUT_DURATION: Duration = Duration::from_secs(15 * 60);

/// Decide whether the current failed attempt locks the account.
///
/// `failed_login_attempts` is the stored counter *before* this attempt is
/// recorded, so the `LOCK_THRESHOLD`-th failure (pre-increment value
/// `LOCK_THRESHOLD - 1`) is the one that locks.
#[must_use]
pub const fn should_lock(failed_login_attempts: i32) -> bool {
    failed_login_attempts >= LOCK_THRESHOLD - 1
}

/// Lock expiry for a failure recorded at `now_unix_seconds`.
#[must_use]
pub const fn lock_expiry(now_unix_seconds: i64) -> i64 {
    now_unix_seconds + LOCKOUT_DURATION.as_secs() as i64
}
