//! Validation primitives for registration and login intake.
//!
//! Validation runs before any storage or lockout-state mutation, and the
//! first failing rule's message is what the caller sees.

use regex::Regex;

/// Symbols a password may (and must, at least once) contain.
const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Normalize an email for lookup/uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
#[must_use]
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Display-name rule: 3 to 100 characters.
///
/// # Errors
///
/// Returns the client-facing message for the first failing rule.
pub fn validate_full_name(full_name: &str) -> Result<(), &'static str> {
    let length = full_name.chars().count();
    if length == 0 {
        return Err("Name is required");
    }
    if length < 3 {
        return Err("Name must be at least 3 characters");
    }
    if length > 100 {
        return Err("Name cannot exceed 100 characters");
    }
    Ok(())
}

/// Password rule: 8 to 30 characters drawn from letters, digits, and
/// `@$!%*?&`, with at least one lowercase, one uppercase, one digit, and
/// one symbol.
///
/// # Errors
///
/// Returns the client-facing message for the first failing rule.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        return Err("Password is required");
    }
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if password.chars().count() > 30 {
        return Err("Password cannot exceed 30 characters");
    }

    let allowed = |c: char| {
        c.is_ascii_lowercase()
            || c.is_ascii_uppercase()
            || c.is_ascii_digit()
            || PASSWORD_SYMBOLS.contains(c)
    };
    let complexity = password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if !complexity {
        return Err(
            "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character",
        );
    }
    Ok(())
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn full_name_length_bounds() {
        assert_eq!(validate_full_name(""), Err("Name is required"));
        assert_eq!(
            validate_full_name("Al"),
            Err("Name must be at least 3 characters")
        );
        assert!(validate_full_name("Ali").is_ok());
        assert!(validate_full_name(&"a".repeat(100)).is_ok());
        assert_eq!(
            validate_full_name(&"a".repeat(101)),
            Err("Name cannot exceed 100 characters")
        );
    }

    #[test]
    fn password_accepts_compliant_value() {
        assert!(validate_password("Str0ng!Pass").is_ok());
        assert!(validate_password("aB3@aB3@").is_ok());
    }

    #[test]
    fn password_length_bounds() {
        assert_eq!(validate_password(""), Err("Password is required"));
        assert_eq!(
            validate_password("aB3@aB3"),
            Err("Password must be at least 8 characters")
        );
        let long = format!("aB3@{}", "a".repeat(27));
        assert_eq!(
            validate_password(&long),
            Err("Password cannot exceed 30 characters")
        );
    }

    #[test]
    fn password_requires_each_character_class() {
        // missing uppercase, lowercase, digit, and symbol respectively
        for candidate in ["str0ng!pass", "STR0NG!PASS", "Strong!Pass", "Str0ngPass"] {
            assert!(validate_password(candidate).is_err(), "{candidate}");
        }
    }

    #[test]
    fn password_rejects_characters_outside_charset() {
        assert!(validate_password("Str0ng!Pa s").is_err());
        assert!(validate_password("Str0ng!Pa#s").is_err());
    }

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}
