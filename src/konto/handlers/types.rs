//! Request/response types for the account endpoints.
//!
//! Shapes are part of the mobile client contract; success bodies always put
//! account fields under `user` and never include the password hash.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::store::Account;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AccountBody {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

impl From<Account> for AccountBody {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            full_name: account.full_name,
            email: account.email,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: AccountBody,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProfileBody {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProfileResponse {
    pub user: ProfileBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use uuid::Uuid;

    #[test]
    fn register_request_round_trips() -> Result<()> {
        let request = RegisterRequest {
            full_name: "Alice Example".to_string(),
            email: "alice@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            confirm_password: "Str0ng!Pass".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "alice@example.com");
        let decoded: RegisterRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.full_name, "Alice Example");
        Ok(())
    }

    #[test]
    fn account_body_from_account_stringifies_id() {
        let id = Uuid::new_v4();
        let body = AccountBody::from(Account {
            id,
            full_name: "Alice Example".to_string(),
            email: "alice@example.com".to_string(),
        });
        assert_eq!(body.id, id.to_string());
    }

    #[test]
    fn auth_response_nests_user() -> Result<()> {
        let response = AuthResponse {
            message: "Login successful".to_string(),
            token: "token".to_string(),
            user: AccountBody {
                id: Uuid::nil().to_string(),
                full_name: "Alice Example".to_string(),
                email: "alice@example.com".to_string(),
            },
        };
        let value = serde_json::to_value(&response)?;
        let email = value
            .pointer("/user/email")
            .and_then(serde_json::Value::as_str)
            .context("missing user.email")?;
        assert_eq!(email, "alice@example.com");
        Ok(())
    }
}
