pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod login;
pub use self::login::login;

pub mod profile;
pub use self::profile::profile;

pub mod types;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

// Fallback for unknown routes; the mobile client expects a JSON body.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}
