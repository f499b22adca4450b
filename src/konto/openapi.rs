use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use super::handlers;
use crate::auth::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::register::register,
        handlers::login::login,
        handlers::profile::profile,
    ),
    components(schemas(
        handlers::types::RegisterRequest,
        handlers::types::LoginRequest,
        handlers::types::AccountBody,
        handlers::types::AuthResponse,
        handlers::types::ProfileBody,
        handlers::types::ProfileResponse,
        ErrorResponse,
    )),
    modifiers(&BearerToken),
    tags(
        (name = "auth", description = "Registration, login, and profile"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct BearerToken;

impl Modify for BearerToken {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
