use crate::auth::TokenAuthority;
use crate::cli::actions::Action;
use crate::konto;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            token_secret,
            token_ttl_seconds,
        } => {
            // The signing secret and TTL are construction-time configuration;
            // nothing reads them from the environment after this point.
            let authority = TokenAuthority::new(token_secret, token_ttl_seconds);

            konto::new(port, dsn, authority).await?;
        }
    }

    Ok(())
}
