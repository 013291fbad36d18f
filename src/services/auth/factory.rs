/// Factory: build the `Authenticator` (verifier + session store backend) from `Config`.
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{Config, SessionBackend};
use crate::repos::SessionRepo;
use crate::services::auth::{Authenticator, JwtVerifier};
use crate::services::session::{SessionStore, ValkeySessionStore};

pub async fn build_authenticator(config: &Config) -> Result<Arc<Authenticator>> {
    let verifier = JwtVerifier::new(
        &config.jwt_secret,
        config.jwt_issuer.as_deref(),
        config.jwt_audience.as_deref(),
        config.jwt_leeway_seconds,
    );

    let sessions: Arc<dyn SessionStore> = match &config.session_backend {
        SessionBackend::Postgres { database_url } => Arc::new(
            SessionRepo::connect(database_url)
                .await
                .context("failed to connect to session database")?,
        ),
        SessionBackend::Valkey { url, key_prefix } => Arc::new(
            ValkeySessionStore::connect(url, key_prefix.clone())
                .await
                .context("failed to connect to session cache")?,
        ),
    };

    tracing::info!(
        backend = sessions.backend_name(),
        timeout = ?config.session_check_timeout,
        "session store ready"
    );

    Ok(Arc::new(Authenticator::new(
        Arc::new(verifier),
        sessions,
        config.session_check_timeout,
    )))
}
