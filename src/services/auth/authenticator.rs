//! Request authenticator: bearer credential → token verification → session membership.
//!
//! Every rejection reason stays distinguishable here (logs, tests) and is collapsed into a
//! single `AppError::Unauthorized` by `AuthOutcome::into_identity`, so clients cannot tell
//! "never logged in", "expired" and "logged out elsewhere" apart.

use std::{fmt, sync::Arc, time::Duration};

use axum::http::{HeaderMap, header};
use thiserror::Error;

use crate::error::AppError;
use crate::services::auth::access_jwt::{TokenError, TokenVerifier};
use crate::services::session::{SessionStore, SessionStoreError};

const BEARER_PREFIX: &str = "Bearer ";

/// Why the session store could not answer.
#[derive(Debug, Error)]
pub enum StoreFailure {
    #[error(transparent)]
    Backend(#[from] SessionStoreError),

    #[error("session check timed out after {0:?}")]
    TimedOut(Duration),
}

/// Result of one authentication attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    Admitted(String),
    MissingCredential,
    MalformedCredential,
    InvalidToken(TokenError),
    SessionNotFound { user_id: String },
    StoreUnavailable(StoreFailure),
}

impl AuthOutcome {
    /// Admitted → user id. Anything else is logged with its reason and becomes a plain 401.
    pub fn into_identity(self) -> Result<String, AppError> {
        match self {
            Self::Admitted(user_id) => return Ok(user_id),
            Self::MissingCredential => {
                tracing::debug!("missing authorization header");
            }
            Self::MalformedCredential => {
                tracing::debug!("malformed authorization header");
            }
            Self::InvalidToken(err) => {
                tracing::warn!(error = ?err, "access token verification failed");
            }
            Self::SessionNotFound { user_id } => {
                tracing::warn!(user_id = %user_id, "session not recognized");
            }
            Self::StoreUnavailable(err) => {
                tracing::error!(error = %err, "session store unavailable");
            }
        }

        Err(AppError::Unauthorized)
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// Exactly one case-sensitive `"Bearer "` prefix is stripped; the rest is the token as sent.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthOutcome> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthOutcome::MissingCredential)?;

    let raw = value
        .to_str()
        .map_err(|_| AuthOutcome::MalformedCredential)?;

    match raw.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthOutcome::MalformedCredential),
    }
}

#[derive(Clone)]
pub struct Authenticator {
    verifier: Arc<dyn TokenVerifier>,
    sessions: Arc<dyn SessionStore>,
    session_check_timeout: Duration,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("session_store", &self.sessions.backend_name())
            .field("session_check_timeout", &self.session_check_timeout)
            .finish()
    }
}

impl Authenticator {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        sessions: Arc<dyn SessionStore>,
        session_check_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            sessions,
            session_check_timeout,
        }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthOutcome {
        let token = match bearer_token(headers) {
            Ok(token) => token,
            Err(outcome) => return outcome,
        };

        let verified = match self.verifier.verify(token) {
            Ok(verified) => verified,
            Err(err) => return AuthOutcome::InvalidToken(err),
        };

        // The store is asked about the same token string the verifier accepted.
        let checked = tokio::time::timeout(
            self.session_check_timeout,
            self.sessions.exists(&verified.user_id, token),
        )
        .await;

        match checked {
            Ok(Ok(true)) => AuthOutcome::Admitted(verified.user_id),
            Ok(Ok(false)) => AuthOutcome::SessionNotFound {
                user_id: verified.user_id,
            },
            Ok(Err(err)) => AuthOutcome::StoreUnavailable(err.into()),
            Err(_) => AuthOutcome::StoreUnavailable(StoreFailure::TimedOut(
                self.session_check_timeout,
            )),
        }
    }
}
