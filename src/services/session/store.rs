use async_trait::async_trait;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::cache::CacheError;

/// Session Store seam: which tokens are currently active for which user.
///
/// - `Ok(true)`: the exact token is registered for the user
/// - `Ok(false)`: unknown user, or the token is not (or no longer) listed
/// - `Err(_)`: backend failure (callers treat it as an authentication failure)
#[async_trait]
pub trait SessionStore: Send + Sync {
    // Backend name, for logs.
    fn backend_name(&self) -> &'static str;

    async fn exists(&self, user_id: &str, token: &str) -> Result<bool, SessionStoreError>;
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
