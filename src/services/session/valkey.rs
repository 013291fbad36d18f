use std::sync::Arc;

use async_trait::async_trait;

use crate::services::{
    cache::{CacheClient, CacheError, ValkeyClient},
    session::store::{SessionStore, SessionStoreError},
};

/// Valkey-backed session store (Redis protocol).
///
/// Each user's active tokens are a set stored at `<prefix>:<user_id>`, both parts verbatim.
/// User ids must not contain `:` when several prefixes share one Valkey database, otherwise
/// user `a:b` under `sessions` and user `b` under `sessions:a` land on the same key.
#[derive(Clone, Debug)]
pub struct ValkeySessionStore<C: CacheClient> {
    cache: Arc<C>,
    prefix: String,
}

impl ValkeySessionStore<ValkeyClient> {
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = ValkeyClient::new(url).await?;

        Ok(Self::new_with_cache(Arc::new(client), prefix))
    }
}

impl<C: CacheClient> ValkeySessionStore<C> {
    pub fn new_with_cache(cache: Arc<C>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, user_id: &str) -> String {
        format!("{}:{}", self.prefix, user_id)
    }
}

#[async_trait]
impl<C: CacheClient> SessionStore for ValkeySessionStore<C> {
    fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }

    async fn exists(&self, user_id: &str, token: &str) -> Result<bool, SessionStoreError> {
        let present = self.cache.set_contains(&self.key(user_id), token).await?;

        Ok(present)
    }
}
