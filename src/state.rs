/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cloned per request, so everything inside is Arc/cheap to clone
 */
use std::sync::Arc;

use crate::services::auth::Authenticator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(auth: Arc<Authenticator>) -> Self {
        Self { auth }
    }
}
