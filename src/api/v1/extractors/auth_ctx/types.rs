/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - The access middleware fills it into request extensions; handlers only receive this type
 */

/// Context attached to an admitted request.
///
/// - `user_id` is the identifier decoded from the access token, whose session was confirmed
///   active in the session store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
}

impl AuthCtx {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
