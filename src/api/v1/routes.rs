/*
 * Responsibility
 * - URL layout of v1
 * - Which routes sit behind the bearer + session middleware
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::me::me;
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/me", get(me));

    middleware::auth::access::apply(protected, state)
}
