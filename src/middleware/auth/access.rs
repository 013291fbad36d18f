//! Bearer access token + session check → AuthCtx in request extensions
//!
//! - `Authorization: Bearer <jwt>` is verified (signature, exp, optional iss/aud)
//! - the same token must still be listed among the user's active sessions
//! - any failure is a uniform 401; the reason only goes to the log

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Put authentication in front of every route of `router`.
///
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8's from_fn cannot take a State extractor; pass the state explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = state.auth.authenticate(req.headers()).await.into_identity()?;

    // middleware → extractor
    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::{
        Extension,
        body::to_bytes,
        http::{StatusCode, header},
        routing::get,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::extractors::AuthCtxExtractor;
    use crate::services::auth::Authenticator;
    use crate::services::auth::access_jwt::test_tokens::{expired_for, valid_for};
    use crate::services::auth::authenticator::test_support::CountingVerifier;
    use crate::services::session::memory::MemorySessionStore;

    // Records how many times the protected handler ran and for whom.
    fn app(store: MemorySessionStore, hits: Arc<AtomicUsize>) -> Router {
        let auth = Authenticator::new(
            Arc::new(CountingVerifier::new()),
            Arc::new(store),
            Duration::from_millis(500),
        );
        let state = AppState::new(Arc::new(auth));

        let protected = Router::new().route(
            "/protected",
            get(
                |Extension(hits): Extension<Arc<AtomicUsize>>,
                 AuthCtxExtractor(ctx): AuthCtxExtractor| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    ctx.user_id
                },
            ),
        );

        apply(protected, state.clone())
            .layer(Extension(hits))
            .with_state(state)
    }

    async fn send(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let res = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn assert_unauthorized(status: StatusCode, body: &str) {
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: Value = serde_json::from_str(body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Unauthorized" }));
    }

    #[tokio::test]
    async fn rejects_without_header() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(app(MemorySessionStore::default(), hits.clone()), None).await;

        assert_unauthorized(status, &body);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_basic_scheme() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (status, body) = send(
            app(MemorySessionStore::default(), hits.clone()),
            Some("Basic xyz"),
        )
        .await;

        assert_unauthorized(status, &body);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_bad_and_expired_tokens_with_the_same_body() {
        let hits = Arc::new(AtomicUsize::new(0));
        let expired = expired_for("u1");
        let store = MemorySessionStore::default().with_session("u1", &expired);
        let app = app(store, hits.clone());

        let (status, body) = send(app.clone(), Some("Bearer badtoken")).await;
        assert_unauthorized(status, &body);

        let (status, body) = send(app, Some(&format!("Bearer {expired}"))).await;
        assert_unauthorized(status, &body);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_logged_out_token() {
        let hits = Arc::new(AtomicUsize::new(0));
        let token = valid_for("u1");
        let (status, body) = send(
            app(MemorySessionStore::default(), hits.clone()),
            Some(&format!("Bearer {token}")),
        )
        .await;

        assert_unauthorized(status, &body);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn admits_active_session_once_per_request() {
        let hits = Arc::new(AtomicUsize::new(0));
        let token = valid_for("u1");
        let app = app(
            MemorySessionStore::default().with_session("u1", &token),
            hits.clone(),
        );
        let authorization = format!("Bearer {token}");

        let (status, body) = send(app.clone(), Some(&authorization)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let (status, body) = send(app, Some(&authorization)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u1");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
