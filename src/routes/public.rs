use crate::{AppState, handlers::account};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/login
        // Email and password in, HS256 JWT out.
        .route("/auth/login", post(account::login))
        // POST /auth/register/supplier
        // Creates an unapproved supplier; admins are notified.
        .route("/auth/register/supplier", post(account::register_supplier))
}
