use crate::{AppState, handlers::offers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Supplier Router Module
///
/// Bidding for approved suppliers. Unapproved suppliers are stopped with
/// 403 by `require_supplier` before any of these run.
pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        // Open requests only.
        .route("/requests", get(offers::list_open_requests))
        .route("/requests/{id}", get(offers::get_request_for_supplier))
        .route("/requests/{id}/offers", post(offers::submit_offer))
        .route("/offers", get(offers::list_my_offers))
        // DELETE withdraws a pending offer.
        .route(
            "/offers/{id}",
            put(offers::update_my_offer).delete(offers::withdraw_my_offer),
        )
}
