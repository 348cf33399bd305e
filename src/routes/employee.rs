use crate::{AppState, handlers::requests};
use axum::{
    Router,
    routing::{get, post},
};

/// Employee Router Module
///
/// Request lifecycle for site staff. `require_employee` has already attached
/// the caller's `CurrentEmployee`; ownership is checked per handler.
pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/requests",
            post(requests::create_request).get(requests::list_my_requests),
        )
        // DELETE cancels; the row is kept with status `cancelled`.
        .route(
            "/requests/{id}",
            get(requests::get_my_request)
                .put(requests::update_my_request)
                .delete(requests::cancel_my_request),
        )
        .route("/requests/{id}/offers", get(requests::list_request_offers))
        // Awards the request and rejects every sibling offer.
        .route("/offers/{id}/accept", post(requests::accept_offer))
}
