use crate::{
    AppState,
    handlers::{account, catalog, notifications, sheets},
};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Authenticated Router Module
///
/// Routes open to every role once the caller is authenticated. Handlers
/// receive the resolved `AuthUser` that `require_auth` stored in the request.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        .route("/me", get(account::get_me))
        // --- Notifications ---
        // Only ever the caller's own rows.
        .route("/notifications", get(notifications::get_notifications))
        .route(
            "/notifications/{id}/read",
            patch(notifications::mark_notification_read),
        )
        .route(
            "/notifications/read-all",
            post(notifications::mark_all_notifications_read),
        )
        // --- Catalog (read-only) ---
        .route("/catalog/sites", get(catalog::list_sites))
        .route("/catalog/categories", get(catalog::list_categories))
        // GET /catalog/brands?category_id=...&site_id=...
        .route("/catalog/brands", get(catalog::list_brands))
        // --- Excel exchange ---
        // POST issues a presigned PUT URL; the file itself never passes through the API.
        .route("/sheets", post(sheets::create_sheet).get(sheets::list_sheets))
        .route("/sheets/{id}/download", get(sheets::download_sheet))
}
