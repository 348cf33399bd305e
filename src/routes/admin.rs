use crate::{
    AppState,
    handlers::{admin, catalog},
};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Admin Router Module
///
/// Oversight, moderation and catalog maintenance. The whole router sits
/// behind `require_admin`; handlers do not re-check the role.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        .route("/stats", get(admin::get_admin_stats))
        // --- Supplier approval ---
        // GET /admin/suppliers?approved=false lists the approval queue.
        .route("/suppliers", get(admin::list_suppliers))
        .route("/suppliers/{id}/approval", put(admin::set_supplier_approval))
        // --- Employees ---
        .route(
            "/employees",
            post(admin::create_employee).get(admin::list_employees),
        )
        // --- Request review ---
        .route("/requests", get(admin::list_requests))
        .route("/requests/{id}", get(admin::get_request))
        .route("/requests/{id}/review", put(admin::review_request))
        // --- Catalog maintenance ---
        .route("/sites", post(catalog::create_site))
        .route(
            "/sites/{id}",
            put(catalog::update_site).delete(catalog::delete_site),
        )
        .route(
            "/sites/{id}/brands/{brand_id}",
            put(catalog::link_site_brand).delete(catalog::unlink_site_brand),
        )
        .route("/categories", post(catalog::create_category))
        .route(
            "/categories/{id}",
            put(catalog::update_category).delete(catalog::delete_category),
        )
        .route(
            "/categories/{id}/brands/{brand_id}",
            put(catalog::link_category_brand).delete(catalog::unlink_category_brand),
        )
        .route("/brands", post(catalog::create_brand))
        .route(
            "/brands/{id}",
            put(catalog::update_brand).delete(catalog::delete_brand),
        )
}
