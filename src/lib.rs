use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod repository;
pub mod storage;
pub mod validation;
pub mod workflow;

// Route groups, one per access role.
pub mod routes;
use routes::{admin, authenticated, employee, public, supplier};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// OpenAPI document aggregated from every `#[utoipa::path]` handler and
/// `ToSchema` model. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::account::login, handlers::account::register_supplier, handlers::account::get_me,
        handlers::notifications::get_notifications, handlers::notifications::mark_notification_read,
        handlers::notifications::mark_all_notifications_read,
        handlers::catalog::list_sites, handlers::catalog::list_categories, handlers::catalog::list_brands,
        handlers::catalog::create_site, handlers::catalog::update_site, handlers::catalog::delete_site,
        handlers::catalog::create_category, handlers::catalog::update_category,
        handlers::catalog::delete_category, handlers::catalog::create_brand,
        handlers::catalog::update_brand, handlers::catalog::delete_brand,
        handlers::catalog::link_site_brand, handlers::catalog::unlink_site_brand,
        handlers::catalog::link_category_brand, handlers::catalog::unlink_category_brand,
        handlers::sheets::create_sheet, handlers::sheets::list_sheets, handlers::sheets::download_sheet,
        handlers::requests::create_request, handlers::requests::list_my_requests,
        handlers::requests::get_my_request, handlers::requests::update_my_request,
        handlers::requests::cancel_my_request, handlers::requests::list_request_offers,
        handlers::requests::accept_offer,
        handlers::offers::list_open_requests, handlers::offers::get_request_for_supplier,
        handlers::offers::submit_offer, handlers::offers::list_my_offers,
        handlers::offers::update_my_offer, handlers::offers::withdraw_my_offer,
        handlers::admin::get_admin_stats, handlers::admin::list_suppliers,
        handlers::admin::set_supplier_approval, handlers::admin::create_employee,
        handlers::admin::list_employees, handlers::admin::list_requests,
        handlers::admin::get_request, handlers::admin::review_request
    ),
    components(
        schemas(
            models::Role, models::RequestStatus, models::OfferStatus, models::NotificationKind,
            models::SheetKind, models::Employee, models::Supplier, models::Site, models::Brand,
            models::Category, models::MaterialRequest, models::Offer, models::Notification,
            models::Sheet, models::LoginRequest, models::LoginResponse,
            models::RegisterSupplierRequest, models::CreateEmployeeRequest,
            models::CreateMaterialRequest, models::UpdateMaterialRequest,
            models::SubmitOfferRequest, models::UpdateOfferRequest, models::ReviewRequest,
            models::SupplierApproval, models::SiteInput, models::NameInput,
            models::CreateSheetRequest, models::SheetUploadResponse, models::SheetDownloadResponse,
            models::Profile, models::RequestDetail, models::ReadAllResponse,
            models::AdminDashboardStats,
        )
    ),
    tags(
        (name = "site-procurement", description = "Construction-site procurement API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// The shared, cloneable container of every service a handler may need.
#[derive(Clone)]
pub struct AppState {
    /// Persistence: Postgres in deployments, in-memory in tests.
    pub repo: RepositoryState,
    /// Object storage for the Excel exchange.
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles every route group behind its role gate, then wraps the whole
/// application in the request-id, tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // `route_layer` only runs the gate for routes that matched, so unknown
    // paths still answer 404 instead of 401.
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth)),
        )
        .nest(
            "/employee",
            employee::employee_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_employee,
            )),
        )
        .nest(
            "/supplier",
            supplier::supplier_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_supplier,
            )),
        )
        .nest(
            "/admin",
            admin::admin_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin)),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: every log line of one request carries its
/// method, URI and `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
