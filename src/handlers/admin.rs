use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::{normalize_email, validated};
use crate::{
    AppState,
    auth,
    error::{ApiError, ApiResult},
    models::{
        AdminDashboardStats, CreateEmployeeRequest, Employee, MaterialRequest, RequestDetail,
        RequestFilter, ReviewRequest, Supplier, SupplierApproval, SupplierFilter,
    },
    notify::{self, NotificationEvent},
    validation::ValidationError,
    workflow,
};

/// get_admin_stats
///
/// [Admin Route] Dashboard counters over requests, offers, suppliers and employees.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Dashboard counters", body = AdminDashboardStats))
)]
pub async fn get_admin_stats(State(state): State<AppState>) -> Json<AdminDashboardStats> {
    Json(state.repo.get_stats().await)
}

// --- Suppliers ---

#[utoipa::path(
    get,
    path = "/admin/suppliers",
    params(SupplierFilter),
    responses((status = 200, description = "Suppliers", body = [Supplier]))
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(filter): Query<SupplierFilter>,
) -> Json<Vec<Supplier>> {
    Json(state.repo.list_suppliers(filter.approved).await)
}

/// set_supplier_approval
///
/// [Admin Route] Approves or revokes a supplier. The supplier is notified
/// only when the flag actually changes.
#[utoipa::path(
    put,
    path = "/admin/suppliers/{id}/approval",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    request_body = SupplierApproval,
    responses(
        (status = 200, description = "Updated", body = Supplier),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_supplier_approval(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SupplierApproval>,
) -> ApiResult<Json<Supplier>> {
    let before = state
        .repo
        .get_supplier(id)
        .await
        .ok_or(ApiError::NotFound("supplier"))?;
    if before.is_approved == payload.approved {
        return Ok(Json(before));
    }

    let supplier = state
        .repo
        .set_supplier_approval(id, payload.approved)
        .await
        .ok_or(ApiError::NotFound("supplier"))?;
    tracing::info!(supplier_id = %id, approved = supplier.is_approved, "supplier approval changed");

    notify::dispatch(state.repo.as_ref(), NotificationEvent::SupplierApprovalChanged(&supplier)).await;

    Ok(Json(supplier))
}

// --- Employees ---

/// create_employee
///
/// [Admin Route] Creates the login and the employee record in one step.
#[utoipa::path(
    post,
    path = "/admin/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Created", body = Employee),
        (status = 400, description = "Invalid payload or unknown site"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let mut payload = validated(payload)?;
    payload.email = normalize_email(&payload.email);
    if state.repo.get_site(payload.site_id).await.is_none() {
        return Err(ValidationError::new("site_id", "unknown site").into());
    }

    let hash = auth::hash_password_blocking(payload.password.clone()).await?;
    let employee = state.repo.create_employee(payload, hash).await?;
    tracing::info!(employee_id = %employee.id, site_id = %employee.site_id, "employee created");

    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    get,
    path = "/admin/employees",
    responses((status = 200, description = "Employees", body = [Employee]))
)]
pub async fn list_employees(State(state): State<AppState>) -> Json<Vec<Employee>> {
    Json(state.repo.list_employees().await)
}

// --- Requests ---

#[utoipa::path(
    get,
    path = "/admin/requests",
    params(RequestFilter),
    responses((status = 200, description = "Requests, newest first", body = [MaterialRequest]))
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(filter): Query<RequestFilter>,
) -> Json<Vec<MaterialRequest>> {
    Json(state.repo.list_requests(filter).await)
}

#[utoipa::path(
    get,
    path = "/admin/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Found", body = RequestDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RequestDetail>> {
    let request = state
        .repo
        .get_request(id)
        .await
        .ok_or(ApiError::NotFound("request"))?;
    let offers = state.repo.list_offers_for_request(id).await;
    Ok(Json(RequestDetail { request, offers }))
}

/// review_request
///
/// [Admin Route] Opens a pending request for bidding or rejects it. Opening
/// notifies the owner and every approved supplier; rejecting only the owner.
#[utoipa::path(
    put,
    path = "/admin/requests/{id}/review",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Reviewed", body = MaterialRequest),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Not pending")
    )
)]
pub async fn review_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> ApiResult<Json<MaterialRequest>> {
    let payload = validated(payload)?;
    let current = state
        .repo
        .get_request(id)
        .await
        .ok_or(ApiError::NotFound("request"))?;
    let next = workflow::review(current.status, payload.approve)?;

    let request = state
        .repo
        .set_request_status(id, &[current.status], next, payload.note)
        .await
        .ok_or_else(|| ApiError::Conflict("request was reviewed concurrently".to_string()))?;
    tracing::info!(request_id = %id, status = request.status.as_str(), "request reviewed");

    notify::dispatch(state.repo.as_ref(), NotificationEvent::RequestReviewed(&request)).await;

    Ok(Json(request))
}
