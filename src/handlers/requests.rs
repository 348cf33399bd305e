use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::validated;
use crate::{
    AppState,
    auth::CurrentEmployee,
    error::{ApiError, ApiResult},
    models::{
        BrandFilter, CreateMaterialRequest, MaterialRequest, Offer, RequestDetail,
        UpdateMaterialRequest,
    },
    notify::{self, NotificationEvent},
    repository::{Cancellation, Repository},
    validation::ValidationError,
    workflow,
};

/// A request may only name a brand that is linked to its category.
async fn ensure_brand_in_category(
    repo: &dyn Repository,
    category_id: Uuid,
    brand_id: Option<Uuid>,
) -> ApiResult<()> {
    let Some(brand_id) = brand_id else {
        return Ok(());
    };
    let filter = BrandFilter {
        category_id: Some(category_id),
        site_id: None,
    };
    if repo.list_brands(filter).await.iter().any(|b| b.id == brand_id) {
        Ok(())
    } else {
        Err(ValidationError::new("brand_id", "brand is not offered in this category").into())
    }
}

/// Loads a request owned by `employee`. Someone else's request is reported
/// as missing rather than forbidden.
async fn owned_request(
    repo: &dyn Repository,
    employee: &CurrentEmployee,
    id: Uuid,
) -> ApiResult<MaterialRequest> {
    repo.get_request(id)
        .await
        .filter(|r| r.employee_id == employee.0.id)
        .ok_or(ApiError::NotFound("request"))
}

/// create_request
///
/// [Employee Route] Raises a material request at the employee's own site.
/// The request starts `pending`; every admin is notified to review it.
#[utoipa::path(
    post,
    path = "/employee/requests",
    request_body = CreateMaterialRequest,
    responses(
        (status = 201, description = "Created", body = MaterialRequest),
        (status = 400, description = "Invalid payload or unknown category")
    )
)]
pub async fn create_request(
    employee: CurrentEmployee,
    State(state): State<AppState>,
    Json(payload): Json<CreateMaterialRequest>,
) -> ApiResult<(StatusCode, Json<MaterialRequest>)> {
    let payload = validated(payload)?;
    if state.repo.get_category(payload.category_id).await.is_none() {
        return Err(ValidationError::new("category_id", "unknown category").into());
    }
    ensure_brand_in_category(state.repo.as_ref(), payload.category_id, payload.brand_id).await?;

    let request = state.repo.create_request(&employee.0, payload).await?;
    tracing::info!(request_id = %request.id, employee_id = %employee.0.id, "request created");

    notify::dispatch(state.repo.as_ref(), NotificationEvent::RequestCreated(&request)).await;

    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/employee/requests",
    responses((status = 200, description = "My requests, newest first", body = [MaterialRequest]))
)]
pub async fn list_my_requests(
    employee: CurrentEmployee,
    State(state): State<AppState>,
) -> Json<Vec<MaterialRequest>> {
    Json(state.repo.list_requests_by_employee(employee.0.id).await)
}

/// get_my_request
///
/// [Employee Route] One of the caller's requests together with every offer on it.
#[utoipa::path(
    get,
    path = "/employee/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Found", body = RequestDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_my_request(
    employee: CurrentEmployee,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RequestDetail>> {
    let request = owned_request(state.repo.as_ref(), &employee, id).await?;
    let offers = state.repo.list_offers_for_request(id).await;
    Ok(Json(RequestDetail { request, offers }))
}

/// update_my_request
///
/// [Employee Route] Partial update, allowed only while the request is pending.
#[utoipa::path(
    put,
    path = "/employee/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateMaterialRequest,
    responses(
        (status = 200, description = "Updated", body = MaterialRequest),
        (status = 404, description = "Not Found"),
        (status = 409, description = "No longer pending")
    )
)]
pub async fn update_my_request(
    employee: CurrentEmployee,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaterialRequest>,
) -> ApiResult<Json<MaterialRequest>> {
    let payload = validated(payload)?;
    let current = owned_request(state.repo.as_ref(), &employee, id).await?;
    workflow::ensure_editable(current.status)?;
    ensure_brand_in_category(state.repo.as_ref(), current.category_id, payload.brand_id).await?;

    state
        .repo
        .update_request(id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::Conflict("request was reviewed concurrently".to_string()))
}

/// cancel_my_request
///
/// [Employee Route] Cancels a pending or open request. Pending offers on it
/// are closed as rejected and their suppliers are told.
#[utoipa::path(
    delete,
    path = "/employee/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Cancelled", body = MaterialRequest),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Already final")
    )
)]
pub async fn cancel_my_request(
    employee: CurrentEmployee,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MaterialRequest>> {
    let current = owned_request(state.repo.as_ref(), &employee, id).await?;
    workflow::cancel(current.status)?;

    let Cancellation { request, closed } = state
        .repo
        .cancel_request(id, &[current.status])
        .await
        .ok_or_else(|| ApiError::Conflict("request changed concurrently".to_string()))?;
    tracing::info!(request_id = %id, closed_offers = closed.len(), "request cancelled");

    notify::dispatch(
        state.repo.as_ref(),
        NotificationEvent::RequestCancelled {
            request: &request,
            closed_offers: &closed,
        },
    )
    .await;

    Ok(Json(request))
}

#[utoipa::path(
    get,
    path = "/employee/requests/{id}/offers",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Offers on my request", body = [Offer]),
        (status = 404, description = "Not Found")
    )
)]
pub async fn list_request_offers(
    employee: CurrentEmployee,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Offer>>> {
    owned_request(state.repo.as_ref(), &employee, id).await?;
    Ok(Json(state.repo.list_offers_for_request(id).await))
}

/// accept_offer
///
/// [Employee Route] Awards the owning request to this offer. Every other
/// pending offer on the request is rejected in the same write, and both the
/// winner and the losers are notified.
#[utoipa::path(
    post,
    path = "/employee/offers/{id}/accept",
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Awarded", body = RequestDetail),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Request not open or offer not pending")
    )
)]
pub async fn accept_offer(
    employee: CurrentEmployee,
    State(state): State<AppState>,
    Path(offer_id): Path<Uuid>,
) -> ApiResult<Json<RequestDetail>> {
    let offer = state
        .repo
        .get_offer(offer_id)
        .await
        .ok_or(ApiError::NotFound("offer"))?;
    let request = owned_request(state.repo.as_ref(), &employee, offer.request_id).await?;
    workflow::award(request.status, offer.status)?;

    // The guarded write can still lose a race with a concurrent accept or cancel.
    let award = state
        .repo
        .accept_offer(offer_id)
        .await
        .ok_or_else(|| ApiError::Conflict("request was closed concurrently".to_string()))?;
    tracing::info!(
        request_id = %award.request.id,
        offer_id = %award.offer.id,
        rejected = award.rejected.len(),
        "offer accepted"
    );

    notify::dispatch(state.repo.as_ref(), NotificationEvent::OfferAccepted(&award)).await;

    let offers = state.repo.list_offers_for_request(award.request.id).await;
    Ok(Json(RequestDetail {
        request: award.request,
        offers,
    }))
}
