use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::validated;
use crate::{
    AppState,
    auth::CurrentSupplier,
    error::{ApiError, ApiResult},
    models::{
        MaterialRequest, Offer, RequestDetail, RequestFilter, RequestStatus, SubmitOfferRequest,
        UpdateOfferRequest,
    },
    notify::{self, NotificationEvent},
    repository::Repository,
    workflow,
};

/// Loads an offer written by `supplier`, together with its request.
async fn owned_offer(
    repo: &dyn Repository,
    supplier: &CurrentSupplier,
    id: Uuid,
) -> ApiResult<(Offer, MaterialRequest)> {
    let offer = repo
        .get_offer(id)
        .await
        .filter(|o| o.supplier_id == supplier.0.id)
        .ok_or(ApiError::NotFound("offer"))?;
    let request = repo
        .get_request(offer.request_id)
        .await
        .ok_or(ApiError::NotFound("request"))?;
    Ok((offer, request))
}

/// list_open_requests
///
/// [Supplier Route] Requests currently accepting offers. A `status` query
/// parameter is ignored; suppliers only ever see open requests here.
#[utoipa::path(
    get,
    path = "/supplier/requests",
    params(RequestFilter),
    responses(
        (status = 200, description = "Open requests", body = [MaterialRequest]),
        (status = 403, description = "Supplier not approved")
    )
)]
pub async fn list_open_requests(
    _supplier: CurrentSupplier,
    State(state): State<AppState>,
    Query(filter): Query<RequestFilter>,
) -> Json<Vec<MaterialRequest>> {
    let filter = RequestFilter {
        status: Some(RequestStatus::Open),
        ..filter
    };
    Json(state.repo.list_requests(filter).await)
}

/// get_request_for_supplier
///
/// [Supplier Route] An open request, or any request the caller has bid on.
/// Only the caller's own offers are included.
#[utoipa::path(
    get,
    path = "/supplier/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Found", body = RequestDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_request_for_supplier(
    supplier: CurrentSupplier,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RequestDetail>> {
    let request = state
        .repo
        .get_request(id)
        .await
        .ok_or(ApiError::NotFound("request"))?;
    let offers: Vec<Offer> = state
        .repo
        .list_offers_for_request(id)
        .await
        .into_iter()
        .filter(|o| o.supplier_id == supplier.0.id)
        .collect();

    if request.status != RequestStatus::Open && offers.is_empty() {
        return Err(ApiError::NotFound("request"));
    }
    Ok(Json(RequestDetail { request, offers }))
}

/// submit_offer
///
/// [Supplier Route] Bids on an open request. A supplier holds at most one
/// pending offer per request; a second one is answered with 409.
#[utoipa::path(
    post,
    path = "/supplier/requests/{id}/offers",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = SubmitOfferRequest,
    responses(
        (status = 201, description = "Submitted", body = Offer),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request not open or offer already pending")
    )
)]
pub async fn submit_offer(
    supplier: CurrentSupplier,
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<SubmitOfferRequest>,
) -> ApiResult<(StatusCode, Json<Offer>)> {
    let payload = validated(payload)?;
    let request = state
        .repo
        .get_request(request_id)
        .await
        .ok_or(ApiError::NotFound("request"))?;
    workflow::ensure_accepts_offers(request.status)?;

    if state.repo.find_pending_offer(request_id, supplier.0.id).await.is_some() {
        return Err(ApiError::Conflict(
            "a pending offer for this request already exists".to_string(),
        ));
    }

    let offer = state.repo.create_offer(request_id, supplier.0.id, payload).await?;
    tracing::info!(offer_id = %offer.id, request_id = %request_id, supplier_id = %supplier.0.id, "offer submitted");

    notify::dispatch(
        state.repo.as_ref(),
        NotificationEvent::OfferSubmitted {
            request: &request,
            offer: &offer,
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(offer)))
}

#[utoipa::path(
    get,
    path = "/supplier/offers",
    responses((status = 200, description = "My offers, newest first", body = [Offer]))
)]
pub async fn list_my_offers(
    supplier: CurrentSupplier,
    State(state): State<AppState>,
) -> Json<Vec<Offer>> {
    Json(state.repo.list_offers_by_supplier(supplier.0.id).await)
}

/// update_my_offer
///
/// [Supplier Route] Revises price, delivery time or note of a pending offer
/// while its request is still open.
#[utoipa::path(
    put,
    path = "/supplier/offers/{id}",
    params(("id" = Uuid, Path, description = "Offer ID")),
    request_body = UpdateOfferRequest,
    responses(
        (status = 200, description = "Updated", body = Offer),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Offer or request closed")
    )
)]
pub async fn update_my_offer(
    supplier: CurrentSupplier,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOfferRequest>,
) -> ApiResult<Json<Offer>> {
    let payload = validated(payload)?;
    let (offer, request) = owned_offer(state.repo.as_ref(), &supplier, id).await?;
    workflow::ensure_offer_editable(offer.status)?;
    workflow::ensure_accepts_offers(request.status)?;

    let offer = state
        .repo
        .update_offer(id, payload)
        .await
        .ok_or_else(|| ApiError::Conflict("offer is no longer pending".to_string()))?;

    notify::dispatch(
        state.repo.as_ref(),
        NotificationEvent::OfferUpdated {
            request: &request,
            offer: &offer,
        },
    )
    .await;

    Ok(Json(offer))
}

#[utoipa::path(
    delete,
    path = "/supplier/offers/{id}",
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Withdrawn", body = Offer),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Offer not pending")
    )
)]
pub async fn withdraw_my_offer(
    supplier: CurrentSupplier,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Offer>> {
    let (offer, request) = owned_offer(state.repo.as_ref(), &supplier, id).await?;
    let next = workflow::withdraw(offer.status)?;

    let offer = state
        .repo
        .set_offer_status(id, &[offer.status], next)
        .await
        .ok_or_else(|| ApiError::Conflict("offer changed concurrently".to_string()))?;
    tracing::info!(offer_id = %id, "offer withdrawn");

    notify::dispatch(
        state.repo.as_ref(),
        NotificationEvent::OfferWithdrawn {
            request: &request,
            offer: &offer,
        },
    )
    .await;

    Ok(Json(offer))
}
