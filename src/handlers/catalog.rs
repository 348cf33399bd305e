use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::validated;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{Brand, BrandFilter, Category, NameInput, Site, SiteInput},
};

// --- Reads (any authenticated user) ---

#[utoipa::path(
    get,
    path = "/catalog/sites",
    responses((status = 200, description = "All sites", body = [Site]))
)]
pub async fn list_sites(State(state): State<AppState>) -> Json<Vec<Site>> {
    Json(state.repo.list_sites().await)
}

#[utoipa::path(
    get,
    path = "/catalog/categories",
    responses((status = 200, description = "All categories", body = [Category]))
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.repo.list_categories().await)
}

/// list_brands
///
/// [Authenticated Route] Brands, optionally narrowed to those linked to a
/// category and/or a site. Both filters apply together.
#[utoipa::path(
    get,
    path = "/catalog/brands",
    params(BrandFilter),
    responses((status = 200, description = "Matching brands", body = [Brand]))
)]
pub async fn list_brands(
    State(state): State<AppState>,
    Query(filter): Query<BrandFilter>,
) -> Json<Vec<Brand>> {
    Json(state.repo.list_brands(filter).await)
}

// --- Sites (admin) ---

#[utoipa::path(
    post,
    path = "/admin/sites",
    request_body = SiteInput,
    responses(
        (status = 201, description = "Created", body = Site),
        (status = 409, description = "Name taken")
    )
)]
pub async fn create_site(
    State(state): State<AppState>,
    Json(payload): Json<SiteInput>,
) -> ApiResult<(StatusCode, Json<Site>)> {
    let site = state.repo.create_site(validated(payload)?).await?;
    tracing::info!(site_id = %site.id, "site created");
    Ok((StatusCode::CREATED, Json(site)))
}

#[utoipa::path(
    put,
    path = "/admin/sites/{id}",
    params(("id" = Uuid, Path, description = "Site ID")),
    request_body = SiteInput,
    responses((status = 200, description = "Updated", body = Site), (status = 404, description = "Not Found"))
)]
pub async fn update_site(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SiteInput>,
) -> ApiResult<Json<Site>> {
    state
        .repo
        .update_site(id, validated(payload)?)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("site"))
}

/// delete_site
///
/// [Admin Route] Fails with 400 while employees or requests still reference the site.
#[utoipa::path(
    delete,
    path = "/admin/sites/{id}",
    params(("id" = Uuid, Path, description = "Site ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_site(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if state.repo.delete_site(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("site"))
    }
}

// --- Categories (admin) ---

#[utoipa::path(
    post,
    path = "/admin/categories",
    request_body = NameInput,
    responses((status = 201, description = "Created", body = Category), (status = 409, description = "Name taken"))
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<NameInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let payload = validated(payload)?;
    let category = state.repo.create_category(payload.name.trim().to_string()).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = NameInput,
    responses((status = 200, description = "Renamed", body = Category), (status = 404, description = "Not Found"))
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NameInput>,
) -> ApiResult<Json<Category>> {
    let payload = validated(payload)?;
    state
        .repo
        .update_category(id, payload.name.trim().to_string())
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("category"))
}

#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.repo.delete_category(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("category"))
    }
}

// --- Brands (admin) ---

#[utoipa::path(
    post,
    path = "/admin/brands",
    request_body = NameInput,
    responses((status = 201, description = "Created", body = Brand), (status = 409, description = "Name taken"))
)]
pub async fn create_brand(
    State(state): State<AppState>,
    Json(payload): Json<NameInput>,
) -> ApiResult<(StatusCode, Json<Brand>)> {
    let payload = validated(payload)?;
    let brand = state.repo.create_brand(payload.name.trim().to_string()).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

#[utoipa::path(
    put,
    path = "/admin/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand ID")),
    request_body = NameInput,
    responses((status = 200, description = "Renamed", body = Brand), (status = 404, description = "Not Found"))
)]
pub async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NameInput>,
) -> ApiResult<Json<Brand>> {
    let payload = validated(payload)?;
    state
        .repo
        .update_brand(id, payload.name.trim().to_string())
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("brand"))
}

#[utoipa::path(
    delete,
    path = "/admin/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete_brand(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if state.repo.delete_brand(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("brand"))
    }
}

// --- Junction links (admin) ---
//
// Linking is idempotent: an existing link is answered with 204 as well.

#[utoipa::path(
    put,
    path = "/admin/sites/{id}/brands/{brand_id}",
    params(
        ("id" = Uuid, Path, description = "Site ID"),
        ("brand_id" = Uuid, Path, description = "Brand ID")
    ),
    responses((status = 204, description = "Linked"), (status = 400, description = "Unknown site or brand"))
)]
pub async fn link_site_brand(
    State(state): State<AppState>,
    Path((site_id, brand_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.repo.link_site_brand(site_id, brand_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/admin/sites/{id}/brands/{brand_id}",
    params(
        ("id" = Uuid, Path, description = "Site ID"),
        ("brand_id" = Uuid, Path, description = "Brand ID")
    ),
    responses((status = 204, description = "Unlinked"), (status = 404, description = "No such link"))
)]
pub async fn unlink_site_brand(
    State(state): State<AppState>,
    Path((site_id, brand_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    if state.repo.unlink_site_brand(site_id, brand_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("site brand link"))
    }
}

#[utoipa::path(
    put,
    path = "/admin/categories/{id}/brands/{brand_id}",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ("brand_id" = Uuid, Path, description = "Brand ID")
    ),
    responses((status = 204, description = "Linked"), (status = 400, description = "Unknown category or brand"))
)]
pub async fn link_category_brand(
    State(state): State<AppState>,
    Path((category_id, brand_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.repo.link_category_brand(category_id, brand_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/admin/categories/{id}/brands/{brand_id}",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ("brand_id" = Uuid, Path, description = "Brand ID")
    ),
    responses((status = 204, description = "Unlinked"), (status = 404, description = "No such link"))
)]
pub async fn unlink_category_brand(
    State(state): State<AppState>,
    Path((category_id, brand_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    if state.repo.unlink_category_brand(category_id, brand_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("category brand link"))
    }
}
