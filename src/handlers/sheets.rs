use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use super::validated;
use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ApiResult},
    models::{
        CreateSheetRequest, Role, Sheet, SheetDownloadResponse, SheetKind, SheetUploadResponse,
    },
    storage,
    validation::{self, ValidationError},
    workflow,
};

/// Employees exchange request sheets, approved suppliers exchange offer sheets.
/// A linked request must belong to the employee, or be open for the supplier.
async fn sheet_kind_for(
    state: &AppState,
    user: &AuthUser,
    request_id: Option<Uuid>,
) -> ApiResult<SheetKind> {
    let linked = match request_id {
        Some(id) => Some(
            state
                .repo
                .get_request(id)
                .await
                .ok_or_else(|| ApiError::from(ValidationError::new("request_id", "unknown request")))?,
        ),
        None => None,
    };

    match user.role {
        Role::Employee => {
            let employee = state
                .repo
                .get_employee_by_user(user.id)
                .await
                .ok_or(ApiError::Forbidden("no employee record"))?;
            if linked.is_some_and(|r| r.employee_id != employee.id) {
                return Err(ApiError::NotFound("request"));
            }
            Ok(SheetKind::RequestSheet)
        }
        Role::Supplier => {
            let supplier = state.repo.get_supplier_by_user(user.id).await;
            if !supplier.is_some_and(|s| s.is_approved) {
                return Err(ApiError::Forbidden("supplier is not approved"));
            }
            if let Some(request) = linked {
                workflow::ensure_accepts_offers(request.status)?;
            }
            Ok(SheetKind::OfferSheet)
        }
        Role::Admin => Err(ApiError::Forbidden("admins do not upload sheets")),
    }
}

/// create_sheet
///
/// [Authenticated Route] Starts an Excel exchange upload.
///
/// *Security*: The object key is server-generated (`sheets/<kind>/<uuid>.<ext>`),
/// only spreadsheet extensions are accepted, and the returned PUT URL is
/// short-lived and constrained to the spreadsheet MIME type. The sheet is
/// recorded only after presigning succeeded.
#[utoipa::path(
    post,
    path = "/sheets",
    request_body = CreateSheetRequest,
    responses(
        (status = 201, description = "Upload URL issued", body = SheetUploadResponse),
        (status = 400, description = "Not a spreadsheet"),
        (status = 403, description = "Role may not upload")
    )
)]
pub async fn create_sheet(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateSheetRequest>,
) -> ApiResult<(StatusCode, Json<SheetUploadResponse>)> {
    let payload = validated(payload)?;
    let extension = validation::sheet_extension(&payload.file_name)?;
    let kind = sheet_kind_for(&state, &user, payload.request_id).await?;

    let object_key = storage::sheet_object_key(kind, &extension);
    let upload_url = state
        .storage
        .presigned_upload_url(&object_key, storage::sheet_content_type(&extension))
        .await
        .map_err(ApiError::storage)?;

    let sheet = state
        .repo
        .create_sheet(
            user.id,
            kind,
            payload.request_id,
            payload.file_name.trim().to_string(),
            object_key,
        )
        .await?;
    tracing::info!(sheet_id = %sheet.id, kind = kind.as_str(), "sheet upload issued");

    Ok((StatusCode::CREATED, Json(SheetUploadResponse { sheet, upload_url })))
}

/// list_sheets
///
/// [Authenticated Route] Admins see every sheet; everyone else their own.
#[utoipa::path(
    get,
    path = "/sheets",
    responses((status = 200, description = "Sheets, newest first", body = [Sheet]))
)]
pub async fn list_sheets(user: AuthUser, State(state): State<AppState>) -> Json<Vec<Sheet>> {
    let owner = (user.role != Role::Admin).then_some(user.id);
    Json(state.repo.list_sheets(owner).await)
}

/// download_sheet
///
/// [Authenticated Route] Presigned GET URL for a sheet. Allowed for the
/// uploader, for admins, and for the employee owning the linked request
/// (so offer sheets reach the buyer). Everyone else gets 404.
#[utoipa::path(
    get,
    path = "/sheets/{id}/download",
    params(("id" = Uuid, Path, description = "Sheet ID")),
    responses(
        (status = 200, description = "Download URL issued", body = SheetDownloadResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn download_sheet(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SheetDownloadResponse>> {
    let sheet = state.repo.get_sheet(id).await.ok_or(ApiError::NotFound("sheet"))?;

    let allowed = if sheet.owner_id == user.id || user.role == Role::Admin {
        true
    } else if let (Role::Employee, Some(request_id)) = (user.role, sheet.request_id) {
        let employee = state.repo.get_employee_by_user(user.id).await;
        let request = state.repo.get_request(request_id).await;
        matches!((employee, request), (Some(e), Some(r)) if r.employee_id == e.id)
    } else {
        false
    };
    if !allowed {
        return Err(ApiError::NotFound("sheet"));
    }

    let download_url = state
        .storage
        .presigned_download_url(&sheet.object_key)
        .await
        .map_err(ApiError::storage)?;

    Ok(Json(SheetDownloadResponse {
        file_name: sheet.file_name,
        download_url,
    }))
}
