use axum::{Json, extract::State, http::StatusCode};

use super::{normalize_email, validated};
use crate::{
    AppState,
    auth::{self, AuthUser},
    error::{ApiError, ApiResult},
    models::{LoginRequest, LoginResponse, Profile, RegisterSupplierRequest, Role, Supplier},
    notify::{self, NotificationEvent},
};

/// login
///
/// [Public Route] Exchanges email and password for a signed JWT.
///
/// Unknown email and wrong password are both answered with the same 401 so
/// the endpoint does not reveal which accounts exist.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Bad credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let payload = validated(payload)?;
    let email = normalize_email(&payload.email);

    let Some(user) = state.repo.get_user_by_email(&email).await else {
        auth::verify_unknown_account(payload.password).await;
        return Err(ApiError::Unauthorized);
    };

    if !auth::verify_password_blocking(payload.password, user.password_hash.clone()).await {
        tracing::info!(user_id = %user.id, "login rejected");
        return Err(ApiError::Unauthorized);
    }

    let (token, expires_at) = auth::issue_token(&user, &state.config)?;
    tracing::info!(user_id = %user.id, role = user.role.as_str(), "login succeeded");

    Ok(Json(LoginResponse {
        token,
        role: user.role,
        expires_at,
    }))
}

/// register_supplier
///
/// [Public Route] Supplier self-registration. The account is created
/// unapproved; every admin is notified so it can be reviewed.
#[utoipa::path(
    post,
    path = "/auth/register/supplier",
    request_body = RegisterSupplierRequest,
    responses(
        (status = 201, description = "Registered, awaiting approval", body = Supplier),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email or tax number already registered")
    )
)]
pub async fn register_supplier(
    State(state): State<AppState>,
    Json(payload): Json<RegisterSupplierRequest>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    let mut payload = validated(payload)?;
    payload.email = normalize_email(&payload.email);
    payload.tax_number = payload.tax_number.trim().to_string();

    let hash = auth::hash_password_blocking(payload.password.clone()).await?;
    let supplier = state.repo.register_supplier(payload, hash).await?;
    tracing::info!(supplier_id = %supplier.id, "supplier registered");

    notify::dispatch(state.repo.as_ref(), NotificationEvent::SupplierRegistered(&supplier)).await;

    Ok((StatusCode::CREATED, Json(supplier)))
}

/// get_me
///
/// [Authenticated Route] The caller's identity plus its employee or supplier record.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Current profile", body = Profile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Profile>> {
    let user = state.repo.get_user(id).await.ok_or(ApiError::NotFound("user"))?;

    let (employee, supplier) = match user.role {
        Role::Employee => (state.repo.get_employee_by_user(id).await, None),
        Role::Supplier => (None, state.repo.get_supplier_by_user(id).await),
        Role::Admin => (None, None),
    };

    Ok(Json(Profile {
        id: user.id,
        email: user.email,
        role: user.role,
        employee,
        supplier,
    }))
}
