use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use crate::{
    AppState,
    config::{AppConfig, Env},
    error::ApiError,
    models::{Employee, Role, Supplier, User},
    repository::{Repository, RepositoryState},
};

/// Claims
///
/// JWT payload issued by `POST /auth/login`. The role is informational; the
/// extractor always re-reads it from the database.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

/// The employee record of the caller, attached by `require_employee`.
#[derive(Debug, Clone)]
pub struct CurrentEmployee(pub Employee);

/// The approved supplier record of the caller, attached by `require_supplier`.
#[derive(Debug, Clone)]
pub struct CurrentSupplier(pub Supplier);

/// AuthUser Extractor
///
/// Resolution order:
/// 1. an identity already attached to the request by a role gate;
/// 2. in `Env::Local`, the `x-user-id` header naming an existing user;
/// 3. a `Bearer` JWT, validated for signature and expiry, whose subject
///    still exists in the repository.
///
/// Rejection: 401 on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            let bypass = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|id| Uuid::parse_str(id).ok());
            if let Some(user_id) = bypass {
                if let Some(user) = repo.get_user(user_id).await {
                    return Ok(AuthUser {
                        id: user.id,
                        role: user.role,
                    });
                }
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let claims = decode_token(token, &config.jwt_secret).map_err(|e| {
            tracing::debug!("rejected token: {:?}", e.kind());
            StatusCode::UNAUTHORIZED
        })?;

        // A valid token for a deleted user is still rejected.
        let user = repo
            .get_user(claims.sub)
            .await
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser {
            id: user.id,
            role: user.role,
        })
    }
}

impl<S> FromRequestParts<S> for CurrentEmployee
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(employee) = parts.extensions.get::<CurrentEmployee>() {
            return Ok(employee.clone());
        }
        let user = AuthUser::from_request_parts(parts, state).await?;
        RepositoryState::from_ref(state)
            .get_employee_by_user(user.id)
            .await
            .map(CurrentEmployee)
            .ok_or(StatusCode::FORBIDDEN)
    }
}

impl<S> FromRequestParts<S> for CurrentSupplier
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(supplier) = parts.extensions.get::<CurrentSupplier>() {
            return Ok(supplier.clone());
        }
        let user = AuthUser::from_request_parts(parts, state).await?;
        RepositoryState::from_ref(state)
            .get_supplier_by_user(user.id)
            .await
            .filter(|s| s.is_approved)
            .map(CurrentSupplier)
            .ok_or(StatusCode::FORBIDDEN)
    }
}

// --- Role gates ---
//
// Route-group middleware. The `AuthUser` argument rejects anonymous callers
// with 401 before the body runs; a role mismatch is answered with 403.
// Resolved identities are stored in the request extensions so handler
// extractors do not hit the repository a second time.

/// Any authenticated user.
pub async fn require_auth(user: AuthUser, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

pub async fn require_admin(
    user: AuthUser,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if user.role != Role::Admin {
        tracing::warn!(user_id = %user.id, "admin route denied");
        return Err(StatusCode::FORBIDDEN);
    }
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub async fn require_employee(
    State(state): State<AppState>,
    user: AuthUser,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if user.role != Role::Employee {
        return Err(StatusCode::FORBIDDEN);
    }
    let employee = state
        .repo
        .get_employee_by_user(user.id)
        .await
        .ok_or(StatusCode::FORBIDDEN)?;
    request.extensions_mut().insert(user);
    request.extensions_mut().insert(CurrentEmployee(employee));
    Ok(next.run(request).await)
}

/// Suppliers must also be approved by an admin.
pub async fn require_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if user.role != Role::Supplier {
        return Err(StatusCode::FORBIDDEN);
    }
    let supplier = state
        .repo
        .get_supplier_by_user(user.id)
        .await
        .ok_or(StatusCode::FORBIDDEN)?;
    if !supplier.is_approved {
        tracing::info!(supplier_id = %supplier.id, "unapproved supplier blocked");
        return Err(StatusCode::FORBIDDEN);
    }
    request.extensions_mut().insert(user);
    request.extensions_mut().insert(CurrentSupplier(supplier));
    Ok(next.run(request).await)
}

// --- Tokens and passwords ---

fn now_secs() -> usize {
    Utc::now().timestamp().max(0) as usize
}

/// issue_token
///
/// Signs an HS256 token for `user`, valid for `config.jwt_ttl_secs`.
/// Returns the token and its expiry instant.
pub fn issue_token(user: &User, config: &AppConfig) -> Result<(String, DateTime<Utc>), ApiError> {
    let iat = now_secs();
    let exp = iat + config.jwt_ttl_secs as usize;
    let claims = Claims {
        sub: user.id,
        role: user.role,
        exp,
        iat,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;

    let expires_at = Utc
        .timestamp_opt(exp as i64, 0)
        .single()
        .ok_or_else(|| ApiError::Internal("token expiry out of range".to_string()))?;
    Ok((token, expires_at))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
}

/// Argon2id hash in PHC string format.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Runs `hash_password` on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?
}

pub async fn verify_password_blocking(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}

/// Stands in for the stored hash when a login names no account. Its
/// password is random, so nothing verifies against it.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password(&Uuid::new_v4().to_string()).ok());

/// verify_unknown_account
///
/// Spends the same Argon2 verify as a real login so an unknown email is
/// not answered faster than a wrong password. Always false.
pub async fn verify_unknown_account(password: String) -> bool {
    tokio::task::spawn_blocking(move || {
        UNKNOWN_ACCOUNT_HASH
            .as_deref()
            .is_some_and(|hash| verify_password(&password, hash))
    })
    .await
    .unwrap_or(false)
}

/// False for a wrong password and for a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("stored password hash is malformed: {e}");
            false
        }
    }
}

/// bootstrap_admin
///
/// Creates the configured admin account when `ADMIN_EMAIL` and
/// `ADMIN_PASSWORD` are both set and no user holds that email yet.
/// Returns the created user, or `None` when nothing had to be done.
pub async fn bootstrap_admin(
    repo: &dyn Repository,
    config: &AppConfig,
) -> Result<Option<User>, ApiError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(None);
    };
    let email = email.trim().to_lowercase();
    if repo.get_user_by_email(&email).await.is_some() {
        tracing::debug!("bootstrap admin already present");
        return Ok(None);
    }

    let hash = hash_password_blocking(password.clone()).await?;
    let admin = repo.create_admin(&email, &hash).await?;
    tracing::info!(user_id = %admin.id, "bootstrap admin created");
    Ok(Some(admin))
}
