use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// --- Enumerations (stored as TEXT columns) ---

/// Raised when a TEXT column holds a value no enum variant maps to.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: String) -> Self {
        Self { kind, value }
    }
}

/// Role
///
/// The RBAC field carried by every user and every issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    #[default]
    Employee,
    Supplier,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Supplier => "supplier",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            "supplier" => Ok(Role::Supplier),
            _ => Err(UnknownVariant::new("role", value)),
        }
    }
}

/// RequestStatus
///
/// Lifecycle of a material request. Transitions live in `crate::workflow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RequestStatus {
    /// Raised by an employee, waiting for admin review.
    #[default]
    Pending,
    /// Approved by an admin; suppliers may bid.
    Open,
    Rejected,
    Cancelled,
    /// An offer was accepted.
    Awarded,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Open => "open",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
            RequestStatus::Awarded => "awarded",
        }
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "open" => Ok(RequestStatus::Open),
            "rejected" => Ok(RequestStatus::Rejected),
            "cancelled" => Ok(RequestStatus::Cancelled),
            "awarded" => Ok(RequestStatus::Awarded),
            _ => Err(UnknownVariant::new("request status", value)),
        }
    }
}

/// OfferStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OfferStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Withdrawn => "withdrawn",
        }
    }
}

impl TryFrom<String> for OfferStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(OfferStatus::Pending),
            "accepted" => Ok(OfferStatus::Accepted),
            "rejected" => Ok(OfferStatus::Rejected),
            "withdrawn" => Ok(OfferStatus::Withdrawn),
            _ => Err(UnknownVariant::new("offer status", value)),
        }
    }
}

/// NotificationKind
///
/// One variant per workflow transition that notifies someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NotificationKind {
    SupplierRegistered,
    SupplierApproved,
    SupplierRevoked,
    #[default]
    RequestCreated,
    RequestOpened,
    RequestRejected,
    RequestCancelled,
    OfferSubmitted,
    OfferUpdated,
    OfferWithdrawn,
    OfferAccepted,
    OfferRejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::SupplierRegistered => "supplier_registered",
            NotificationKind::SupplierApproved => "supplier_approved",
            NotificationKind::SupplierRevoked => "supplier_revoked",
            NotificationKind::RequestCreated => "request_created",
            NotificationKind::RequestOpened => "request_opened",
            NotificationKind::RequestRejected => "request_rejected",
            NotificationKind::RequestCancelled => "request_cancelled",
            NotificationKind::OfferSubmitted => "offer_submitted",
            NotificationKind::OfferUpdated => "offer_updated",
            NotificationKind::OfferWithdrawn => "offer_withdrawn",
            NotificationKind::OfferAccepted => "offer_accepted",
            NotificationKind::OfferRejected => "offer_rejected",
        }
    }
}

impl TryFrom<String> for NotificationKind {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let kind = match value.as_str() {
            "supplier_registered" => NotificationKind::SupplierRegistered,
            "supplier_approved" => NotificationKind::SupplierApproved,
            "supplier_revoked" => NotificationKind::SupplierRevoked,
            "request_created" => NotificationKind::RequestCreated,
            "request_opened" => NotificationKind::RequestOpened,
            "request_rejected" => NotificationKind::RequestRejected,
            "request_cancelled" => NotificationKind::RequestCancelled,
            "offer_submitted" => NotificationKind::OfferSubmitted,
            "offer_updated" => NotificationKind::OfferUpdated,
            "offer_withdrawn" => NotificationKind::OfferWithdrawn,
            "offer_accepted" => NotificationKind::OfferAccepted,
            "offer_rejected" => NotificationKind::OfferRejected,
            _ => return Err(UnknownVariant::new("notification kind", value)),
        };
        Ok(kind)
    }
}

/// SheetKind
///
/// Direction of an Excel exchange file. Employees upload bulk request
/// sheets, suppliers upload offer sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SheetKind {
    #[default]
    RequestSheet,
    OfferSheet,
}

impl SheetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetKind::RequestSheet => "request_sheet",
            SheetKind::OfferSheet => "offer_sheet",
        }
    }
}

impl TryFrom<String> for SheetKind {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "request_sheet" => Ok(SheetKind::RequestSheet),
            "offer_sheet" => Ok(SheetKind::OfferSheet),
            _ => Err(UnknownVariant::new("sheet kind", value)),
        }
    }
}

// --- Core Records (Mapped to Database) ---

/// User
///
/// Login identity from the `users` table. Never serialized with its hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Employee
///
/// Site staff member. 1–1 with a `User` of role `employee`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Employee {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub site_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Supplier
///
/// Vendor company. Can only bid once an admin has approved it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Supplier {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub tax_number: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_approved: bool,
    #[ts(type = "string | null")]
    pub approved_at: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Site {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

/// MaterialRequest
///
/// A material need raised by an employee at their site (`requests` table).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct MaterialRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub site_id: Uuid,
    pub category_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub quantity: i32,
    pub unit: String,
    pub needed_by: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub review_note: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Offer
///
/// A supplier's priced response to an open request. Prices are kept in
/// minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Offer {
    pub id: Uuid,
    pub request_id: Uuid,
    pub supplier_id: Uuid,
    pub unit_price_cents: i64,
    pub delivery_days: i32,
    pub note: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: OfferStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Notification
///
/// A row of the `notifications` table, addressed to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub kind: NotificationKind,
    pub message: String,
    pub request_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
    pub is_read: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a notification; id and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub request_id: Option<Uuid>,
    pub offer_id: Option<Uuid>,
}

/// Sheet
///
/// Metadata of one Excel exchange file. The bytes live in object storage
/// under `object_key`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Sheet {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[sqlx(try_from = "String")]
    pub kind: SheetKind,
    pub request_id: Option<Uuid>,
    pub file_name: String,
    pub object_key: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    #[ts(type = "string")]
    pub expires_at: DateTime<Utc>,
}

/// RegisterSupplierRequest
///
/// Public self-registration payload. The account starts unapproved.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterSupplierRequest {
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub tax_number: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// CreateEmployeeRequest
///
/// Admin-only payload creating a user of role `employee` attached to a site.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateEmployeeRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub site_id: Uuid,
}

/// CreateMaterialRequest
///
/// Payload for POST /employee/requests. The site is taken from the employee record.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateMaterialRequest {
    pub category_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub quantity: i32,
    pub unit: String,
    pub needed_by: Option<NaiveDate>,
}

/// UpdateMaterialRequest
///
/// Partial update; only `Some` fields change. Allowed while the request is pending.
/// A missing or `null` field keeps the stored value, so `brand_id` and
/// `needed_by` cannot be cleared once set.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateMaterialRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needed_by: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SubmitOfferRequest {
    pub unit_price_cents: i64,
    pub delivery_days: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateOfferRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_days: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// ReviewRequest
///
/// Admin decision on a pending request: open it for bidding or reject it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReviewRequest {
    pub approve: bool,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SupplierApproval {
    pub approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SiteInput {
    pub name: String,
    pub address: String,
}

/// Payload shared by brand and category create/rename.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NameInput {
    pub name: String,
}

/// CreateSheetRequest
///
/// Starts an Excel exchange upload. The server answers with a presigned PUT URL.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateSheetRequest {
    #[schema(example = "offers-week-42.xlsx")]
    pub file_name: String,
    pub request_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SheetUploadResponse {
    pub sheet: Sheet,
    pub upload_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SheetDownloadResponse {
    pub file_name: String,
    pub download_url: String,
}

// --- Query Filters ---

#[derive(Debug, Clone, Deserialize, Default, IntoParams)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub category_id: Option<Uuid>,
    pub site_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Default, IntoParams)]
pub struct BrandFilter {
    pub category_id: Option<Uuid>,
    pub site_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Default, IntoParams)]
pub struct SupplierFilter {
    pub approved: Option<bool>,
}

// --- Output Schemas ---

/// Profile
///
/// Output of GET /me: the login identity plus whichever role record it owns.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub employee: Option<Employee>,
    pub supplier: Option<Supplier>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RequestDetail {
    pub request: MaterialRequest,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReadAllResponse {
    /// Notifications flipped from unread to read.
    pub updated: u64,
}

/// AdminDashboardStats
///
/// Output schema for GET /admin/stats.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_requests: i64,
    /// Requests still waiting for review.
    pub pending_requests: i64,
    pub open_requests: i64,
    pub awarded_requests: i64,
    pub total_offers: i64,
    pub total_suppliers: i64,
    /// Suppliers waiting for approval.
    pub pending_suppliers: i64,
    pub total_employees: i64,
}
