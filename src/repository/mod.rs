use crate::models::{
    AdminDashboardStats, Brand, BrandFilter, Category, CreateEmployeeRequest,
    CreateMaterialRequest, Employee, MaterialRequest, NewNotification, Notification, Offer,
    OfferStatus, RegisterSupplierRequest, RequestFilter, RequestStatus, Role, Sheet, SheetKind,
    Site, SiteInput, SubmitOfferRequest, Supplier, UpdateMaterialRequest, UpdateOfferRequest, User,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// RepoError
///
/// Write failures a caller can act on. Reads report absence through
/// `Option`/empty `Vec` and log the underlying error instead.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A unique constraint rejected the write.
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// A foreign key pointed nowhere, or a delete would orphan rows.
    #[error("{0}")]
    Reference(&'static str),

    #[error("database error: {0}")]
    Database(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Award
///
/// Outcome of accepting an offer: the winner, the awarded request and every
/// sibling offer that was pending and is now rejected.
#[derive(Debug, Clone)]
pub struct Award {
    pub offer: Offer,
    pub request: MaterialRequest,
    pub rejected: Vec<Offer>,
}

/// Cancellation
///
/// Outcome of cancelling a request: the cancelled request and the offers
/// that were pending on it and are now rejected.
#[derive(Debug, Clone)]
pub struct Cancellation {
    pub request: MaterialRequest,
    pub closed: Vec<Offer>,
}

/// Repository Trait
///
/// The persistence contract used by handlers, the auth extractor and the
/// notification dispatcher. `Send + Sync` so `Arc<dyn Repository>` can live
/// in the shared application state.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> Option<User>;
    async fn get_user_by_email(&self, email: &str) -> Option<User>;
    async fn list_user_ids_by_role(&self, role: Role) -> Vec<Uuid>;
    async fn create_admin(&self, email: &str, password_hash: &str) -> RepoResult<User>;

    // --- Employees ---
    /// Creates the `employee` user and its employee record atomically.
    async fn create_employee(
        &self,
        req: CreateEmployeeRequest,
        password_hash: String,
    ) -> RepoResult<Employee>;
    async fn get_employee(&self, id: Uuid) -> Option<Employee>;
    async fn get_employee_by_user(&self, user_id: Uuid) -> Option<Employee>;
    async fn list_employees(&self) -> Vec<Employee>;

    // --- Suppliers ---
    /// Creates the `supplier` user and an unapproved supplier record atomically.
    async fn register_supplier(
        &self,
        req: RegisterSupplierRequest,
        password_hash: String,
    ) -> RepoResult<Supplier>;
    async fn get_supplier(&self, id: Uuid) -> Option<Supplier>;
    async fn get_supplier_by_user(&self, user_id: Uuid) -> Option<Supplier>;
    async fn list_suppliers(&self, approved: Option<bool>) -> Vec<Supplier>;
    async fn set_supplier_approval(&self, id: Uuid, approved: bool) -> Option<Supplier>;

    // --- Catalog: sites ---
    async fn list_sites(&self) -> Vec<Site>;
    async fn get_site(&self, id: Uuid) -> Option<Site>;
    async fn create_site(&self, input: SiteInput) -> RepoResult<Site>;
    async fn update_site(&self, id: Uuid, input: SiteInput) -> RepoResult<Option<Site>>;
    async fn delete_site(&self, id: Uuid) -> RepoResult<bool>;

    // --- Catalog: categories ---
    async fn list_categories(&self) -> Vec<Category>;
    async fn get_category(&self, id: Uuid) -> Option<Category>;
    async fn create_category(&self, name: String) -> RepoResult<Category>;
    async fn update_category(&self, id: Uuid, name: String) -> RepoResult<Option<Category>>;
    async fn delete_category(&self, id: Uuid) -> RepoResult<bool>;

    // --- Catalog: brands and junctions ---
    /// Brands, optionally narrowed to those linked to a category and/or a site.
    async fn list_brands(&self, filter: BrandFilter) -> Vec<Brand>;
    async fn get_brand(&self, id: Uuid) -> Option<Brand>;
    async fn create_brand(&self, name: String) -> RepoResult<Brand>;
    async fn update_brand(&self, id: Uuid, name: String) -> RepoResult<Option<Brand>>;
    async fn delete_brand(&self, id: Uuid) -> RepoResult<bool>;
    /// Idempotent: returns true only if a new link was stored.
    async fn link_site_brand(&self, site_id: Uuid, brand_id: Uuid) -> RepoResult<bool>;
    async fn unlink_site_brand(&self, site_id: Uuid, brand_id: Uuid) -> bool;
    async fn link_category_brand(&self, category_id: Uuid, brand_id: Uuid) -> RepoResult<bool>;
    async fn unlink_category_brand(&self, category_id: Uuid, brand_id: Uuid) -> bool;

    // --- Material requests ---
    /// New requests start `pending` at the employee's site.
    async fn create_request(
        &self,
        employee: &Employee,
        req: CreateMaterialRequest,
    ) -> RepoResult<MaterialRequest>;
    async fn get_request(&self, id: Uuid) -> Option<MaterialRequest>;
    async fn list_requests(&self, filter: RequestFilter) -> Vec<MaterialRequest>;
    async fn list_requests_by_employee(&self, employee_id: Uuid) -> Vec<MaterialRequest>;
    /// Partial update of a pending request. Only `Some` fields change.
    /// `Ok(None)` when the request is gone or no longer pending.
    async fn update_request(
        &self,
        id: Uuid,
        req: UpdateMaterialRequest,
    ) -> RepoResult<Option<MaterialRequest>>;
    /// Moves the request to `status` only while it is still in one of `from`.
    /// `None` when it is gone or has moved on.
    async fn set_request_status(
        &self,
        id: Uuid,
        from: &[RequestStatus],
        status: RequestStatus,
        note: Option<String>,
    ) -> Option<MaterialRequest>;
    /// Cancels the request while it is still in one of `from` and rejects its
    /// pending offers, all or nothing.
    async fn cancel_request(&self, id: Uuid, from: &[RequestStatus]) -> Option<Cancellation>;

    // --- Offers ---
    async fn create_offer(
        &self,
        request_id: Uuid,
        supplier_id: Uuid,
        req: SubmitOfferRequest,
    ) -> RepoResult<Offer>;
    async fn get_offer(&self, id: Uuid) -> Option<Offer>;
    async fn find_pending_offer(&self, request_id: Uuid, supplier_id: Uuid) -> Option<Offer>;
    async fn list_offers_for_request(&self, request_id: Uuid) -> Vec<Offer>;
    async fn list_offers_by_supplier(&self, supplier_id: Uuid) -> Vec<Offer>;
    async fn update_offer(&self, id: Uuid, req: UpdateOfferRequest) -> Option<Offer>;
    /// Guarded like `set_request_status`.
    async fn set_offer_status(
        &self,
        id: Uuid,
        from: &[OfferStatus],
        status: OfferStatus,
    ) -> Option<Offer>;
    /// Accepts one pending offer, rejects its pending siblings and awards the
    /// request, all or nothing. `None` when the offer is gone or no longer pending.
    async fn accept_offer(&self, offer_id: Uuid) -> Option<Award>;

    // --- Notifications ---
    /// Returns the number of rows stored.
    async fn create_notifications(&self, batch: Vec<NewNotification>) -> usize;
    async fn list_notifications(&self, user_id: Uuid) -> Vec<Notification>;
    /// Ownership enforced: only the recipient can mark a notification.
    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> bool;
    async fn mark_all_notifications_read(&self, user_id: Uuid) -> u64;

    // --- Excel exchange ---
    async fn create_sheet(
        &self,
        owner_id: Uuid,
        kind: SheetKind,
        request_id: Option<Uuid>,
        file_name: String,
        object_key: String,
    ) -> RepoResult<Sheet>;
    async fn get_sheet(&self, id: Uuid) -> Option<Sheet>;
    /// `None` lists every sheet (admin view).
    async fn list_sheets(&self, owner_id: Option<Uuid>) -> Vec<Sheet>;

    // --- Dashboard ---
    async fn get_stats(&self) -> AdminDashboardStats;
}

/// RepositoryState
///
/// The shared handle stored in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;
