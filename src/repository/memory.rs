use super::{Award, Cancellation, RepoError, RepoResult, Repository};
use crate::models::{
    AdminDashboardStats, Brand, BrandFilter, Category, CreateEmployeeRequest,
    CreateMaterialRequest, Employee, MaterialRequest, NewNotification, Notification, Offer,
    OfferStatus, RegisterSupplierRequest, RequestFilter, RequestStatus, Role, Sheet, SheetKind,
    Site, SiteInput, SubmitOfferRequest, Supplier, UpdateMaterialRequest, UpdateOfferRequest, User,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

const DANGLING: &str = "referenced record does not exist or is still in use";

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    employees: Vec<Employee>,
    suppliers: Vec<Supplier>,
    sites: Vec<Site>,
    categories: Vec<Category>,
    brands: Vec<Brand>,
    site_brands: HashSet<(Uuid, Uuid)>,
    category_brands: HashSet<(Uuid, Uuid)>,
    requests: Vec<MaterialRequest>,
    offers: Vec<Offer>,
    notifications: Vec<Notification>,
    sheets: Vec<Sheet>,
}

impl Tables {
    fn email_taken(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn insert_user(&mut self, email: &str, password_hash: String, role: Role) -> RepoResult<User> {
        if self.email_taken(email) {
            return Err(RepoError::Conflict("email"));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now(),
        };
        self.users.push(user.clone());
        Ok(user)
    }
}

/// InMemoryRepository
///
/// `Repository` over process-local tables behind a tokio `RwLock`. Enforces
/// the same unique and foreign-key rules as the Postgres schema so handler
/// tests observe identical outcomes. Also backs `APP_ENV=local` runs started
/// without a `DATABASE_URL`.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> chrono::DateTime<Utc>) {
    rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
}

#[async_trait]
impl Repository for InMemoryRepository {
    // --- USERS ---

    async fn get_user(&self, id: Uuid) -> Option<User> {
        let t = self.tables.read().await;
        t.users.iter().find(|u| u.id == id).cloned()
    }

    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        let t = self.tables.read().await;
        t.users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned()
    }

    async fn list_user_ids_by_role(&self, role: Role) -> Vec<Uuid> {
        let t = self.tables.read().await;
        t.users.iter().filter(|u| u.role == role).map(|u| u.id).collect()
    }

    async fn create_admin(&self, email: &str, password_hash: &str) -> RepoResult<User> {
        let mut t = self.tables.write().await;
        t.insert_user(email, password_hash.to_string(), Role::Admin)
    }

    // --- EMPLOYEES ---

    async fn create_employee(
        &self,
        req: CreateEmployeeRequest,
        password_hash: String,
    ) -> RepoResult<Employee> {
        let mut t = self.tables.write().await;
        if !t.sites.iter().any(|s| s.id == req.site_id) {
            return Err(RepoError::Reference(DANGLING));
        }
        let user = t.insert_user(&req.email, password_hash, Role::Employee)?;
        let employee = Employee {
            id: Uuid::new_v4(),
            user_id: user.id,
            full_name: req.full_name,
            phone: req.phone,
            site_id: req.site_id,
            created_at: Utc::now(),
        };
        t.employees.push(employee.clone());
        Ok(employee)
    }

    async fn get_employee(&self, id: Uuid) -> Option<Employee> {
        let t = self.tables.read().await;
        t.employees.iter().find(|e| e.id == id).cloned()
    }

    async fn get_employee_by_user(&self, user_id: Uuid) -> Option<Employee> {
        let t = self.tables.read().await;
        t.employees.iter().find(|e| e.user_id == user_id).cloned()
    }

    async fn list_employees(&self) -> Vec<Employee> {
        let t = self.tables.read().await;
        let mut rows = t.employees.clone();
        rows.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        rows
    }

    // --- SUPPLIERS ---

    async fn register_supplier(
        &self,
        req: RegisterSupplierRequest,
        password_hash: String,
    ) -> RepoResult<Supplier> {
        let mut t = self.tables.write().await;
        if t.suppliers.iter().any(|s| s.tax_number == req.tax_number) {
            return Err(RepoError::Conflict("tax number"));
        }
        let user = t.insert_user(&req.email, password_hash, Role::Supplier)?;
        let supplier = Supplier {
            id: Uuid::new_v4(),
            user_id: user.id,
            company_name: req.company_name,
            tax_number: req.tax_number,
            phone: req.phone,
            address: req.address,
            is_approved: false,
            approved_at: None,
            created_at: Utc::now(),
        };
        t.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    async fn get_supplier(&self, id: Uuid) -> Option<Supplier> {
        let t = self.tables.read().await;
        t.suppliers.iter().find(|s| s.id == id).cloned()
    }

    async fn get_supplier_by_user(&self, user_id: Uuid) -> Option<Supplier> {
        let t = self.tables.read().await;
        t.suppliers.iter().find(|s| s.user_id == user_id).cloned()
    }

    async fn list_suppliers(&self, approved: Option<bool>) -> Vec<Supplier> {
        let t = self.tables.read().await;
        let mut rows: Vec<Supplier> = t
            .suppliers
            .iter()
            .filter(|s| approved.is_none_or(|flag| s.is_approved == flag))
            .cloned()
            .collect();
        newest_first(&mut rows, |s| s.created_at);
        rows
    }

    async fn set_supplier_approval(&self, id: Uuid, approved: bool) -> Option<Supplier> {
        let mut t = self.tables.write().await;
        let supplier = t.suppliers.iter_mut().find(|s| s.id == id)?;
        supplier.is_approved = approved;
        supplier.approved_at = approved.then(Utc::now);
        Some(supplier.clone())
    }

    // --- SITES ---

    async fn list_sites(&self) -> Vec<Site> {
        let t = self.tables.read().await;
        let mut rows = t.sites.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    async fn get_site(&self, id: Uuid) -> Option<Site> {
        let t = self.tables.read().await;
        t.sites.iter().find(|s| s.id == id).cloned()
    }

    async fn create_site(&self, input: SiteInput) -> RepoResult<Site> {
        let mut t = self.tables.write().await;
        if t.sites.iter().any(|s| s.name == input.name) {
            return Err(RepoError::Conflict("site"));
        }
        let site = Site {
            id: Uuid::new_v4(),
            name: input.name,
            address: input.address,
            created_at: Utc::now(),
        };
        t.sites.push(site.clone());
        Ok(site)
    }

    async fn update_site(&self, id: Uuid, input: SiteInput) -> RepoResult<Option<Site>> {
        let mut t = self.tables.write().await;
        if t.sites.iter().any(|s| s.id != id && s.name == input.name) {
            return Err(RepoError::Conflict("site"));
        }
        Ok(t.sites.iter_mut().find(|s| s.id == id).map(|site| {
            site.name = input.name;
            site.address = input.address;
            site.clone()
        }))
    }

    async fn delete_site(&self, id: Uuid) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        if t.employees.iter().any(|e| e.site_id == id) || t.requests.iter().any(|r| r.site_id == id) {
            return Err(RepoError::Reference(DANGLING));
        }
        let before = t.sites.len();
        t.sites.retain(|s| s.id != id);
        t.site_brands.retain(|(site, _)| *site != id);
        Ok(t.sites.len() < before)
    }

    // --- CATEGORIES ---

    async fn list_categories(&self) -> Vec<Category> {
        let t = self.tables.read().await;
        let mut rows = t.categories.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    async fn get_category(&self, id: Uuid) -> Option<Category> {
        let t = self.tables.read().await;
        t.categories.iter().find(|c| c.id == id).cloned()
    }

    async fn create_category(&self, name: String) -> RepoResult<Category> {
        let mut t = self.tables.write().await;
        if t.categories.iter().any(|c| c.name == name) {
            return Err(RepoError::Conflict("category"));
        }
        let category = Category {
            id: Uuid::new_v4(),
            name,
        };
        t.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, name: String) -> RepoResult<Option<Category>> {
        let mut t = self.tables.write().await;
        if t.categories.iter().any(|c| c.id != id && c.name == name) {
            return Err(RepoError::Conflict("category"));
        }
        Ok(t.categories.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = name;
            c.clone()
        }))
    }

    async fn delete_category(&self, id: Uuid) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        if t.requests.iter().any(|r| r.category_id == id) {
            return Err(RepoError::Reference(DANGLING));
        }
        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        t.category_brands.retain(|(category, _)| *category != id);
        Ok(t.categories.len() < before)
    }

    // --- BRANDS ---

    async fn list_brands(&self, filter: BrandFilter) -> Vec<Brand> {
        let t = self.tables.read().await;
        let mut rows: Vec<Brand> = t
            .brands
            .iter()
            .filter(|b| {
                filter
                    .category_id
                    .is_none_or(|c| t.category_brands.contains(&(c, b.id)))
            })
            .filter(|b| filter.site_id.is_none_or(|s| t.site_brands.contains(&(s, b.id))))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    async fn get_brand(&self, id: Uuid) -> Option<Brand> {
        let t = self.tables.read().await;
        t.brands.iter().find(|b| b.id == id).cloned()
    }

    async fn create_brand(&self, name: String) -> RepoResult<Brand> {
        let mut t = self.tables.write().await;
        if t.brands.iter().any(|b| b.name == name) {
            return Err(RepoError::Conflict("brand"));
        }
        let brand = Brand {
            id: Uuid::new_v4(),
            name,
        };
        t.brands.push(brand.clone());
        Ok(brand)
    }

    async fn update_brand(&self, id: Uuid, name: String) -> RepoResult<Option<Brand>> {
        let mut t = self.tables.write().await;
        if t.brands.iter().any(|b| b.id != id && b.name == name) {
            return Err(RepoError::Conflict("brand"));
        }
        Ok(t.brands.iter_mut().find(|b| b.id == id).map(|b| {
            b.name = name;
            b.clone()
        }))
    }

    async fn delete_brand(&self, id: Uuid) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        if t.requests.iter().any(|r| r.brand_id == Some(id)) {
            return Err(RepoError::Reference(DANGLING));
        }
        let before = t.brands.len();
        t.brands.retain(|b| b.id != id);
        t.site_brands.retain(|(_, brand)| *brand != id);
        t.category_brands.retain(|(_, brand)| *brand != id);
        Ok(t.brands.len() < before)
    }

    async fn link_site_brand(&self, site_id: Uuid, brand_id: Uuid) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        if !t.sites.iter().any(|s| s.id == site_id) || !t.brands.iter().any(|b| b.id == brand_id) {
            return Err(RepoError::Reference(DANGLING));
        }
        Ok(t.site_brands.insert((site_id, brand_id)))
    }

    async fn unlink_site_brand(&self, site_id: Uuid, brand_id: Uuid) -> bool {
        let mut t = self.tables.write().await;
        t.site_brands.remove(&(site_id, brand_id))
    }

    async fn link_category_brand(&self, category_id: Uuid, brand_id: Uuid) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        if !t.categories.iter().any(|c| c.id == category_id)
            || !t.brands.iter().any(|b| b.id == brand_id)
        {
            return Err(RepoError::Reference(DANGLING));
        }
        Ok(t.category_brands.insert((category_id, brand_id)))
    }

    async fn unlink_category_brand(&self, category_id: Uuid, brand_id: Uuid) -> bool {
        let mut t = self.tables.write().await;
        t.category_brands.remove(&(category_id, brand_id))
    }

    // --- MATERIAL REQUESTS ---

    async fn create_request(
        &self,
        employee: &Employee,
        req: CreateMaterialRequest,
    ) -> RepoResult<MaterialRequest> {
        let mut t = self.tables.write().await;
        let category_ok = t.categories.iter().any(|c| c.id == req.category_id);
        let brand_ok = req
            .brand_id
            .is_none_or(|brand| t.brands.iter().any(|b| b.id == brand));
        if !category_ok || !brand_ok {
            return Err(RepoError::Reference(DANGLING));
        }
        let now = Utc::now();
        let request = MaterialRequest {
            id: Uuid::new_v4(),
            employee_id: employee.id,
            site_id: employee.site_id,
            category_id: req.category_id,
            brand_id: req.brand_id,
            title: req.title,
            description: req.description,
            quantity: req.quantity,
            unit: req.unit,
            needed_by: req.needed_by,
            status: RequestStatus::Pending,
            review_note: None,
            created_at: now,
            updated_at: now,
        };
        t.requests.push(request.clone());
        Ok(request)
    }

    async fn get_request(&self, id: Uuid) -> Option<MaterialRequest> {
        let t = self.tables.read().await;
        t.requests.iter().find(|r| r.id == id).cloned()
    }

    async fn list_requests(&self, filter: RequestFilter) -> Vec<MaterialRequest> {
        let t = self.tables.read().await;
        let mut rows: Vec<MaterialRequest> = t
            .requests
            .iter()
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .filter(|r| filter.category_id.is_none_or(|c| r.category_id == c))
            .filter(|r| filter.site_id.is_none_or(|s| r.site_id == s))
            .cloned()
            .collect();
        newest_first(&mut rows, |r| r.created_at);
        rows
    }

    async fn list_requests_by_employee(&self, employee_id: Uuid) -> Vec<MaterialRequest> {
        let t = self.tables.read().await;
        let mut rows: Vec<MaterialRequest> = t
            .requests
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |r| r.created_at);
        rows
    }

    async fn update_request(
        &self,
        id: Uuid,
        req: UpdateMaterialRequest,
    ) -> RepoResult<Option<MaterialRequest>> {
        let mut t = self.tables.write().await;
        if let Some(brand) = req.brand_id {
            if !t.brands.iter().any(|b| b.id == brand) {
                return Err(RepoError::Reference(DANGLING));
            }
        }
        Ok(t
            .requests
            .iter_mut()
            .find(|r| r.id == id && r.status == RequestStatus::Pending)
            .map(|r| {
                if let Some(brand) = req.brand_id {
                    r.brand_id = Some(brand);
                }
                if let Some(title) = req.title {
                    r.title = title;
                }
                if let Some(description) = req.description {
                    r.description = description;
                }
                if let Some(quantity) = req.quantity {
                    r.quantity = quantity;
                }
                if let Some(unit) = req.unit {
                    r.unit = unit;
                }
                if let Some(needed_by) = req.needed_by {
                    r.needed_by = Some(needed_by);
                }
                r.updated_at = Utc::now();
                r.clone()
            }))
    }

    async fn set_request_status(
        &self,
        id: Uuid,
        from: &[RequestStatus],
        status: RequestStatus,
        note: Option<String>,
    ) -> Option<MaterialRequest> {
        let mut t = self.tables.write().await;
        let request = t
            .requests
            .iter_mut()
            .find(|r| r.id == id && from.contains(&r.status))?;
        request.status = status;
        if note.is_some() {
            request.review_note = note;
        }
        request.updated_at = Utc::now();
        Some(request.clone())
    }

    async fn cancel_request(&self, id: Uuid, from: &[RequestStatus]) -> Option<Cancellation> {
        let mut t = self.tables.write().await;
        let now = Utc::now();
        let request = t
            .requests
            .iter_mut()
            .find(|r| r.id == id && from.contains(&r.status))?;
        request.status = RequestStatus::Cancelled;
        request.updated_at = now;
        let request = request.clone();

        let mut closed = Vec::new();
        for offer in t
            .offers
            .iter_mut()
            .filter(|o| o.request_id == id && o.status == OfferStatus::Pending)
        {
            offer.status = OfferStatus::Rejected;
            offer.updated_at = now;
            closed.push(offer.clone());
        }
        Some(Cancellation { request, closed })
    }

    // --- OFFERS ---

    async fn create_offer(
        &self,
        request_id: Uuid,
        supplier_id: Uuid,
        req: SubmitOfferRequest,
    ) -> RepoResult<Offer> {
        let mut t = self.tables.write().await;
        if !t.requests.iter().any(|r| r.id == request_id)
            || !t.suppliers.iter().any(|s| s.id == supplier_id)
        {
            return Err(RepoError::Reference(DANGLING));
        }
        if t.offers.iter().any(|o| {
            o.request_id == request_id && o.supplier_id == supplier_id && o.status == OfferStatus::Pending
        }) {
            return Err(RepoError::Conflict("pending offer"));
        }
        let now = Utc::now();
        let offer = Offer {
            id: Uuid::new_v4(),
            request_id,
            supplier_id,
            unit_price_cents: req.unit_price_cents,
            delivery_days: req.delivery_days,
            note: req.note,
            status: OfferStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        t.offers.push(offer.clone());
        Ok(offer)
    }

    async fn get_offer(&self, id: Uuid) -> Option<Offer> {
        let t = self.tables.read().await;
        t.offers.iter().find(|o| o.id == id).cloned()
    }

    async fn find_pending_offer(&self, request_id: Uuid, supplier_id: Uuid) -> Option<Offer> {
        let t = self.tables.read().await;
        t.offers
            .iter()
            .find(|o| {
                o.request_id == request_id
                    && o.supplier_id == supplier_id
                    && o.status == OfferStatus::Pending
            })
            .cloned()
    }

    async fn list_offers_for_request(&self, request_id: Uuid) -> Vec<Offer> {
        let t = self.tables.read().await;
        let mut rows: Vec<Offer> = t
            .offers
            .iter()
            .filter(|o| o.request_id == request_id)
            .cloned()
            .collect();
        rows.sort_by_key(|o| (o.unit_price_cents, o.created_at));
        rows
    }

    async fn list_offers_by_supplier(&self, supplier_id: Uuid) -> Vec<Offer> {
        let t = self.tables.read().await;
        let mut rows: Vec<Offer> = t
            .offers
            .iter()
            .filter(|o| o.supplier_id == supplier_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |o| o.created_at);
        rows
    }

    async fn update_offer(&self, id: Uuid, req: UpdateOfferRequest) -> Option<Offer> {
        let mut t = self.tables.write().await;
        let offer = t
            .offers
            .iter_mut()
            .find(|o| o.id == id && o.status == OfferStatus::Pending)?;
        if let Some(price) = req.unit_price_cents {
            offer.unit_price_cents = price;
        }
        if let Some(days) = req.delivery_days {
            offer.delivery_days = days;
        }
        if let Some(note) = req.note {
            offer.note = Some(note);
        }
        offer.updated_at = Utc::now();
        Some(offer.clone())
    }

    async fn set_offer_status(
        &self,
        id: Uuid,
        from: &[OfferStatus],
        status: OfferStatus,
    ) -> Option<Offer> {
        let mut t = self.tables.write().await;
        let offer = t
            .offers
            .iter_mut()
            .find(|o| o.id == id && from.contains(&o.status))?;
        offer.status = status;
        offer.updated_at = Utc::now();
        Some(offer.clone())
    }

    async fn accept_offer(&self, offer_id: Uuid) -> Option<Award> {
        let mut t = self.tables.write().await;
        let request_id = t
            .offers
            .iter()
            .find(|o| o.id == offer_id && o.status == OfferStatus::Pending)?
            .request_id;
        let request_open = t
            .requests
            .iter()
            .any(|r| r.id == request_id && r.status == RequestStatus::Open);
        if !request_open {
            return None;
        }

        let now = Utc::now();
        let mut accepted = None;
        let mut rejected = Vec::new();
        for offer in t.offers.iter_mut().filter(|o| o.request_id == request_id) {
            if offer.id == offer_id {
                offer.status = OfferStatus::Accepted;
                offer.updated_at = now;
                accepted = Some(offer.clone());
            } else if offer.status == OfferStatus::Pending {
                offer.status = OfferStatus::Rejected;
                offer.updated_at = now;
                rejected.push(offer.clone());
            }
        }

        let request = t.requests.iter_mut().find(|r| r.id == request_id)?;
        request.status = RequestStatus::Awarded;
        request.updated_at = now;

        Some(Award {
            offer: accepted?,
            request: request.clone(),
            rejected,
        })
    }

    // --- NOTIFICATIONS ---

    async fn create_notifications(&self, batch: Vec<NewNotification>) -> usize {
        let mut t = self.tables.write().await;
        let count = batch.len();
        let now = Utc::now();
        t.notifications.extend(batch.into_iter().map(|n| Notification {
            id: Uuid::new_v4(),
            user_id: n.user_id,
            kind: n.kind,
            message: n.message,
            request_id: n.request_id,
            offer_id: n.offer_id,
            is_read: false,
            created_at: now,
        }));
        count
    }

    async fn list_notifications(&self, user_id: Uuid) -> Vec<Notification> {
        let t = self.tables.read().await;
        let mut rows: Vec<Notification> = t
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |n| n.created_at);
        rows
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> bool {
        let mut t = self.tables.write().await;
        match t
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(n) => {
                n.is_read = true;
                true
            }
            None => false,
        }
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> u64 {
        let mut t = self.tables.write().await;
        let mut changed = 0;
        for n in t
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            n.is_read = true;
            changed += 1;
        }
        changed
    }

    // --- SHEETS ---

    async fn create_sheet(
        &self,
        owner_id: Uuid,
        kind: SheetKind,
        request_id: Option<Uuid>,
        file_name: String,
        object_key: String,
    ) -> RepoResult<Sheet> {
        let mut t = self.tables.write().await;
        if let Some(request) = request_id {
            if !t.requests.iter().any(|r| r.id == request) {
                return Err(RepoError::Reference(DANGLING));
            }
        }
        let sheet = Sheet {
            id: Uuid::new_v4(),
            owner_id,
            kind,
            request_id,
            file_name,
            object_key,
            created_at: Utc::now(),
        };
        t.sheets.push(sheet.clone());
        Ok(sheet)
    }

    async fn get_sheet(&self, id: Uuid) -> Option<Sheet> {
        let t = self.tables.read().await;
        t.sheets.iter().find(|s| s.id == id).cloned()
    }

    async fn list_sheets(&self, owner_id: Option<Uuid>) -> Vec<Sheet> {
        let t = self.tables.read().await;
        let mut rows: Vec<Sheet> = t
            .sheets
            .iter()
            .filter(|s| owner_id.is_none_or(|owner| s.owner_id == owner))
            .cloned()
            .collect();
        newest_first(&mut rows, |s| s.created_at);
        rows
    }

    // --- DASHBOARD ---

    async fn get_stats(&self) -> AdminDashboardStats {
        let t = self.tables.read().await;
        let count_requests =
            |status: RequestStatus| t.requests.iter().filter(|r| r.status == status).count() as i64;
        AdminDashboardStats {
            total_requests: t.requests.len() as i64,
            pending_requests: count_requests(RequestStatus::Pending),
            open_requests: count_requests(RequestStatus::Open),
            awarded_requests: count_requests(RequestStatus::Awarded),
            total_offers: t.offers.len() as i64,
            total_suppliers: t.suppliers.len() as i64,
            pending_suppliers: t.suppliers.iter().filter(|s| !s.is_approved).count() as i64,
            total_employees: t.employees.len() as i64,
        }
    }
}
