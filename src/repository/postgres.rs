use super::{Award, Cancellation, RepoError, RepoResult, Repository};
use crate::models::{
    AdminDashboardStats, Brand, BrandFilter, Category, CreateEmployeeRequest,
    CreateMaterialRequest, Employee, MaterialRequest, NewNotification, Notification, Offer,
    OfferStatus, RegisterSupplierRequest, RequestFilter, RequestStatus, Role, Sheet, SheetKind,
    Site, SiteInput, SubmitOfferRequest, Supplier, UpdateMaterialRequest, UpdateOfferRequest, User,
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, query_builder::QueryBuilder};
use uuid::Uuid;

const USER_COLS: &str = "id, email, password_hash, role, created_at";
const EMPLOYEE_COLS: &str = "id, user_id, full_name, phone, site_id, created_at";
const SUPPLIER_COLS: &str =
    "id, user_id, company_name, tax_number, phone, address, is_approved, approved_at, created_at";
const SITE_COLS: &str = "id, name, address, created_at";
const REQUEST_COLS: &str = "id, employee_id, site_id, category_id, brand_id, title, description, \
     quantity, unit, needed_by, status, review_note, created_at, updated_at";
const OFFER_COLS: &str = "id, request_id, supplier_id, unit_price_cents, delivery_days, note, \
     status, created_at, updated_at";
const NOTIFICATION_COLS: &str =
    "id, user_id, kind, message, request_id, offer_id, is_read, created_at";
const SHEET_COLS: &str = "id, owner_id, kind, request_id, file_name, object_key, created_at";

/// Classifies a failed write. Unique and foreign-key violations become
/// actionable `RepoError`s; anything else is logged and reported opaque.
fn write_error(what: &'static str, e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return RepoError::Conflict(what);
        }
        if db.is_foreign_key_violation() {
            return RepoError::Reference("referenced record does not exist or is still in use");
        }
    }
    tracing::error!("{what} write error: {:?}", e);
    RepoError::Database(e.to_string())
}

/// Status texts for a `status = ANY($n)` guard.
fn status_texts<S>(from: &[S], as_str: impl Fn(&S) -> &'static str) -> Vec<String> {
    from.iter().map(|s| as_str(s).to_string()).collect()
}

/// PostgresRepository
///
/// `Repository` backed by PostgreSQL through a sqlx pool. Queries are
/// checked at runtime so the crate builds without a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn rename(&self, table: &'static str, id: Uuid, name: String) -> Result<Option<(Uuid, String)>, sqlx::Error> {
        let sql = format!("UPDATE {table} SET name = $2 WHERE id = $1 RETURNING id, name");
        sqlx::query_as::<_, (Uuid, String)>(&sql)
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_by_id(&self, table: &'static str, id: Uuid) -> RepoResult<bool> {
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|res| res.rows_affected() > 0)
            .map_err(|e| write_error(table, e))
    }

    async fn accept_offer_tx(&self, offer_id: Uuid) -> Result<Option<Award>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let accepted = sqlx::query_as::<_, Offer>(&format!(
            "UPDATE offers SET status = 'accepted', updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' RETURNING {OFFER_COLS}"
        ))
        .bind(offer_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(offer) = accepted else {
            return Ok(None);
        };

        // The request must still be open; dropping `tx` rolls the offer back otherwise.
        let awarded = sqlx::query_as::<_, MaterialRequest>(&format!(
            "UPDATE requests SET status = 'awarded', updated_at = NOW() \
             WHERE id = $1 AND status = 'open' RETURNING {REQUEST_COLS}"
        ))
        .bind(offer.request_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(request) = awarded else {
            return Ok(None);
        };

        let rejected = sqlx::query_as::<_, Offer>(&format!(
            "UPDATE offers SET status = 'rejected', updated_at = NOW() \
             WHERE request_id = $1 AND id <> $2 AND status = 'pending' RETURNING {OFFER_COLS}"
        ))
        .bind(offer.request_id)
        .bind(offer.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(Award {
            offer,
            request,
            rejected,
        }))
    }

    async fn cancel_request_tx(
        &self,
        id: Uuid,
        from: &[RequestStatus],
    ) -> Result<Option<Cancellation>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let cancelled = sqlx::query_as::<_, MaterialRequest>(&format!(
            "UPDATE requests SET status = 'cancelled', updated_at = NOW() \
             WHERE id = $1 AND status = ANY($2) RETURNING {REQUEST_COLS}"
        ))
        .bind(id)
        .bind(status_texts(from, RequestStatus::as_str))
        .fetch_optional(&mut *tx)
        .await?;
        let Some(request) = cancelled else {
            return Ok(None);
        };

        let closed = sqlx::query_as::<_, Offer>(&format!(
            "UPDATE offers SET status = 'rejected', updated_at = NOW() \
             WHERE request_id = $1 AND status = 'pending' RETURNING {OFFER_COLS}"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(Cancellation { request, closed }))
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }

    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user_by_email error: {:?}", e);
            None
        })
    }

    async fn list_user_ids_by_role(&self, role: Role) -> Vec<Uuid> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_user_ids_by_role error: {:?}", e);
                vec![]
            })
    }

    async fn create_admin(&self, email: &str, password_hash: &str) -> RepoResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, 'admin') \
             RETURNING {USER_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("email", e))
    }

    // --- EMPLOYEES ---

    async fn create_employee(
        &self,
        req: CreateEmployeeRequest,
        password_hash: String,
    ) -> RepoResult<Employee> {
        let mut tx = self.pool.begin().await.map_err(|e| write_error("employee", e))?;
        let user_id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, 'employee')",
        )
        .bind(user_id)
        .bind(&req.email)
        .bind(password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("email", e))?;

        let employee = sqlx::query_as::<_, Employee>(&format!(
            "INSERT INTO employees (id, user_id, full_name, phone, site_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {EMPLOYEE_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(req.full_name)
        .bind(req.phone)
        .bind(req.site_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error("employee", e))?;

        tx.commit().await.map_err(|e| write_error("employee", e))?;
        Ok(employee)
    }

    async fn get_employee(&self, id: Uuid) -> Option<Employee> {
        sqlx::query_as::<_, Employee>(&format!("SELECT {EMPLOYEE_COLS} FROM employees WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_employee error: {:?}", e);
                None
            })
    }

    async fn get_employee_by_user(&self, user_id: Uuid) -> Option<Employee> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLS} FROM employees WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_employee_by_user error: {:?}", e);
            None
        })
    }

    async fn list_employees(&self) -> Vec<Employee> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLS} FROM employees ORDER BY full_name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_employees error: {:?}", e);
            vec![]
        })
    }

    // --- SUPPLIERS ---

    async fn register_supplier(
        &self,
        req: RegisterSupplierRequest,
        password_hash: String,
    ) -> RepoResult<Supplier> {
        let mut tx = self.pool.begin().await.map_err(|e| write_error("supplier", e))?;
        let user_id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, 'supplier')",
        )
        .bind(user_id)
        .bind(&req.email)
        .bind(password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("email", e))?;

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "INSERT INTO suppliers (id, user_id, company_name, tax_number, phone, address, is_approved) \
             VALUES ($1, $2, $3, $4, $5, $6, false) RETURNING {SUPPLIER_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(req.company_name)
        .bind(req.tax_number)
        .bind(req.phone)
        .bind(req.address)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error("tax number", e))?;

        tx.commit().await.map_err(|e| write_error("supplier", e))?;
        Ok(supplier)
    }

    async fn get_supplier(&self, id: Uuid) -> Option<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!("SELECT {SUPPLIER_COLS} FROM suppliers WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_supplier error: {:?}", e);
                None
            })
    }

    async fn get_supplier_by_user(&self, user_id: Uuid) -> Option<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLS} FROM suppliers WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_supplier_by_user error: {:?}", e);
            None
        })
    }

    async fn list_suppliers(&self, approved: Option<bool>) -> Vec<Supplier> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {SUPPLIER_COLS} FROM suppliers"));
        if let Some(flag) = approved {
            builder.push(" WHERE is_approved = ").push_bind(flag);
        }
        builder.push(" ORDER BY created_at DESC");

        builder
            .build_query_as::<Supplier>()
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_suppliers error: {:?}", e);
                vec![]
            })
    }

    async fn set_supplier_approval(&self, id: Uuid, approved: bool) -> Option<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!(
            "UPDATE suppliers SET is_approved = $2, \
             approved_at = CASE WHEN $2 THEN NOW() ELSE NULL END \
             WHERE id = $1 RETURNING {SUPPLIER_COLS}"
        ))
        .bind(id)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_supplier_approval error: {:?}", e);
            None
        })
    }

    // --- SITES ---

    async fn list_sites(&self) -> Vec<Site> {
        sqlx::query_as::<_, Site>(&format!("SELECT {SITE_COLS} FROM sites ORDER BY name ASC"))
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_sites error: {:?}", e);
                vec![]
            })
    }

    async fn get_site(&self, id: Uuid) -> Option<Site> {
        sqlx::query_as::<_, Site>(&format!("SELECT {SITE_COLS} FROM sites WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_site error: {:?}", e);
                None
            })
    }

    async fn create_site(&self, input: SiteInput) -> RepoResult<Site> {
        sqlx::query_as::<_, Site>(&format!(
            "INSERT INTO sites (id, name, address) VALUES ($1, $2, $3) RETURNING {SITE_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(input.name)
        .bind(input.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("site", e))
    }

    async fn update_site(&self, id: Uuid, input: SiteInput) -> RepoResult<Option<Site>> {
        sqlx::query_as::<_, Site>(&format!(
            "UPDATE sites SET name = $2, address = $3 WHERE id = $1 RETURNING {SITE_COLS}"
        ))
        .bind(id)
        .bind(input.name)
        .bind(input.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("site", e))
    }

    async fn delete_site(&self, id: Uuid) -> RepoResult<bool> {
        self.delete_by_id("sites", id).await
    }

    // --- CATEGORIES ---

    async fn list_categories(&self) -> Vec<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_categories error: {:?}", e);
                vec![]
            })
    }

    async fn get_category(&self, id: Uuid) -> Option<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_category error: {:?}", e);
                None
            })
    }

    async fn create_category(&self, name: String) -> RepoResult<Category> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("category", e))
    }

    async fn update_category(&self, id: Uuid, name: String) -> RepoResult<Option<Category>> {
        self.rename("categories", id, name)
            .await
            .map(|row| row.map(|(id, name)| Category { id, name }))
            .map_err(|e| write_error("category", e))
    }

    async fn delete_category(&self, id: Uuid) -> RepoResult<bool> {
        self.delete_by_id("categories", id).await
    }

    // --- BRANDS ---

    async fn list_brands(&self, filter: BrandFilter) -> Vec<Brand> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT b.id, b.name FROM brands b WHERE 1 = 1");
        if let Some(category_id) = filter.category_id {
            builder
                .push(" AND EXISTS (SELECT 1 FROM category_brands cb WHERE cb.brand_id = b.id AND cb.category_id = ")
                .push_bind(category_id)
                .push(")");
        }
        if let Some(site_id) = filter.site_id {
            builder
                .push(" AND EXISTS (SELECT 1 FROM site_brands sb WHERE sb.brand_id = b.id AND sb.site_id = ")
                .push_bind(site_id)
                .push(")");
        }
        builder.push(" ORDER BY b.name ASC");

        builder
            .build_query_as::<Brand>()
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_brands error: {:?}", e);
                vec![]
            })
    }

    async fn get_brand(&self, id: Uuid) -> Option<Brand> {
        sqlx::query_as::<_, Brand>("SELECT id, name FROM brands WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_brand error: {:?}", e);
                None
            })
    }

    async fn create_brand(&self, name: String) -> RepoResult<Brand> {
        sqlx::query_as::<_, Brand>("INSERT INTO brands (id, name) VALUES ($1, $2) RETURNING id, name")
            .bind(Uuid::new_v4())
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error("brand", e))
    }

    async fn update_brand(&self, id: Uuid, name: String) -> RepoResult<Option<Brand>> {
        self.rename("brands", id, name)
            .await
            .map(|row| row.map(|(id, name)| Brand { id, name }))
            .map_err(|e| write_error("brand", e))
    }

    async fn delete_brand(&self, id: Uuid) -> RepoResult<bool> {
        self.delete_by_id("brands", id).await
    }

    async fn link_site_brand(&self, site_id: Uuid, brand_id: Uuid) -> RepoResult<bool> {
        sqlx::query("INSERT INTO site_brands (site_id, brand_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(site_id)
            .bind(brand_id)
            .execute(&self.pool)
            .await
            .map(|res| res.rows_affected() > 0)
            .map_err(|e| write_error("site brand", e))
    }

    async fn unlink_site_brand(&self, site_id: Uuid, brand_id: Uuid) -> bool {
        match sqlx::query("DELETE FROM site_brands WHERE site_id = $1 AND brand_id = $2")
            .bind(site_id)
            .bind(brand_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("unlink_site_brand error: {:?}", e);
                false
            }
        }
    }

    async fn link_category_brand(&self, category_id: Uuid, brand_id: Uuid) -> RepoResult<bool> {
        sqlx::query(
            "INSERT INTO category_brands (category_id, brand_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(category_id)
        .bind(brand_id)
        .execute(&self.pool)
        .await
        .map(|res| res.rows_affected() > 0)
        .map_err(|e| write_error("category brand", e))
    }

    async fn unlink_category_brand(&self, category_id: Uuid, brand_id: Uuid) -> bool {
        match sqlx::query("DELETE FROM category_brands WHERE category_id = $1 AND brand_id = $2")
            .bind(category_id)
            .bind(brand_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("unlink_category_brand error: {:?}", e);
                false
            }
        }
    }

    // --- MATERIAL REQUESTS ---

    async fn create_request(
        &self,
        employee: &Employee,
        req: CreateMaterialRequest,
    ) -> RepoResult<MaterialRequest> {
        sqlx::query_as::<_, MaterialRequest>(&format!(
            "INSERT INTO requests (id, employee_id, site_id, category_id, brand_id, title, \
             description, quantity, unit, needed_by, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending') RETURNING {REQUEST_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(employee.id)
        .bind(employee.site_id)
        .bind(req.category_id)
        .bind(req.brand_id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.quantity)
        .bind(req.unit)
        .bind(req.needed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("request", e))
    }

    async fn get_request(&self, id: Uuid) -> Option<MaterialRequest> {
        sqlx::query_as::<_, MaterialRequest>(&format!(
            "SELECT {REQUEST_COLS} FROM requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_request error: {:?}", e);
            None
        })
    }

    /// list_requests
    ///
    /// Filtered listing built with `QueryBuilder` so every filter value is bound.
    async fn list_requests(&self, filter: RequestFilter) -> Vec<MaterialRequest> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {REQUEST_COLS} FROM requests WHERE 1 = 1"));
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(category_id) = filter.category_id {
            builder.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(site_id) = filter.site_id {
            builder.push(" AND site_id = ").push_bind(site_id);
        }
        builder.push(" ORDER BY created_at DESC");

        builder
            .build_query_as::<MaterialRequest>()
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_requests error: {:?}", e);
                vec![]
            })
    }

    async fn list_requests_by_employee(&self, employee_id: Uuid) -> Vec<MaterialRequest> {
        sqlx::query_as::<_, MaterialRequest>(&format!(
            "SELECT {REQUEST_COLS} FROM requests WHERE employee_id = $1 ORDER BY created_at DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_requests_by_employee error: {:?}", e);
            vec![]
        })
    }

    /// update_request
    ///
    /// `COALESCE` keeps the stored value for every field left as `None`.
    /// The `pending` guard makes a concurrent review win over the edit.
    async fn update_request(
        &self,
        id: Uuid,
        req: UpdateMaterialRequest,
    ) -> RepoResult<Option<MaterialRequest>> {
        sqlx::query_as::<_, MaterialRequest>(&format!(
            r#"
            UPDATE requests
            SET brand_id = COALESCE($2, brand_id),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                quantity = COALESCE($5, quantity),
                unit = COALESCE($6, unit),
                needed_by = COALESCE($7, needed_by),
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {REQUEST_COLS}
            "#
        ))
        .bind(id)
        .bind(req.brand_id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.quantity)
        .bind(req.unit)
        .bind(req.needed_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("request", e))
    }

    async fn set_request_status(
        &self,
        id: Uuid,
        from: &[RequestStatus],
        status: RequestStatus,
        note: Option<String>,
    ) -> Option<MaterialRequest> {
        sqlx::query_as::<_, MaterialRequest>(&format!(
            "UPDATE requests SET status = $2, review_note = COALESCE($3, review_note), \
             updated_at = NOW() WHERE id = $1 AND status = ANY($4) RETURNING {REQUEST_COLS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(note)
        .bind(status_texts(from, RequestStatus::as_str))
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_request_status error: {:?}", e);
            None
        })
    }

    async fn cancel_request(&self, id: Uuid, from: &[RequestStatus]) -> Option<Cancellation> {
        self.cancel_request_tx(id, from).await.unwrap_or_else(|e| {
            tracing::error!("cancel_request error: {:?}", e);
            None
        })
    }

    // --- OFFERS ---

    /// create_offer
    ///
    /// A partial unique index allows one pending offer per (request, supplier);
    /// a second one surfaces as `RepoError::Conflict`.
    async fn create_offer(
        &self,
        request_id: Uuid,
        supplier_id: Uuid,
        req: SubmitOfferRequest,
    ) -> RepoResult<Offer> {
        sqlx::query_as::<_, Offer>(&format!(
            "INSERT INTO offers (id, request_id, supplier_id, unit_price_cents, delivery_days, note, status) \
             VALUES ($1, $2, $3, $4, $5, $6, 'pending') RETURNING {OFFER_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(request_id)
        .bind(supplier_id)
        .bind(req.unit_price_cents)
        .bind(req.delivery_days)
        .bind(req.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("pending offer", e))
    }

    async fn get_offer(&self, id: Uuid) -> Option<Offer> {
        sqlx::query_as::<_, Offer>(&format!("SELECT {OFFER_COLS} FROM offers WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_offer error: {:?}", e);
                None
            })
    }

    async fn find_pending_offer(&self, request_id: Uuid, supplier_id: Uuid) -> Option<Offer> {
        sqlx::query_as::<_, Offer>(&format!(
            "SELECT {OFFER_COLS} FROM offers \
             WHERE request_id = $1 AND supplier_id = $2 AND status = 'pending'"
        ))
        .bind(request_id)
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("find_pending_offer error: {:?}", e);
            None
        })
    }

    async fn list_offers_for_request(&self, request_id: Uuid) -> Vec<Offer> {
        sqlx::query_as::<_, Offer>(&format!(
            "SELECT {OFFER_COLS} FROM offers WHERE request_id = $1 \
             ORDER BY unit_price_cents ASC, created_at ASC"
        ))
        .bind(request_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_offers_for_request error: {:?}", e);
            vec![]
        })
    }

    async fn list_offers_by_supplier(&self, supplier_id: Uuid) -> Vec<Offer> {
        sqlx::query_as::<_, Offer>(&format!(
            "SELECT {OFFER_COLS} FROM offers WHERE supplier_id = $1 ORDER BY created_at DESC"
        ))
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_offers_by_supplier error: {:?}", e);
            vec![]
        })
    }

    async fn update_offer(&self, id: Uuid, req: UpdateOfferRequest) -> Option<Offer> {
        sqlx::query_as::<_, Offer>(&format!(
            r#"
            UPDATE offers
            SET unit_price_cents = COALESCE($2, unit_price_cents),
                delivery_days = COALESCE($3, delivery_days),
                note = COALESCE($4, note),
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {OFFER_COLS}
            "#
        ))
        .bind(id)
        .bind(req.unit_price_cents)
        .bind(req.delivery_days)
        .bind(req.note)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_offer error: {:?}", e);
            None
        })
    }

    async fn set_offer_status(
        &self,
        id: Uuid,
        from: &[OfferStatus],
        status: OfferStatus,
    ) -> Option<Offer> {
        sqlx::query_as::<_, Offer>(&format!(
            "UPDATE offers SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status = ANY($3) RETURNING {OFFER_COLS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(status_texts(from, OfferStatus::as_str))
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_offer_status error: {:?}", e);
            None
        })
    }

    async fn accept_offer(&self, offer_id: Uuid) -> Option<Award> {
        self.accept_offer_tx(offer_id).await.unwrap_or_else(|e| {
            tracing::error!("accept_offer error: {:?}", e);
            None
        })
    }

    // --- NOTIFICATIONS ---

    async fn create_notifications(&self, batch: Vec<NewNotification>) -> usize {
        if batch.is_empty() {
            return 0;
        }
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO notifications (id, user_id, kind, message, request_id, offer_id) ",
        );
        builder.push_values(batch, |mut row, n| {
            row.push_bind(Uuid::new_v4())
                .push_bind(n.user_id)
                .push_bind(n.kind.as_str())
                .push_bind(n.message)
                .push_bind(n.request_id)
                .push_bind(n.offer_id);
        });

        match builder.build().execute(&self.pool).await {
            Ok(res) => res.rows_affected() as usize,
            Err(e) => {
                tracing::error!("create_notifications error: {:?}", e);
                0
            }
        }
    }

    async fn list_notifications(&self, user_id: Uuid) -> Vec<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLS} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to fetch notifications: {:?}", e);
            vec![]
        })
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> bool {
        let result = sqlx::query("UPDATE notifications SET is_read = true WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(r) => r.rows_affected() > 0,
            Err(e) => {
                tracing::error!("Failed to mark notification read: {:?}", e);
                false
            }
        }
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> u64 {
        match sqlx::query("UPDATE notifications SET is_read = true WHERE user_id = $1 AND is_read = false")
            .bind(user_id)
            .execute(&self.pool)
            .await
        {
            Ok(r) => r.rows_affected(),
            Err(e) => {
                tracing::error!("Failed to mark notifications read: {:?}", e);
                0
            }
        }
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
        sqlx::query_as::<_, Sheet>(&format!(
            "INSERT INTO sheets (id, owner_id, kind, request_id, file_name, object_key) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SHEET_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(kind.as_str())
        .bind(request_id)
        .bind(file_name)
        .bind(object_key)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("sheet", e))
    }

    async fn get_sheet(&self, id: Uuid) -> Option<Sheet> {
        sqlx::query_as::<_, Sheet>(&format!("SELECT {SHEET_COLS} FROM sheets WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_sheet error: {:?}", e);
                None
            })
    }

    async fn list_sheets(&self, owner_id: Option<Uuid>) -> Vec<Sheet> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {SHEET_COLS} FROM sheets"));
        if let Some(owner) = owner_id {
            builder.push(" WHERE owner_id = ").push_bind(owner);
        }
        builder.push(" ORDER BY created_at DESC");

        builder
            .build_query_as::<Sheet>()
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_sheets error: {:?}", e);
                vec![]
            })
    }

    // --- DASHBOARD ---

    /// get_stats
    ///
    /// All dashboard counters in a single round trip.
    async fn get_stats(&self) -> AdminDashboardStats {
        let row = sqlx::query_as::<_, (i64, i64, i64, i64, i64, i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM requests),
                (SELECT COUNT(*) FROM requests WHERE status = 'pending'),
                (SELECT COUNT(*) FROM requests WHERE status = 'open'),
                (SELECT COUNT(*) FROM requests WHERE status = 'awarded'),
                (SELECT COUNT(*) FROM offers),
                (SELECT COUNT(*) FROM suppliers),
                (SELECT COUNT(*) FROM suppliers WHERE is_approved = false),
                (SELECT COUNT(*) FROM employees)
            "#,
        )
        .fetch_one(&self.pool)
        .await;

        match row {
            Ok((
                total_requests,
                pending_requests,
                open_requests,
                awarded_requests,
                total_offers,
                total_suppliers,
                pending_suppliers,
                total_employees,
            )) => AdminDashboardStats {
                total_requests,
                pending_requests,
                open_requests,
                awarded_requests,
                total_offers,
                total_suppliers,
                pending_suppliers,
                total_employees,
            },
            Err(e) => {
                tracing::error!("get_stats error: {:?}", e);
                AdminDashboardStats::default()
            }
        }
    }
}
