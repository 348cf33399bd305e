//! Fixtures shared by the integration tests: an in-memory `AppState` and
//! helpers seeding the catalog, employees and suppliers.

#![allow(dead_code)]

use site_procurement::{
    AppConfig, AppState, InMemoryRepository, MockStorageService,
    auth::{CurrentEmployee, CurrentSupplier},
    config::Env,
    models::{
        CreateEmployeeRequest, CreateMaterialRequest, Employee, MaterialRequest,
        RegisterSupplierRequest, RequestStatus, Site, SiteInput, Supplier,
    },
    storage::StorageState,
};
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

/// Seeded accounts do not log in, so they carry a placeholder hash.
pub const UNUSABLE_HASH: &str = "!unusable";

pub fn test_config(env: Env) -> AppConfig {
    let mut config = AppConfig::default();
    config.env = env.clone();
    config.jwt_secret = TEST_JWT_SECRET.to_string();
    if env == Env::Production {
        config.s3_endpoint = "http://mock-prod-s3".to_string();
        config.s3_key = "prod_key_stub".to_string();
        config.s3_secret = "prod_secret_stub".to_string();
    }
    config
}

pub fn test_state(env: Env) -> AppState {
    state_with_storage(env, Arc::new(MockStorageService::new()))
}

pub fn state_with_storage(env: Env, storage: StorageState) -> AppState {
    AppState {
        repo: Arc::new(InMemoryRepository::new()),
        storage,
        config: test_config(env),
    }
}

pub async fn seed_site(state: &AppState, name: &str) -> Site {
    state
        .repo
        .create_site(SiteInput {
            name: name.to_string(),
            address: "1 Quay Street".to_string(),
        })
        .await
        .expect("seed site")
}

pub async fn seed_admin(state: &AppState, email: &str) -> Uuid {
    state
        .repo
        .create_admin(email, UNUSABLE_HASH)
        .await
        .expect("seed admin")
        .id
}

pub async fn seed_employee(state: &AppState, email: &str, site: &Site) -> CurrentEmployee {
    let employee: Employee = state
        .repo
        .create_employee(
            CreateEmployeeRequest {
                email: email.to_string(),
                password: String::new(),
                full_name: "Site Foreman".to_string(),
                phone: None,
                site_id: site.id,
            },
            UNUSABLE_HASH.to_string(),
        )
        .await
        .expect("seed employee");
    CurrentEmployee(employee)
}

pub async fn seed_supplier(state: &AppState, email: &str, tax: &str, approved: bool) -> Supplier {
    let supplier = state
        .repo
        .register_supplier(
            RegisterSupplierRequest {
                email: email.to_string(),
                password: String::new(),
                company_name: format!("{tax} Building Supplies"),
                tax_number: tax.to_string(),
                phone: None,
                address: None,
            },
            UNUSABLE_HASH.to_string(),
        )
        .await
        .expect("seed supplier");
    if approved {
        state
            .repo
            .set_supplier_approval(supplier.id, true)
            .await
            .expect("approve supplier")
    } else {
        supplier
    }
}

pub fn current(supplier: &Supplier) -> CurrentSupplier {
    CurrentSupplier(supplier.clone())
}

pub fn material(category_id: Uuid) -> CreateMaterialRequest {
    CreateMaterialRequest {
        category_id,
        brand_id: None,
        title: "Rebar 12mm".to_string(),
        description: "Slab reinforcement, east wing".to_string(),
        quantity: 40,
        unit: "t".to_string(),
        needed_by: None,
    }
}

/// A request already reviewed and open for offers.
pub async fn seed_open_request(
    state: &AppState,
    employee: &CurrentEmployee,
    category_id: Uuid,
) -> MaterialRequest {
    let request = state
        .repo
        .create_request(&employee.0, material(category_id))
        .await
        .expect("seed request");
    state
        .repo
        .set_request_status(request.id, &[RequestStatus::Pending], RequestStatus::Open, None)
        .await
        .expect("open request")
}
