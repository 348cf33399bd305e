mod common;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use common::{
    current, material, seed_admin, seed_employee, seed_open_request, seed_site, seed_supplier,
    test_state,
};
use site_procurement::{
    ApiError, AppState,
    auth::{self, AuthUser},
    config::Env,
    handlers::{account, admin, catalog, notifications, offers, requests},
    models::{
        BrandFilter, CreateEmployeeRequest, LoginRequest, NameInput, NotificationKind, OfferStatus,
        RegisterSupplierRequest, RequestFilter, RequestStatus, ReviewRequest, Role,
        SubmitOfferRequest, SupplierApproval, SupplierFilter, UpdateMaterialRequest,
        UpdateOfferRequest,
    },
    notify::{self, NotificationEvent},
};
use uuid::Uuid;

async fn seed_category(state: &AppState, name: &str) -> Uuid {
    state.repo.create_category(name.to_string()).await.unwrap().id
}

fn offer(price: i64) -> SubmitOfferRequest {
    SubmitOfferRequest {
        unit_price_cents: price,
        delivery_days: 7,
        note: None,
    }
}

async fn kinds_for(state: &AppState, user_id: Uuid) -> Vec<NotificationKind> {
    state
        .repo
        .list_notifications(user_id)
        .await
        .into_iter()
        .map(|n| n.kind)
        .collect()
}

// --- Accounts ---

#[tokio::test]
async fn test_register_supplier_then_login() {
    let state = test_state(Env::Local);
    let admin_id = seed_admin(&state, "boss@site.example").await;

    let payload = RegisterSupplierRequest {
        email: "  Sales@Vendor.Example ".to_string(),
        password: "long-enough-password".to_string(),
        company_name: "Vendor Ltd".to_string(),
        tax_number: "TX-100".to_string(),
        phone: None,
        address: None,
    };
    let (status, Json(supplier)) =
        account::register_supplier(State(state.clone()), Json(payload.clone()))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert!(!supplier.is_approved);
    assert_eq!(kinds_for(&state, admin_id).await, vec![NotificationKind::SupplierRegistered]);

    // Same email in a different case is a conflict.
    let duplicate = account::register_supplier(
        State(state.clone()),
        Json(RegisterSupplierRequest {
            tax_number: "TX-101".to_string(),
            email: "sales@vendor.example".to_string(),
            ..payload
        }),
    )
    .await;
    assert!(matches!(duplicate, Err(ApiError::Conflict(_))));

    let Json(login) = account::login(
        State(state.clone()),
        Json(LoginRequest {
            email: "SALES@vendor.example".to_string(),
            password: "long-enough-password".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(login.role, Role::Supplier);
    let claims = auth::decode_token(&login.token, &state.config.jwt_secret).unwrap();
    assert_eq!(claims.sub, supplier.user_id);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let state = test_state(Env::Local);
    let hash = auth::hash_password("long-enough-password").unwrap();
    state.repo.create_admin("boss@site.example", &hash).await.unwrap();

    let wrong_password = account::login(
        State(state.clone()),
        Json(LoginRequest {
            email: "boss@site.example".to_string(),
            password: "not-the-password".to_string(),
        }),
    )
    .await;
    assert!(matches!(wrong_password, Err(ApiError::Unauthorized)));

    let unknown = account::login(
        State(state.clone()),
        Json(LoginRequest {
            email: "ghost@site.example".to_string(),
            password: "long-enough-password".to_string(),
        }),
    )
    .await;
    assert_eq!(unknown.unwrap_err().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_supplier_validates_payload() {
    let state = test_state(Env::Local);
    let result = account::register_supplier(
        State(state),
        Json(RegisterSupplierRequest {
            email: "sales@vendor.example".to_string(),
            password: "short".to_string(),
            company_name: "Vendor Ltd".to_string(),
            tax_number: "TX-100".to_string(),
            phone: None,
            address: None,
        }),
    )
    .await;
    assert_eq!(result.unwrap_err().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_me_includes_role_record() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;

    let user = AuthUser {
        id: employee.0.user_id,
        role: Role::Employee,
    };
    let Json(profile) = account::get_me(user, State(state)).await.unwrap();
    assert_eq!(profile.role, Role::Employee);
    assert_eq!(profile.employee.unwrap().id, employee.0.id);
    assert!(profile.supplier.is_none());
}

// --- Employee requests ---

#[tokio::test]
async fn test_create_request_rejects_non_positive_quantity() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;

    let mut payload = material(category);
    payload.quantity = 0;
    let result = requests::create_request(employee, State(state.clone()), Json(payload)).await;

    assert_eq!(result.unwrap_err().status(), StatusCode::BAD_REQUEST);
    assert!(state.repo.list_requests(RequestFilter::default()).await.is_empty());
}

#[tokio::test]
async fn test_create_request_checks_brand_belongs_to_category() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let steel = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let brand = state.repo.create_brand("Arcelor".to_string()).await.unwrap();

    let mut payload = material(steel);
    payload.brand_id = Some(brand.id);
    let unlinked =
        requests::create_request(employee.clone(), State(state.clone()), Json(payload.clone())).await;
    assert_eq!(unlinked.unwrap_err().status(), StatusCode::BAD_REQUEST);

    state.repo.link_category_brand(steel, brand.id).await.unwrap();
    let (status, Json(request)) =
        requests::create_request(employee, State(state.clone()), Json(payload))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request.brand_id, Some(brand.id));
    assert_eq!(request.site_id, site.id);
    assert_eq!(request.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_create_request_notifies_admins() {
    let state = test_state(Env::Local);
    let admin_id = seed_admin(&state, "boss@site.example").await;
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;

    let (_, Json(request)) =
        requests::create_request(employee, State(state.clone()), Json(material(category)))
            .await
            .unwrap();

    let notes = state.repo.list_notifications(admin_id).await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::RequestCreated);
    assert_eq!(notes[0].request_id, Some(request.id));
}

#[tokio::test]
async fn test_update_only_while_pending_and_only_by_owner() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let owner = seed_employee(&state, "foreman@site.example", &site).await;
    let other = seed_employee(&state, "other@site.example", &site).await;

    let request = state.repo.create_request(&owner.0, material(category)).await.unwrap();
    let change = UpdateMaterialRequest {
        quantity: Some(55),
        ..Default::default()
    };

    let foreign = requests::update_my_request(
        other,
        State(state.clone()),
        Path(request.id),
        Json(change.clone()),
    )
    .await;
    assert_eq!(foreign.unwrap_err().status(), StatusCode::NOT_FOUND);

    let Json(updated) = requests::update_my_request(
        owner.clone(),
        State(state.clone()),
        Path(request.id),
        Json(change.clone()),
    )
    .await
    .unwrap();
    assert_eq!(updated.quantity, 55);
    assert_eq!(updated.title, request.title);

    state
        .repo
        .set_request_status(request.id, &[RequestStatus::Pending], RequestStatus::Open, None)
        .await
        .unwrap();
    let after_open =
        requests::update_my_request(owner, State(state.clone()), Path(request.id), Json(change))
            .await;
    assert_eq!(after_open.unwrap_err().status(), StatusCode::CONFLICT);
}

// --- Admin review ---

#[tokio::test]
async fn test_review_open_notifies_owner_and_approved_suppliers() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let approved = seed_supplier(&state, "known@vendor.example", "TX-1", true).await;
    let pending = seed_supplier(&state, "new@vendor.example", "TX-2", false).await;

    let request = state.repo.create_request(&employee.0, material(category)).await.unwrap();

    let Json(reviewed) = admin::review_request(
        State(state.clone()),
        Path(request.id),
        Json(ReviewRequest {
            approve: true,
            note: Some("Budget confirmed".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(reviewed.status, RequestStatus::Open);
    assert_eq!(reviewed.review_note.as_deref(), Some("Budget confirmed"));

    assert_eq!(kinds_for(&state, employee.0.user_id).await, vec![NotificationKind::RequestOpened]);
    assert_eq!(kinds_for(&state, approved.user_id).await, vec![NotificationKind::RequestOpened]);
    assert!(kinds_for(&state, pending.user_id).await.is_empty());

    // A second review is an illegal transition.
    let again = admin::review_request(
        State(state.clone()),
        Path(request.id),
        Json(ReviewRequest {
            approve: false,
            note: None,
        }),
    )
    .await;
    assert_eq!(again.unwrap_err().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_review_reject_notifies_only_owner() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let approved = seed_supplier(&state, "known@vendor.example", "TX-1", true).await;
    let request = state.repo.create_request(&employee.0, material(category)).await.unwrap();

    let Json(reviewed) = admin::review_request(
        State(state.clone()),
        Path(request.id),
        Json(ReviewRequest {
            approve: false,
            note: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(reviewed.status, RequestStatus::Rejected);
    assert_eq!(kinds_for(&state, employee.0.user_id).await, vec![NotificationKind::RequestRejected]);
    assert!(kinds_for(&state, approved.user_id).await.is_empty());
}

// --- Offers ---

#[tokio::test]
async fn test_offer_requires_open_request() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let supplier = seed_supplier(&state, "known@vendor.example", "TX-1", true).await;
    let request = state.repo.create_request(&employee.0, material(category)).await.unwrap();

    let result = offers::submit_offer(
        current(&supplier),
        State(state.clone()),
        Path(request.id),
        Json(offer(1_500)),
    )
    .await;
    assert_eq!(result.unwrap_err().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_second_pending_offer_is_conflict() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let supplier = seed_supplier(&state, "known@vendor.example", "TX-1", true).await;
    let request = seed_open_request(&state, &employee, category).await;

    let (status, Json(first)) = offers::submit_offer(
        current(&supplier),
        State(state.clone()),
        Path(request.id),
        Json(offer(1_500)),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first.status, OfferStatus::Pending);
    assert_eq!(
        kinds_for(&state, employee.0.user_id).await,
        vec![NotificationKind::OfferSubmitted]
    );

    let second = offers::submit_offer(
        current(&supplier),
        State(state.clone()),
        Path(request.id),
        Json(offer(1_400)),
    )
    .await;
    assert_eq!(second.unwrap_err().status(), StatusCode::CONFLICT);

    // After withdrawing, a fresh offer is allowed again.
    let Json(withdrawn) =
        offers::withdraw_my_offer(current(&supplier), State(state.clone()), Path(first.id))
            .await
            .unwrap();
    assert_eq!(withdrawn.status, OfferStatus::Withdrawn);
    let third = offers::submit_offer(
        current(&supplier),
        State(state.clone()),
        Path(request.id),
        Json(offer(1_400)),
    )
    .await;
    assert!(third.is_ok());
}

#[tokio::test]
async fn test_offer_validation_bounds() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let supplier = seed_supplier(&state, "known@vendor.example", "TX-1", true).await;
    let request = seed_open_request(&state, &employee, category).await;

    let free = offers::submit_offer(
        current(&supplier),
        State(state.clone()),
        Path(request.id),
        Json(offer(0)),
    )
    .await;
    assert_eq!(free.unwrap_err().status(), StatusCode::BAD_REQUEST);

    let slow = offers::submit_offer(
        current(&supplier),
        State(state.clone()),
        Path(request.id),
        Json(SubmitOfferRequest {
            unit_price_cents: 100,
            delivery_days: 400,
            note: None,
        }),
    )
    .await;
    assert_eq!(slow.unwrap_err().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_offer_only_by_author() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let author = seed_supplier(&state, "known@vendor.example", "TX-1", true).await;
    let rival = seed_supplier(&state, "rival@vendor.example", "TX-2", true).await;
    let request = seed_open_request(&state, &employee, category).await;
    let placed = state
        .repo
        .create_offer(request.id, author.id, offer(1_500))
        .await
        .unwrap();

    let change = UpdateOfferRequest {
        unit_price_cents: Some(1_250),
        ..Default::default()
    };
    let foreign = offers::update_my_offer(
        current(&rival),
        State(state.clone()),
        Path(placed.id),
        Json(change.clone()),
    )
    .await;
    assert_eq!(foreign.unwrap_err().status(), StatusCode::NOT_FOUND);

    let Json(updated) =
        offers::update_my_offer(current(&author), State(state.clone()), Path(placed.id), Json(change))
            .await
            .unwrap();
    assert_eq!(updated.unit_price_cents, 1_250);
    assert_eq!(updated.delivery_days, 7);
    assert_eq!(
        kinds_for(&state, employee.0.user_id).await,
        vec![NotificationKind::OfferUpdated]
    );
}

#[tokio::test]
async fn test_accept_offer_awards_and_rejects_siblings() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let winner = seed_supplier(&state, "winner@vendor.example", "TX-1", true).await;
    let loser = seed_supplier(&state, "loser@vendor.example", "TX-2", true).await;
    let request = seed_open_request(&state, &employee, category).await;

    let winning = state.repo.create_offer(request.id, winner.id, offer(1_200)).await.unwrap();
    let losing = state.repo.create_offer(request.id, loser.id, offer(1_300)).await.unwrap();

    let Json(detail) =
        requests::accept_offer(employee.clone(), State(state.clone()), Path(winning.id))
            .await
            .unwrap();

    assert_eq!(detail.request.status, RequestStatus::Awarded);
    let status_of = |id: Uuid| detail.offers.iter().find(|o| o.id == id).unwrap().status;
    assert_eq!(status_of(winning.id), OfferStatus::Accepted);
    assert_eq!(status_of(losing.id), OfferStatus::Rejected);

    assert_eq!(kinds_for(&state, winner.user_id).await, vec![NotificationKind::OfferAccepted]);
    assert_eq!(kinds_for(&state, loser.user_id).await, vec![NotificationKind::OfferRejected]);

    // The request is closed now; nothing else can be accepted or submitted.
    let again = requests::accept_offer(employee, State(state.clone()), Path(losing.id)).await;
    assert_eq!(again.unwrap_err().status(), StatusCode::CONFLICT);
    let late = offers::submit_offer(
        current(&loser),
        State(state.clone()),
        Path(request.id),
        Json(offer(900)),
    )
    .await;
    assert_eq!(late.unwrap_err().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_accept_offer_on_foreign_request_is_not_found() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let owner = seed_employee(&state, "foreman@site.example", &site).await;
    let other = seed_employee(&state, "other@site.example", &site).await;
    let supplier = seed_supplier(&state, "known@vendor.example", "TX-1", true).await;
    let request = seed_open_request(&state, &owner, category).await;
    let placed = state.repo.create_offer(request.id, supplier.id, offer(1_200)).await.unwrap();

    let result = requests::accept_offer(other, State(state.clone()), Path(placed.id)).await;
    assert_eq!(result.unwrap_err().status(), StatusCode::NOT_FOUND);
    assert_eq!(
        state.repo.get_request(request.id).await.unwrap().status,
        RequestStatus::Open
    );
}

#[tokio::test]
async fn test_cancel_request_closes_pending_offers() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let supplier = seed_supplier(&state, "known@vendor.example", "TX-1", true).await;
    let request = seed_open_request(&state, &employee, category).await;
    let placed = state.repo.create_offer(request.id, supplier.id, offer(1_200)).await.unwrap();

    let Json(cancelled) =
        requests::cancel_my_request(employee.clone(), State(state.clone()), Path(request.id))
            .await
            .unwrap();
    assert_eq!(cancelled.status, RequestStatus::Cancelled);
    assert_eq!(
        state.repo.get_offer(placed.id).await.unwrap().status,
        OfferStatus::Rejected
    );
    assert_eq!(
        kinds_for(&state, supplier.user_id).await,
        vec![NotificationKind::RequestCancelled]
    );

    let twice = requests::cancel_my_request(employee, State(state.clone()), Path(request.id)).await;
    assert_eq!(twice.unwrap_err().status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_supplier_sees_only_open_requests_and_own_offers() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let me = seed_supplier(&state, "me@vendor.example", "TX-1", true).await;
    let rival = seed_supplier(&state, "rival@vendor.example", "TX-2", true).await;

    let open = seed_open_request(&state, &employee, category).await;
    let pending = state.repo.create_request(&employee.0, material(category)).await.unwrap();
    state.repo.create_offer(open.id, me.id, offer(1_000)).await.unwrap();
    state.repo.create_offer(open.id, rival.id, offer(990)).await.unwrap();

    let Json(listed) = offers::list_open_requests(
        current(&me),
        State(state.clone()),
        Query(RequestFilter {
            status: Some(RequestStatus::Pending),
            ..Default::default()
        }),
    )
    .await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, open.id);

    let Json(detail) =
        offers::get_request_for_supplier(current(&me), State(state.clone()), Path(open.id))
            .await
            .unwrap();
    assert_eq!(detail.offers.len(), 1);
    assert_eq!(detail.offers[0].supplier_id, me.id);

    let hidden =
        offers::get_request_for_supplier(current(&me), State(state.clone()), Path(pending.id)).await;
    assert_eq!(hidden.unwrap_err().status(), StatusCode::NOT_FOUND);
}

// --- Admin ---

#[tokio::test]
async fn test_supplier_approval_notifies_on_change_only() {
    let state = test_state(Env::Local);
    let supplier = seed_supplier(&state, "new@vendor.example", "TX-1", false).await;

    let Json(approved) = admin::set_supplier_approval(
        State(state.clone()),
        Path(supplier.id),
        Json(SupplierApproval { approved: true }),
    )
    .await
    .unwrap();
    assert!(approved.is_approved);
    assert!(approved.approved_at.is_some());

    // Approving again changes nothing.
    admin::set_supplier_approval(
        State(state.clone()),
        Path(supplier.id),
        Json(SupplierApproval { approved: true }),
    )
    .await
    .unwrap();
    assert_eq!(
        kinds_for(&state, supplier.user_id).await,
        vec![NotificationKind::SupplierApproved]
    );

    let Json(queue) = admin::list_suppliers(
        State(state.clone()),
        Query(SupplierFilter {
            approved: Some(false),
        }),
    )
    .await;
    assert!(queue.is_empty());

    let missing = admin::set_supplier_approval(
        State(state),
        Path(Uuid::new_v4()),
        Json(SupplierApproval { approved: true }),
    )
    .await;
    assert_eq!(missing.unwrap_err().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_employee_requires_known_site() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let payload = CreateEmployeeRequest {
        email: "Foreman@Site.Example".to_string(),
        password: "long-enough-password".to_string(),
        full_name: "Site Foreman".to_string(),
        phone: None,
        site_id: Uuid::new_v4(),
    };

    let unknown = admin::create_employee(State(state.clone()), Json(payload.clone())).await;
    assert_eq!(unknown.unwrap_err().status(), StatusCode::BAD_REQUEST);

    let (status, Json(employee)) = admin::create_employee(
        State(state.clone()),
        Json(CreateEmployeeRequest {
            site_id: site.id,
            ..payload
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let user = state.repo.get_user(employee.user_id).await.unwrap();
    assert_eq!(user.email, "foreman@site.example");
    assert_eq!(user.role, Role::Employee);
}

#[tokio::test]
async fn test_admin_stats_reflect_workflow() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let category = seed_category(&state, "Steel").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let supplier = seed_supplier(&state, "known@vendor.example", "TX-1", true).await;
    seed_supplier(&state, "new@vendor.example", "TX-2", false).await;

    state.repo.create_request(&employee.0, material(category)).await.unwrap();
    let open = seed_open_request(&state, &employee, category).await;
    state.repo.create_offer(open.id, supplier.id, offer(1_000)).await.unwrap();

    let Json(stats) = admin::get_admin_stats(State(state)).await;
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.pending_requests, 1);
    assert_eq!(stats.open_requests, 1);
    assert_eq!(stats.awarded_requests, 0);
    assert_eq!(stats.total_offers, 1);
    assert_eq!(stats.total_suppliers, 2);
    assert_eq!(stats.pending_suppliers, 1);
    assert_eq!(stats.total_employees, 1);
}

// --- Catalog ---

#[tokio::test]
async fn test_catalog_names_are_unique_and_links_filter_brands() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let (status, Json(steel)) = catalog::create_category(
        State(state.clone()),
        Json(NameInput {
            name: " Steel ".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(steel.name, "Steel");

    let duplicate = catalog::create_category(
        State(state.clone()),
        Json(NameInput {
            name: "Steel".to_string(),
        }),
    )
    .await;
    assert_eq!(duplicate.unwrap_err().status(), StatusCode::CONFLICT);

    let arcelor = state.repo.create_brand("Arcelor".to_string()).await.unwrap();
    let tata = state.repo.create_brand("Tata".to_string()).await.unwrap();

    let linked = catalog::link_category_brand(State(state.clone()), Path((steel.id, arcelor.id)))
        .await
        .unwrap();
    assert_eq!(linked, StatusCode::NO_CONTENT);
    catalog::link_site_brand(State(state.clone()), Path((site.id, tata.id)))
        .await
        .unwrap();

    let Json(in_steel) = catalog::list_brands(
        State(state.clone()),
        Query(BrandFilter {
            category_id: Some(steel.id),
            site_id: None,
        }),
    )
    .await;
    assert_eq!(in_steel.iter().map(|b| b.id).collect::<Vec<_>>(), vec![arcelor.id]);

    let dangling = catalog::link_site_brand(State(state.clone()), Path((Uuid::new_v4(), tata.id))).await;
    assert_eq!(dangling.unwrap_err().status(), StatusCode::BAD_REQUEST);

    let removed = catalog::unlink_site_brand(State(state.clone()), Path((site.id, tata.id)))
        .await
        .unwrap();
    assert_eq!(removed, StatusCode::NO_CONTENT);
    let gone = catalog::unlink_site_brand(State(state), Path((site.id, tata.id))).await;
    assert_eq!(gone.unwrap_err().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_site_in_use_cannot_be_deleted() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    seed_employee(&state, "foreman@site.example", &site).await;

    let in_use = catalog::delete_site(State(state.clone()), Path(site.id)).await;
    assert_eq!(in_use.unwrap_err().status(), StatusCode::BAD_REQUEST);

    let empty = seed_site(&state, "South Yard").await;
    let deleted = catalog::delete_site(State(state.clone()), Path(empty.id)).await.unwrap();
    assert_eq!(deleted, StatusCode::NO_CONTENT);
    let missing = catalog::delete_site(State(state), Path(empty.id)).await;
    assert_eq!(missing.unwrap_err().status(), StatusCode::NOT_FOUND);
}

// --- Notifications ---

#[tokio::test]
async fn test_notifications_read_flags() {
    let state = test_state(Env::Local);
    let admin_id = seed_admin(&state, "boss@site.example").await;
    let stranger = seed_admin(&state, "other@site.example").await;
    seed_supplier(&state, "a@vendor.example", "TX-1", false).await;
    seed_supplier(&state, "b@vendor.example", "TX-2", false).await;
    // Seeding goes through the repository, so notify explicitly.
    for supplier in state.repo.list_suppliers(None).await {
        notify::dispatch(state.repo.as_ref(), NotificationEvent::SupplierRegistered(&supplier)).await;
    }

    let me = AuthUser {
        id: admin_id,
        role: Role::Admin,
    };
    let Json(mine) = notifications::get_notifications(me.clone(), State(state.clone())).await;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|n| !n.is_read));

    let foreign = notifications::mark_notification_read(
        AuthUser {
            id: stranger,
            role: Role::Admin,
        },
        State(state.clone()),
        Path(mine[0].id),
    )
    .await;
    assert_eq!(foreign, StatusCode::NOT_FOUND);

    let marked =
        notifications::mark_notification_read(me.clone(), State(state.clone()), Path(mine[0].id)).await;
    assert_eq!(marked, StatusCode::NO_CONTENT);

    let Json(all) = notifications::mark_all_notifications_read(me, State(state)).await;
    assert_eq!(all.updated, 1);
}
