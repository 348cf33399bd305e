mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use common::{seed_admin, seed_employee, seed_site, seed_supplier, test_state};
use serde_json::{Value, json};
use site_procurement::{AppState, auth, config::Env, create_router};
use tower::ServiceExt;
use uuid::Uuid;

// --- Helper Functions ---

fn app(state: &AppState) -> Router {
    create_router(state.clone())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Uses the local `x-user-id` shortcut.
fn get_as(uri: &str, user_id: Uuid) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-user-id", user_id.to_string())
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// --- Tests ---

#[tokio::test]
async fn test_health_is_public_and_tagged_with_request_id() {
    let state = test_state(Env::Production);
    let response = app(&state).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_incoming_request_id_is_propagated() {
    let state = test_state(Env::Production);
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();

    let response = app(&state).oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn test_anonymous_calls_are_unauthorized() {
    let state = test_state(Env::Production);
    for uri in ["/me", "/notifications", "/employee/requests", "/admin/stats"] {
        let response = app(&state).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let state = test_state(Env::Production);
    let response = app(&state).oneshot(get("/no/such/route")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_gates() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let pending = seed_supplier(&state, "new@vendor.example", "TX-1", false).await;
    let approved = seed_supplier(&state, "known@vendor.example", "TX-2", true).await;
    let admin = seed_admin(&state, "boss@site.example").await;

    let cases = [
        ("/admin/stats", employee.0.user_id, StatusCode::FORBIDDEN),
        ("/admin/stats", admin, StatusCode::OK),
        ("/employee/requests", approved.user_id, StatusCode::FORBIDDEN),
        ("/employee/requests", admin, StatusCode::FORBIDDEN),
        ("/employee/requests", employee.0.user_id, StatusCode::OK),
        ("/supplier/requests", pending.user_id, StatusCode::FORBIDDEN),
        ("/supplier/requests", employee.0.user_id, StatusCode::FORBIDDEN),
        ("/supplier/requests", approved.user_id, StatusCode::OK),
        // Unapproved suppliers still reach the shared routes.
        ("/me", pending.user_id, StatusCode::OK),
        ("/catalog/sites", pending.user_id, StatusCode::OK),
    ];

    for (uri, user, expected) in cases {
        let response = app(&state).oneshot(get_as(uri, user)).await.unwrap();
        assert_eq!(response.status(), expected, "{uri}");
    }
}

#[tokio::test]
async fn test_login_then_bearer_profile() {
    let state = test_state(Env::Production);
    let hash = auth::hash_password("long-enough-password").unwrap();
    let admin = state.repo.create_admin("boss@site.example", &hash).await.unwrap();

    let response = app(&state)
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "Boss@Site.Example", "password": "long-enough-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login = body_json(response).await;
    assert_eq!(login["role"], "admin");
    let token = login["token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["id"], admin.id.to_string());
    assert_eq!(profile["email"], "boss@site.example");
}

#[tokio::test]
async fn test_errors_render_as_json_body() {
    let state = test_state(Env::Production);
    let response = app(&state)
        .oneshot(post_json(
            "/auth/login",
            json!({ "email": "ghost@site.example", "password": "whatever-password" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "authentication required");
}

#[tokio::test]
async fn test_employee_request_flow_over_http() {
    let state = test_state(Env::Local);
    let site = seed_site(&state, "North Yard").await;
    let employee = seed_employee(&state, "foreman@site.example", &site).await;
    let category = state.repo.create_category("Steel".to_string()).await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/employee/requests")
        .header("x-user-id", employee.0.user_id.to_string())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "category_id": category.id,
                "title": "Rebar 12mm",
                "description": "Slab reinforcement",
                "quantity": 12,
                "unit": "t"
            })
            .to_string(),
        ))
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["status"], "pending");
    assert_eq!(created["site_id"], site.id.to_string());

    let id = created["id"].as_str().unwrap();
    let response = app(&state)
        .oneshot(get_as(&format!("/employee/requests/{id}"), employee.0.user_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["request"]["id"], id);
    assert_eq!(detail["offers"], json!([]));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let state = test_state(Env::Production);
    let response = app(&state).oneshot(get("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let doc = body_json(response).await;
    assert!(doc["paths"].get("/auth/login").is_some());
    assert!(doc["paths"].get("/employee/offers/{id}/accept").is_some());
}
