use serde_json::json;
use site_procurement::models::{
    CreateMaterialRequest, Notification, NotificationKind, OfferStatus, RequestStatus, Role,
    SheetKind, UpdateOfferRequest, User,
};
use uuid::Uuid;

const NOTIFICATION_KINDS: [NotificationKind; 12] = [
    NotificationKind::SupplierRegistered,
    NotificationKind::SupplierApproved,
    NotificationKind::SupplierRevoked,
    NotificationKind::RequestCreated,
    NotificationKind::RequestOpened,
    NotificationKind::RequestRejected,
    NotificationKind::RequestCancelled,
    NotificationKind::OfferSubmitted,
    NotificationKind::OfferUpdated,
    NotificationKind::OfferWithdrawn,
    NotificationKind::OfferAccepted,
    NotificationKind::OfferRejected,
];

// --- Stored text and JSON agree ---

#[test]
fn test_notification_kind_text_matches_json() {
    for kind in NOTIFICATION_KINDS {
        assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        assert_eq!(NotificationKind::try_from(kind.as_str().to_string()).unwrap(), kind);
    }
}

#[test]
fn test_status_text_matches_json() {
    for status in [
        RequestStatus::Pending,
        RequestStatus::Open,
        RequestStatus::Rejected,
        RequestStatus::Cancelled,
        RequestStatus::Awarded,
    ] {
        assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        assert_eq!(RequestStatus::try_from(status.as_str().to_string()).unwrap(), status);
    }
    for status in [
        OfferStatus::Pending,
        OfferStatus::Accepted,
        OfferStatus::Rejected,
        OfferStatus::Withdrawn,
    ] {
        assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        assert_eq!(OfferStatus::try_from(status.as_str().to_string()).unwrap(), status);
    }
    for role in [Role::Admin, Role::Employee, Role::Supplier] {
        assert_eq!(serde_json::to_value(role).unwrap(), json!(role.as_str()));
    }
    assert_eq!(serde_json::to_value(SheetKind::OfferSheet).unwrap(), json!("offer_sheet"));
}

#[test]
fn test_unknown_stored_text_is_rejected() {
    let err = Role::try_from("superuser".to_string()).unwrap_err();
    assert_eq!(err.to_string(), "unknown role value 'superuser'");
    assert!(RequestStatus::try_from("Open".to_string()).is_err());
    assert!(SheetKind::try_from("invoice".to_string()).is_err());
}

// --- Wire shapes ---

#[test]
fn test_notification_serializes_kind_as_type() {
    let note = Notification {
        id: Uuid::nil(),
        user_id: Uuid::nil(),
        kind: NotificationKind::OfferAccepted,
        message: "Your offer was accepted".to_string(),
        ..Default::default()
    };
    let value = serde_json::to_value(&note).unwrap();

    assert_eq!(value["type"], "offer_accepted");
    assert!(value.get("kind").is_none());
    assert_eq!(value["is_read"], false);
}

#[test]
fn test_user_never_serializes_password_hash() {
    let user = User {
        email: "buyer@site.example".to_string(),
        password_hash: "$argon2id$v=19$secret".to_string(),
        role: Role::Supplier,
        ..Default::default()
    };
    let value = serde_json::to_value(&user).unwrap();

    assert!(value.get("password_hash").is_none());
    assert_eq!(value["role"], "supplier");
}

#[test]
fn test_optional_fields_may_be_omitted() {
    let req: CreateMaterialRequest = serde_json::from_value(json!({
        "category_id": Uuid::new_v4(),
        "title": "Cement",
        "description": "CEM II 42.5",
        "quantity": 200,
        "unit": "bag"
    }))
    .unwrap();
    assert!(req.brand_id.is_none());
    assert!(req.needed_by.is_none());

    let patch: UpdateOfferRequest = serde_json::from_value(json!({ "delivery_days": 3 })).unwrap();
    assert_eq!(patch.delivery_days, Some(3));
    assert!(patch.unit_price_cents.is_none());
}

#[test]
fn test_unknown_enum_value_in_payload_fails_to_parse() {
    let parsed = serde_json::from_value::<RequestStatus>(json!("archived"));
    assert!(parsed.is_err());
}
