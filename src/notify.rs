//! Notification side-effects of workflow transitions.
//!
//! Handlers call `dispatch` after a transition has been persisted. Recipients
//! are resolved through the repository at dispatch time. Failures are logged
//! and never fail the request that triggered them.

use uuid::Uuid;

use crate::{
    models::{MaterialRequest, NewNotification, NotificationKind, Offer, RequestStatus, Role, Supplier},
    repository::{Award, Repository},
};

/// A persisted transition somebody has to hear about.
#[derive(Debug, Clone, Copy)]
pub enum NotificationEvent<'a> {
    /// Tell every admin a supplier awaits approval.
    SupplierRegistered(&'a Supplier),
    /// Tell the supplier its approval flag changed.
    SupplierApprovalChanged(&'a Supplier),
    /// Tell every admin a request awaits review.
    RequestCreated(&'a MaterialRequest),
    /// Tell the owner the outcome; when opened, also every approved supplier.
    RequestReviewed(&'a MaterialRequest),
    /// Tell the suppliers whose pending offers were closed by the cancellation.
    RequestCancelled {
        request: &'a MaterialRequest,
        closed_offers: &'a [Offer],
    },
    OfferSubmitted {
        request: &'a MaterialRequest,
        offer: &'a Offer,
    },
    OfferUpdated {
        request: &'a MaterialRequest,
        offer: &'a Offer,
    },
    OfferWithdrawn {
        request: &'a MaterialRequest,
        offer: &'a Offer,
    },
    /// Tell the winner and every rejected bidder.
    OfferAccepted(&'a Award),
}

fn note(
    user_id: Uuid,
    kind: NotificationKind,
    message: String,
    request_id: Option<Uuid>,
    offer_id: Option<Uuid>,
) -> NewNotification {
    NewNotification {
        user_id,
        kind,
        message,
        request_id,
        offer_id,
    }
}

async fn request_owner(repo: &dyn Repository, request: &MaterialRequest) -> Option<Uuid> {
    repo.get_employee(request.employee_id).await.map(|e| e.user_id)
}

async fn offer_author(repo: &dyn Repository, offer: &Offer) -> Option<Uuid> {
    repo.get_supplier(offer.supplier_id).await.map(|s| s.user_id)
}

/// plan
///
/// Resolves the recipients of `event` and renders one notification each.
pub async fn plan(repo: &dyn Repository, event: NotificationEvent<'_>) -> Vec<NewNotification> {
    let mut out = Vec::new();
    match event {
        NotificationEvent::SupplierRegistered(supplier) => {
            for admin in repo.list_user_ids_by_role(Role::Admin).await {
                out.push(note(
                    admin,
                    NotificationKind::SupplierRegistered,
                    format!("Supplier \"{}\" registered and awaits approval", supplier.company_name),
                    None,
                    None,
                ));
            }
        }
        NotificationEvent::SupplierApprovalChanged(supplier) => {
            let (kind, message) = if supplier.is_approved {
                (
                    NotificationKind::SupplierApproved,
                    "Your supplier account was approved; you can now submit offers".to_string(),
                )
            } else {
                (
                    NotificationKind::SupplierRevoked,
                    "Your supplier approval was revoked".to_string(),
                )
            };
            out.push(note(supplier.user_id, kind, message, None, None));
        }
        NotificationEvent::RequestCreated(request) => {
            for admin in repo.list_user_ids_by_role(Role::Admin).await {
                out.push(note(
                    admin,
                    NotificationKind::RequestCreated,
                    format!("New request \"{}\" awaits review", request.title),
                    Some(request.id),
                    None,
                ));
            }
        }
        NotificationEvent::RequestReviewed(request) => {
            let opened = request.status == RequestStatus::Open;
            if let Some(owner) = request_owner(repo, request).await {
                let (kind, verb) = if opened {
                    (NotificationKind::RequestOpened, "approved and opened for offers")
                } else {
                    (NotificationKind::RequestRejected, "rejected")
                };
                out.push(note(
                    owner,
                    kind,
                    format!("Your request \"{}\" was {verb}", request.title),
                    Some(request.id),
                    None,
                ));
            }
            if opened {
                for supplier in repo.list_suppliers(Some(true)).await {
                    out.push(note(
                        supplier.user_id,
                        NotificationKind::RequestOpened,
                        format!(
                            "New request \"{}\": {} {}",
                            request.title, request.quantity, request.unit
                        ),
                        Some(request.id),
                        None,
                    ));
                }
            }
        }
        NotificationEvent::RequestCancelled {
            request,
            closed_offers,
        } => {
            for offer in closed_offers {
                if let Some(supplier) = offer_author(repo, offer).await {
                    out.push(note(
                        supplier,
                        NotificationKind::RequestCancelled,
                        format!("Request \"{}\" was cancelled", request.title),
                        Some(request.id),
                        Some(offer.id),
                    ));
                }
            }
        }
        NotificationEvent::OfferSubmitted { request, offer }
        | NotificationEvent::OfferUpdated { request, offer }
        | NotificationEvent::OfferWithdrawn { request, offer } => {
            let (kind, verb) = match event {
                NotificationEvent::OfferSubmitted { .. } => {
                    (NotificationKind::OfferSubmitted, "received a new offer")
                }
                NotificationEvent::OfferUpdated { .. } => {
                    (NotificationKind::OfferUpdated, "has an updated offer")
                }
                _ => (NotificationKind::OfferWithdrawn, "had an offer withdrawn"),
            };
            if let Some(owner) = request_owner(repo, request).await {
                out.push(note(
                    owner,
                    kind,
                    format!("Your request \"{}\" {verb}", request.title),
                    Some(request.id),
                    Some(offer.id),
                ));
            }
        }
        NotificationEvent::OfferAccepted(award) => {
            if let Some(winner) = offer_author(repo, &award.offer).await {
                out.push(note(
                    winner,
                    NotificationKind::OfferAccepted,
                    format!("Your offer for \"{}\" was accepted", award.request.title),
                    Some(award.request.id),
                    Some(award.offer.id),
                ));
            }
            for offer in &award.rejected {
                if let Some(loser) = offer_author(repo, offer).await {
                    out.push(note(
                        loser,
                        NotificationKind::OfferRejected,
                        format!("Another offer was chosen for \"{}\"", award.request.title),
                        Some(award.request.id),
                        Some(offer.id),
                    ));
                }
            }
        }
    }
    out
}

/// dispatch
///
/// Plans and stores the notifications for `event`. Returns how many were stored.
pub async fn dispatch(repo: &dyn Repository, event: NotificationEvent<'_>) -> usize {
    let batch = plan(repo, event).await;
    let expected = batch.len();
    let stored = repo.create_notifications(batch).await;
    if stored < expected {
        tracing::warn!(expected, stored, "some notifications were not stored");
    } else {
        tracing::debug!(stored, "notifications dispatched");
    }
    stored
}
