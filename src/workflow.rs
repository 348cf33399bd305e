//! Request and offer state transitions.
//!
//! Handlers ask these functions for the next status before touching the
//! repository, so an illegal move is answered with 409 and nothing is written.

use thiserror::Error;

use crate::models::{OfferStatus, RequestStatus};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("request is {0:?}; only pending requests can be {1}")]
    RequestNotPending(RequestStatus, &'static str),

    #[error("request is {0:?}; it does not accept offers")]
    RequestClosed(RequestStatus),

    #[error("request is {0:?} and can no longer be cancelled")]
    RequestFinal(RequestStatus),

    #[error("offer is {0:?}; only pending offers can be {1}")]
    OfferNotPending(OfferStatus, &'static str),
}

/// Admin review: `pending -> open | rejected`.
pub fn review(current: RequestStatus, approve: bool) -> Result<RequestStatus, WorkflowError> {
    match current {
        RequestStatus::Pending if approve => Ok(RequestStatus::Open),
        RequestStatus::Pending => Ok(RequestStatus::Rejected),
        other => Err(WorkflowError::RequestNotPending(other, "reviewed")),
    }
}

/// Owner cancellation: `pending | open -> cancelled`.
pub fn cancel(current: RequestStatus) -> Result<RequestStatus, WorkflowError> {
    match current {
        RequestStatus::Pending | RequestStatus::Open => Ok(RequestStatus::Cancelled),
        other => Err(WorkflowError::RequestFinal(other)),
    }
}

/// Only pending requests may be edited by their owner.
pub fn ensure_editable(current: RequestStatus) -> Result<(), WorkflowError> {
    match current {
        RequestStatus::Pending => Ok(()),
        other => Err(WorkflowError::RequestNotPending(other, "edited")),
    }
}

pub fn ensure_accepts_offers(current: RequestStatus) -> Result<(), WorkflowError> {
    match current {
        RequestStatus::Open => Ok(()),
        other => Err(WorkflowError::RequestClosed(other)),
    }
}

/// Offer acceptance: the request must be open and the offer pending.
/// Returns the request's next status (`awarded`).
pub fn award(request: RequestStatus, offer: OfferStatus) -> Result<RequestStatus, WorkflowError> {
    ensure_accepts_offers(request)?;
    match offer {
        OfferStatus::Pending => Ok(RequestStatus::Awarded),
        other => Err(WorkflowError::OfferNotPending(other, "accepted")),
    }
}

pub fn ensure_offer_editable(current: OfferStatus) -> Result<(), WorkflowError> {
    match current {
        OfferStatus::Pending => Ok(()),
        other => Err(WorkflowError::OfferNotPending(other, "updated")),
    }
}

/// Supplier withdrawal: `pending -> withdrawn`.
pub fn withdraw(current: OfferStatus) -> Result<OfferStatus, WorkflowError> {
    match current {
        OfferStatus::Pending => Ok(OfferStatus::Withdrawn),
        other => Err(WorkflowError::OfferNotPending(other, "withdrawn")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_only_from_pending() {
        assert_eq!(review(RequestStatus::Pending, true), Ok(RequestStatus::Open));
        assert_eq!(review(RequestStatus::Pending, false), Ok(RequestStatus::Rejected));
        assert!(review(RequestStatus::Open, true).is_err());
        assert!(review(RequestStatus::Awarded, false).is_err());
    }

    #[test]
    fn award_requires_open_request_and_pending_offer() {
        assert_eq!(
            award(RequestStatus::Open, OfferStatus::Pending),
            Ok(RequestStatus::Awarded)
        );
        assert_eq!(
            award(RequestStatus::Pending, OfferStatus::Pending),
            Err(WorkflowError::RequestClosed(RequestStatus::Pending))
        );
        assert!(award(RequestStatus::Open, OfferStatus::Withdrawn).is_err());
    }

    #[test]
    fn cancellation_is_final() {
        assert_eq!(cancel(RequestStatus::Open), Ok(RequestStatus::Cancelled));
        assert!(cancel(RequestStatus::Cancelled).is_err());
        assert!(cancel(RequestStatus::Awarded).is_err());
    }
}
