/// Router Module Index
///
/// One router per access role. Each group is mounted in `crate::create_router`
/// behind the matching role gate from `crate::auth`, so no handler below is
/// reachable without the gate having run first.

/// Anonymous access: health, login and supplier self-registration.
pub mod public;

/// Any authenticated user (`require_auth`).
pub mod authenticated;

/// Nested under `/employee`, behind `require_employee`.
pub mod employee;

/// Nested under `/supplier`, behind `require_supplier` (approved suppliers only).
pub mod supplier;

/// Nested under `/admin`, behind `require_admin`.
pub mod admin;
