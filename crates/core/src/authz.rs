//! Authorization predicates.
//!
//! Both guards are pure functions over an already-authenticated caller
//! identity; they never perform I/O and never error. The transport
//! layer decides how to compose them (logical AND per route) and how a
//! denial is rendered.

use crate::roles::Role;
use crate::types::DbId;

/// The (id, role) pair derived from a verified token.
///
/// Attached to a request by the transport layer after token
/// verification and handed to the guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    pub id: DbId,
    pub role: Role,
}

/// Role-based guard.
///
/// An empty `required` slice means the route declared no role
/// restriction and any authenticated caller passes. The distinction
/// between "no guard attached" and "guard with an empty role set" is
/// the route table's to preserve, not this function's.
pub fn role_guard(required: &[Role], caller_role: Role) -> bool {
    required.is_empty() || required.contains(&caller_role)
}

/// Self-access guard: the caller may only touch their own account.
pub fn self_guard(caller_id: DbId, target_id: DbId) -> bool {
    caller_id == target_id
}
