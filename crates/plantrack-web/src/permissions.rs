//! Ownership predicates over (current user, resource) pairs.
//!
//! Kept as standalone functions so each route composes exactly the checks it
//! needs and each predicate is testable without a database.

use plantrack_db::models::{Plan, User};

/// True when `user` may rename or delete `plan`: the owner, or any superuser.
pub fn can_modify_plan(user: &User, plan: &Plan) -> bool {
    plan.owner_id == user.id || user.is_superuser
}
