//! Minimal user access for batch orchestration.
//!
//! User management (registration, auth, sessions) lives outside this
//! system; the orchestrator only needs to enumerate the users it must
//! reconcile.

use crate::errors::Result;

/// Read-only access to the user population.
pub trait UserRepositoryTrait: Send + Sync {
    /// Lists the ids of all users, in no particular order.
    fn list_user_ids(&self) -> Result<Vec<String>>;
}
