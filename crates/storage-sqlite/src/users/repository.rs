use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::users::dsl as users_dsl;

use stockfolio_core::errors::Result;
use stockfolio_core::users::UserRepositoryTrait;

/// Read-only access to the users table.
///
/// User rows are created and removed by the authentication service that
/// owns them; this crate only enumerates them for batch runs and relies
/// on `ON DELETE CASCADE` to clean up holdings, snapshots, and
/// watchlists when a user is removed.
pub struct UserRepository {
    pool: Arc<DbPool>,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl UserRepositoryTrait for UserRepository {
    fn list_user_ids(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;

        users_dsl::users
            .select(users_dsl::id)
            .load::<String>(&mut conn)
            .into_core()
    }
}
