//! Test fixtures: a migrated on-disk database in a temp directory.

use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;

use crate::db::{create_pool, get_connection, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::schema::users;
use crate::utils::format_timestamp;

pub(crate) struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    // Held so the database file outlives the test.
    _dir: tempfile::TempDir,
}

/// Fresh migrated database plus its writer actor. Must be called from
/// within a tokio runtime (the writer is a spawned task).
pub(crate) fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("test.db");
    let pool = create_pool(path.to_str().expect("temp path is valid utf-8"))
        .expect("failed to create pool");
    run_migrations(&pool).expect("failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

/// Inserts a bare user row so foreign keys hold.
pub(crate) fn seed_user(pool: &Arc<DbPool>, user_id: &str) {
    let mut conn = get_connection(pool).expect("failed to get connection");
    diesel::insert_into(users::table)
        .values((
            users::id.eq(user_id),
            users::email.eq(format!("{}@example.com", user_id)),
            users::created_at.eq(format_timestamp(Utc::now())),
        ))
        .execute(&mut conn)
        .expect("failed to seed user");
}
