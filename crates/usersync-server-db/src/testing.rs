// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::pool::{create_pool, run_migrations};
use crate::sqlite::SqliteUserStore;
use crate::types::UserRecord;

pub async fn create_test_pool() -> SqlitePool {
	let pool = create_pool("sqlite::memory:").await.unwrap();
	run_migrations(&pool, "users").await.unwrap();
	pool
}

pub async fn create_test_store() -> (SqliteUserStore, SqlitePool) {
	let pool = create_test_pool().await;
	(SqliteUserStore::new(pool.clone(), "users"), pool)
}

pub async fn fetch_user(pool: &SqlitePool, clerk_id: &str) -> Option<UserRecord> {
	sqlx::query(
		"SELECT clerk_id, first_name, last_name, email, phone_number FROM users WHERE clerk_id = ?",
	)
	.bind(clerk_id)
	.fetch_optional(pool)
	.await
	.unwrap()
	.map(|row| UserRecord {
		clerk_id: row.get("clerk_id"),
		first_name: row.get("first_name"),
		last_name: row.get("last_name"),
		email: row.get("email"),
		phone_number: row.get("phone_number"),
	})
}
