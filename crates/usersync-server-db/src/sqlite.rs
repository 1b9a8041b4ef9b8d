// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed user store for local development.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::error::DbError;
use crate::store::UserStore;
use crate::types::UserRecord;

#[derive(Clone)]
pub struct SqliteUserStore {
	pool: SqlitePool,
	insert_sql: String,
	update_sql: String,
}

impl SqliteUserStore {
	/// `table` must be a plain identifier; it is interpolated into SQL.
	pub fn new(pool: SqlitePool, table: &str) -> Self {
		Self {
			pool,
			insert_sql: format!(
				"INSERT INTO {table} (clerk_id, first_name, last_name, email, phone_number) \
				 VALUES (?, ?, ?, ?, ?)"
			),
			update_sql: format!(
				"UPDATE {table} SET first_name = ?, last_name = ?, email = ?, phone_number = ? \
				 WHERE clerk_id = ?"
			),
		}
	}

	#[tracing::instrument(skip(self, user), fields(clerk_id = %user.clerk_id))]
	pub async fn insert_user(&self, user: &UserRecord) -> Result<(), DbError> {
		sqlx::query(&self.insert_sql)
			.bind(&user.clerk_id)
			.bind(&user.first_name)
			.bind(&user.last_name)
			.bind(&user.email)
			.bind(&user.phone_number)
			.execute(&self.pool)
			.await
			.map_err(|e| match e {
				sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
					DbError::Conflict(format!("User {} already exists", user.clerk_id))
				}
				_ => DbError::Sqlx(e),
			})?;

		Ok(())
	}

	#[tracing::instrument(skip(self, user), fields(clerk_id = %user.clerk_id))]
	pub async fn update_user(&self, user: &UserRecord) -> Result<u64, DbError> {
		let result = sqlx::query(&self.update_sql)
			.bind(&user.first_name)
			.bind(&user.last_name)
			.bind(&user.email)
			.bind(&user.phone_number)
			.bind(&user.clerk_id)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}
}

#[async_trait]
impl UserStore for SqliteUserStore {
	async fn insert_user(&self, user: &UserRecord) -> Result<(), DbError> {
		self.insert_user(user).await
	}

	async fn update_user(&self, user: &UserRecord) -> Result<u64, DbError> {
		self.update_user(user).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_test_store, fetch_user};
	use proptest::prelude::*;

	fn record(id: &str) -> UserRecord {
		UserRecord {
			clerk_id: id.to_string(),
			first_name: Some("Grace".to_string()),
			last_name: Some("Hopper".to_string()),
			email: "grace@example.com".to_string(),
			phone_number: None,
		}
	}

	#[tokio::test]
	async fn test_insert_then_fetch() {
		let (store, pool) = create_test_store().await;
		store.insert_user(&record("user_1")).await.unwrap();

		let row = fetch_user(&pool, "user_1").await.unwrap();
		assert_eq!(row, record("user_1"));
	}

	#[tokio::test]
	async fn test_duplicate_insert_conflicts() {
		let (store, _pool) = create_test_store().await;
		store.insert_user(&record("user_1")).await.unwrap();

		let err = store.insert_user(&record("user_1")).await.unwrap_err();
		assert!(matches!(err, DbError::Conflict(_)));
	}

	#[tokio::test]
	async fn test_update_overwrites_every_field() {
		let (store, pool) = create_test_store().await;
		store.insert_user(&record("user_1")).await.unwrap();

		let updated = UserRecord {
			clerk_id: "user_1".to_string(),
			first_name: None,
			last_name: Some("Murray Hopper".to_string()),
			email: "ghopper@example.com".to_string(),
			phone_number: Some("+15555550100".to_string()),
		};
		assert_eq!(store.update_user(&updated).await.unwrap(), 1);
		assert_eq!(fetch_user(&pool, "user_1").await.unwrap(), updated);
	}

	#[tokio::test]
	async fn test_update_unknown_id_affects_nothing() {
		let (store, pool) = create_test_store().await;
		assert_eq!(store.update_user(&record("user_missing")).await.unwrap(), 0);
		assert!(fetch_user(&pool, "user_missing").await.is_none());
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(16))]

		#[test]
		fn prop_insert_preserves_fields(
			id in "user_[A-Za-z0-9]{1,27}",
			first in proptest::option::of("[A-Za-z '-]{0,40}"),
			email in "[a-z]{1,10}@[a-z]{1,10}\\.com",
		) {
			let rt = tokio::runtime::Runtime::new().unwrap();
			rt.block_on(async {
				let (store, pool) = create_test_store().await;
				let user = UserRecord {
					clerk_id: id.clone(),
					first_name: first,
					last_name: None,
					email,
					phone_number: None,
				};
				store.insert_user(&user).await.unwrap();
				prop_assert_eq!(fetch_user(&pool, &id).await.unwrap(), user);
				Ok(())
			})?;
		}
	}
}
