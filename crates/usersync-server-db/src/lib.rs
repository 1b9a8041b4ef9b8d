// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # usersync-server-db
//!
//! Persistence for synchronized user rows.
//!
//! The [`UserStore`] trait is the only thing the HTTP layer sees. Two
//! implementations exist:
//!
//! | Store | Selected when | Notes |
//! |-------|---------------|-------|
//! | [`RestUserStore`] | store URL is `http(s)://` | PostgREST endpoint, service-key auth |
//! | [`SqliteUserStore`] | store URL starts with `sqlite:` | local development, WAL mode |
//!
//! Use [`connect_store`] to build the configured one once at startup and
//! share it as `Arc<dyn UserStore>`.
//!
//! ## Error Handling
//!
//! | Variant | When |
//! |---------|------|
//! | `Conflict` | A row with the same `clerk_id` already exists |
//! | `Rejected` | The REST endpoint answered with a non-2xx status |
//! | `Http` | The REST request could not be sent or timed out |
//! | `Sqlx` | Any other SQLite failure |

pub mod error;
pub mod pool;
pub mod rest;
pub mod sqlite;
pub mod store;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use error::{DbError, Result};
pub use pool::{create_pool, run_migrations};
pub use rest::RestUserStore;
pub use sqlite::SqliteUserStore;
pub use store::UserStore;
pub use types::UserRecord;

use std::sync::Arc;

use usersync_server_config::{StoreBackend, StoreConfig};

/// Build the store selected by `config`.
///
/// For SQLite this opens the pool and creates the users table.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn UserStore>> {
	match config.backend() {
		StoreBackend::Rest => {
			let store = RestUserStore::from_config(config)?;
			tracing::info!(endpoint = %store.endpoint(), "using REST user store");
			Ok(Arc::new(store))
		}
		StoreBackend::Sqlite => {
			let pool = create_pool(&config.url).await?;
			run_migrations(&pool, &config.table).await?;
			tracing::info!(table = %config.table, "using SQLite user store");
			Ok(Arc::new(SqliteUserStore::new(pool, &config.table)))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(url: &str) -> StoreConfig {
		StoreConfig {
			url: url.to_string(),
			service_key: Some("service-key".into()),
			table: "users".to_string(),
			timeout_secs: 5,
		}
	}

	#[tokio::test]
	async fn test_connect_sqlite_store_is_usable() {
		let store = connect_store(&config("sqlite::memory:")).await.unwrap();
		let user = UserRecord {
			clerk_id: "user_1".to_string(),
			first_name: None,
			last_name: None,
			email: "a@example.com".to_string(),
			phone_number: None,
		};
		store.insert_user(&user).await.unwrap();
		assert_eq!(store.update_user(&user).await.unwrap(), 1);
	}

	#[tokio::test]
	async fn test_connect_rest_store() {
		assert!(connect_store(&config("https://abc.supabase.co")).await.is_ok());
	}
}
