// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;

use crate::error::DbError;

/// Create a SqlitePool with WAL mode and common settings.
///
/// In-memory databases are pinned to a single long-lived connection, since
/// every new connection would otherwise open an empty database.
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid, `DbError::Sqlx` if
/// the connection fails.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	let in_memory = database_url.contains(":memory:");

	let mut options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);
	if !in_memory {
		options = options.journal_mode(SqliteJournalMode::Wal);
	}

	let pool = if in_memory {
		SqlitePoolOptions::new()
			.max_connections(1)
			.idle_timeout(None)
			.max_lifetime(None)
			.connect_with(options)
			.await?
	} else {
		SqlitePool::connect_with(options).await?
	};

	tracing::debug!(in_memory, "database pool created");
	Ok(pool)
}

/// Create the users table if it does not exist yet.
///
/// `table` must already be validated as a plain identifier.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool, table: &str) -> Result<(), DbError> {
	let ddl = format!(
		r#"
		CREATE TABLE IF NOT EXISTS {table} (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			clerk_id TEXT NOT NULL UNIQUE,
			first_name TEXT,
			last_name TEXT,
			email TEXT NOT NULL,
			phone_number TEXT,
			created_at TEXT NOT NULL DEFAULT (datetime('now'))
		)
		"#
	);
	sqlx::query(&ddl).execute(pool).await?;

	tracing::debug!("migrations applied");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_migrations_are_idempotent() {
		let pool = create_pool("sqlite::memory:").await.unwrap();
		run_migrations(&pool, "users").await.unwrap();
		run_migrations(&pool, "users").await.unwrap();

		let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
			.fetch_one(&pool)
			.await
			.unwrap();
		assert_eq!(count.0, 0);
	}

	#[tokio::test]
	async fn test_invalid_url() {
		let err = create_pool("sqlite::memory:?mode=sideways").await.unwrap_err();
		assert!(matches!(err, DbError::Internal(_)));
	}
}
