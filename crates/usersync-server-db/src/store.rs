// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::DbError;
use crate::types::UserRecord;

/// Write side of the users table.
///
/// Uniqueness of `clerk_id` is left to the backing schema: `insert_user`
/// never checks for an existing row and surfaces the store's conflict.
#[async_trait]
pub trait UserStore: Send + Sync {
	async fn insert_user(&self, user: &UserRecord) -> Result<(), DbError>;

	/// Overwrite every column of the row whose `clerk_id` matches.
	/// Returns the number of rows changed; zero is not an error.
	async fn update_user(&self, user: &UserRecord) -> Result<u64, DbError>;
}
