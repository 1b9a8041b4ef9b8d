// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

/// One row of the users table, keyed by the identity provider's user id.
///
/// Serializes with `null` for absent names and phone numbers so an update
/// overwrites every column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
	pub clerk_id: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub email: String,
	pub phone_number: Option<String>,
}
