// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use crate::error::VerifyError;

pub const HEADER_ID: &str = "svix-id";
pub const HEADER_TIMESTAMP: &str = "svix-timestamp";
pub const HEADER_SIGNATURE: &str = "svix-signature";

/// The three signature headers of one delivery, borrowed from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookHeaders<'a> {
	pub id: &'a str,
	pub timestamp: &'a str,
	pub signature: &'a str,
}

impl<'a> WebhookHeaders<'a> {
	pub fn new(id: &'a str, timestamp: &'a str, signature: &'a str) -> Self {
		Self {
			id,
			timestamp,
			signature,
		}
	}

	/// Collect the headers through `lookup`, which maps a header name to its
	/// value. Absent and empty values are both reported as missing.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, VerifyError>
	where
		F: Fn(&'static str) -> Option<&'a str>,
	{
		let get = |name: &'static str| {
			lookup(name)
				.filter(|v| !v.is_empty())
				.ok_or(VerifyError::MissingHeader(name))
		};

		Ok(Self {
			id: get(HEADER_ID)?,
			timestamp: get(HEADER_TIMESTAMP)?,
			signature: get(HEADER_SIGNATURE)?,
		})
	}
}
