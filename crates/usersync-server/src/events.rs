// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Inbound event envelope and user payload.
//!
//! Parsing happens in two steps: the `{ type, data }` envelope first, then
//! `data` against [`ClerkUser`] only for the event types that are handled.
//! An unhandled type is reported as such whatever its payload looks like,
//! and so is a `type` that is absent or not a string. Only a body that is
//! not JSON at all fails outright.

use serde::Deserialize;
use usersync_server_db::UserRecord;

use crate::error::WebhookError;

pub const USER_CREATED: &str = "user.created";
pub const USER_CREATED_AT_EDGE: &str = "user.createdAtEdge";
pub const USER_UPDATED: &str = "user.updated";

#[derive(Debug, Default, Deserialize)]
struct Envelope {
	#[serde(rename = "type", default)]
	event_type: serde_json::Value,
	#[serde(default)]
	data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
	UserCreated(ClerkUser),
	UserUpdated(ClerkUser),
	Unsupported(String),
}

impl WebhookEvent {
	/// Parse a verified request body.
	///
	/// # Errors
	/// `WebhookError::UndecodableBody` if the body is not JSON, and
	/// `WebhookError::InvalidPayload` if a handled event carries a malformed
	/// user object.
	pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
		let value: serde_json::Value = serde_json::from_slice(body)
			.map_err(|e| WebhookError::UndecodableBody(e.to_string()))?;
		// Arrays, scalars and null carry no type.
		let envelope: Envelope = serde_json::from_value(value).unwrap_or_default();

		let Some(event_type) = envelope.event_type.as_str() else {
			return Ok(WebhookEvent::Unsupported(envelope.event_type.to_string()));
		};

		let user = |data: serde_json::Value| {
			serde_json::from_value::<ClerkUser>(data)
				.map_err(|e| WebhookError::InvalidPayload(format!("user payload: {e}")))
		};

		match event_type {
			USER_CREATED | USER_CREATED_AT_EDGE => Ok(WebhookEvent::UserCreated(user(envelope.data)?)),
			USER_UPDATED => Ok(WebhookEvent::UserUpdated(user(envelope.data)?)),
			other => Ok(WebhookEvent::Unsupported(other.to_string())),
		}
	}

	pub fn event_type(&self) -> &str {
		match self {
			WebhookEvent::UserCreated(_) => USER_CREATED,
			WebhookEvent::UserUpdated(_) => USER_UPDATED,
			WebhookEvent::Unsupported(t) => t,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailAddress {
	pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhoneNumber {
	#[serde(default)]
	pub phone_number: String,
}

/// User object as sent by the identity provider. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClerkUser {
	#[serde(default)]
	pub id: String,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	#[serde(default)]
	pub email_addresses: Option<Vec<EmailAddress>>,
	#[serde(default)]
	pub phone_numbers: Option<Vec<PhoneNumber>>,
}

impl ClerkUser {
	/// Map to the persisted row: first email, first phone number if any.
	/// An empty phone number is stored as absent.
	///
	/// # Errors
	/// `WebhookError::InvalidPayload` when `id` is empty or there is no
	/// email address.
	pub fn to_record(&self) -> Result<UserRecord, WebhookError> {
		if self.id.trim().is_empty() {
			return Err(WebhookError::InvalidPayload("user id is missing".to_string()));
		}

		let email = self
			.email_addresses
			.as_deref()
			.and_then(|list| list.first())
			.map(|e| e.email_address.clone())
			.ok_or_else(|| {
				WebhookError::InvalidPayload(format!("user {} has no email address", self.id))
			})?;

		let phone_number = self
			.phone_numbers
			.as_deref()
			.and_then(|list| list.first())
			.map(|p| p.phone_number.clone())
			.filter(|p| !p.is_empty());

		Ok(UserRecord {
			clerk_id: self.id.clone(),
			first_name: self.first_name.clone(),
			last_name: self.last_name.clone(),
			email,
			phone_number,
		})
	}
}
