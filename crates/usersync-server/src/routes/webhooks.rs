// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity-provider webhook receiver.
//!
//! Each delivery goes through four gates in order: the signing headers are
//! present, the signature over the raw body verifies, the event type is
//! one we handle, and the store accepts the write. The first gate to fail
//! decides the response and is the only place that logs the failure.
//!
//! A body that cannot be buffered (over the size limit, or a broken
//! stream) fails after the header gate with the handling-error response,
//! so the route never answers with anything but 405, 400 or 200.

use axum::{
	body::Bytes,
	extract::{rejection::BytesRejection, State},
	http::HeaderMap,
};
use usersync_common_webhook::WebhookHeaders;
use usersync_server_db::UserRecord;

use crate::{
	api::AppState,
	error::{WebhookError, BODY_PROCESSED},
	events::{ClerkUser, WebhookEvent},
};

/// POST /webhooks/clerk - verify and apply one user lifecycle event.
pub async fn handle_clerk_webhook(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Result<Bytes, BytesRejection>,
) -> Result<&'static str, WebhookError> {
	let svix = WebhookHeaders::from_lookup(|name| {
		headers.get(name).and_then(|v| v.to_str().ok())
	})
	.map_err(|e| {
		tracing::warn!(error = %e, "clerk_webhook: missing svix headers");
		WebhookError::MissingHeaders
	})?;

	let body = body.map_err(|e| {
		tracing::warn!(msg_id = %svix.id, error = %e, "clerk_webhook: failed to read body");
		WebhookError::InvalidPayload(format!("request body: {e}"))
	})?;

	if let Err(e) = state.verifier.verify(&svix, &body) {
		tracing::warn!(
			msg_id = %svix.id,
			timestamp = %svix.timestamp,
			error = %e,
			"clerk_webhook: signature verification failed"
		);
		return Err(WebhookError::InvalidSignature(e));
	}

	let event = WebhookEvent::parse(&body).map_err(|e| {
		tracing::warn!(msg_id = %svix.id, error = %e, "clerk_webhook: malformed event body");
		e
	})?;

	tracing::debug!(msg_id = %svix.id, event_type = %event.event_type(), "clerk_webhook: received event");

	match event {
		WebhookEvent::UserCreated(user) => {
			let record = user_record(svix.id, &user)?;
			state.store.insert_user(&record).await.map_err(|e| {
				tracing::error!(
					msg_id = %svix.id,
					clerk_id = %record.clerk_id,
					error = %e,
					"clerk_webhook: failed to insert user"
				);
				WebhookError::Store(e)
			})?;
			tracing::info!(
				msg_id = %svix.id,
				clerk_id = %record.clerk_id,
				first_name = ?record.first_name,
				last_name = ?record.last_name,
				email = %record.email,
				phone_number = ?record.phone_number,
				"clerk_webhook: user created"
			);
		}
		WebhookEvent::UserUpdated(user) => {
			let record = user_record(svix.id, &user)?;
			let rows_affected = state.store.update_user(&record).await.map_err(|e| {
				tracing::error!(
					msg_id = %svix.id,
					clerk_id = %record.clerk_id,
					error = %e,
					"clerk_webhook: failed to update user"
				);
				WebhookError::Store(e)
			})?;
			tracing::info!(
				msg_id = %svix.id,
				clerk_id = %record.clerk_id,
				first_name = ?record.first_name,
				last_name = ?record.last_name,
				email = %record.email,
				phone_number = ?record.phone_number,
				rows_affected,
				"clerk_webhook: user updated"
			);
		}
		WebhookEvent::Unsupported(event_type) => {
			tracing::debug!(msg_id = %svix.id, event_type = %event_type, "clerk_webhook: ignoring event");
			return Err(WebhookError::UnsupportedEvent(event_type));
		}
	}

	Ok(BODY_PROCESSED)
}

/// Fallback for non-POST methods on the webhook paths.
pub async fn method_not_allowed() -> WebhookError {
	WebhookError::MethodNotAllowed
}

fn user_record(msg_id: &str, user: &ClerkUser) -> Result<UserRecord, WebhookError> {
	user.to_record().map_err(|e| {
		tracing::warn!(msg_id = %msg_id, clerk_id = %user.id, error = %e, "clerk_webhook: invalid user payload");
		e
	})
}
