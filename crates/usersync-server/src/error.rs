// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Webhook rejection reasons and their HTTP mapping.
//!
//! Response bodies are plain text and stable; the identity provider's
//! delivery dashboard shows them verbatim.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use usersync_common_webhook::VerifyError;
use usersync_server_db::DbError;

pub const BODY_METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
pub const BODY_MISSING_HEADERS: &str = "Error occured -- no svix headers";
pub const BODY_INVALID_SIGNATURE: &str = "Error occured -- invalid signature";
pub const BODY_UNSUPPORTED_EVENT: &str = "Event type not supported";
pub const BODY_HANDLING_FAILED: &str = "Error occured -- during event handling";
pub const BODY_PROCESSED: &str = "Webhook processed";

/// Failure category, used by tests and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Transport,
	Auth,
	Rejected,
	Validation,
	Downstream,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::Transport => "transport",
			ErrorKind::Auth => "auth",
			ErrorKind::Rejected => "rejected",
			ErrorKind::Validation => "validation",
			ErrorKind::Downstream => "downstream",
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
	#[error("method not allowed")]
	MethodNotAllowed,

	#[error("missing svix headers")]
	MissingHeaders,

	#[error("invalid signature: {0}")]
	InvalidSignature(#[source] VerifyError),

	#[error("undecodable body: {0}")]
	UndecodableBody(String),

	#[error("unsupported event type: {0}")]
	UnsupportedEvent(String),

	#[error("invalid payload: {0}")]
	InvalidPayload(String),

	#[error("store error: {0}")]
	Store(#[from] DbError),
}

impl WebhookError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			WebhookError::MethodNotAllowed => ErrorKind::Transport,
			WebhookError::MissingHeaders
			| WebhookError::InvalidSignature(_)
			| WebhookError::UndecodableBody(_) => ErrorKind::Auth,
			WebhookError::UnsupportedEvent(_) => ErrorKind::Rejected,
			WebhookError::InvalidPayload(_) => ErrorKind::Validation,
			WebhookError::Store(_) => ErrorKind::Downstream,
		}
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			WebhookError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
			_ => StatusCode::BAD_REQUEST,
		}
	}

	pub fn body(&self) -> &'static str {
		match self {
			WebhookError::MethodNotAllowed => BODY_METHOD_NOT_ALLOWED,
			WebhookError::MissingHeaders => BODY_MISSING_HEADERS,
			WebhookError::InvalidSignature(_) | WebhookError::UndecodableBody(_) => {
				BODY_INVALID_SIGNATURE
			}
			WebhookError::UnsupportedEvent(_) => BODY_UNSUPPORTED_EVENT,
			WebhookError::InvalidPayload(_) | WebhookError::Store(_) => BODY_HANDLING_FAILED,
		}
	}
}

impl IntoResponse for WebhookError {
	fn into_response(self) -> Response {
		(self.status_code(), self.body()).into_response()
	}
}
