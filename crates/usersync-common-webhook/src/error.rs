// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Reasons a delivery fails verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
	/// The signing secret is not valid base64 (after the optional `whsec_` prefix).
	#[error("invalid webhook secret: {0}")]
	InvalidSecret(String),

	/// A required header was absent or empty.
	#[error("missing header: {0}")]
	MissingHeader(&'static str),

	/// `svix-timestamp` is not an integer.
	#[error("invalid timestamp header")]
	InvalidTimestamp,

	/// Signed further in the past than the tolerance allows.
	#[error("message timestamp too old")]
	TimestampTooOld,

	/// Signed further in the future than the tolerance allows.
	#[error("message timestamp too new")]
	TimestampTooNew,

	/// No `v1` entry in `svix-signature` matched.
	#[error("no matching signature found")]
	NoMatchingSignature,
}
