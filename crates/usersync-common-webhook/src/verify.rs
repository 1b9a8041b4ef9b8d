// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;
use usersync_common_config::Secret;

use crate::error::VerifyError;
use crate::headers::WebhookHeaders;

type HmacSha256 = Hmac<Sha256>;

/// Prefix the provider puts in front of the base64 signing key.
pub const SECRET_PREFIX: &str = "whsec_";

/// Accepted clock skew between signer and receiver, in either direction.
pub const DEFAULT_TOLERANCE_SECS: u64 = 5 * 60;

const SIGNATURE_VERSION: &str = "v1";

/// Verifies deliveries signed with one shared secret.
///
/// Cheap to clone; holds the decoded key and the timestamp tolerance only.
#[derive(Clone)]
pub struct WebhookVerifier {
	key: Secret<Vec<u8>>,
	tolerance: Duration,
}

impl fmt::Debug for WebhookVerifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebhookVerifier")
			.field("key", &self.key)
			.field("tolerance", &self.tolerance)
			.finish()
	}
}

impl WebhookVerifier {
	/// Build a verifier from a `whsec_<base64>` secret. The prefix is optional.
	pub fn new(secret: &str) -> Result<Self, VerifyError> {
		let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
		let key = STANDARD
			.decode(encoded)
			.map_err(|e| VerifyError::InvalidSecret(e.to_string()))?;

		if key.is_empty() {
			return Err(VerifyError::InvalidSecret("secret is empty".to_string()));
		}

		Ok(Self {
			key: Secret::new(key),
			tolerance: Duration::from_secs(DEFAULT_TOLERANCE_SECS),
		})
	}

	pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
		self.tolerance = tolerance;
		self
	}

	/// Verify `body` against `headers` using the system clock.
	pub fn verify(&self, headers: &WebhookHeaders<'_>, body: &[u8]) -> Result<(), VerifyError> {
		self.verify_at(headers, body, chrono::Utc::now().timestamp())
	}

	/// Verify `body` against `headers` as if the current time were `now`
	/// (Unix seconds).
	///
	/// The timestamp window is checked before any HMAC work. `body` must be
	/// the exact bytes received; re-serialized JSON will not verify.
	pub fn verify_at(
		&self,
		headers: &WebhookHeaders<'_>,
		body: &[u8],
		now: i64,
	) -> Result<(), VerifyError> {
		let timestamp = self.check_timestamp(headers.timestamp, now)?;
		let expected = self.signature_bytes(headers.id, timestamp, body);

		let matched = headers
			.signature
			.split_whitespace()
			.filter_map(|entry| entry.split_once(','))
			.filter(|(version, _)| *version == SIGNATURE_VERSION)
			.filter_map(|(_, encoded)| STANDARD.decode(encoded).ok())
			.any(|candidate| bool::from(candidate.as_slice().ct_eq(expected.as_slice())));

		if matched {
			debug!(msg_id = headers.id, "webhook signature verified");
			Ok(())
		} else {
			debug!(msg_id = headers.id, "webhook signature did not match");
			Err(VerifyError::NoMatchingSignature)
		}
	}

	/// Produce the `v1,<base64>` header value for a message.
	pub fn sign(&self, msg_id: &str, timestamp: i64, body: &[u8]) -> String {
		let signature = self.signature_bytes(msg_id, timestamp, body);
		format!("{SIGNATURE_VERSION},{}", STANDARD.encode(signature))
	}

	fn check_timestamp(&self, raw: &str, now: i64) -> Result<i64, VerifyError> {
		let timestamp: i64 = raw
			.trim()
			.parse()
			.map_err(|_| VerifyError::InvalidTimestamp)?;
		let tolerance = i64::try_from(self.tolerance.as_secs()).unwrap_or(i64::MAX);

		if now.saturating_sub(timestamp) > tolerance {
			debug!(timestamp, now, "webhook timestamp outside tolerance (too old)");
			return Err(VerifyError::TimestampTooOld);
		}
		if timestamp.saturating_sub(now) > tolerance {
			debug!(timestamp, now, "webhook timestamp outside tolerance (too new)");
			return Err(VerifyError::TimestampTooNew);
		}

		Ok(timestamp)
	}

	fn signature_bytes(&self, msg_id: &str, timestamp: i64, body: &[u8]) -> Vec<u8> {
		let mut mac =
			HmacSha256::new_from_slice(self.key.expose()).expect("HMAC can take key of any size");
		mac.update(msg_id.as_bytes());
		mac.update(b".");
		mac.update(timestamp.to_string().as_bytes());
		mac.update(b".");
		mac.update(body);
		mac.finalize().into_bytes().to_vec()
	}
}
