// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Signed-webhook verification using the Svix scheme.
//!
//! The identity provider delivers webhooks through Svix. Every delivery
//! carries three headers:
//!
//! - `svix-id`: unique message identifier
//! - `svix-timestamp`: Unix seconds at which the message was signed
//! - `svix-signature`: space-separated `v1,<base64>` signatures
//!
//! The signature is HMAC-SHA256 over `"{id}.{timestamp}.{body}"`, keyed with
//! the base64-decoded part of the `whsec_...` signing secret. Deliveries whose
//! timestamp is more than the tolerance away from the local clock are
//! rejected to limit replay.
//!
//! ```
//! use usersync_common_webhook::{WebhookHeaders, WebhookVerifier};
//!
//! let verifier = WebhookVerifier::new("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw").unwrap();
//! let body = br#"{"type":"user.created","data":{}}"#;
//! let signature = verifier.sign("msg_1", 1_700_000_000, body);
//!
//! let headers = WebhookHeaders::new("msg_1", "1700000000", &signature);
//! assert!(verifier.verify_at(&headers, body, 1_700_000_010).is_ok());
//! ```

mod error;
mod headers;
mod verify;

pub use error::VerifyError;
pub use headers::{WebhookHeaders, HEADER_ID, HEADER_SIGNATURE, HEADER_TIMESTAMP};
pub use verify::{WebhookVerifier, DEFAULT_TOLERANCE_SECS, SECRET_PREFIX};
