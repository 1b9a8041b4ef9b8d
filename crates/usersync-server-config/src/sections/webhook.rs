// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Inbound webhook configuration.

use serde::Deserialize;
use usersync_common_config::SecretString;

use crate::error::ConfigError;

const DEFAULT_TOLERANCE_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct WebhookConfig {
	/// `whsec_...` signing secret from the identity provider's dashboard.
	pub secret: SecretString,
	/// Allowed distance between `svix-timestamp` and the local clock.
	pub tolerance_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookConfigLayer {
	#[serde(default)]
	pub secret: Option<SecretString>,
	#[serde(default)]
	pub tolerance_secs: Option<u64>,
}

impl WebhookConfigLayer {
	pub fn merge(&mut self, other: WebhookConfigLayer) {
		if other.secret.is_some() {
			self.secret = other.secret;
		}
		if other.tolerance_secs.is_some() {
			self.tolerance_secs = other.tolerance_secs;
		}
	}

	pub fn build(self) -> Result<WebhookConfig, ConfigError> {
		let secret = self
			.secret
			.filter(|s| !s.expose().trim().is_empty())
			.ok_or(ConfigError::Missing {
				key: "webhook.secret",
				hint: "USERSYNC_SERVER_WEBHOOK_SECRET or CLERK_WEBHOOK_SECRET",
			})?;

		let tolerance_secs = self.tolerance_secs.unwrap_or(DEFAULT_TOLERANCE_SECS);
		if tolerance_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "webhook.tolerance_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		Ok(WebhookConfig {
			secret,
			tolerance_secs,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_secret_required() {
		let err = WebhookConfigLayer::default().build().unwrap_err();
		assert!(matches!(
			err,
			ConfigError::Missing {
				key: "webhook.secret",
				..
			}
		));
	}

	#[test]
	fn test_default_tolerance() {
		let config = WebhookConfigLayer {
			secret: Some("whsec_abc".into()),
			tolerance_secs: None,
		}
		.build()
		.unwrap();
		assert_eq!(config.tolerance_secs, 300);
		assert_eq!(config.secret.expose(), "whsec_abc");
	}

	#[test]
	fn test_zero_tolerance_rejected() {
		let layer = WebhookConfigLayer {
			secret: Some("whsec_abc".into()),
			tolerance_secs: Some(0),
		};
		assert!(matches!(
			layer.build().unwrap_err(),
			ConfigError::InvalidValue { .. }
		));
	}
}
