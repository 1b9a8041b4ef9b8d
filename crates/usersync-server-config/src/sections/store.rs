// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User data-store configuration.
//!
//! The store URL selects the backend: `sqlite:` URLs open a local database,
//! anything else is treated as a PostgREST endpoint that authenticates with
//! the service key.

use serde::Deserialize;
use usersync_common_config::SecretString;

use crate::error::ConfigError;

const DEFAULT_TABLE: &str = "users";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
	Rest,
	Sqlite,
}

impl StoreBackend {
	pub fn as_str(&self) -> &'static str {
		match self {
			StoreBackend::Rest => "rest",
			StoreBackend::Sqlite => "sqlite",
		}
	}
}

/// Resolved store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
	pub url: String,
	/// Required for [`StoreBackend::Rest`]; ignored for SQLite.
	pub service_key: Option<SecretString>,
	pub table: String,
	pub timeout_secs: u64,
}

impl StoreConfig {
	pub fn backend(&self) -> StoreBackend {
		if self.url.starts_with("sqlite:") {
			StoreBackend::Sqlite
		} else {
			StoreBackend::Rest
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub service_key: Option<SecretString>,
	#[serde(default)]
	pub table: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}

impl StoreConfigLayer {
	pub fn merge(&mut self, other: StoreConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.service_key.is_some() {
			self.service_key = other.service_key;
		}
		if other.table.is_some() {
			self.table = other.table;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn build(self) -> Result<StoreConfig, ConfigError> {
		let url = self
			.url
			.map(|u| u.trim_end_matches('/').to_string())
			.ok_or(ConfigError::Missing {
				key: "store.url",
				hint: "USERSYNC_SERVER_STORE_URL or SUPABASE_URL",
			})?;

		let table = self.table.unwrap_or_else(|| DEFAULT_TABLE.to_string());
		if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
			return Err(ConfigError::InvalidValue {
				key: "store.table".to_string(),
				message: format!("'{table}' must be a plain identifier"),
			});
		}

		let config = StoreConfig {
			url,
			service_key: self.service_key.filter(|k| !k.expose().is_empty()),
			table,
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
		};

		if config.backend() == StoreBackend::Rest {
			if !config.url.starts_with("https://") && !config.url.starts_with("http://") {
				return Err(ConfigError::InvalidValue {
					key: "store.url".to_string(),
					message: format!("'{}' is neither an http(s) nor a sqlite URL", config.url),
				});
			}
			if config.service_key.is_none() {
				return Err(ConfigError::Missing {
					key: "store.service_key",
					hint: "USERSYNC_SERVER_STORE_SERVICE_KEY or SUPABASE_SERVICE_KEY",
				});
			}
		}

		Ok(config)
	}
}
