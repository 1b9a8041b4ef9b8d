// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file, the environment.

use std::path::PathBuf;

use tracing::{debug, trace};
use usersync_common_config::{load_secret_env, SecretString};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{HttpConfigLayer, LoggingConfigLayer, StoreConfigLayer, WebhookConfigLayer};

/// Higher precedence overrides lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub const SYSTEM_PATH: &'static str = "/etc/usersync/server.toml";

	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(Self::SYSTEM_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::FileRead {
			path: self.path.clone(),
			source,
		})?;

		let layer = toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
			path: self.path.clone(),
			source,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment source.
///
/// Convention: `USERSYNC_SERVER_<SECTION>_<FIELD>`. The store and webhook
/// settings also accept the variable names used by the earlier worker
/// deployment (`SUPABASE_URL`, `SUPABASE_SERVICE_KEY`, `CLERK_WEBHOOK_SECRET`).
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: env_var("USERSYNC_SERVER_HOST"),
				port: env_parse("USERSYNC_SERVER_PORT")?,
			}),
			store: Some(StoreConfigLayer {
				url: env_var("USERSYNC_SERVER_STORE_URL").or_else(|| env_var("SUPABASE_URL")),
				service_key: secret_with_fallback(
					"USERSYNC_SERVER_STORE_SERVICE_KEY",
					"SUPABASE_SERVICE_KEY",
				)?,
				table: env_var("USERSYNC_SERVER_STORE_TABLE"),
				timeout_secs: env_parse("USERSYNC_SERVER_STORE_TIMEOUT_SECS")?,
			}),
			webhook: Some(WebhookConfigLayer {
				secret: secret_with_fallback("USERSYNC_SERVER_WEBHOOK_SECRET", "CLERK_WEBHOOK_SECRET")?,
				tolerance_secs: env_parse("USERSYNC_SERVER_WEBHOOK_TOLERANCE_SECS")?,
			}),
			logging: Some(LoggingConfigLayer {
				level: env_var("USERSYNC_SERVER_LOG_LEVEL"),
				json: env_bool("USERSYNC_SERVER_LOG_JSON"),
			}),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("cannot parse '{v}'"),
		}),
		None => Ok(None),
	}
}

fn secret_with_fallback(
	primary: &str,
	fallback: &str,
) -> Result<Option<SecretString>, ConfigError> {
	let load = |var: &str| load_secret_env(var).map_err(|e| ConfigError::Secret(e.to_string()));
	match load(primary)? {
		Some(secret) => Ok(Some(secret)),
		None => load(fallback),
	}
}
