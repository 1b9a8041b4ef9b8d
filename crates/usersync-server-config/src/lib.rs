// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for usersync-server.
//!
//! Settings come from built-in defaults, an optional TOML file and the
//! process environment, merged in that order. Secrets stay wrapped in
//! [`usersync_common_config::SecretString`] and never reach the log output.

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::{
	HttpConfig, LoggingConfig, StoreBackend, StoreConfig, WebhookConfig,
};
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub store: StoreConfig,
	pub webhook: WebhookConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`USERSYNC_SERVER_*` and the legacy names)
/// 2. Config file (`/etc/usersync/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let store = layer.store.unwrap_or_default().build()?;
	let webhook = layer.webhook.unwrap_or_default().build()?;

	if http.host.trim().is_empty() {
		return Err(ConfigError::Validation("http.host must not be empty".to_string()));
	}

	info!(
		host = %http.host,
		port = http.port,
		store_backend = store.backend().as_str(),
		store_table = %store.table,
		store_timeout_secs = store.timeout_secs,
		webhook_tolerance_secs = webhook.tolerance_secs,
		log_json = logging.json,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		store,
		webhook,
		logging,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	fn write_toml(content: &str) -> NamedTempFile {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	fn load_file_only(file: &NamedTempFile) -> Result<ServerConfig, ConfigError> {
		load_from_sources(vec![
			Box::new(TomlSource::new(file.path())),
			Box::new(DefaultsSource),
		])
	}

	#[test]
	fn test_full_toml_config() {
		let file = write_toml(
			r#"
[http]
host = "127.0.0.1"
port = 3001

[store]
url = "https://project.supabase.co/"
service_key = "service-role"
table = "profiles"
timeout_secs = 5

[webhook]
secret = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw"

[logging]
level = "debug"
json = true
"#,
		);

		let config = load_file_only(&file).unwrap();
		assert_eq!(config.socket_addr(), "127.0.0.1:3001");
		assert_eq!(config.store.url, "https://project.supabase.co");
		assert_eq!(config.store.backend(), StoreBackend::Rest);
		assert_eq!(config.store.table, "profiles");
		assert_eq!(config.store.timeout_secs, 5);
		assert_eq!(config.webhook.tolerance_secs, 300);
		assert_eq!(config.logging.level, "debug");
		assert!(config.logging.json);
	}

	#[test]
	fn test_missing_webhook_secret_fails() {
		let file = write_toml(
			r#"
[store]
url = "sqlite::memory:"
"#,
		);
		let err = load_file_only(&file).unwrap_err();
		assert!(matches!(
			err,
			ConfigError::Missing {
				key: "webhook.secret",
				..
			}
		));
	}

	#[test]
	fn test_missing_store_fails() {
		let file = write_toml(
			r#"
[webhook]
secret = "whsec_abc"
"#,
		);
		assert!(matches!(
			load_file_only(&file).unwrap_err(),
			ConfigError::Missing { key: "store.url", .. }
		));
	}

	#[test]
	fn test_blank_host_rejected() {
		let file = write_toml(
			r#"
[http]
host = "  "

[store]
url = "sqlite::memory:"

[webhook]
secret = "whsec_abc"
"#,
		);
		assert!(matches!(
			load_file_only(&file).unwrap_err(),
			ConfigError::Validation(_)
		));
	}

	#[test]
	fn test_debug_output_has_no_secrets() {
		let file = write_toml(
			r#"
[store]
url = "https://project.supabase.co"
service_key = "super-secret-service-role"

[webhook]
secret = "whsec_top_secret_value"
"#,
		);
		let config = load_file_only(&file).unwrap();
		let out = format!("{config:?}");
		assert!(!out.contains("super-secret-service-role"));
		assert!(!out.contains("whsec_top_secret_value"));
	}
}
