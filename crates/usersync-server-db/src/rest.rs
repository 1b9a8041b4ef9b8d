// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! PostgREST-backed user store.
//!
//! Talks to `{url}/rest/v1/{table}` with the service key sent as both the
//! `apikey` header and a bearer token. Each operation is a single request;
//! failures are reported to the caller, never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderValue, Client, RequestBuilder, Response, StatusCode};
use usersync_common_config::SecretString;
use usersync_server_config::StoreConfig;

use crate::error::DbError;
use crate::store::UserStore;
use crate::types::UserRecord;

const PREFER_INSERT: &str = "return=minimal";
const PREFER_UPDATE: &str = "return=minimal, count=exact";

/// Longest response body echoed into an error message.
const MAX_ERROR_BODY: usize = 512;

#[derive(Clone)]
pub struct RestUserStore {
	client: Client,
	endpoint: String,
	service_key: SecretString,
}

impl std::fmt::Debug for RestUserStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RestUserStore")
			.field("endpoint", &self.endpoint)
			.field("service_key", &self.service_key)
			.finish()
	}
}

impl RestUserStore {
	/// Build a store from resolved configuration.
	///
	/// # Errors
	/// Returns `DbError::Internal` if no service key is configured and
	/// `DbError::Http` if the HTTP client cannot be constructed.
	pub fn from_config(config: &StoreConfig) -> Result<Self, DbError> {
		let service_key = config
			.service_key
			.clone()
			.ok_or_else(|| DbError::Internal("REST store requires a service key".to_string()))?;

		let client = Client::builder()
			.user_agent(user_agent())
			.timeout(Duration::from_secs(config.timeout_secs))
			.build()?;

		Ok(Self::new(client, &config.url, &config.table, service_key))
	}

	pub fn new(client: Client, base_url: &str, table: &str, service_key: SecretString) -> Self {
		Self {
			client,
			endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
			service_key,
		}
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
		request
			.header("apikey", self.service_key.expose().as_str())
			.bearer_auth(self.service_key.expose())
	}

	#[tracing::instrument(skip(self, user), fields(clerk_id = %user.clerk_id))]
	pub async fn insert_user(&self, user: &UserRecord) -> Result<(), DbError> {
		let response = self
			.authorized(self.client.post(&self.endpoint))
			.header("Prefer", PREFER_INSERT)
			.json(user)
			.send()
			.await?;

		check_status(response).await?;
		tracing::debug!("user row inserted");
		Ok(())
	}

	#[tracing::instrument(skip(self, user), fields(clerk_id = %user.clerk_id))]
	pub async fn update_user(&self, user: &UserRecord) -> Result<u64, DbError> {
		let filter = format!("eq.{}", user.clerk_id);
		let response = self
			.authorized(self.client.patch(&self.endpoint))
			.query(&[("clerk_id", filter.as_str())])
			.header("Prefer", PREFER_UPDATE)
			.json(user)
			.send()
			.await?;

		let response = check_status(response).await?;
		let rows = response
			.headers()
			.get(reqwest::header::CONTENT_RANGE)
			.and_then(parse_content_range_total);

		match rows {
			Some(rows) => Ok(rows),
			None => {
				tracing::debug!("store did not report an affected row count");
				Ok(0)
			}
		}
	}
}

#[async_trait]
impl UserStore for RestUserStore {
	async fn insert_user(&self, user: &UserRecord) -> Result<(), DbError> {
		self.insert_user(user).await
	}

	async fn update_user(&self, user: &UserRecord) -> Result<u64, DbError> {
		self.update_user(user).await
	}
}

async fn check_status(response: Response) -> Result<Response, DbError> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	let mut message = response.text().await.unwrap_or_default();
	if message.len() > MAX_ERROR_BODY {
		let mut cut = MAX_ERROR_BODY;
		while !message.is_char_boundary(cut) {
			cut -= 1;
		}
		message.truncate(cut);
	}

	if status == StatusCode::CONFLICT {
		return Err(DbError::Conflict(message));
	}

	Err(DbError::Rejected {
		status: status.as_u16(),
		message,
	})
}

/// `Content-Range: 0-0/1` or `*/0` carries the total after the slash.
fn parse_content_range_total(value: &HeaderValue) -> Option<u64> {
	let (_, total) = value.to_str().ok()?.rsplit_once('/')?;
	total.trim().parse().ok()
}

fn user_agent() -> String {
	format!("usersync/{}", env!("CARGO_PKG_VERSION"))
}
