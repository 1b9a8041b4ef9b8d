// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP server that mirrors identity-provider users into a data store.
//!
//! A signed `user.created` / `user.updated` delivery becomes one insert or
//! one update in the configured [`usersync_server_db::UserStore`].

pub mod api;
pub mod error;
pub mod events;
pub mod routes;
pub mod version;

pub use api::{create_router, AppState};
pub use error::{ErrorKind, WebhookError};
pub use events::{ClerkUser, WebhookEvent};

use std::time::Duration;

use usersync_common_webhook::{VerifyError, WebhookVerifier};
use usersync_server_config::ServerConfig;
use usersync_server_db::{connect_store, DbError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
	#[error("invalid webhook secret: {0}")]
	WebhookSecret(#[from] VerifyError),

	#[error("failed to open user store: {0}")]
	Store(#[from] DbError),
}

/// Build the shared state from resolved configuration.
///
/// Fails when the signing secret does not decode or the store cannot be
/// opened, so a misconfigured server never starts accepting deliveries.
pub async fn create_app_state(config: &ServerConfig) -> Result<AppState, StartupError> {
	let verifier = WebhookVerifier::new(config.webhook.secret.expose())?
		.with_tolerance(Duration::from_secs(config.webhook.tolerance_secs));
	let store = connect_store(&config.store).await?;

	Ok(AppState::new(store, verifier, config.store.backend()))
}
