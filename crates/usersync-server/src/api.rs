// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Router and shared request state.

use std::sync::Arc;

use axum::{
	routing::{get, post, MethodRouter},
	Router,
};
use usersync_common_webhook::WebhookVerifier;
use usersync_server_config::StoreBackend;
use usersync_server_db::UserStore;

use crate::routes;

/// Immutable per-process state shared by every request.
#[derive(Clone)]
pub struct AppState {
	pub store: Arc<dyn UserStore>,
	pub verifier: Arc<WebhookVerifier>,
	pub store_backend: StoreBackend,
}

impl AppState {
	pub fn new(
		store: Arc<dyn UserStore>,
		verifier: WebhookVerifier,
		store_backend: StoreBackend,
	) -> Self {
		Self {
			store,
			verifier: Arc::new(verifier),
			store_backend,
		}
	}
}

/// Build the HTTP router.
///
/// The webhook is served on `/webhooks/clerk` and on `/` for deployments
/// that point the provider at the service root. Any method other than POST
/// on either path gets the plain-text 405.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/webhooks/clerk", webhook_route())
		.route("/", webhook_route())
		.with_state(state)
}

fn webhook_route() -> MethodRouter<AppState> {
	post(routes::webhooks::handle_clerk_webhook).fallback(routes::webhooks::method_not_allowed)
}
