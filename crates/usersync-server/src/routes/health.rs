// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Liveness endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{api::AppState, version::BuildInfo};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub timestamp: String,
	pub version: BuildInfo,
	pub store: &'static str,
}

/// GET /health - reports liveness and the configured store backend.
///
/// The store is not probed.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "ok",
		timestamp: chrono::Utc::now().to_rfc3339(),
		version: BuildInfo::current(),
		store: state.store_backend.as_str(),
	})
}
