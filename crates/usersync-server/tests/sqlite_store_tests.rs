// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Full-stack tests: configuration to router to an in-memory SQLite store.

use axum::{
	body::Body,
	http::{Method, Request, StatusCode},
	Router,
};
use serde_json::json;
use tower::ServiceExt;
use usersync_common_webhook::{WebhookVerifier, HEADER_ID, HEADER_SIGNATURE, HEADER_TIMESTAMP};
use usersync_server::{create_app_state, create_router, StartupError};
use usersync_server_config::{HttpConfig, LoggingConfig, ServerConfig, StoreConfig, WebhookConfig};

const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

fn config(secret: &str) -> ServerConfig {
	ServerConfig {
		http: HttpConfig::default(),
		store: StoreConfig {
			url: "sqlite::memory:".to_string(),
			service_key: None,
			table: "users".to_string(),
			timeout_secs: 10,
		},
		webhook: WebhookConfig {
			secret: secret.into(),
			tolerance_secs: 300,
		},
		logging: LoggingConfig::default(),
	}
}

async fn app() -> Router {
	create_router(create_app_state(&config(SECRET)).await.unwrap())
}

fn delivery(msg_id: &str, event_type: &str, email: &str) -> Request<Body> {
	let body = json!({
		"type": event_type,
		"data": {
			"id": "user_2NNEqL2nrIRdJ194ndJqAHwEfxC",
			"first_name": "Jane",
			"last_name": "Doe",
			"email_addresses": [{ "email_address": email }],
			"phone_numbers": []
		}
	})
	.to_string();
	let ts = chrono::Utc::now().timestamp();
	let signature = WebhookVerifier::new(SECRET)
		.unwrap()
		.sign(msg_id, ts, body.as_bytes());

	Request::builder()
		.method(Method::POST)
		.uri("/webhooks/clerk")
		.header(HEADER_ID, msg_id)
		.header(HEADER_TIMESTAMP, ts.to_string())
		.header(HEADER_SIGNATURE, signature)
		.body(Body::from(body))
		.unwrap()
}

#[tokio::test]
async fn test_create_update_and_replay_against_sqlite() {
	let app = app().await;

	let created = app
		.clone()
		.oneshot(delivery("msg_1", "user.created", "jane@example.com"))
		.await
		.unwrap();
	assert_eq!(created.status(), StatusCode::OK);

	let updated = app
		.clone()
		.oneshot(delivery("msg_2", "user.updated", "jane.doe@example.com"))
		.await
		.unwrap();
	assert_eq!(updated.status(), StatusCode::OK);

	let replayed = app
		.clone()
		.oneshot(delivery("msg_3", "user.created", "jane@example.com"))
		.await
		.unwrap();
	assert_eq!(replayed.status(), StatusCode::BAD_REQUEST);
	let bytes = axum::body::to_bytes(replayed.into_body(), usize::MAX)
		.await
		.unwrap();
	assert_eq!(&bytes[..], b"Error occured -- during event handling");
}

#[tokio::test]
async fn test_undecodable_secret_fails_startup() {
	let err = create_app_state(&config("whsec_%%%not-base64%%%"))
		.await
		.err()
		.unwrap();
	assert!(matches!(err, StartupError::WebhookSecret(_)));
}
