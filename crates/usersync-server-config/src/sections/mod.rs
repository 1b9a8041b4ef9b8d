// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for usersync-server.

pub mod http;
pub mod logging;
pub mod store;
pub mod webhook;

pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use store::{StoreBackend, StoreConfig, StoreConfigLayer};
pub use webhook::{WebhookConfig, WebhookConfigLayer};
