// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information for usersync-server.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildInfo {
	pub version: &'static str,
	pub platform: &'static str,
}

impl BuildInfo {
	pub const fn current() -> Self {
		Self {
			version: env!("CARGO_PKG_VERSION"),
			platform: env!("USERSYNC_PLATFORM"),
		}
	}
}

/// Format version info for display.
pub fn format_version_info() -> String {
	let info = BuildInfo::current();
	format!(
		"usersync-server version: {}\n\
		 Platform:                {}",
		info.version, info.platform,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_info_mentions_package_version() {
		let out = format_version_info();
		assert!(out.starts_with("usersync-server version: "));
		assert!(out.contains(env!("CARGO_PKG_VERSION")));
	}
}
