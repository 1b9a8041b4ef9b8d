// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

fn main() {
	let os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
	let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
	println!("cargo:rustc-env=USERSYNC_PLATFORM={os}-{arch}");
	println!("cargo:rerun-if-changed=build.rs");
}
