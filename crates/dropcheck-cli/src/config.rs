// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Run-mode flags and environment configuration.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use dropcheck_client::{WriteKey, DEFAULT_BASE_URL};

/// Environment variable holding the write-side access credential.
pub const WRITE_KEY_ENV: &str = "DROPCHECK_WRITE_KEY";

/// Environment variable overriding the ingestion endpoint.
pub const INGEST_URL_ENV: &str = "DROPCHECK_INGEST_URL";

/// Fixture directory holding the real-image PNGs.
pub const DEFAULT_DATA_DIR: &str = "data";

/// dropcheck - reproduces dropped interaction attachments by driving the
/// event sink through a realistic delay sequence.
///
/// Unrecognized arguments are ignored; both flags are presence-only.
#[derive(Parser, Debug)]
#[command(name = "dropcheck", version, about, ignore_errors = true)]
pub struct Args {
	/// Load fixture PNGs from the data directory instead of synthesizing
	/// flat-color images.
	#[arg(long)]
	pub use_real_images: bool,

	/// Collapse every simulated delay to zero for fast iteration.
	#[arg(long)]
	pub no_sleeps: bool,
}

/// Immutable run configuration, derived once from the invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
	/// Read fixture files instead of synthesizing images.
	pub use_real_images: bool,
	/// Collapse simulated delays to zero.
	pub no_sleeps: bool,
	/// Directory the fixture images are read from.
	pub data_dir: PathBuf,
}

impl RunConfig {
	/// Builds the run configuration from parsed arguments.
	pub fn from_args(args: &Args) -> Self {
		Self {
			use_real_images: args.use_real_images,
			no_sleeps: args.no_sleeps,
			data_dir: PathBuf::from(DEFAULT_DATA_DIR),
		}
	}
}

/// Reads the required write key from the environment.
///
/// Fails before any sink is constructed when the variable is unset or blank.
pub fn load_write_key() -> Result<WriteKey> {
	let raw = std::env::var(WRITE_KEY_ENV)
		.map_err(|_| anyhow!("{WRITE_KEY_ENV} environment variable is required"))?;
	WriteKey::new(raw).with_context(|| format!("{WRITE_KEY_ENV} must be a non-empty write key"))
}

/// Returns the ingestion endpoint, honoring the environment override.
pub fn ingest_url() -> String {
	std::env::var(INGEST_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}
