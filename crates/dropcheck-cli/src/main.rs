// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! dropcheck - timing harness reproducing dropped interaction attachments.
//!
//! Drives the event sink through a realistic delay sequence (navigation,
//! screenshot capture, model completion, annotation), attaches an input and an
//! output image to one interaction, finishes it, and flushes the sink. The
//! transcript on stdout carries relative elapsed times so the sequence can be
//! correlated against sink-side logs.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dropcheck_client::{EventSink, HttpEventSink, SinkOptions};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod clock;
mod config;
mod images;
mod scenario;

use config::{Args, RunConfig};

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	// Load .env file if present
	dotenvy::dotenv().ok();

	let args = Args::parse();
	let run_config = RunConfig::from_args(&args);

	// Interrupt abandons the sink on purpose: part of the reproduction is
	// observing what a non-graceful exit does to still-buffered events.
	if let Err(e) = ctrlc::set_handler(|| {
		info!("received interrupt, exiting");
		std::process::exit(0);
	}) {
		warn!(error = %e, "failed to register interrupt handler");
	}

	if let Err(e) = run(run_config).await {
		error!("reproduction run failed: {e:#}");
		std::process::exit(1);
	}
}

async fn run(run_config: RunConfig) -> Result<()> {
	info!("starting attachment-drop reproduction");
	info!(
		images = if run_config.use_real_images {
			"fixture files"
		} else {
			"synthetic"
		},
		sleeps = if run_config.no_sleeps {
			"disabled"
		} else {
			"enabled"
		},
		"run mode"
	);

	// The credential check happens before any sink exists.
	let write_key = config::load_write_key()?;

	let options = SinkOptions::new(write_key)
		.with_base_url(config::ingest_url())
		.with_debug_logs(true)
		.with_redact_pii(true);
	let sink: Arc<dyn EventSink> = Arc::new(HttpEventSink::new(options)?);
	let clock = clock::select_clock(run_config.no_sleeps);

	scenario::run_scenario(sink, clock.as_ref(), &run_config).await?;

	info!("reproduction run complete");
	Ok(())
}
