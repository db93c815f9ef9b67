// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the event-sink client.

use dropcheck_core::EventId;
use thiserror::Error;

/// Event-sink client errors.
///
/// The harness never retries a failed call, so no retryability classification
/// is carried here; every error propagates to the top-level handler unchanged.
#[derive(Debug, Error)]
pub enum SinkError {
	/// Write key is missing or empty.
	#[error("invalid write key: must be a non-empty string")]
	InvalidWriteKey,

	/// Base URL is missing or invalid.
	#[error("invalid base URL")]
	InvalidBaseUrl,

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Server returned an error response.
	#[error("server error ({status}): {message}")]
	ServerError { status: u16, message: String },

	/// Call referenced an interaction the sink has never seen.
	#[error("unknown interaction: {0}")]
	UnknownInteraction(EventId),

	/// Begin was called twice with the same event id.
	#[error("interaction already open: {0}")]
	DuplicateInteraction(EventId),

	/// Finish was called twice for the same interaction.
	#[error("interaction already finished: {0}")]
	AlreadyFinished(EventId),

	/// Sink has been closed.
	#[error("sink has been closed")]
	Closed,

	/// Serialization error.
	#[error("serialization error: {0}")]
	Serialization(String),
}

/// Result type alias for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;
