// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Begin/finish descriptors for an interaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ConvoId, EventId};
use crate::properties::Properties;

/// Everything the sink needs to open an interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSpec {
	/// Caller-supplied event identifier.
	pub event_id: EventId,
	/// Event name shown on the ingest side.
	pub event: String,
	/// User the interaction is attributed to.
	pub user_id: String,
	/// Textual input the model received.
	pub input: String,
	/// Model name recorded on the event.
	pub model: String,
	/// Conversation the interaction belongs to.
	pub convo_id: ConvoId,
	/// Free-form properties bag.
	pub properties: Properties,
	/// When the interaction was opened.
	pub begun_at: DateTime<Utc>,
}

impl InteractionSpec {
	/// Builds a begin descriptor, stamping the open time.
	pub fn new(
		event_id: EventId,
		event: impl Into<String>,
		user_id: impl Into<String>,
		input: impl Into<String>,
		model: impl Into<String>,
		convo_id: ConvoId,
		properties: Properties,
	) -> Self {
		Self {
			event_id,
			event: event.into(),
			user_id: user_id.into(),
			input: input.into(),
			model: model.into(),
			convo_id,
			properties,
			begun_at: Utc::now(),
		}
	}
}

/// Final output value carried by the finish call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishPayload {
	/// Final output string, typically serialized JSON.
	pub output: String,
}

impl FinishPayload {
	/// Wraps an output string.
	pub fn new(output: impl Into<String>) -> Self {
		Self {
			output: output.into(),
		}
	}
}
