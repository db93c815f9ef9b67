// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The event-sink capability and the per-interaction handle.

use std::sync::Arc;

use dropcheck_core::{Attachment, EventId, FinishPayload, InteractionSpec};

use crate::error::Result;

/// Capability for delivering interactions to the ingestion service.
///
/// The service itself is opaque; implementations only promise the call
/// contract: an interaction is opened with `begin`, accumulates attachments,
/// is terminated exactly once with `finish`, and `close` blocks until every
/// buffered interaction has been durably sent.
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
	/// Opens an interaction.
	async fn begin(&self, spec: InteractionSpec) -> Result<()>;

	/// Appends attachments to an open interaction.
	async fn add_attachments(&self, event_id: &EventId, attachments: Vec<Attachment>)
		-> Result<()>;

	/// Terminates an interaction with its final output.
	async fn finish(&self, event_id: &EventId, payload: FinishPayload) -> Result<()>;

	/// Flushes all buffered interactions and shuts the sink down.
	async fn close(&self) -> Result<()>;
}

/// Handle over one open interaction.
///
/// `finish` takes the handle by value, so an interaction cannot be terminated
/// twice through it.
pub struct Interaction {
	event_id: EventId,
	sink: Arc<dyn EventSink>,
}

impl Interaction {
	/// Opens an interaction on the sink and returns its handle.
	pub async fn begin(sink: Arc<dyn EventSink>, spec: InteractionSpec) -> Result<Self> {
		let event_id = spec.event_id.clone();
		sink.begin(spec).await?;
		Ok(Self { event_id, sink })
	}

	/// The event id this handle refers to.
	pub fn event_id(&self) -> &EventId {
		&self.event_id
	}

	/// Appends attachments to the interaction.
	pub async fn add_attachments(&self, attachments: Vec<Attachment>) -> Result<()> {
		self.sink.add_attachments(&self.event_id, attachments).await
	}

	/// Terminates the interaction, consuming the handle.
	pub async fn finish(self, payload: FinishPayload) -> Result<()> {
		self.sink.finish(&self.event_id, payload).await
	}
}
