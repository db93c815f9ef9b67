// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Call-recording fake sink.
//!
//! The bug under study lives in the real sink's internal timing, which this
//! repository cannot reproduce in-process. The recording sink exists so the
//! harness sequence itself stays testable: it records every call in order and
//! can be switched into a failing mode.

use std::sync::atomic::{AtomicBool, Ordering};

use dropcheck_core::{Attachment, AttachmentRole, EventId, FinishPayload, InteractionSpec};
use tokio::sync::Mutex;

use crate::error::{Result, SinkError};
use crate::sink::EventSink;

/// One recorded sink call.
#[derive(Debug, Clone)]
pub enum SinkCall {
	/// An interaction was opened.
	Begin(InteractionSpec),
	/// Attachments were appended.
	AddAttachments {
		event_id: EventId,
		attachments: Vec<Attachment>,
	},
	/// An interaction was finished.
	Finish {
		event_id: EventId,
		payload: FinishPayload,
	},
	/// The sink was closed.
	Close,
}

/// An [`EventSink`] that records calls instead of delivering them.
#[derive(Default)]
pub struct RecordingSink {
	calls: Mutex<Vec<SinkCall>>,
	should_fail: AtomicBool,
}

impl RecordingSink {
	/// Creates an empty recording sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes every subsequent call fail with a server error.
	pub fn set_should_fail(&self, fail: bool) {
		self.should_fail.store(fail, Ordering::SeqCst);
	}

	/// Returns every recorded call in order.
	pub async fn calls(&self) -> Vec<SinkCall> {
		self.calls.lock().await.clone()
	}

	/// Returns the number of `add_attachments` calls recorded.
	pub async fn attachment_call_count(&self) -> usize {
		self.calls
			.lock()
			.await
			.iter()
			.filter(|call| matches!(call, SinkCall::AddAttachments { .. }))
			.count()
	}

	/// Returns the roles of every recorded attachment, in call order.
	pub async fn attachment_roles(&self) -> Vec<AttachmentRole> {
		self.calls
			.lock()
			.await
			.iter()
			.filter_map(|call| match call {
				SinkCall::AddAttachments { attachments, .. } => {
					Some(attachments.iter().map(|a| a.role).collect::<Vec<_>>())
				}
				_ => None,
			})
			.flatten()
			.collect()
	}

	async fn record(&self, call: SinkCall) -> Result<()> {
		if self.should_fail.load(Ordering::SeqCst) {
			return Err(SinkError::ServerError {
				status: 500,
				message: "recording sink failure".to_string(),
			});
		}
		self.calls.lock().await.push(call);
		Ok(())
	}
}

#[async_trait::async_trait]
impl EventSink for RecordingSink {
	async fn begin(&self, spec: InteractionSpec) -> Result<()> {
		self.record(SinkCall::Begin(spec)).await
	}

	async fn add_attachments(
		&self,
		event_id: &EventId,
		attachments: Vec<Attachment>,
	) -> Result<()> {
		self.record(SinkCall::AddAttachments {
			event_id: event_id.clone(),
			attachments,
		})
		.await
	}

	async fn finish(&self, event_id: &EventId, payload: FinishPayload) -> Result<()> {
		self.record(SinkCall::Finish {
			event_id: event_id.clone(),
			payload,
		})
		.await
	}

	async fn close(&self) -> Result<()> {
		self.record(SinkCall::Close).await
	}
}
