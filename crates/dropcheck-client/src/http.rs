// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP-backed production sink.
//!
//! Interactions are buffered in memory while open and delivered as a single
//! JSON envelope when the sink is closed. Delivery is thin plumbing only:
//! one bearer-authenticated POST, no retries, no timers. `close` blocks until
//! the server acknowledges the envelope.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dropcheck_core::{Attachment, EventId, FinishPayload, InteractionSpec};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Result, SinkError};
use crate::key::WriteKey;
use crate::sink::EventSink;

/// Default ingestion endpoint.
pub const DEFAULT_BASE_URL: &str = "https://events.dropcheck.io";

/// Request timeout for the delivery POST.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`HttpEventSink`].
#[derive(Debug)]
pub struct SinkOptions {
	/// Write-side access credential.
	pub write_key: WriteKey,
	/// Ingestion endpoint base URL.
	pub base_url: String,
	/// Emit verbose per-call logging.
	pub debug_logs: bool,
	/// Ask the server to redact PII from delivered events.
	pub redact_pii: bool,
}

impl SinkOptions {
	/// Creates options with the default endpoint and quiet logging.
	pub fn new(write_key: WriteKey) -> Self {
		Self {
			write_key,
			base_url: DEFAULT_BASE_URL.to_string(),
			debug_logs: false,
			redact_pii: false,
		}
	}

	/// Overrides the ingestion endpoint.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Enables verbose per-call logging.
	pub fn with_debug_logs(mut self, debug_logs: bool) -> Self {
		self.debug_logs = debug_logs;
		self
	}

	/// Enables server-side PII redaction.
	pub fn with_redact_pii(mut self, redact_pii: bool) -> Self {
		self.redact_pii = redact_pii;
		self
	}
}

/// An interaction that has been opened but not yet finished.
struct PendingInteraction {
	spec: InteractionSpec,
	attachments: Vec<Attachment>,
}

/// A finished interaction waiting in the outbox.
#[derive(Serialize)]
struct EventRecord {
	#[serde(flatten)]
	spec: InteractionSpec,
	attachments: Vec<Attachment>,
	output: String,
	finished_at: DateTime<Utc>,
}

/// The envelope delivered to the server on close.
#[derive(Serialize)]
struct Envelope<'a> {
	redact_pii: bool,
	events: &'a [EventRecord],
}

#[derive(Default)]
struct SinkState {
	pending: HashMap<EventId, PendingInteraction>,
	outbox: Vec<EventRecord>,
}

/// Production [`EventSink`] delivering interactions over HTTP.
pub struct HttpEventSink {
	http: reqwest::Client,
	options: SinkOptions,
	state: Mutex<SinkState>,
	closed: AtomicBool,
}

impl HttpEventSink {
	/// Creates a sink from the given options.
	pub fn new(options: SinkOptions) -> Result<Self> {
		if options.base_url.trim().is_empty() {
			return Err(SinkError::InvalidBaseUrl);
		}

		let http = reqwest::Client::builder()
			.user_agent(concat!("dropcheck/", env!("CARGO_PKG_VERSION")))
			.timeout(REQUEST_TIMEOUT)
			.build()?;

		Ok(Self {
			http,
			options,
			state: Mutex::new(SinkState::default()),
			closed: AtomicBool::new(false),
		})
	}

	fn ensure_open(&self) -> Result<()> {
		if self.closed.load(Ordering::SeqCst) {
			return Err(SinkError::Closed);
		}
		Ok(())
	}

	fn delivery_url(&self) -> String {
		format!(
			"{}/v1/events/batch",
			self.options.base_url.trim_end_matches('/')
		)
	}

	async fn deliver(&self, events: &[EventRecord]) -> Result<()> {
		let envelope = Envelope {
			redact_pii: self.options.redact_pii,
			events,
		};

		if self.options.debug_logs {
			debug!(
				count = events.len(),
				url = %self.delivery_url(),
				"delivering event envelope"
			);
		}

		let response = self
			.http
			.post(self.delivery_url())
			.bearer_auth(self.options.write_key.expose())
			.json(&envelope)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let message = response.text().await.unwrap_or_default();
			return Err(SinkError::ServerError {
				status: status.as_u16(),
				message,
			});
		}

		info!(count = events.len(), "event envelope delivered");
		Ok(())
	}
}

#[async_trait::async_trait]
impl EventSink for HttpEventSink {
	async fn begin(&self, spec: InteractionSpec) -> Result<()> {
		self.ensure_open()?;

		let mut state = self.state.lock().await;
		let event_id = spec.event_id.clone();
		if state.pending.contains_key(&event_id)
			|| state.outbox.iter().any(|e| e.spec.event_id == event_id)
		{
			return Err(SinkError::DuplicateInteraction(event_id));
		}

		if self.options.debug_logs {
			debug!(event_id = %event_id, event = %spec.event, "interaction opened");
		}

		state.pending.insert(
			event_id,
			PendingInteraction {
				spec,
				attachments: Vec::new(),
			},
		);
		Ok(())
	}

	async fn add_attachments(
		&self,
		event_id: &EventId,
		attachments: Vec<Attachment>,
	) -> Result<()> {
		self.ensure_open()?;

		let mut state = self.state.lock().await;
		let pending = state
			.pending
			.get_mut(event_id)
			.ok_or_else(|| SinkError::UnknownInteraction(event_id.clone()))?;

		if self.options.debug_logs {
			debug!(
				event_id = %event_id,
				count = attachments.len(),
				total = pending.attachments.len() + attachments.len(),
				"attachments appended"
			);
		}

		pending.attachments.extend(attachments);
		Ok(())
	}

	async fn finish(&self, event_id: &EventId, payload: FinishPayload) -> Result<()> {
		self.ensure_open()?;

		let mut state = self.state.lock().await;
		let pending = match state.pending.remove(event_id) {
			Some(pending) => pending,
			None => {
				if state.outbox.iter().any(|e| &e.spec.event_id == event_id) {
					return Err(SinkError::AlreadyFinished(event_id.clone()));
				}
				return Err(SinkError::UnknownInteraction(event_id.clone()));
			}
		};

		if self.options.debug_logs {
			debug!(
				event_id = %event_id,
				attachments = pending.attachments.len(),
				"interaction finished"
			);
		}

		state.outbox.push(EventRecord {
			spec: pending.spec,
			attachments: pending.attachments,
			output: payload.output,
			finished_at: Utc::now(),
		});
		Ok(())
	}

	async fn close(&self) -> Result<()> {
		if self.closed.swap(true, Ordering::SeqCst) {
			return Err(SinkError::Closed);
		}

		let state = {
			let mut state = self.state.lock().await;
			std::mem::take(&mut *state)
		};

		for event_id in state.pending.keys() {
			warn!(event_id = %event_id, "dropping unfinished interaction at close");
		}

		if state.outbox.is_empty() {
			debug!("close with empty outbox, nothing to deliver");
			return Ok(());
		}

		self.deliver(&state.outbox).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dropcheck_core::{AttachmentRole, ConvoId, Properties};
	use wiremock::matchers::{method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn test_options(base_url: &str) -> SinkOptions {
		SinkOptions::new(WriteKey::new("wk_test_key").unwrap())
			.with_base_url(base_url)
			.with_debug_logs(true)
			.with_redact_pii(true)
	}

	fn test_spec() -> InteractionSpec {
		InteractionSpec::new(
			EventId::new(),
			"attachment_drop_probe",
			"test-user",
			"Test input",
			"test-model",
			ConvoId::new(),
			Properties::new().insert("test", true),
		)
	}

	async fn mounted_server(status: u16) -> MockServer {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/v1/events/batch"))
			.respond_with(ResponseTemplate::new(status))
			.mount(&server)
			.await;
		server
	}

	#[tokio::test]
	async fn close_delivers_one_envelope_with_both_attachments() {
		let server = mounted_server(200).await;
		let sink = HttpEventSink::new(test_options(&server.uri())).unwrap();

		let spec = test_spec();
		let event_id = spec.event_id.clone();
		sink.begin(spec).await.unwrap();
		sink.add_attachments(
			&event_id,
			vec![Attachment::image("screenshot", b"in", AttachmentRole::Input)],
		)
		.await
		.unwrap();
		sink.add_attachments(
			&event_id,
			vec![Attachment::image(
				"click_target",
				b"out",
				AttachmentRole::Output,
			)],
		)
		.await
		.unwrap();
		sink.finish(&event_id, FinishPayload::new(r#"{"type":"click","x":1730,"y":157}"#))
			.await
			.unwrap();
		sink.close().await.unwrap();

		let requests = server.received_requests().await.unwrap();
		assert_eq!(requests.len(), 1);

		let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
		assert_eq!(body["redact_pii"], true);
		let events = body["events"].as_array().unwrap();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0]["event"], "attachment_drop_probe");
		assert_eq!(events[0]["event_id"], event_id.as_str());
		let attachments = events[0]["attachments"].as_array().unwrap();
		assert_eq!(attachments.len(), 2);
		assert_eq!(attachments[0]["role"], "input");
		assert_eq!(attachments[1]["role"], "output");
		assert_eq!(
			events[0]["output"],
			r#"{"type":"click","x":1730,"y":157}"#
		);
	}

	#[tokio::test]
	async fn close_with_no_finished_interactions_sends_nothing() {
		let server = mounted_server(200).await;
		let sink = HttpEventSink::new(test_options(&server.uri())).unwrap();

		sink.begin(test_spec()).await.unwrap();
		sink.close().await.unwrap();

		let requests = server.received_requests().await.unwrap();
		assert!(requests.is_empty());
	}

	#[tokio::test]
	async fn server_error_surfaces_status() {
		let server = mounted_server(500).await;
		let sink = HttpEventSink::new(test_options(&server.uri())).unwrap();

		let spec = test_spec();
		let event_id = spec.event_id.clone();
		sink.begin(spec).await.unwrap();
		sink.finish(&event_id, FinishPayload::new("done"))
			.await
			.unwrap();

		let result = sink.close().await;
		assert!(matches!(
			result,
			Err(SinkError::ServerError { status: 500, .. })
		));
	}

	#[tokio::test]
	async fn calls_after_close_are_rejected() {
		let server = mounted_server(200).await;
		let sink = HttpEventSink::new(test_options(&server.uri())).unwrap();

		sink.close().await.unwrap();

		assert!(matches!(
			sink.begin(test_spec()).await,
			Err(SinkError::Closed)
		));
		assert!(matches!(sink.close().await, Err(SinkError::Closed)));
	}

	#[tokio::test]
	async fn unknown_interaction_is_rejected() {
		let server = mounted_server(200).await;
		let sink = HttpEventSink::new(test_options(&server.uri())).unwrap();

		let event_id = EventId::new();
		let result = sink
			.add_attachments(
				&event_id,
				vec![Attachment::image("screenshot", b"x", AttachmentRole::Input)],
			)
			.await;
		assert!(matches!(result, Err(SinkError::UnknownInteraction(_))));

		let result = sink.finish(&event_id, FinishPayload::new("done")).await;
		assert!(matches!(result, Err(SinkError::UnknownInteraction(_))));
	}

	#[tokio::test]
	async fn duplicate_begin_and_double_finish_are_rejected() {
		let server = mounted_server(200).await;
		let sink = HttpEventSink::new(test_options(&server.uri())).unwrap();

		let spec = test_spec();
		let event_id = spec.event_id.clone();
		sink.begin(spec.clone()).await.unwrap();
		assert!(matches!(
			sink.begin(spec).await,
			Err(SinkError::DuplicateInteraction(_))
		));

		sink.finish(&event_id, FinishPayload::new("done"))
			.await
			.unwrap();
		assert!(matches!(
			sink.finish(&event_id, FinishPayload::new("again")).await,
			Err(SinkError::AlreadyFinished(_))
		));
	}

	#[test]
	fn empty_base_url_is_rejected() {
		let options = SinkOptions::new(WriteKey::new("wk_test_key").unwrap()).with_base_url("");
		assert!(matches!(
			HttpEventSink::new(options),
			Err(SinkError::InvalidBaseUrl)
		));
	}
}
