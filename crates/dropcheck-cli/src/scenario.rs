// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The scripted reproduction sequence.
//!
//! A single linear pass: open the interaction, wait through the navigation and
//! screenshot delays, attach the input image, wait through the long model
//! completion, attach the output image, finish, close. The long gap before the
//! second attachment is the point of the exercise: it gives any time-based
//! flush inside the sink under test room to finalize the event early.
//!
//! Whether the flushed event really kept both attachments is only observable
//! on the vendor dashboard; the harness prints the expected count and defers
//! verification out of band.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dropcheck_client::{EventSink, Interaction};
use dropcheck_core::{AttachmentRole, ConvoId, EventId, FinishPayload, InteractionSpec, Properties};
use serde::Serialize;
use tracing::info;

use crate::clock::{format_elapsed, Clock};
use crate::config::RunConfig;
use crate::images::obtain_image;

/// Event name recorded on the interaction.
pub const EVENT_NAME: &str = "attachment_drop_probe";
/// User the interaction is attributed to.
pub const USER_ID: &str = "test-user";
/// Model name recorded on the interaction.
pub const MODEL: &str = "test-model";
/// Textual input recorded on the interaction.
pub const INPUT_TEXT: &str = "Test input for the attachment-drop probe";

/// Attachment count the final event should carry.
pub const EXPECTED_ATTACHMENTS: usize = 2;

/// Step labels in execution order.
pub const STEP_LABELS: [&str; 8] = [
	"navigation",
	"screenshot",
	"input-attach",
	"model-completion",
	"annotation",
	"output-attach",
	"task-complete",
	"close",
];

const NAVIGATION_DELAY: Duration = Duration::from_millis(1960);
const SCREENSHOT_DELAY: Duration = Duration::from_millis(380);
const MODEL_COMPLETION_DELAY: Duration = Duration::from_millis(7290);
const ANNOTATION_DELAY: Duration = Duration::from_millis(20);

/// Final output recorded on the interaction: the clicked coordinate.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ScenarioOutput {
	Click { x: u32, y: u32 },
}

/// What a run did, for assertions that don't parse log output.
#[derive(Debug, Default)]
pub struct ScenarioReport {
	/// Ordered step labels the run completed.
	pub steps: Vec<&'static str>,
	/// Number of attachment calls issued.
	pub attachment_calls: usize,
}

impl ScenarioReport {
	fn step(&mut self, label: &'static str) {
		self.steps.push(label);
	}
}

/// Executes the reproduction sequence against the given sink and clock.
pub async fn run_scenario(
	sink: Arc<dyn EventSink>,
	clock: &dyn Clock,
	config: &RunConfig,
) -> Result<ScenarioReport> {
	let mut report = ScenarioReport::default();
	let elapsed = || format_elapsed(clock.elapsed());

	let event_id = EventId::new();
	let convo_id = ConvoId::new();
	info!(event_id = %event_id, convo_id = %convo_id, "opening interaction");

	let properties = Properties::new()
		.insert("test", true)
		.insert("use_real_images", config.use_real_images);
	let spec = InteractionSpec::new(
		event_id,
		EVENT_NAME,
		USER_ID,
		INPUT_TEXT,
		MODEL,
		convo_id,
		properties,
	);
	let interaction = Interaction::begin(sink.clone(), spec)
		.await
		.context("opening interaction")?;

	info!(elapsed = %elapsed(), "starting navigation");
	clock.sleep(NAVIGATION_DELAY).await;
	report.step("navigation");
	info!(elapsed = %elapsed(), "navigation complete");

	info!(elapsed = %elapsed(), "capturing screenshot");
	clock.sleep(SCREENSHOT_DELAY).await;
	report.step("screenshot");
	let input_image = obtain_image(AttachmentRole::Input, config)
		.await
		.context("obtaining input image")?;
	info!(elapsed = %elapsed(), bytes = input_image.len(), "screenshot captured");

	info!(elapsed = %elapsed(), "adding input attachment");
	interaction
		.add_attachments(vec![input_image.into_attachment()])
		.await
		.context("adding input attachment")?;
	report.attachment_calls += 1;
	report.step("input-attach");
	info!(elapsed = %elapsed(), "input attachment added");

	info!(elapsed = %elapsed(), "starting model completion");
	clock.sleep(MODEL_COMPLETION_DELAY).await;
	report.step("model-completion");
	info!(elapsed = %elapsed(), "model completion finished");

	info!(elapsed = %elapsed(), "creating annotated click target image");
	clock.sleep(ANNOTATION_DELAY).await;
	report.step("annotation");
	let output_image = obtain_image(AttachmentRole::Output, config)
		.await
		.context("obtaining output image")?;

	info!(elapsed = %elapsed(), bytes = output_image.len(), "adding output attachment");
	interaction
		.add_attachments(vec![output_image.into_attachment()])
		.await
		.context("adding output attachment")?;
	report.attachment_calls += 1;
	report.step("output-attach");
	info!(elapsed = %elapsed(), "output attachment added");

	info!(elapsed = %elapsed(), "task complete");
	let output = serde_json::to_string(&ScenarioOutput::Click { x: 1730, y: 157 })
		.context("serializing final output")?;
	interaction
		.finish(FinishPayload::new(output))
		.await
		.context("finishing interaction")?;
	report.step("task-complete");

	sink.close().await.context("closing sink")?;
	report.step("close");
	info!(elapsed = %elapsed(), "sink closed, all events flushed");

	info!(
		expected = EXPECTED_ATTACHMENTS,
		"expected attachment count on the final event"
	);
	info!("commonly observed: 1 (input only); verify the real count on the vendor dashboard");

	Ok(report)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	use dropcheck_client::{RecordingSink, SinkCall};

	use crate::clock::SkipClock;

	fn synthetic_config() -> RunConfig {
		RunConfig {
			use_real_images: false,
			no_sleeps: true,
			data_dir: PathBuf::from("data"),
		}
	}

	#[tokio::test]
	async fn run_completes_every_step_in_order() {
		let sink = Arc::new(RecordingSink::new());
		let clock = SkipClock::new();

		let report = run_scenario(sink.clone(), &clock, &synthetic_config())
			.await
			.unwrap();

		assert_eq!(report.steps, STEP_LABELS);
		assert_eq!(report.attachment_calls, EXPECTED_ATTACHMENTS);
	}

	#[tokio::test]
	async fn sink_sees_begin_two_attachments_finish_close() {
		let sink = Arc::new(RecordingSink::new());
		let clock = SkipClock::new();

		run_scenario(sink.clone(), &clock, &synthetic_config())
			.await
			.unwrap();

		let calls = sink.calls().await;
		assert_eq!(calls.len(), 5);
		assert!(matches!(calls[0], SinkCall::Begin(_)));
		assert!(matches!(calls[1], SinkCall::AddAttachments { .. }));
		assert!(matches!(calls[2], SinkCall::AddAttachments { .. }));
		assert!(matches!(calls[3], SinkCall::Finish { .. }));
		assert!(matches!(calls[4], SinkCall::Close));

		assert_eq!(
			sink.attachment_roles().await,
			vec![AttachmentRole::Input, AttachmentRole::Output]
		);
	}

	#[tokio::test]
	async fn begin_records_run_mode_properties() {
		let sink = Arc::new(RecordingSink::new());
		let clock = SkipClock::new();

		run_scenario(sink.clone(), &clock, &synthetic_config())
			.await
			.unwrap();

		let calls = sink.calls().await;
		let spec = match &calls[0] {
			SinkCall::Begin(spec) => spec.clone(),
			other => panic!("expected begin, got {other:?}"),
		};
		assert_eq!(spec.event, EVENT_NAME);
		assert_eq!(spec.user_id, USER_ID);
		assert_eq!(spec.model, MODEL);
		assert_eq!(
			spec.properties.get("test"),
			Some(&serde_json::Value::Bool(true))
		);
		assert_eq!(
			spec.properties.get("use_real_images"),
			Some(&serde_json::Value::Bool(false))
		);
	}

	#[tokio::test]
	async fn finish_payload_is_a_click_coordinate() {
		let sink = Arc::new(RecordingSink::new());
		let clock = SkipClock::new();

		run_scenario(sink.clone(), &clock, &synthetic_config())
			.await
			.unwrap();

		let calls = sink.calls().await;
		let payload = calls
			.iter()
			.find_map(|call| match call {
				SinkCall::Finish { payload, .. } => Some(payload.clone()),
				_ => None,
			})
			.unwrap();

		let value: serde_json::Value = serde_json::from_str(&payload.output).unwrap();
		assert_eq!(value["type"], "click");
		assert_eq!(value["x"], 1730);
		assert_eq!(value["y"], 157);
	}

	#[tokio::test]
	async fn virtual_elapsed_covers_every_delay() {
		let sink = Arc::new(RecordingSink::new());
		let clock = SkipClock::new();

		run_scenario(sink.clone(), &clock, &synthetic_config())
			.await
			.unwrap();

		// 1960 + 380 + 7290 + 20
		assert_eq!(clock.elapsed(), Duration::from_millis(9650));
	}

	#[tokio::test]
	async fn missing_fixture_aborts_before_any_attachment() {
		let dir = tempfile::tempdir().unwrap();
		let config = RunConfig {
			use_real_images: true,
			no_sleeps: true,
			data_dir: dir.path().to_path_buf(),
		};
		let sink = Arc::new(RecordingSink::new());
		let clock = SkipClock::new();

		let result = run_scenario(sink.clone(), &clock, &config).await;
		assert!(result.is_err());

		assert_eq!(sink.attachment_call_count().await, 0);
		let calls = sink.calls().await;
		assert_eq!(calls.len(), 1);
		assert!(matches!(calls[0], SinkCall::Begin(_)));
	}

	#[tokio::test]
	async fn sink_failure_propagates_out_of_the_run() {
		let sink = Arc::new(RecordingSink::new());
		sink.set_should_fail(true);
		let clock = SkipClock::new();

		let result = run_scenario(sink, &clock, &synthetic_config()).await;
		assert!(result.is_err());
	}
}
