// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Image acquisition for the two attachments.
//!
//! Synthetic mode encodes a flat-color 1920x1080 PNG in memory; real mode
//! reads fixed-name fixture files from the data directory. Nothing is cached,
//! the payload is recomputed or reloaded on every run.

use std::io::Cursor;

use anyhow::{Context, Result};
use dropcheck_core::{Attachment, AttachmentRole};
use image::{Rgb, RgbImage};

use crate::config::RunConfig;

/// Synthetic image dimensions.
pub const IMAGE_WIDTH: u32 = 1920;
/// Synthetic image dimensions.
pub const IMAGE_HEIGHT: u32 = 1080;

const INPUT_FIXTURE: &str = "input-screenshot.png";
const OUTPUT_FIXTURE: &str = "output-click-target.png";

/// An in-memory PNG payload ready to become an attachment.
#[derive(Debug)]
pub struct ImagePayload {
	/// Which side of the interaction the image belongs to.
	pub role: AttachmentRole,
	/// Attachment name shown on the ingest side.
	pub name: &'static str,
	/// PNG bytes.
	pub bytes: Vec<u8>,
}

impl ImagePayload {
	/// Payload size in bytes.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Returns true if the payload is empty.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Encodes the payload into a role-tagged attachment.
	pub fn into_attachment(self) -> Attachment {
		Attachment::image(self.name, &self.bytes, self.role)
	}
}

/// Produces the image payload for a role according to the run configuration.
pub async fn obtain_image(role: AttachmentRole, config: &RunConfig) -> Result<ImagePayload> {
	let bytes = if config.use_real_images {
		let path = config.data_dir.join(fixture_filename(role));
		tokio::fs::read(&path)
			.await
			.with_context(|| format!("reading fixture image {}", path.display()))?
	} else {
		synthetic_png(flat_color(role))?
	};

	Ok(ImagePayload {
		role,
		name: attachment_name(role),
		bytes,
	})
}

/// Attachment name for a role.
pub fn attachment_name(role: AttachmentRole) -> &'static str {
	match role {
		AttachmentRole::Input => "screenshot",
		AttachmentRole::Output => "click_target",
	}
}

fn fixture_filename(role: AttachmentRole) -> &'static str {
	match role {
		AttachmentRole::Input => INPUT_FIXTURE,
		AttachmentRole::Output => OUTPUT_FIXTURE,
	}
}

fn flat_color(role: AttachmentRole) -> Rgb<u8> {
	match role {
		AttachmentRole::Input => Rgb([255, 0, 0]),
		AttachmentRole::Output => Rgb([0, 255, 0]),
	}
}

fn synthetic_png(color: Rgb<u8>) -> Result<Vec<u8>> {
	let bitmap = RgbImage::from_pixel(IMAGE_WIDTH, IMAGE_HEIGHT, color);
	let mut buffer = Cursor::new(Vec::new());
	bitmap
		.write_to(&mut buffer, image::ImageFormat::Png)
		.context("encoding synthetic image")?;
	Ok(buffer.into_inner())
}
