// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-tagged binary attachments.
//!
//! An attachment carries its payload as a base64 `data:` URI. Encoding happens
//! once, at construction, immediately before the attachment is handed to the
//! sink.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Which side of the interaction an attachment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentRole {
	/// Captured before the model acted (e.g. the screenshot it saw).
	Input,
	/// Produced after the model acted (e.g. the annotated click target).
	Output,
}

impl AttachmentRole {
	/// Returns the wire representation ("input" or "output").
	pub fn as_str(&self) -> &'static str {
		match self {
			AttachmentRole::Input => "input",
			AttachmentRole::Output => "output",
		}
	}
}

impl std::fmt::Display for AttachmentRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl std::str::FromStr for AttachmentRole {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"input" => Ok(AttachmentRole::Input),
			"output" => Ok(AttachmentRole::Output),
			_ => Err(format!("invalid attachment role: {}", s)),
		}
	}
}

/// The payload kind of an attachment.
///
/// The harness only ever sends images; the enum keeps the wire field typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
	/// A PNG image payload.
	Image,
}

/// A named, role-tagged payload attached to an interaction.
///
/// Wire shape: `{"type": ..., "name": ..., "value": ..., "role": ...}` where
/// `value` is a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
	/// Payload kind, serialized as `type`.
	#[serde(rename = "type")]
	pub kind: AttachmentKind,
	/// Attachment name shown on the ingest side.
	pub name: String,
	/// Base64 data URI holding the payload bytes.
	pub value: String,
	/// Which side of the interaction the payload belongs to.
	pub role: AttachmentRole,
}

impl Attachment {
	/// Builds an image attachment, encoding the PNG bytes as a data URI.
	pub fn image(name: impl Into<String>, png_bytes: &[u8], role: AttachmentRole) -> Self {
		Self {
			kind: AttachmentKind::Image,
			name: name.into(),
			value: format!("data:image/png;base64,{}", STANDARD.encode(png_bytes)),
			role,
		}
	}
}
