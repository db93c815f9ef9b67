// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared domain types for the dropcheck interaction harness.
//!
//! This crate holds the vocabulary spoken on both sides of the event-sink
//! boundary: interaction identifiers, role-tagged attachments, the begin/finish
//! descriptors, and the properties bag attached to an interaction.

mod attachment;
mod ids;
mod interaction;
mod properties;

pub use attachment::{Attachment, AttachmentKind, AttachmentRole};
pub use ids::{ConvoId, EventId};
pub use interaction::{FinishPayload, InteractionSpec};
pub use properties::Properties;
