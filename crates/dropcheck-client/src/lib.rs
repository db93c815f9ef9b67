// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event-sink client boundary for the dropcheck interaction harness.
//!
//! The vendor's ingestion service is an opaque collaborator; this crate owns
//! the seam in front of it:
//! - [`EventSink`] — the begin/attach/finish/close capability the harness
//!   drives,
//! - [`Interaction`] — a handle over one open interaction,
//! - [`HttpEventSink`] — the production sink that delivers buffered
//!   interactions over HTTP when closed,
//! - [`RecordingSink`] — a call-recording fake for deterministic tests.

mod error;
mod http;
mod key;
mod recording;
mod sink;

pub use error::{Result, SinkError};
pub use http::{HttpEventSink, SinkOptions, DEFAULT_BASE_URL};
pub use key::WriteKey;
pub use recording::{RecordingSink, SinkCall};
pub use sink::{EventSink, Interaction};
