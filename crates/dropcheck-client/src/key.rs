// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Write-side credential wrapper.
//!
//! The key is redacted from `Debug` output and zeroized on drop so it cannot
//! leak through logs or reused allocations. Use [`WriteKey::expose`] at the
//! single point the raw value is put on the wire.

use zeroize::Zeroize;

use crate::error::{Result, SinkError};

/// A write-side access credential for the ingestion service.
pub struct WriteKey(String);

impl WriteKey {
	/// Wraps a raw key, rejecting empty or whitespace-only values.
	pub fn new(raw: impl Into<String>) -> Result<Self> {
		let raw = raw.into();
		if raw.trim().is_empty() {
			return Err(SinkError::InvalidWriteKey);
		}
		Ok(Self(raw))
	}

	/// Returns the raw key value.
	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Debug for WriteKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("WriteKey(<redacted>)")
	}
}

impl Drop for WriteKey {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn rejects_empty_key() {
		assert!(matches!(WriteKey::new(""), Err(SinkError::InvalidWriteKey)));
		assert!(matches!(WriteKey::new("   "), Err(SinkError::InvalidWriteKey)));
	}

	#[test]
	fn exposes_raw_value() {
		let key = WriteKey::new("wk_live_abc123").unwrap();
		assert_eq!(key.expose(), "wk_live_abc123");
	}

	#[test]
	fn debug_output_is_redacted() {
		let key = WriteKey::new("wk_live_abc123").unwrap();
		let debug = format!("{:?}", key);
		assert!(!debug.contains("abc123"));
		assert!(debug.contains("redacted"));
	}

	proptest! {
		#[test]
		fn non_blank_keys_are_accepted(raw in "[a-zA-Z0-9_]{1,64}") {
			let key = WriteKey::new(raw.clone()).unwrap();
			prop_assert_eq!(key.expose(), raw.as_str());
		}
	}
}
