// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Interaction and conversation identifiers.
//!
//! Both identifiers are generated fresh for every run (UUIDv7, so they sort by
//! creation time on the ingest side). They are never reused or persisted;
//! uniqueness is probabilistic and not otherwise enforced.

use serde::{Deserialize, Serialize};

/// Unique identifier for a single interaction event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
	/// Generates a fresh event id.
	pub fn new() -> Self {
		Self(uuid7::uuid7().to_string())
	}

	/// Returns the id as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for EventId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for EventId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for EventId {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Err("event id must not be empty".to_string());
		}
		Ok(Self(s.to_string()))
	}
}

/// Unique identifier for the conversation an interaction belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConvoId(String);

impl ConvoId {
	/// Generates a fresh conversation id.
	pub fn new() -> Self {
		Self(uuid7::uuid7().to_string())
	}

	/// Returns the id as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for ConvoId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for ConvoId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for ConvoId {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Err("convo id must not be empty".to_string());
		}
		Ok(Self(s.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn event_id_display_roundtrip() {
		let id = EventId::new();
		let parsed: EventId = id.to_string().parse().unwrap();
		assert_eq!(id, parsed);
	}

	#[test]
	fn convo_id_display_roundtrip() {
		let id = ConvoId::new();
		let parsed: ConvoId = id.to_string().parse().unwrap();
		assert_eq!(id, parsed);
	}

	#[test]
	fn empty_ids_do_not_parse() {
		assert!("".parse::<EventId>().is_err());
		assert!("".parse::<ConvoId>().is_err());
	}

	#[test]
	fn event_id_serde_roundtrip() {
		let id = EventId::new();
		let json = serde_json::to_string(&id).unwrap();
		let parsed: EventId = serde_json::from_str(&json).unwrap();
		assert_eq!(id, parsed);
	}

	proptest! {
		#[test]
		fn event_ids_are_unique(_seed: u64) {
			let id1 = EventId::new();
			let id2 = EventId::new();
			prop_assert_ne!(id1, id2);
		}

		#[test]
		fn convo_ids_are_unique(_seed: u64) {
			let id1 = ConvoId::new();
			let id2 = ConvoId::new();
			prop_assert_ne!(id1, id2);
		}

		#[test]
		fn non_empty_strings_parse(s in "[a-z0-9-]{1,40}") {
			let id: EventId = s.parse().unwrap();
			prop_assert_eq!(id.as_str(), s.as_str());
		}
	}
}
