// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Free-form properties bag attached to an interaction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A builder for the properties bag recorded on an interaction.
///
/// # Example
///
/// ```
/// use dropcheck_core::Properties;
///
/// let props = Properties::new()
///     .insert("test", true)
///     .insert("use_real_images", false);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
	inner: Map<String, Value>,
}

impl Properties {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self { inner: Map::new() }
	}

	/// Inserts a key-value pair, replacing any existing value for the key.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	/// Gets a value by key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.inner.get(key)
	}

	/// Returns the number of properties.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Returns true if the bag is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<Properties> for Value {
	fn from(props: Properties) -> Self {
		Value::Object(props.inner)
	}
}
