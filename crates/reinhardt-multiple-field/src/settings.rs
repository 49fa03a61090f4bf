//! Crate-wide settings for the multiple field type

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by every multiple field in a project.
///
/// All keys are optional when loading from TOML:
///
/// ```toml
/// cache_prefix = "reinhardt/multiple-field::"
/// cache_ttl_minutes = 30
/// view_namespace = "reinhardt.field_type.multiple"
/// dropdown_class = "custom-select form-control"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultipleFieldSettings {
	/// Prefix of the cache keys holding picker payloads
	pub cache_prefix: String,
	/// Lifetime of picker payloads in the cache
	pub cache_ttl_minutes: u64,
	/// Namespace of the input and filter views
	pub view_namespace: String,
	/// CSS class applied to dropdown inputs without an explicit class
	pub dropdown_class: String,
}

impl Default for MultipleFieldSettings {
	fn default() -> Self {
		Self {
			cache_prefix: "reinhardt/multiple-field::".to_string(),
			cache_ttl_minutes: 30,
			view_namespace: "reinhardt.field_type.multiple".to_string(),
			dropdown_class: "custom-select form-control".to_string(),
		}
	}
}

impl MultipleFieldSettings {
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}

	pub fn cache_ttl(&self) -> Duration {
		Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60))
	}

	/// Cache key for a configuration token
	pub fn cache_key(&self, token: &str) -> String {
		format!("{}{}", self.cache_prefix, token)
	}
}
