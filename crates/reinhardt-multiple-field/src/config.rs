//! Field configuration
//!
//! Per-field options as they appear in a form or stream definition:
//!
//! ```toml
//! related = "blog.tags"
//! title_name = "{entry.name}"
//! mode = "checkboxes"
//! min = 1
//! max = 5
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Name of the option handler used when none is configured
pub const DEFAULT_HANDLER: &str = "related";

/// Input widget used to render the field.
///
/// Unknown names are kept as [`Mode::Custom`] so projects can ship their own
/// input views; `table` is accepted as another name for [`Mode::Lookup`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
	/// Free-form tag input posting a comma separated string
	#[default]
	Tags,
	/// Multi-select dropdown
	Dropdown,
	/// One checkbox per option
	Checkboxes,
	/// Table picker backed by a value table
	Lookup,
	/// Project-defined mode rendered by `<namespace>::<name>`
	Custom(String),
}

impl Mode {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Tags => "tags",
			Self::Dropdown => "dropdown",
			Self::Checkboxes => "checkboxes",
			Self::Lookup => "lookup",
			Self::Custom(name) => name,
		}
	}
}

impl From<String> for Mode {
	fn from(name: String) -> Self {
		match name.as_str() {
			"tags" => Self::Tags,
			"dropdown" => Self::Dropdown,
			"checkboxes" => Self::Checkboxes,
			"lookup" | "table" => Self::Lookup,
			_ => Self::Custom(name),
		}
	}
}

impl From<&str> for Mode {
	fn from(name: &str) -> Self {
		Self::from(name.to_string())
	}
}

impl From<Mode> for String {
	fn from(mode: Mode) -> Self {
		match mode {
			Mode::Custom(name) => name,
			other => other.as_str().to_string(),
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

fn default_handler() -> String {
	DEFAULT_HANDLER.to_string()
}

/// Immutable settings of one multiple field.
///
/// Field order is fixed and unknown options are kept in a sorted map, so the
/// JSON serialization is canonical and safe to hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	related: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	key_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	title_name: Option<String>,
	#[serde(default)]
	mode: Mode,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	min: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	max: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	value_table: Option<String>,
	#[serde(default = "default_handler")]
	handler: String,
	#[serde(default)]
	required: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	class: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	placeholder: Option<String>,
	#[serde(flatten)]
	extra: BTreeMap<String, Value>,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			related: None,
			key_name: None,
			title_name: None,
			mode: Mode::default(),
			min: None,
			max: None,
			value_table: None,
			handler: default_handler(),
			required: false,
			class: None,
			placeholder: None,
			extra: BTreeMap::new(),
		}
	}
}

impl FieldConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse a configuration from a JSON value
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::{FieldConfig, Mode};
	/// use serde_json::json;
	///
	/// let config = FieldConfig::from_value(json!({
	///     "related": "tags",
	///     "mode": "dropdown",
	///     "max": 3,
	/// }))
	/// .unwrap();
	///
	/// assert_eq!(config.related(), Some("tags"));
	/// assert_eq!(config.mode(), Mode::Dropdown);
	/// assert_eq!(config.max(), Some(3));
	/// assert_eq!(config.handler(), "related");
	/// ```
	pub fn from_value(value: Value) -> Result<Self> {
		Ok(serde_json::from_value(value)?)
	}

	/// Parse a configuration from TOML
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}

	pub fn with_related(mut self, related: impl Into<String>) -> Self {
		self.related = Some(related.into());
		self
	}

	pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
		self.key_name = Some(key_name.into());
		self
	}

	pub fn with_title_name(mut self, title_name: impl Into<String>) -> Self {
		self.title_name = Some(title_name.into());
		self
	}

	pub fn with_mode(mut self, mode: Mode) -> Self {
		self.mode = mode;
		self
	}

	pub fn with_min(mut self, min: usize) -> Self {
		self.min = Some(min);
		self
	}

	pub fn with_max(mut self, max: usize) -> Self {
		self.max = Some(max);
		self
	}

	pub fn with_value_table(mut self, value_table: impl Into<String>) -> Self {
		self.value_table = Some(value_table.into());
		self
	}

	pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
		self.handler = handler.into();
		self
	}

	pub fn with_required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	pub fn with_class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	/// Set an option the field type does not interpret itself
	pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(name.into(), value.into());
		self
	}

	pub fn related(&self) -> Option<&str> {
		self.related.as_deref().filter(|r| !r.is_empty())
	}

	pub fn key_name(&self) -> Option<&str> {
		self.key_name.as_deref().filter(|k| !k.is_empty())
	}

	pub fn title_name(&self) -> Option<&str> {
		self.title_name.as_deref().filter(|t| !t.is_empty())
	}

	pub fn mode(&self) -> Mode {
		self.mode.clone()
	}

	/// Lower selection bound; zero counts as unset
	pub fn min(&self) -> Option<usize> {
		self.min.filter(|n| *n > 0)
	}

	/// Upper selection bound; zero counts as unset
	pub fn max(&self) -> Option<usize> {
		self.max.filter(|n| *n > 0)
	}

	pub fn value_table(&self) -> Option<&str> {
		self.value_table.as_deref().filter(|v| !v.is_empty())
	}

	pub fn handler(&self) -> &str {
		&self.handler
	}

	pub fn required(&self) -> bool {
		self.required
	}

	pub fn class(&self) -> Option<&str> {
		self.class.as_deref().filter(|c| !c.is_empty())
	}

	pub fn placeholder(&self) -> Option<&str> {
		self.placeholder.as_deref().filter(|p| !p.is_empty())
	}

	/// Look up any option by name, typed or extra
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::FieldConfig;
	/// use serde_json::json;
	///
	/// let config = FieldConfig::new().with_related("tags").with_option("sortable", true);
	///
	/// assert_eq!(config.get("related"), Some(json!("tags")));
	/// assert_eq!(config.get("sortable"), Some(json!(true)));
	/// assert_eq!(config.get("min"), None);
	/// ```
	pub fn get(&self, name: &str) -> Option<Value> {
		match self.to_value() {
			Value::Object(mut map) => map.remove(name),
			_ => None,
		}
	}

	/// Look up an option, falling back to `default` when it is absent
	pub fn get_or(&self, name: &str, default: impl Into<Value>) -> Value {
		self.get(name).unwrap_or_else(|| default.into())
	}

	/// The configuration as a JSON object
	pub fn to_value(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}

	/// Canonical JSON text of the configuration
	pub fn canonical_json(&self) -> String {
		self.to_value().to_string()
	}
}
