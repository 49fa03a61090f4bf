//! HTML attributes handed to input views

use crate::record::is_truthy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered HTML attributes.
///
/// Later merges win over earlier ones; [`HtmlAttributes::without_empty`]
/// drops every falsy value before the attributes reach a view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HtmlAttributes {
	entries: IndexMap<String, Value>,
}

impl HtmlAttributes {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set an attribute, consuming and returning the set
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.entries.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.entries.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Overlay `other` on top of these attributes
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::HtmlAttributes;
	/// use serde_json::json;
	///
	/// let base = HtmlAttributes::new().with("class", "a").with("id", "tags");
	/// let merged = base.merge(HtmlAttributes::new().with("class", "b"));
	///
	/// assert_eq!(merged.get("class"), Some(&json!("b")));
	/// assert_eq!(merged.get("id"), Some(&json!("tags")));
	/// ```
	pub fn merge(mut self, other: HtmlAttributes) -> Self {
		self.entries.extend(other.entries);
		self
	}

	/// Drop null, false, zero and empty values
	pub fn without_empty(mut self) -> Self {
		self.entries.retain(|_, value| is_truthy(value));
		self
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for HtmlAttributes {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			entries: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}
