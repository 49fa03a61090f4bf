//! Related records and their keys
//!
//! A [`Record`] is the attribute map of one row of a related record source,
//! nested relations included. [`RecordKey`] is the scalar identifying a row
//! in the option map and in the pivot table.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One row of a related record source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
	attributes: Map<String, Value>,
}

impl Record {
	/// Create a record from its attribute map
	pub fn new(attributes: Map<String, Value>) -> Self {
		Self { attributes }
	}

	/// Create a record from a JSON object, returning `None` for any other value
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::Record;
	/// use serde_json::json;
	///
	/// let record = Record::from_value(json!({"id": 1, "name": "rust"})).unwrap();
	/// assert_eq!(record.get("name"), Some(&json!("rust")));
	/// assert!(Record::from_value(json!([1, 2])).is_none());
	/// ```
	pub fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::Object(attributes) => Some(Self { attributes }),
			_ => None,
		}
	}

	/// Set an attribute, consuming and returning the record
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	/// Read an attribute by dotted path.
	///
	/// Path segments walk into nested objects; numeric segments index arrays.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::Record;
	/// use serde_json::json;
	///
	/// let record = Record::from_value(json!({
	///     "author": {"name": "Ferris"},
	///     "tags": ["a", "b"],
	/// }))
	/// .unwrap();
	///
	/// assert_eq!(record.get("author.name"), Some(&json!("Ferris")));
	/// assert_eq!(record.get("tags.1"), Some(&json!("b")));
	/// assert_eq!(record.get("author.email"), None);
	/// ```
	pub fn get(&self, path: &str) -> Option<&Value> {
		let mut segments = path.split('.');
		let mut current = self.attributes.get(segments.next()?)?;

		for segment in segments {
			current = match current {
				Value::Object(map) => map.get(segment)?,
				Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
				_ => return None,
			};
		}

		Some(current)
	}

	/// The record's `id` attribute
	pub fn id(&self) -> Option<&Value> {
		self.attributes.get("id")
	}

	pub fn attributes(&self) -> &Map<String, Value> {
		&self.attributes
	}

	pub fn into_attributes(self) -> Map<String, Value> {
		self.attributes
	}
}

impl From<Map<String, Value>> for Record {
	fn from(attributes: Map<String, Value>) -> Self {
		Self::new(attributes)
	}
}

/// Scalar key of a related record.
///
/// Serializes untagged, so `RecordKey::Int(3)` is `3` and
/// `RecordKey::Str("a")` is `"a"` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
	/// Integer key, typically an auto-increment primary key
	Int(i64),
	/// String key (slugs, UUIDs, or ids posted back as text)
	Str(String),
}

impl RecordKey {
	/// Convert a JSON scalar into a key.
	///
	/// Integers and strings map directly, other numbers use their textual form.
	/// Null, booleans, arrays and objects have no key representation.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::RecordKey;
	/// use serde_json::json;
	///
	/// assert_eq!(RecordKey::from_value(&json!(7)), Some(RecordKey::Int(7)));
	/// assert_eq!(RecordKey::from_value(&json!("7")), Some(RecordKey::from("7")));
	/// assert_eq!(RecordKey::from_value(&json!(null)), None);
	/// ```
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Number(n) => match n.as_i64() {
				Some(i) => Some(Self::Int(i)),
				None => Some(Self::Str(n.to_string())),
			},
			Value::String(s) => Some(Self::Str(s.clone())),
			_ => None,
		}
	}

	pub fn to_value(&self) -> Value {
		match self {
			Self::Int(i) => Value::from(*i),
			Self::Str(s) => Value::String(s.clone()),
		}
	}
}

impl fmt::Display for RecordKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(i) => write!(f, "{}", i),
			Self::Str(s) => f.write_str(s),
		}
	}
}

impl From<i64> for RecordKey {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<&str> for RecordKey {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for RecordKey {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

/// Whether a submitted or stored value counts as present.
///
/// Null, `false`, zero, the empty string, `"0"`, and empty arrays or objects
/// are all treated as empty and get filtered out of selections and attributes.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty() && s != "0",
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	}
}
