//! Option maps
//!
//! The option map is what the input widgets render: an ordered mapping from
//! related record key to display label.

use crate::record::{Record, RecordKey};
use crate::title::{EvaluationError, TitleExpression, display_value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered `key → label` pairs offered by the field.
///
/// Iteration follows insertion order. Inserting an existing key replaces its
/// label and keeps the key at its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionMap {
	entries: IndexMap<RecordKey, String>,
}

impl OptionMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a label, returning the one it replaced
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::{OptionMap, RecordKey};
	///
	/// let mut options = OptionMap::new();
	/// options.insert(RecordKey::Int(1), "first");
	/// options.insert(RecordKey::Int(2), "second");
	/// let replaced = options.insert(RecordKey::Int(1), "again");
	///
	/// assert_eq!(replaced.as_deref(), Some("first"));
	/// assert_eq!(options.labels().collect::<Vec<_>>(), vec!["again", "second"]);
	/// ```
	pub fn insert(&mut self, key: RecordKey, label: impl Into<String>) -> Option<String> {
		self.entries.insert(key, label.into())
	}

	pub fn get(&self, key: &RecordKey) -> Option<&str> {
		self.entries.get(key).map(String::as_str)
	}

	pub fn contains_key(&self, key: &RecordKey) -> bool {
		self.entries.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn keys(&self) -> impl Iterator<Item = &RecordKey> {
		self.entries.keys()
	}

	pub fn labels(&self) -> impl Iterator<Item = &str> {
		self.entries.values().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, &str)> {
		self.entries.iter().map(|(k, v)| (k, v.as_str()))
	}

	/// Pairs as `(value, label)` strings, the shape select widgets consume
	pub fn to_choices(&self) -> Vec<(String, String)> {
		self.entries
			.iter()
			.map(|(key, label)| (key.to_string(), label.clone()))
			.collect()
	}
}

impl FromIterator<(RecordKey, String)> for OptionMap {
	fn from_iter<I: IntoIterator<Item = (RecordKey, String)>>(iter: I) -> Self {
		let mut options = Self::new();
		for (key, label) in iter {
			options.insert(key, label);
		}
		options
	}
}

impl IntoIterator for OptionMap {
	type Item = (RecordKey, String);
	type IntoIter = indexmap::map::IntoIter<RecordKey, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

/// Build an option map by evaluating `key_name` and `title` on every record.
///
/// Keys and labels are paired positionally in record order. The first
/// record whose key or label cannot be evaluated aborts the whole build, so
/// callers can switch strategies for every row at once.
///
/// # Examples
///
/// ```
/// use reinhardt_multiple_field::options::build_option_map;
/// use reinhardt_multiple_field::{Record, RecordKey, TitleExpression};
/// use serde_json::json;
///
/// let records = vec![
///     Record::from_value(json!({"id": 2, "name": "web"})).unwrap(),
///     Record::from_value(json!({"id": 1, "name": "rust"})).unwrap(),
/// ];
///
/// let options = build_option_map(&records, "id", &TitleExpression::parse("#{entry.name}")).unwrap();
/// assert_eq!(options.get(&RecordKey::Int(2)), Some("#web"));
/// assert_eq!(options.keys().next(), Some(&RecordKey::Int(2)));
/// ```
pub fn build_option_map(
	records: &[Record],
	key_name: &str,
	title: &TitleExpression,
) -> Result<OptionMap, EvaluationError> {
	let keys = records
		.iter()
		.map(|record| extract_key(record, key_name))
		.collect::<Result<Vec<_>, _>>()?;
	let labels = records
		.iter()
		.map(|record| title.evaluate(record))
		.collect::<Result<Vec<_>, _>>()?;

	Ok(keys.into_iter().zip(labels).collect())
}

/// Project two columns straight into an option map, ignoring expressions.
///
/// Rows without a usable key are skipped. Missing or non-scalar labels
/// become empty strings. This never fails.
pub fn project_option_map(records: &[Record], key_name: &str, title_column: &str) -> OptionMap {
	records
		.iter()
		.filter_map(|record| {
			let key = record.get(key_name).and_then(RecordKey::from_value)?;
			let label = record
				.get(title_column)
				.and_then(display_value)
				.unwrap_or_default();
			Some((key, label))
		})
		.collect()
}

fn extract_key(record: &Record, key_name: &str) -> Result<RecordKey, EvaluationError> {
	let value = record
		.get(key_name)
		.ok_or_else(|| EvaluationError::MissingField(key_name.to_string()))?;

	RecordKey::from_value(value).ok_or_else(|| EvaluationError::NotScalar(key_name.to_string()))
}
