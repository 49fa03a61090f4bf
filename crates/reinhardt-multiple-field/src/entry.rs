//! Entry boundary
//!
//! The entry is the record being edited. It owns the field's stored value
//! and the pivot rows; the field type only reads from it and assigns the
//! parsed selection before save.

use crate::record::{Record, RecordKey};
use serde_json::Value;
use std::collections::HashMap;

/// Current value of a multiple field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
	/// Raw keys, as stored or posted back
	Keys(Vec<Value>),
	/// Related records loaded through the relation, in pivot order
	Records(Vec<Record>),
}

impl Default for FieldValue {
	fn default() -> Self {
		Self::Keys(Vec::new())
	}
}

impl FieldValue {
	/// Wrap an arbitrary JSON value as raw keys.
	///
	/// Arrays become their elements, null becomes empty, and any other
	/// value becomes a single key.
	pub fn from_value(value: Value) -> Self {
		match value {
			Value::Array(items) => Self::Keys(items),
			Value::Null => Self::Keys(Vec::new()),
			other => Self::Keys(vec![other]),
		}
	}

	pub fn from_keys(keys: impl IntoIterator<Item = RecordKey>) -> Self {
		Self::Keys(keys.into_iter().map(|key| key.to_value()).collect())
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Self::Keys(keys) => keys.is_empty(),
			Self::Records(records) => records.is_empty(),
		}
	}
}

/// The entry a multiple field belongs to.
pub trait Entry: Send + Sync {
	/// Table of the entry; pivot tables are named `<table>_<field>`
	fn table_name(&self) -> &str;

	/// Type name stored alongside cached picker payloads
	fn class_name(&self) -> &str;

	/// Primary key, `None` until the entry is saved
	fn id(&self) -> Option<RecordKey>;

	/// Current value of a field
	fn field_value(&self, field: &str) -> Option<FieldValue>;

	/// Assign selected keys to a field; persistence happens on save
	fn set_field_value(&mut self, field: &str, keys: Vec<RecordKey>);
}

/// Form processing boundary handed to [`crate::MultipleFieldType::handle`].
pub trait FormBuilder {
	/// The entry being created or edited by the form
	fn form_entry_mut(&mut self) -> &mut dyn Entry;
}

/// Entry kept entirely in memory.
///
/// # Examples
///
/// ```
/// use reinhardt_multiple_field::entry::{Entry, FieldValue, MemoryEntry};
/// use reinhardt_multiple_field::RecordKey;
///
/// let mut entry = MemoryEntry::new("blog_posts", "Post").with_id(RecordKey::Int(1));
/// entry.set_field_value("tags", vec![RecordKey::Int(2), RecordKey::Int(5)]);
///
/// assert_eq!(
///     entry.field_value("tags"),
///     Some(FieldValue::from_keys([RecordKey::Int(2), RecordKey::Int(5)]))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryEntry {
	table_name: String,
	class_name: String,
	id: Option<RecordKey>,
	values: HashMap<String, FieldValue>,
}

impl MemoryEntry {
	pub fn new(table_name: impl Into<String>, class_name: impl Into<String>) -> Self {
		Self {
			table_name: table_name.into(),
			class_name: class_name.into(),
			id: None,
			values: HashMap::new(),
		}
	}

	pub fn with_id(mut self, id: RecordKey) -> Self {
		self.id = Some(id);
		self
	}

	pub fn with_value(mut self, field: impl Into<String>, value: FieldValue) -> Self {
		self.values.insert(field.into(), value);
		self
	}
}

impl Entry for MemoryEntry {
	fn table_name(&self) -> &str {
		&self.table_name
	}

	fn class_name(&self) -> &str {
		&self.class_name
	}

	fn id(&self) -> Option<RecordKey> {
		self.id.clone()
	}

	fn field_value(&self, field: &str) -> Option<FieldValue> {
		self.values.get(field).cloned()
	}

	fn set_field_value(&mut self, field: &str, keys: Vec<RecordKey>) {
		self.values
			.insert(field.to_string(), FieldValue::from_keys(keys));
	}
}
