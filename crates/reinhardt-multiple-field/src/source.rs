//! Related record sources
//!
//! The field type never reaches into an ORM directly. It asks an injected
//! [`RecordSourceResolver`] for the source named by the `related` option and
//! then reads rows through the [`RecordSource`] capability set.

use crate::error::{MultipleFieldError, Result};
use crate::record::Record;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A source of related records (a model table, a stream, a fixture list).
#[async_trait]
pub trait RecordSource: Send + Sync {
	/// Identifier the source was registered under
	fn name(&self) -> &str;

	/// Table holding the records
	fn table_name(&self) -> &str;

	/// Primary key column, used when `key_name` is not configured
	fn key_name(&self) -> &str {
		"id"
	}

	/// Column used for labels when `title_name` is not configured
	fn title_column(&self) -> &str {
		"id"
	}

	/// Load every record from the default query, unpaginated
	async fn all(&self) -> Result<Vec<Record>>;
}

impl fmt::Debug for dyn RecordSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RecordSource")
			.field("name", &self.name())
			.field("table_name", &self.table_name())
			.finish()
	}
}

/// Resolves the `related` option into a record source.
pub trait RecordSourceResolver: Send + Sync {
	/// Resolve a source registered under a direct name
	fn resolve(&self, name: &str) -> Result<Arc<dyn RecordSource>>;

	/// Resolve the entry source of a stream identified by namespace and slug
	fn resolve_stream(&self, namespace: &str, slug: &str) -> Result<Arc<dyn RecordSource>>;
}

/// Registry backed resolver.
///
/// Direct names and streams live in separate tables, mirroring how the
/// `related` option distinguishes `Model` from `namespace.stream` references.
///
/// # Examples
///
/// ```
/// use reinhardt_multiple_field::source::{MemorySource, RecordSourceResolver, SourceRegistry};
/// use std::sync::Arc;
///
/// let registry = SourceRegistry::new();
/// registry.register(Arc::new(MemorySource::new("tags", "blog_tags")));
/// registry.register_stream("blog", "categories", Arc::new(MemorySource::new("categories", "blog_categories")));
///
/// assert_eq!(registry.resolve("tags").unwrap().table_name(), "blog_tags");
/// assert_eq!(registry.resolve_stream("blog", "categories").unwrap().name(), "categories");
/// assert!(registry.resolve("authors").is_err());
/// ```
#[derive(Default)]
pub struct SourceRegistry {
	sources: RwLock<HashMap<String, Arc<dyn RecordSource>>>,
	streams: RwLock<HashMap<(String, String), Arc<dyn RecordSource>>>,
}

impl SourceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a source under its own name, replacing any previous one
	pub fn register(&self, source: Arc<dyn RecordSource>) {
		self.sources
			.write()
			.insert(source.name().to_string(), source);
	}

	/// Register the entry source of a stream
	pub fn register_stream(
		&self,
		namespace: impl Into<String>,
		slug: impl Into<String>,
		source: Arc<dyn RecordSource>,
	) {
		self.streams
			.write()
			.insert((namespace.into(), slug.into()), source);
	}

	pub fn is_registered(&self, name: &str) -> bool {
		self.sources.read().contains_key(name)
	}
}

impl RecordSourceResolver for SourceRegistry {
	fn resolve(&self, name: &str) -> Result<Arc<dyn RecordSource>> {
		self.sources
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| MultipleFieldError::UnknownRelated(name.to_string()))
	}

	fn resolve_stream(&self, namespace: &str, slug: &str) -> Result<Arc<dyn RecordSource>> {
		self.streams
			.read()
			.get(&(namespace.to_string(), slug.to_string()))
			.cloned()
			.ok_or_else(|| MultipleFieldError::StreamNotFound {
				namespace: namespace.to_string(),
				slug: slug.to_string(),
			})
	}
}

/// Record source holding its rows in memory.
///
/// Useful for static choice lists and as a stand-in for a database table.
pub struct MemorySource {
	name: String,
	table_name: String,
	key_name: String,
	title_column: String,
	records: RwLock<Vec<Record>>,
}

impl MemorySource {
	pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			table_name: table_name.into(),
			key_name: "id".to_string(),
			title_column: "id".to_string(),
			records: RwLock::new(Vec::new()),
		}
	}

	pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
		self.key_name = key_name.into();
		self
	}

	pub fn with_title_column(mut self, title_column: impl Into<String>) -> Self {
		self.title_column = title_column.into();
		self
	}

	pub fn with_records(self, records: Vec<Record>) -> Self {
		*self.records.write() = records;
		self
	}

	/// Append a record
	pub fn push(&self, record: Record) {
		self.records.write().push(record);
	}
}

#[async_trait]
impl RecordSource for MemorySource {
	fn name(&self) -> &str {
		&self.name
	}

	fn table_name(&self) -> &str {
		&self.table_name
	}

	fn key_name(&self) -> &str {
		&self.key_name
	}

	fn title_column(&self) -> &str {
		&self.title_column
	}

	async fn all(&self) -> Result<Vec<Record>> {
		Ok(self.records.read().clone())
	}
}
