//! The multiple relation field type
//!
//! [`MultipleFieldType`] lets an editor pick zero or more related records for
//! an entry. It resolves the related source from its configuration, offers
//! the source's records as options, parses the submitted selection, and
//! describes the sorted pivot relation the selection is stored in.
//!
//! ```rust,ignore
//! let field = MultipleFieldType::new("tags", config, resolver, cache)
//!     .with_entry(entry);
//!
//! // Render
//! let context = field.render_context();
//! let view = context.input_view(HtmlAttributes::new()).await?;
//!
//! // Submit
//! let field = field.with_post(json!("3,1,2"));
//! field.handle(&mut form);
//! ```

use crate::attributes::HtmlAttributes;
use crate::cache::OptionCache;
use crate::config::{FieldConfig, Mode};
use crate::entry::{Entry, FieldValue, FormBuilder};
use crate::error::{MultipleFieldError, Result};
use crate::handler::HandlerRegistry;
use crate::record::{Record, RecordKey, is_truthy};
use crate::relation::BelongsToMany;
use crate::render::RenderContext;
use crate::rules::Rule;
use crate::settings::MultipleFieldSettings;
use crate::source::{RecordSource, RecordSourceResolver};
use crate::value_table::{TableContext, ValueTableRegistry};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Columns left out when comparing related records between revisions
pub const BOOKKEEPING_COLUMNS: [&str; 8] = [
	"id",
	"sort_order",
	"created_at",
	"created_by_id",
	"updated_at",
	"updated_by_id",
	"deleted_at",
	"deleted_by_id",
];

/// A field selecting many related records through a pivot table.
pub struct MultipleFieldType {
	field: String,
	config: FieldConfig,
	settings: Arc<MultipleFieldSettings>,
	resolver: Arc<dyn RecordSourceResolver>,
	cache: Arc<dyn OptionCache>,
	handlers: HandlerRegistry,
	value_tables: ValueTableRegistry,
	entry: Option<Arc<dyn Entry>>,
	value: Option<FieldValue>,
	post: Option<Value>,
	prefix: Option<String>,
	input_view: Option<String>,
}

impl MultipleFieldType {
	/// Create a field type with the default settings, handlers and value tables
	pub fn new(
		field: impl Into<String>,
		config: FieldConfig,
		resolver: Arc<dyn RecordSourceResolver>,
		cache: Arc<dyn OptionCache>,
	) -> Self {
		Self {
			field: field.into(),
			config,
			settings: Arc::new(MultipleFieldSettings::default()),
			resolver,
			cache,
			handlers: HandlerRegistry::default(),
			value_tables: ValueTableRegistry::default(),
			entry: None,
			value: None,
			post: None,
			prefix: None,
			input_view: None,
		}
	}

	pub fn with_settings(mut self, settings: Arc<MultipleFieldSettings>) -> Self {
		self.settings = settings;
		self
	}

	pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
		self.handlers = handlers;
		self
	}

	pub fn with_value_tables(mut self, value_tables: ValueTableRegistry) -> Self {
		self.value_tables = value_tables;
		self
	}

	/// Bind the field to the entry being edited
	pub fn with_entry(mut self, entry: Arc<dyn Entry>) -> Self {
		self.entry = Some(entry);
		self
	}

	/// Override the value read from the entry
	pub fn with_value(mut self, value: FieldValue) -> Self {
		self.value = Some(value);
		self
	}

	/// Attach the submitted form data for this field
	pub fn with_post(mut self, post: Value) -> Self {
		self.post = Some(post);
		self
	}

	/// Prefix of the input name, e.g. the form prefix
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Use a fixed input view instead of the per-mode one
	pub fn with_input_view(mut self, view: impl Into<String>) -> Self {
		self.input_view = Some(view.into());
		self
	}

	pub fn field(&self) -> &str {
		&self.field
	}

	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	pub fn settings(&self) -> &MultipleFieldSettings {
		&self.settings
	}

	pub fn handler_registry(&self) -> &HandlerRegistry {
		&self.handlers
	}

	/// Names of the registered option handlers
	pub fn handlers(&self) -> Vec<&str> {
		self.handlers.names()
	}

	/// The field stores nothing on the entry table itself
	pub fn column_type(&self) -> Option<&'static str> {
		None
	}

	pub fn entry(&self) -> Result<&Arc<dyn Entry>> {
		self.entry
			.as_ref()
			.ok_or_else(|| MultipleFieldError::MissingEntry(self.field.clone()))
	}

	/// Resolve the `related` option into a record source.
	///
	/// `namespace.stream` references go through the stream lookup, anything
	/// else is resolved by name.
	pub fn related_model(&self) -> Result<Arc<dyn RecordSource>> {
		let related = self
			.config
			.related()
			.ok_or(MultipleFieldError::MissingRelated)?;

		match related.split_once('.') {
			Some((namespace, slug)) if !namespace.is_empty() => {
				tracing::debug!(field = %self.field, namespace, slug, "resolving related stream");
				self.resolver.resolve_stream(namespace, slug)
			}
			_ => {
				tracing::debug!(field = %self.field, related, "resolving related source");
				self.resolver.resolve(related)
			}
		}
	}

	pub fn pivot_table_name(&self) -> Result<String> {
		Ok(BelongsToMany::pivot_table_name(
			self.entry()?.table_name(),
			&self.field,
		))
	}

	/// The entry → related association, ordered by `sort_order` ascending
	pub fn relation(&self) -> Result<BelongsToMany> {
		let entry = self.entry()?;
		let related = self.related_model()?;

		Ok(BelongsToMany::new(
			entry.table_name(),
			&self.field,
			related.table_name(),
			related.key_name(),
		))
	}

	/// Validation rules: `array` plus the configured bounds
	pub fn rules(&self) -> Vec<Rule> {
		let mut rules = Vec::new();

		if self.config.required() {
			rules.push(Rule::Required);
		}
		rules.push(Rule::Array);

		if let Some(min) = self.config.min() {
			rules.push(Rule::Min(min));
		}
		if let Some(max) = self.config.max() {
			rules.push(Rule::Max(max));
		}

		rules
	}

	/// Current value: the explicit override, else the entry's value
	pub fn value(&self) -> FieldValue {
		if let Some(value) = &self.value {
			return value.clone();
		}

		self.entry
			.as_ref()
			.and_then(|entry| entry.field_value(&self.field))
			.unwrap_or_default()
	}

	/// Selected keys, in stored order, without empty entries
	pub fn ids(&self) -> Vec<RecordKey> {
		match self.value() {
			FieldValue::Records(records) => records
				.iter()
				.filter_map(|record| record.id())
				.filter(|id| is_truthy(id))
				.filter_map(RecordKey::from_value)
				.collect(),
			FieldValue::Keys(keys) => keys
				.iter()
				.filter(|key| is_truthy(key))
				.filter_map(RecordKey::from_value)
				.collect(),
		}
	}

	/// The submitted selection.
	///
	/// Lists are filtered of empty entries. Strings, as posted by tag
	/// inputs, are split on commas before filtering.
	pub fn post_value(&self) -> Vec<RecordKey> {
		match &self.post {
			None | Some(Value::Null) => Vec::new(),
			Some(Value::Array(items)) => items
				.iter()
				.filter(|item| is_truthy(item))
				.filter_map(RecordKey::from_value)
				.collect(),
			Some(Value::String(joined)) => joined
				.split(',')
				.map(str::trim)
				.filter(|segment| !segment.is_empty() && *segment != "0")
				.map(RecordKey::from)
				.collect(),
			Some(other) if is_truthy(other) => RecordKey::from_value(other).into_iter().collect(),
			Some(_) => Vec::new(),
		}
	}

	/// Assign the submitted selection to the form's entry.
	///
	/// Must run before the entry is saved; the entry turns the keys into
	/// pivot rows when it persists.
	pub fn handle(&self, builder: &mut dyn FormBuilder) {
		let keys = self.post_value();
		tracing::debug!(field = %self.field, count = keys.len(), "assigning selection to entry");
		builder
			.form_entry_mut()
			.set_field_value(&self.field, keys);
	}

	/// Render the table picker for the current selection
	pub async fn table(&self) -> Result<String> {
		let source = self.related_model()?;
		let table = self.value_tables.resolve(self.config.value_table())?;

		let context = TableContext {
			field: self.field.clone(),
			config: self.config.clone(),
			source,
			selected: self.ids(),
		};

		table.render(&context).await
	}

	/// Related records reduced to the attributes that matter for revision diffs
	pub fn to_array_for_comparison(&self, related: &[Record]) -> Vec<Map<String, Value>> {
		related
			.iter()
			.map(|record| {
				let mut attributes = record.attributes().clone();
				for column in BOOKKEEPING_COLUMNS {
					attributes.remove(column);
				}
				attributes
			})
			.collect()
	}

	/// Token identifying this configuration.
	///
	/// Stores the configuration, field name and entry type in the cache under
	/// the token so asynchronous widgets can fetch their data later. Equal
	/// configurations produce equal tokens and share one cache entry.
	pub async fn key(&self) -> Result<String> {
		let token = hex::encode(Sha256::digest(self.config.canonical_json().as_bytes()));

		let mut payload = match self.config.to_value() {
			Value::Object(map) => map,
			_ => Map::new(),
		};
		payload.insert("field".to_string(), Value::String(self.field.clone()));
		payload.insert(
			"entry".to_string(),
			self.entry
				.as_ref()
				.map(|entry| Value::String(entry.class_name().to_string()))
				.unwrap_or(Value::Null),
		);

		self.cache
			.put(
				&self.settings.cache_key(&token),
				Value::Object(payload),
				self.settings.cache_ttl(),
			)
			.await?;

		tracing::debug!(field = %self.field, %token, "stored picker payload");
		Ok(token)
	}

	pub fn input_name(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}{}", prefix, self.field),
			None => self.field.clone(),
		}
	}

	pub fn placeholder(&self) -> Option<&str> {
		self.config.placeholder()
	}

	/// CSS class of the input
	pub fn class(&self) -> Option<String> {
		if let Some(class) = self.config.class() {
			return Some(class.to_string());
		}

		match self.config.mode() {
			Mode::Dropdown => Some(self.settings.dropdown_class.clone()),
			_ => None,
		}
	}

	/// HTML attributes of the input.
	///
	/// `overrides` win over computed values; empty values are dropped.
	pub async fn attributes(&self, overrides: HtmlAttributes) -> Result<HtmlAttributes> {
		let input_name = self.input_name();

		let base = HtmlAttributes::new()
			.with("id", input_name.clone())
			.with("class", self.class())
			.with("required", self.config.required());

		let computed = HtmlAttributes::new()
			.with("data-key", self.key().await?)
			.with("name", format!("{}[]", input_name))
			.with("data-placeholder", self.placeholder());

		Ok(base.merge(computed).merge(overrides).without_empty())
	}

	/// View rendering the input for the configured mode
	pub fn input_view(&self) -> String {
		match &self.input_view {
			Some(view) => view.clone(),
			None => format!("{}::{}", self.settings.view_namespace, self.config.mode()),
		}
	}

	/// View rendering the list filter
	pub fn filter_view(&self) -> String {
		format!("{}::filter", self.settings.view_namespace)
	}

	/// Start a render cycle; options are built at most once per context
	pub fn render_context(&self) -> RenderContext<'_> {
		RenderContext::new(self)
	}
}
