//! Value tables
//!
//! The table picker shows the currently selected related records as a table.
//! A field may name its own component through the `value_table` option;
//! otherwise [`DefaultValueTable`] renders a key/label table with tera.

use crate::config::FieldConfig;
use crate::error::{MultipleFieldError, Result};
use crate::record::RecordKey;
use crate::source::RecordSource;
use crate::title::{TitleExpression, display_value};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Context, Tera};

const DEFAULT_TEMPLATE: &str = r#"<table class="table table-multiple" data-field="{{ field }}">
<thead><tr><th>{{ key_name }}</th><th>{{ title_name }}</th></tr></thead>
<tbody>
{%- for row in rows %}
<tr data-key="{{ row.key }}"><td>{{ row.key }}</td><td>{{ row.label }}</td></tr>
{%- endfor %}
</tbody>
</table>"#;

/// Everything a value table needs to render a field's selection
#[derive(Clone)]
pub struct TableContext {
	pub field: String,
	pub config: FieldConfig,
	pub source: Arc<dyn RecordSource>,
	pub selected: Vec<RecordKey>,
}

/// Renders the table picker content for a field.
#[async_trait]
pub trait ValueTable: Send + Sync {
	async fn render(&self, context: &TableContext) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct TableRow {
	key: String,
	label: String,
}

/// Key/label table of the selected records, in selection order.
///
/// Selected keys with no matching record are left out. Labels fall back to
/// the source's title column when the title expression fails for a row.
#[derive(Debug, Clone)]
pub struct DefaultValueTable {
	template: String,
}

impl Default for DefaultValueTable {
	fn default() -> Self {
		Self {
			template: DEFAULT_TEMPLATE.to_string(),
		}
	}
}

impl DefaultValueTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the tera template; it receives `field`, `key_name`,
	/// `title_name` and `rows` (each with `key` and `label`)
	pub fn with_template(mut self, template: impl Into<String>) -> Self {
		self.template = template.into();
		self
	}
}

#[async_trait]
impl ValueTable for DefaultValueTable {
	async fn render(&self, context: &TableContext) -> Result<String> {
		let source = &context.source;
		let key_name = context.config.key_name().unwrap_or(source.key_name());
		let title_name = context
			.config
			.title_name()
			.unwrap_or(source.title_column());
		let title = TitleExpression::parse(title_name);

		let records = source.all().await?;
		let rows: Vec<TableRow> = context
			.selected
			.iter()
			.filter_map(|selected| {
				let record = records.iter().find(|record| {
					record
						.get(key_name)
						.and_then(RecordKey::from_value)
						.is_some_and(|key| key.to_string() == selected.to_string())
				})?;
				let label = title.evaluate(record).unwrap_or_else(|_| {
					record
						.get(source.title_column())
						.and_then(display_value)
						.unwrap_or_default()
				});
				Some(TableRow {
					key: selected.to_string(),
					label,
				})
			})
			.collect();

		let mut tera_context = Context::new();
		tera_context.insert("field", &context.field);
		tera_context.insert("key_name", key_name);
		tera_context.insert("title_name", title_name);
		tera_context.insert("rows", &rows);

		Ok(Tera::one_off(&self.template, &tera_context, true)?)
	}
}

/// Named value table components
#[derive(Clone)]
pub struct ValueTableRegistry {
	tables: HashMap<String, Arc<dyn ValueTable>>,
	fallback: Arc<dyn ValueTable>,
}

impl Default for ValueTableRegistry {
	fn default() -> Self {
		Self {
			tables: HashMap::new(),
			fallback: Arc::new(DefaultValueTable::default()),
		}
	}
}

impl ValueTableRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, name: impl Into<String>, table: Arc<dyn ValueTable>) {
		self.tables.insert(name.into(), table);
	}

	/// Replace the table used when a field names none
	pub fn with_fallback(mut self, table: Arc<dyn ValueTable>) -> Self {
		self.fallback = table;
		self
	}

	/// Resolve the configured table, or the fallback when none is configured
	pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn ValueTable>> {
		match name {
			None => Ok(Arc::clone(&self.fallback)),
			Some(name) => self
				.tables
				.get(name)
				.cloned()
				.ok_or_else(|| MultipleFieldError::UnknownValueTable(name.to_string())),
		}
	}
}
