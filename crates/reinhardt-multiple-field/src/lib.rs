//! # reinhardt-multiple-field
//!
//! Multiple relation selector field type for Reinhardt forms.
//!
//! The field lets an editor pick zero or more related records (tags,
//! categories, authors) for an entry. The selection is stored in a pivot table
//! named `<entry_table>_<field_name>` whose `sort_order` column keeps the
//! editor's ordering.
//!
//! ## Features
//!
//! - Related sources resolved by name or `namespace.stream` through an
//!   injected [`RecordSourceResolver`]
//! - Option maps built from a key column and a title expression (plain
//!   column, `{entry.field}` template or `relation::field` accessor), with a
//!   column projection fallback when evaluation fails
//! - Options memoized per render cycle in a [`RenderContext`]
//! - Cache tokens letting asynchronous widgets fetch the field configuration
//! - Post value parsing for tag inputs (comma separated) and list inputs
//! - `array`/`min`/`max` rules and a tera rendered value table
//!
//! ## Architecture
//!
//! ```text
//! reinhardt-multiple-field
//! ├── config      - FieldConfig, Mode
//! ├── settings    - crate-wide settings (cache prefix/TTL, views)
//! ├── record      - Record, RecordKey
//! ├── title       - title expressions
//! ├── options     - OptionMap and map building
//! ├── source      - RecordSource, resolver, registry
//! ├── handler     - option handlers and their registry
//! ├── render      - request-scoped render context
//! ├── relation    - pivot relation definition and SQL
//! ├── rules       - validation rules
//! ├── value_table - table picker components
//! ├── cache       - picker payload cache
//! ├── entry       - entry and form boundaries
//! └── field_type  - MultipleFieldType
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reinhardt_multiple_field::prelude::*;
//!
//! let sources = SourceRegistry::new();
//! sources.register(Arc::new(tags_source));
//!
//! let config = FieldConfig::new()
//!     .with_related("tags")
//!     .with_title_name("{entry.name}")
//!     .with_mode(Mode::Checkboxes)
//!     .with_max(5);
//!
//! let field = MultipleFieldType::new("tags", config, Arc::new(sources), cache)
//!     .with_entry(entry);
//!
//! let view = field.render_context().input_view(HtmlAttributes::new()).await?;
//! ```

pub mod attributes;
pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
pub mod field_type;
pub mod handler;
pub mod options;
pub mod record;
pub mod relation;
pub mod render;
pub mod rules;
pub mod settings;
pub mod source;
pub mod title;
pub mod value_table;

pub use attributes::HtmlAttributes;
pub use cache::{InMemoryOptionCache, OptionCache};
pub use config::{FieldConfig, Mode};
pub use entry::{Entry, FieldValue, FormBuilder, MemoryEntry};
pub use error::{MultipleFieldError, Result};
pub use field_type::MultipleFieldType;
pub use handler::{HandlerRegistry, OptionHandler, RelatedHandler};
pub use options::OptionMap;
pub use record::{Record, RecordKey};
pub use relation::{BelongsToMany, PivotRow};
pub use render::{InputView, RenderContext};
pub use rules::{Rule, RuleViolation};
pub use settings::MultipleFieldSettings;
pub use source::{MemorySource, RecordSource, RecordSourceResolver, SourceRegistry};
pub use title::{EvaluationError, TitleExpression};
pub use value_table::{DefaultValueTable, TableContext, ValueTable, ValueTableRegistry};

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::attributes::HtmlAttributes;
	pub use crate::cache::{InMemoryOptionCache, OptionCache};
	pub use crate::config::{FieldConfig, Mode};
	pub use crate::entry::{Entry, FieldValue, FormBuilder};
	pub use crate::error::{MultipleFieldError, Result};
	pub use crate::field_type::MultipleFieldType;
	pub use crate::record::{Record, RecordKey};
	pub use crate::source::{RecordSource, RecordSourceResolver, SourceRegistry};
}
