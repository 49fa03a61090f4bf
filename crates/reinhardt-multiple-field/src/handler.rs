//! Option handlers
//!
//! An option handler turns a field type into the option map its widgets
//! render. Handlers are looked up by name from a [`HandlerRegistry`]; the
//! field's `handler` option picks one, `related` being the default.

use crate::config::DEFAULT_HANDLER;
use crate::error::{MultipleFieldError, Result};
use crate::field_type::MultipleFieldType;
use crate::options::{OptionMap, build_option_map, project_option_map};
use crate::title::TitleExpression;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds the options offered by a multiple field.
#[async_trait]
pub trait OptionHandler: Send + Sync {
	async fn build_options(&self, field: &MultipleFieldType) -> Result<OptionMap>;
}

/// Offers every record of the related source.
///
/// Keys come from `key_name` (default: the source's key column) and labels
/// from `title_name` (default: the source's title column). When a key or
/// label cannot be evaluated for any record, the whole map is rebuilt from
/// the source's key and title columns instead; that failure is logged and
/// never returned. Loading the records is not retried and its errors
/// propagate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelatedHandler;

#[async_trait]
impl OptionHandler for RelatedHandler {
	async fn build_options(&self, field: &MultipleFieldType) -> Result<OptionMap> {
		let source = field.related_model()?;
		let records = source.all().await?;

		let key_name = field.config().key_name().unwrap_or(source.key_name());
		let title = TitleExpression::parse(
			field
				.config()
				.title_name()
				.unwrap_or(source.title_column()),
		);

		match build_option_map(&records, key_name, &title) {
			Ok(options) => {
				tracing::debug!(
					field = %field.field(),
					source = %source.name(),
					parsable = title.is_parsable(),
					count = options.len(),
					"built related options"
				);
				Ok(options)
			}
			Err(error) => {
				tracing::warn!(
					field = %field.field(),
					source = %source.name(),
					title = %title.as_str(),
					%error,
					"title evaluation failed, projecting key and title columns"
				);
				Ok(project_option_map(
					&records,
					source.key_name(),
					source.title_column(),
				))
			}
		}
	}
}

/// Named option handlers.
///
/// The default registry holds only [`RelatedHandler`] under `related`.
///
/// # Examples
///
/// ```
/// use reinhardt_multiple_field::handler::{HandlerRegistry, RelatedHandler};
/// use std::sync::Arc;
///
/// let mut registry = HandlerRegistry::default();
/// registry.register("tags", Arc::new(RelatedHandler));
///
/// assert_eq!(registry.names(), vec!["related", "tags"]);
/// assert!(registry.get("fields").is_err());
/// ```
#[derive(Clone)]
pub struct HandlerRegistry {
	handlers: HashMap<String, Arc<dyn OptionHandler>>,
}

impl Default for HandlerRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();
		registry.register(DEFAULT_HANDLER, Arc::new(RelatedHandler));
		registry
	}
}

impl HandlerRegistry {
	/// A registry without any handler
	pub fn empty() -> Self {
		Self {
			handlers: HashMap::new(),
		}
	}

	/// Register a handler, replacing any handler of the same name
	pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn OptionHandler>) {
		self.handlers.insert(name.into(), handler);
	}

	pub fn get(&self, name: &str) -> Result<Arc<dyn OptionHandler>> {
		self.handlers
			.get(name)
			.cloned()
			.ok_or_else(|| MultipleFieldError::UnknownHandler(name.to_string()))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.handlers.contains_key(name)
	}

	/// Registered names, sorted
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}
}
