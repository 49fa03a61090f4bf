//! Error types for the multiple field type.
//!
//! Label evaluation failures are not part of this enum: they are recovered
//! inside the option handler and live in [`crate::title::EvaluationError`].

use thiserror::Error;

/// Result type for multiple field operations
pub type Result<T> = std::result::Result<T, MultipleFieldError>;

/// Errors raised while configuring, resolving or rendering a multiple field.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MultipleFieldError {
	/// The `related` option is absent from the field configuration
	#[error("Config [related] is required.")]
	MissingRelated,

	/// No record source is registered under the configured name
	#[error("related record source not found: {0}")]
	UnknownRelated(String),

	/// A `namespace.stream` reference did not match any registered stream
	#[error("stream not found: {namespace}.{slug}")]
	StreamNotFound {
		/// Stream namespace.
		namespace: String,
		/// Stream slug.
		slug: String,
	},

	/// No option handler is registered under the configured name
	#[error("option handler not registered: {0}")]
	UnknownHandler(String),

	/// No value table component is registered under the configured name
	#[error("value table not registered: {0}")]
	UnknownValueTable(String),

	/// The field configuration could not be parsed
	#[error("invalid field configuration: {0}")]
	InvalidConfig(String),

	/// The field type is not bound to an entry
	#[error("field '{0}' is not bound to an entry")]
	MissingEntry(String),

	/// The related record source failed to load records
	#[error("record source error: {0}")]
	Source(String),

	/// The cache backend rejected an operation
	#[error("cache error: {0}")]
	Cache(String),

	/// The value table failed to render
	#[error("value table error: {0}")]
	Render(String),
}

impl From<toml::de::Error> for MultipleFieldError {
	fn from(err: toml::de::Error) -> Self {
		Self::InvalidConfig(err.to_string())
	}
}

impl From<serde_json::Error> for MultipleFieldError {
	fn from(err: serde_json::Error) -> Self {
		Self::InvalidConfig(err.to_string())
	}
}

impl From<tera::Error> for MultipleFieldError {
	fn from(err: tera::Error) -> Self {
		Self::Render(err.to_string())
	}
}
