//! Title expressions
//!
//! A title expression turns a related record into the label shown to the
//! editor. It is either a plain column name (`name`) or a parsable expression:
//!
//! - a template with `{...}` placeholders, e.g. `{entry.name} ({entry.slug})`,
//!   where the optional `entry.` prefix refers to the record itself;
//! - a double-colon accessor reading a nested attribute, e.g. `author::name`.
//!
//! Evaluation failures are reported as [`EvaluationError`] so callers can
//! choose a fallback instead of failing the whole render.

use crate::record::Record;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\{\s*([A-Za-z_][A-Za-z0-9_]*(?:(?:\.|::)[A-Za-z0-9_]+)*)\s*\}")
		.expect("PLACEHOLDER_REGEX: invalid regex pattern")
});

/// Errors raised while evaluating a key or title expression against a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
	/// The record has no value at the requested path
	#[error("field '{0}' is not present on the record")]
	MissingField(String),

	/// The value exists but cannot be rendered as a label or used as a key
	#[error("field '{0}' is not a scalar value")]
	NotScalar(String),

	/// The expression itself is malformed (unbalanced braces, empty placeholder)
	#[error("malformed title expression '{expression}': {reason}")]
	Malformed {
		/// The offending expression.
		expression: String,
		/// What is wrong with it.
		reason: String,
	},
}

/// Whether an expression needs parsing rather than a direct column read.
///
/// # Examples
///
/// ```
/// use reinhardt_multiple_field::title::is_parsable;
///
/// assert!(!is_parsable("name"));
/// assert!(is_parsable("{entry.name}"));
/// assert!(is_parsable("author::name"));
/// ```
pub fn is_parsable(expression: &str) -> bool {
	expression.contains('{') || expression.contains("::")
}

/// A label rule for related records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleExpression {
	/// Read a single column (dotted paths allowed)
	Column(String),
	/// Evaluate a template or accessor against the record
	Template(String),
}

impl TitleExpression {
	/// Classify an expression
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::TitleExpression;
	///
	/// assert_eq!(TitleExpression::parse("name"), TitleExpression::Column("name".into()));
	/// assert!(TitleExpression::parse("{entry.name}").is_parsable());
	/// ```
	pub fn parse(expression: &str) -> Self {
		if is_parsable(expression) {
			Self::Template(expression.to_string())
		} else {
			Self::Column(expression.trim().to_string())
		}
	}

	pub fn is_parsable(&self) -> bool {
		matches!(self, Self::Template(_))
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Column(column) => column,
			Self::Template(template) => template,
		}
	}

	/// Evaluate the expression against a record.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_multiple_field::{Record, TitleExpression};
	/// use serde_json::json;
	///
	/// let record = Record::from_value(json!({
	///     "name": "Rust",
	///     "author": {"name": "Ferris"},
	/// }))
	/// .unwrap();
	///
	/// let column = TitleExpression::parse("name");
	/// assert_eq!(column.evaluate(&record).unwrap(), "Rust");
	///
	/// let template = TitleExpression::parse("{entry.name} by {author::name}");
	/// assert_eq!(template.evaluate(&record).unwrap(), "Rust by Ferris");
	///
	/// let accessor = TitleExpression::parse("author::name");
	/// assert_eq!(accessor.evaluate(&record).unwrap(), "Ferris");
	/// ```
	pub fn evaluate(&self, record: &Record) -> Result<String, EvaluationError> {
		match self {
			Self::Column(column) => read_label(record, column),
			Self::Template(template) if template.contains('{') => render_template(template, record),
			Self::Template(accessor) => read_label(record, &normalize_path(accessor.trim())),
		}
	}
}

/// Read a value at `path` and render it as label text
pub(crate) fn read_label(record: &Record, path: &str) -> Result<String, EvaluationError> {
	let value = record
		.get(path)
		.ok_or_else(|| EvaluationError::MissingField(path.to_string()))?;

	display_value(value).ok_or_else(|| EvaluationError::NotScalar(path.to_string()))
}

/// Render a scalar as label text; `None` for arrays and objects
pub(crate) fn display_value(value: &Value) -> Option<String> {
	match value {
		Value::Null => Some(String::new()),
		Value::String(s) => Some(s.clone()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Number(n) => Some(n.to_string()),
		Value::Array(_) | Value::Object(_) => None,
	}
}

fn normalize_path(path: &str) -> String {
	let path = path.replace("::", ".");
	match path.strip_prefix("entry.") {
		Some(rest) => rest.to_string(),
		None => path,
	}
}

fn render_template(template: &str, record: &Record) -> Result<String, EvaluationError> {
	let mut rendered = String::with_capacity(template.len());
	let mut last = 0;

	for captures in PLACEHOLDER_REGEX.captures_iter(template) {
		let (Some(whole), Some(path)) = (captures.get(0), captures.get(1)) else {
			continue;
		};

		let literal = &template[last..whole.start()];
		check_literal(template, literal)?;
		rendered.push_str(literal);
		rendered.push_str(&read_label(record, &normalize_path(path.as_str()))?);
		last = whole.end();
	}

	let tail = &template[last..];
	check_literal(template, tail)?;
	rendered.push_str(tail);

	Ok(rendered)
}

// Braces outside a recognized placeholder mean the template is broken.
fn check_literal(template: &str, literal: &str) -> Result<(), EvaluationError> {
	if literal.contains('{') || literal.contains('}') {
		return Err(EvaluationError::Malformed {
			expression: template.to_string(),
			reason: "unbalanced or empty placeholder".to_string(),
		});
	}
	Ok(())
}
